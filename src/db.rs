use crate::error::ApiError;
use crate::models::CatalogItem;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

const CATALOG_COLUMNS: &str = "id, name, category, unit_rate, labor_rate, created_at, updated_at";

/// Creates and configures a PostgreSQL connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
///
/// # Returns
/// * `Result<DbPool>` - Configured connection pool or error
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Check if a catalog item with the given name already exists
pub async fn check_duplicate_catalog_item(pool: &PgPool, name: &str) -> Result<bool, ApiError> {
    tracing::debug!("Checking for duplicate catalog item: {}", name);

    let exists: Option<bool> =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM catalog_items WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await?;

    let is_duplicate = exists.unwrap_or(false);
    if is_duplicate {
        tracing::debug!("Duplicate catalog item found: {}", name);
    }

    Ok(is_duplicate)
}

/// Check if a catalog item name exists on a different row
///
/// Used for update operations so an item can keep its own name.
pub async fn check_duplicate_catalog_item_excluding_id(
    pool: &PgPool,
    name: &str,
    exclude_id: i32,
) -> Result<bool, ApiError> {
    let exists: Option<bool> = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM catalog_items WHERE name = $1 AND id != $2)",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    Ok(exists.unwrap_or(false))
}

/// Fetch the full catalog
///
/// The discount engine checks category completeness against the whole
/// catalog, so pricing always starts from this list.
pub async fn fetch_catalog(pool: &PgPool) -> Result<Vec<CatalogItem>, sqlx::Error> {
    sqlx::query_as::<_, CatalogItem>(&format!(
        "SELECT {} FROM catalog_items ORDER BY id",
        CATALOG_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

/// Fetch catalog items by id
pub async fn fetch_catalog_by_ids(
    pool: &PgPool,
    ids: &[i32],
) -> Result<Vec<CatalogItem>, sqlx::Error> {
    sqlx::query_as::<_, CatalogItem>(&format!(
        "SELECT {} FROM catalog_items WHERE id = ANY($1)",
        CATALOG_COLUMNS
    ))
    .bind(ids)
    .fetch_all(pool)
    .await
}

/// Check if a client exists
pub async fn client_exists(pool: &PgPool, client_id: i32) -> Result<bool, sqlx::Error> {
    let exists: Option<bool> =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(client_id)
            .fetch_one(pool)
            .await?;

    Ok(exists.unwrap_or(false))
}
