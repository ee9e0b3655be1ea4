mod clients;
mod db;
mod error;
mod models;
mod pricing;
mod proposals;
mod query;
mod quotes;
mod validation;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use validator::Validate;

use clients::ClientsRepository;
use error::ApiError;
use models::{CatalogItem, CreateCatalogItem, ItemCategory, UpdateCatalogItem};
use pricing::PricingDefaultsStore;
use proposals::{ProposalService, ProposalsRepository};
use query::{QueryParams, QueryValidator};
use quotes::{QuoteService, QuotesRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        create_catalog_item,
        get_catalog_item_by_id,
        update_catalog_item,
        delete_catalog_item,
    ),
    components(
        schemas(CatalogItem, CreateCatalogItem, UpdateCatalogItem, ItemCategory)
    ),
    tags(
        (name = "catalog", description = "Equipment/service catalog management endpoints")
    ),
    info(
        title = "Servtec API",
        version = "1.0.0",
        description = "Quotation and contract-proposal backend for equipment services",
        contact(
            name = "API Support",
            email = "suporte@servtec.com.br"
        )
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub defaults_store: Arc<PricingDefaultsStore>,
    pub quote_service: QuoteService,
    pub proposal_service: ProposalService,
    pub clients_repo: ClientsRepository,
}

impl AppState {
    /// Wire all repositories and services onto a connection pool
    pub fn new(db: PgPool) -> Self {
        let defaults_store = Arc::new(PricingDefaultsStore::new(db.clone()));
        let quote_service = QuoteService::new(
            db.clone(),
            QuotesRepository::new(db.clone()),
            defaults_store.clone(),
        );
        let proposal_service = ProposalService::new(
            db.clone(),
            ProposalsRepository::new(db.clone()),
            defaults_store.clone(),
        );
        let clients_repo = ClientsRepository::new(db.clone());

        Self {
            db,
            defaults_store,
            quote_service,
            proposal_service,
            clients_repo,
        }
    }
}

/// Handler for POST /api/catalog
/// Creates a new catalog item
#[utoipa::path(
    post,
    path = "/api/catalog",
    request_body = CreateCatalogItem,
    responses(
        (status = 201, description = "Catalog item created successfully", body = CatalogItem),
        (status = 400, description = "Invalid input data", body = String, example = json!({"error": "Unit rate must be a positive number"})),
        (status = 409, description = "Duplicate item name", body = String, example = json!({"error": "Catalog item already exists"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "catalog"
)]
async fn create_catalog_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateCatalogItem>,
) -> Result<(StatusCode, Json<CatalogItem>), ApiError> {
    tracing::debug!("Creating new catalog item: {}", payload.name);

    // Validate the request using validator crate
    payload.validate()?;

    // Check for duplicate item name
    if db::check_duplicate_catalog_item(&state.db, &payload.name).await? {
        tracing::warn!("Attempt to create duplicate catalog item: {}", payload.name);
        return Err(ApiError::Conflict {
            message: format!("Catalog item with name '{}' already exists", payload.name),
        });
    }

    let item = sqlx::query_as::<_, CatalogItem>(
        r#"
        INSERT INTO catalog_items (name, category, unit_rate, labor_rate)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, category, unit_rate, labor_rate, created_at, updated_at
        "#,
    )
    .bind(&payload.name)
    .bind(payload.category)
    .bind(payload.unit_rate)
    .bind(payload.labor_rate)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created catalog item with id: {}", item.id);
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for GET /api/catalog with query parameters
/// Supports search, category filtering, rate ranges, sorting, and pagination
async fn get_catalog_with_query(
    Query(params): Query<QueryParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    tracing::debug!("Fetching catalog with query parameters: {:?}", params);

    // 1. Validate query parameters
    let validated = QueryValidator::validate(params).map_err(|e| ApiError::BadRequest(e.message))?;

    // 2. Build SQL query
    let mut builder = query::SQLQueryBuilder::new();

    if let Some(search) = validated.search {
        builder.add_search_filter(&search);
    }
    if let Some(category) = validated.category {
        builder.add_category_filter(&category);
    }
    builder.add_rate_range(validated.min_rate, validated.max_rate);

    if let Some(sort_field) = validated.sort_field {
        builder.set_sort(sort_field, validated.sort_order);
    }

    builder.set_pagination(validated.page, validated.limit);

    let (query_str, params) = builder.build();

    // 3. Execute with parameterized binding
    let mut query = sqlx::query_as::<_, CatalogItem>(&query_str);

    for param in params {
        query = query.bind(param);
    }

    let items = query.fetch_all(&state.db).await?;

    tracing::debug!("Query returned {} catalog items", items.len());
    Ok(Json(items))
}

/// Handler for GET /api/catalog/:id
/// Retrieves a specific catalog item by ID
#[utoipa::path(
    get,
    path = "/api/catalog/{id}",
    params(
        ("id" = i32, Path, description = "Catalog item ID")
    ),
    responses(
        (status = 200, description = "Catalog item found", body = CatalogItem),
        (status = 404, description = "Catalog item not found", body = String, example = json!({"error": "CatalogItem with id 1 not found"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "catalog"
)]
async fn get_catalog_item_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CatalogItem>, ApiError> {
    tracing::debug!("Fetching catalog item with id: {}", id);

    let item = sqlx::query_as::<_, CatalogItem>(
        r#"
        SELECT id, name, category, unit_rate, labor_rate, created_at, updated_at
        FROM catalog_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| {
        tracing::debug!("Catalog item with id {} not found", id);
        ApiError::NotFound {
            resource: "CatalogItem".to_string(),
            id: id.to_string(),
        }
    })?;

    tracing::debug!("Successfully retrieved catalog item: {}", item.name);
    Ok(Json(item))
}

/// Handler for PUT /api/catalog/:id
/// Updates an existing catalog item
#[utoipa::path(
    put,
    path = "/api/catalog/{id}",
    params(
        ("id" = i32, Path, description = "Catalog item ID")
    ),
    request_body = UpdateCatalogItem,
    responses(
        (status = 200, description = "Catalog item updated successfully", body = CatalogItem),
        (status = 400, description = "Invalid input data", body = String),
        (status = 404, description = "Catalog item not found", body = String),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "catalog"
)]
async fn update_catalog_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCatalogItem>,
) -> Result<Json<CatalogItem>, ApiError> {
    tracing::debug!("Updating catalog item with id: {}", id);

    payload.validate()?;

    // Multi-step update runs in a transaction so a failed duplicate check or
    // write rolls back cleanly
    let mut tx = state.db.begin().await?;

    let existing = sqlx::query_as::<_, CatalogItem>(
        "SELECT id, name, category, unit_rate, labor_rate, created_at, updated_at \
         FROM catalog_items WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        tracing::debug!("Catalog item with id {} not found for update", id);
        ApiError::NotFound {
            resource: "CatalogItem".to_string(),
            id: id.to_string(),
        }
    })?;

    // Renames are checked against the rest of the catalog
    if let Some(ref new_name) = payload.name {
        if new_name != &existing.name {
            let duplicate_exists: Option<bool> = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM catalog_items WHERE name = $1 AND id != $2)",
            )
            .bind(new_name)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if duplicate_exists.unwrap_or(false) {
                tracing::warn!(
                    "Attempt to update catalog item {} to duplicate name: {}",
                    id,
                    new_name
                );
                return Err(ApiError::Conflict {
                    message: format!("Catalog item with name '{}' already exists", new_name),
                });
            }
        }
    }

    let updated = sqlx::query_as::<_, CatalogItem>(
        r#"
        UPDATE catalog_items
        SET name = $1,
            category = $2,
            unit_rate = $3,
            labor_rate = $4,
            updated_at = NOW()
        WHERE id = $5
        RETURNING id, name, category, unit_rate, labor_rate, created_at, updated_at
        "#,
    )
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.category.unwrap_or(existing.category))
    .bind(payload.unit_rate.unwrap_or(existing.unit_rate))
    .bind(payload.labor_rate.unwrap_or(existing.labor_rate))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Successfully updated catalog item with id: {}", id);
    Ok(Json(updated))
}

/// Handler for DELETE /api/catalog/:id
/// Deletes a catalog item
#[utoipa::path(
    delete,
    path = "/api/catalog/{id}",
    params(
        ("id" = i32, Path, description = "Catalog item ID")
    ),
    responses(
        (status = 204, description = "Catalog item deleted successfully"),
        (status = 404, description = "Catalog item not found", body = String),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "catalog"
)]
async fn delete_catalog_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting catalog item with id: {}", id);

    let result = sqlx::query("DELETE FROM catalog_items WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!("Catalog item with id {} not found for deletion", id);
        return Err(ApiError::NotFound {
            resource: "CatalogItem".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Successfully deleted catalog item with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = AppState::new(db);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Catalog
        .route("/api/catalog", post(create_catalog_item))
        .route("/api/catalog", get(get_catalog_with_query))
        .route("/api/catalog/:id", get(get_catalog_item_by_id))
        .route("/api/catalog/:id", put(update_catalog_item))
        .route("/api/catalog/:id", delete(delete_catalog_item))
        // Clients
        .route("/api/clients", post(clients::create_client_handler))
        .route("/api/clients", get(clients::list_clients_handler))
        .route("/api/clients/:id", get(clients::get_client_by_id_handler))
        .route("/api/clients/:id", put(clients::update_client_handler))
        .route("/api/clients/:id", delete(clients::delete_client_handler))
        // Quotes
        .route("/api/quotes", post(quotes::create_quote_handler))
        .route("/api/quotes", get(quotes::list_quotes_handler))
        .route("/api/quotes/preview", post(quotes::preview_quote_handler))
        .route("/api/quotes/:id", get(quotes::get_quote_by_id_handler))
        .route("/api/quotes/:id/status", patch(quotes::update_quote_status_handler))
        .route(
            "/api/quotes/:id/invoice-items",
            get(quotes::quote_invoice_items_handler),
        )
        // Proposals
        .route("/api/proposals", post(proposals::create_proposal_handler))
        .route("/api/proposals", get(proposals::list_proposals_handler))
        .route(
            "/api/proposals/preview",
            post(proposals::preview_proposal_handler),
        )
        .route("/api/proposals/:id", get(proposals::get_proposal_by_id_handler))
        // Pricing configuration
        .route(
            "/api/pricing/defaults",
            get(pricing::handlers::get_pricing_defaults_handler),
        )
        .route(
            "/api/pricing/defaults",
            put(pricing::handlers::update_pricing_defaults_handler),
        )
        .route(
            "/api/pricing/visit-discounts",
            get(pricing::handlers::get_visit_discounts_handler),
        )
        .route(
            "/api/pricing/visit-discounts",
            put(pricing::handlers::upsert_visit_discount_handler),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Servtec API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Servtec API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
