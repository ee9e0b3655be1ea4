// HTTP handlers for pricing configuration endpoints

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::pricing::{PricingDefaults, PricingError, UpdatePricingDefaults, VisitDiscount};

/// Request DTO for upserting one visit-discount row
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertVisitDiscountRequest {
    #[validate(range(min = 1, message = "Visit count must be at least 1"))]
    pub visit_count: i32,
    #[validate(custom = "crate::validation::validate_percent_range")]
    pub discount_percent: Decimal,
}

/// Handler for GET /api/pricing/defaults
pub async fn get_pricing_defaults_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<PricingDefaults>, PricingError> {
    let defaults = state.defaults_store.defaults().await?;

    Ok(Json(defaults))
}

/// Handler for PUT /api/pricing/defaults
pub async fn update_pricing_defaults_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<UpdatePricingDefaults>,
) -> Result<Json<PricingDefaults>, PricingError> {
    request
        .validate()
        .map_err(|e| PricingError::InvalidConfiguration(e.to_string()))?;

    let defaults = state.defaults_store.update_defaults(&request).await?;

    tracing::info!("Updated pricing defaults");
    Ok(Json(defaults))
}

/// Handler for GET /api/pricing/visit-discounts
pub async fn get_visit_discounts_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<VisitDiscount>>, PricingError> {
    let discounts = state.defaults_store.visit_discounts().await?;

    Ok(Json(discounts))
}

/// Handler for PUT /api/pricing/visit-discounts
pub async fn upsert_visit_discount_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<UpsertVisitDiscountRequest>,
) -> Result<Json<VisitDiscount>, PricingError> {
    request
        .validate()
        .map_err(|e| PricingError::InvalidConfiguration(e.to_string()))?;

    let row = state
        .defaults_store
        .upsert_visit_discount(request.visit_count, request.discount_percent)
        .await?;

    tracing::info!(
        "Configured visit discount: {} visits -> {}%",
        row.visit_count,
        row.discount_percent
    );
    Ok(Json(row))
}
