// HTTP handlers for quote endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::pricing::AdjustedLineItem;
use crate::quotes::{
    CreateQuoteRequest, QuoteError, QuotePreviewRequest, QuotePreviewResponse, QuoteResponse,
    QuoteService, QuoteStatus, UpdateQuoteStatusRequest,
};

/// Query parameters for listing quotes
#[derive(Debug, Deserialize)]
pub struct QuoteListQuery {
    /// Optional client filter
    pub client_id: Option<i32>,
    /// Optional status filter
    pub status: Option<QuoteStatus>,
}

/// Handler for POST /api/quotes
/// Prices the selection and persists a new draft quote
pub async fn create_quote_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteResponse>), QuoteError> {
    request
        .validate()
        .map_err(|e| QuoteError::ValidationError(e.to_string()))?;
    request
        .terms
        .validate()
        .map_err(|e| QuoteError::ValidationError(e.to_string()))?;

    let quote = state.quote_service.create_quote(request).await?;
    let response = QuoteService::to_response(quote);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /api/quotes/preview
/// Computes totals for a selection without persisting anything
pub async fn preview_quote_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<QuotePreviewRequest>,
) -> Result<Json<QuotePreviewResponse>, QuoteError> {
    request
        .validate()
        .map_err(|e| QuoteError::ValidationError(e.to_string()))?;
    request
        .terms
        .validate()
        .map_err(|e| QuoteError::ValidationError(e.to_string()))?;

    let preview = state.quote_service.preview(request).await?;

    Ok(Json(preview))
}

/// Handler for GET /api/quotes
/// Lists quotes with optional client and status filters
pub async fn list_quotes_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<QuoteListQuery>,
) -> Result<Json<Vec<QuoteResponse>>, QuoteError> {
    let quotes = state
        .quote_service
        .list_quotes(query.client_id, query.status)
        .await?;

    Ok(Json(quotes))
}

/// Handler for GET /api/quotes/{quote_id}
pub async fn get_quote_by_id_handler(
    State(state): State<crate::AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<QuoteResponse>, QuoteError> {
    let quote = state.quote_service.get_quote(quote_id).await?;

    Ok(Json(quote))
}

/// Handler for PATCH /api/quotes/{quote_id}/status
pub async fn update_quote_status_handler(
    State(state): State<crate::AppState>,
    Path(quote_id): Path<Uuid>,
    Json(request): Json<UpdateQuoteStatusRequest>,
) -> Result<Json<QuoteResponse>, QuoteError> {
    request
        .validate()
        .map_err(|e| QuoteError::ValidationError(e.to_string()))?;

    let quote = state
        .quote_service
        .update_status(quote_id, request.status)
        .await?;

    Ok(Json(quote))
}

/// Handler for GET /api/quotes/{quote_id}/invoice-items
/// Returns the proration output: unit prices rescaled so the line totals
/// add up to the charged material subtotal
pub async fn quote_invoice_items_handler(
    State(state): State<crate::AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<Vec<AdjustedLineItem>>, QuoteError> {
    let items = state.quote_service.invoice_items(quote_id).await?;

    Ok(Json(items))
}
