// HTTP handlers for proposal endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::proposals::{
    CreateProposalRequest, ProposalError, ProposalPreviewRequest, ProposalPreviewResponse,
    ProposalResponse, ProposalService,
};

/// Query parameters for listing proposals
#[derive(Debug, Deserialize)]
pub struct ProposalListQuery {
    /// Optional client filter
    pub client_id: Option<i32>,
}

/// Handler for POST /api/proposals
/// Prices the selection and persists a new proposal
pub async fn create_proposal_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateProposalRequest>,
) -> Result<(StatusCode, Json<ProposalResponse>), ProposalError> {
    request
        .validate()
        .map_err(|e| ProposalError::ValidationError(e.to_string()))?;
    request
        .terms
        .validate()
        .map_err(|e| ProposalError::ValidationError(e.to_string()))?;

    let proposal = state.proposal_service.create_proposal(request).await?;
    let response = ProposalService::to_response(proposal);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /api/proposals/preview
/// Computes totals for a selection without persisting anything
pub async fn preview_proposal_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<ProposalPreviewRequest>,
) -> Result<Json<ProposalPreviewResponse>, ProposalError> {
    request
        .validate()
        .map_err(|e| ProposalError::ValidationError(e.to_string()))?;
    request
        .terms
        .validate()
        .map_err(|e| ProposalError::ValidationError(e.to_string()))?;

    let preview = state.proposal_service.preview(request).await?;

    Ok(Json(preview))
}

/// Handler for GET /api/proposals
pub async fn list_proposals_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<ProposalListQuery>,
) -> Result<Json<Vec<ProposalResponse>>, ProposalError> {
    let proposals = state.proposal_service.list_proposals(query.client_id).await?;

    Ok(Json(proposals))
}

/// Handler for GET /api/proposals/{proposal_id}
pub async fn get_proposal_by_id_handler(
    State(state): State<crate::AppState>,
    Path(proposal_id): Path<Uuid>,
) -> Result<Json<ProposalResponse>, ProposalError> {
    let proposal = state.proposal_service.get_proposal(proposal_id).await?;

    Ok(Json(proposal))
}
