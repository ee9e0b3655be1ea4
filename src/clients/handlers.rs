// HTTP handlers for client endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::clients::{Client, ClientError, CreateClient, UpdateClient};

/// Handler for POST /api/clients
pub async fn create_client_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateClient>,
) -> Result<(StatusCode, Json<Client>), ClientError> {
    request
        .validate()
        .map_err(|e| ClientError::ValidationError(e.to_string()))?;

    if state
        .clients_repo
        .document_exists(&request.document, None)
        .await?
    {
        tracing::warn!("Attempt to create client with duplicate document");
        return Err(ClientError::DuplicateDocument(request.document));
    }

    let client = state.clients_repo.create(&request).await?;

    tracing::info!("Created client {} ({})", client.id, client.name);
    Ok((StatusCode::CREATED, Json(client)))
}

/// Handler for GET /api/clients
pub async fn list_clients_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<Client>>, ClientError> {
    let clients = state.clients_repo.find_all().await?;

    Ok(Json(clients))
}

/// Handler for GET /api/clients/{id}
pub async fn get_client_by_id_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Client>, ClientError> {
    let client = state
        .clients_repo
        .find_by_id(id)
        .await?
        .ok_or(ClientError::NotFound)?;

    Ok(Json(client))
}

/// Handler for PUT /api/clients/{id}
pub async fn update_client_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateClient>,
) -> Result<Json<Client>, ClientError> {
    request
        .validate()
        .map_err(|e| ClientError::ValidationError(e.to_string()))?;

    if let Some(ref document) = request.document {
        if state
            .clients_repo
            .document_exists(document, Some(id))
            .await?
        {
            return Err(ClientError::DuplicateDocument(document.clone()));
        }
    }

    let client = state.clients_repo.update(id, &request).await?;

    Ok(Json(client))
}

/// Handler for DELETE /api/clients/{id}
pub async fn delete_client_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ClientError> {
    if !state.clients_repo.delete(id).await? {
        return Err(ClientError::NotFound);
    }

    tracing::info!("Deleted client {}", id);
    Ok(StatusCode::NO_CONTENT)
}
