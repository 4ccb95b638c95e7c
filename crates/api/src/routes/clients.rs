//! Client management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use cogest_db::ClientRepository;
use cogest_db::repositories::client::{ClientError, CreateClientInput, UpdateClientInput};
use cogest_shared::AppError;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::routes::{failure, success};

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route("/clients/{id}", get(get_client))
        .route("/clients/{id}", put(update_client))
        .route("/clients/{id}", delete(delete_client))
}

/// Request body for creating a client.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Family name (required).
    pub nom: String,
    /// First name.
    pub prenom: Option<String>,
    /// Phone number, unique.
    pub telephone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Login name, unique.
    pub nom_utilisateur: Option<String>,
}

/// Request body for updating a client. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    /// New family name.
    pub nom: Option<String>,
    /// New first name.
    pub prenom: Option<String>,
    /// New phone number.
    pub telephone: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New login name.
    pub nom_utilisateur: Option<String>,
}

fn app_error(e: ClientError) -> AppError {
    match e {
        ClientError::NotFound(id) => AppError::NotFound(format!("client {id}")),
        ClientError::DuplicateTelephone(_) | ClientError::DuplicateUsername(_) => {
            AppError::Conflict(e.to_string())
        }
        ClientError::Validation(m) => AppError::Validation(m),
        ClientError::Database(e) => {
            error!(error = %e, "client database error");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// GET `/clients` - List all clients.
async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(clients) => success(StatusCode::OK, json!({ "clients": clients })),
        Err(e) => failure(&app_error(e)),
    }
}

/// GET `/clients/{id}` - Get one client.
async fn get_client(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(client)) => success(StatusCode::OK, json!({ "client": client })),
        Ok(None) => failure(&AppError::NotFound(format!("client {id}"))),
        Err(e) => failure(&app_error(e)),
    }
}

/// POST `/clients` - Create a client.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    let result = repo
        .create(CreateClientInput {
            nom: payload.nom,
            prenom: payload.prenom,
            telephone: payload.telephone,
            email: payload.email,
            nom_utilisateur: payload.nom_utilisateur,
        })
        .await;

    match result {
        Ok(client) => {
            info!(client_id = client.id, "client created");
            success(StatusCode::CREATED, json!({ "client": client }))
        }
        Err(e) => failure(&app_error(e)),
    }
}

/// PUT `/clients/{id}` - Update a client.
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClientRequest>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    let result = repo
        .update(
            id,
            UpdateClientInput {
                nom: payload.nom,
                prenom: payload.prenom.map(Some),
                telephone: payload.telephone.map(Some),
                email: payload.email.map(Some),
                nom_utilisateur: payload.nom_utilisateur.map(Some),
            },
        )
        .await;

    match result {
        Ok(client) => success(StatusCode::OK, json!({ "client": client })),
        Err(e) => failure(&app_error(e)),
    }
}

/// DELETE `/clients/{id}` - Delete a client and its charges.
async fn delete_client(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => {
            info!(client_id = id, "client deleted");
            success(StatusCode::OK, json!({}))
        }
        Err(e) => failure(&app_error(e)),
    }
}
