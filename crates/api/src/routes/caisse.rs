//! Cash register routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use cogest_core::ledger::LedgerError;
use cogest_core::register::{Direction, OperationKind};
use cogest_db::CaisseRepository;
use cogest_db::repositories::caisse::{
    CaisseError, CreateOperationInput, UpdateOperationInput,
};
use cogest_shared::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::routes::{failure, success};

/// Creates the register routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/caisse/solde", get(get_solde))
        .route("/caisse/operations", get(list_operations))
        .route("/caisse/operations", post(create_operation))
        .route("/caisse/operations", delete(delete_all_operations))
        .route("/caisse/operations/{id}", put(update_operation))
        .route("/caisse/operations/{id}", delete(delete_operation))
}

/// Request body for recording an operation.
#[derive(Debug, Deserialize)]
pub struct CreateOperationRequest {
    /// Operation kind: `retrait`, `versement`, `paiement_client`, `autre`.
    pub type_operation: String,
    /// Direction for `autre`: `plus` or `moins`.
    pub sens: Option<String>,
    /// Movement amount, strictly positive.
    pub montant: Decimal,
    /// Free-text comment.
    pub commentaire: Option<String>,
    /// Client this operation concerns.
    pub client_id: Option<i32>,
    /// Username to resolve into a client; takes priority over `client_id`.
    pub utilisateur: Option<String>,
    /// Charge this withdrawal settles.
    pub charge_id: Option<i32>,
}

/// Request body for editing an operation. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateOperationRequest {
    /// New operation kind.
    pub type_operation: Option<String>,
    /// New direction.
    pub sens: Option<String>,
    /// New amount.
    pub montant: Option<Decimal>,
    /// New comment.
    pub commentaire: Option<String>,
    /// New client reference.
    pub client_id: Option<i32>,
    /// New username.
    pub utilisateur: Option<String>,
}

fn parse_kind(s: &str) -> Result<OperationKind, AppError> {
    OperationKind::parse(s)
        .ok_or_else(|| AppError::Validation(format!("unknown type_operation: {s}")))
}

fn parse_sens(s: &str) -> Result<Direction, AppError> {
    Direction::parse(s).ok_or_else(|| AppError::Validation(format!("unknown sens: {s}")))
}

fn app_error(e: CaisseError) -> AppError {
    match e {
        CaisseError::OperationNotFound(id) => AppError::NotFound(format!("operation {id}")),
        CaisseError::ChargeNotFound(id) => AppError::NotFound(format!("charge {id}")),
        CaisseError::ClientNotFound(id) => AppError::NotFound(format!("client {id}")),
        CaisseError::UsernameNotFound(u) => AppError::NotFound(format!("username {u}")),
        CaisseError::Ledger(e @ LedgerError::InsufficientFunds { .. }) => {
            AppError::InsufficientFunds(e.to_string())
        }
        CaisseError::Ledger(e) => AppError::Validation(e.to_string()),
        CaisseError::Database(e) => {
            error!(error = %e, "register database error");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// GET `/caisse/solde` - Current balance breakdown.
async fn get_solde(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CaisseRepository::new((*state.db).clone());
    match repo.solde().await {
        Ok(solde) => success(
            StatusCode::OK,
            json!({
                "base": solde.base,
                "mouvements": solde.mouvements,
                "ajustement": solde.ajustement,
                "solde": solde.solde,
            }),
        ),
        Err(e) => failure(&app_error(e)),
    }
}

/// GET `/caisse/operations` - List operations, most recent first.
async fn list_operations(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CaisseRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(operations) => success(StatusCode::OK, json!({ "operations": operations })),
        Err(e) => failure(&app_error(e)),
    }
}

/// POST `/caisse/operations` - Record an operation.
async fn create_operation(
    State(state): State<AppState>,
    Json(payload): Json<CreateOperationRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&payload.type_operation) {
        Ok(kind) => kind,
        Err(e) => return failure(&e),
    };
    let sens = match payload.sens.as_deref().map(parse_sens).transpose() {
        Ok(sens) => sens,
        Err(e) => return failure(&e),
    };

    let repo = CaisseRepository::new((*state.db).clone());
    let result = repo
        .create_operation(CreateOperationInput {
            kind,
            sens,
            montant: payload.montant,
            commentaire: payload.commentaire,
            client_id: payload.client_id,
            utilisateur: payload.utilisateur,
            charge_id: payload.charge_id,
            depense_id: None,
        })
        .await;

    match result {
        Ok(created) => {
            info!(
                operation_id = created.operation.id,
                type_operation = %payload.type_operation,
                "register operation created"
            );
            let mut body = json!({ "operation": created.operation });
            if let Some(warning) = created.warning {
                body["warning"] = json!(warning);
            }
            success(StatusCode::CREATED, body)
        }
        Err(e) => failure(&app_error(e)),
    }
}

/// PUT `/caisse/operations/{id}` - Edit an operation and re-chain later rows.
async fn update_operation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOperationRequest>,
) -> impl IntoResponse {
    let kind = match payload.type_operation.as_deref().map(parse_kind).transpose() {
        Ok(kind) => kind,
        Err(e) => return failure(&e),
    };
    let sens = match payload.sens.as_deref().map(parse_sens).transpose() {
        Ok(sens) => sens.map(Some),
        Err(e) => return failure(&e),
    };

    let repo = CaisseRepository::new((*state.db).clone());
    let result = repo
        .update_operation(
            id,
            UpdateOperationInput {
                kind,
                sens,
                montant: payload.montant,
                commentaire: payload.commentaire.map(Some),
                client_id: payload.client_id.map(Some),
                utilisateur: payload.utilisateur.map(Some),
            },
        )
        .await;

    match result {
        Ok(operation) => success(StatusCode::OK, json!({ "operation": operation })),
        Err(e) => failure(&app_error(e)),
    }
}

/// DELETE `/caisse/operations` - Delete every operation.
///
/// The balance collapses to the derived base valuation.
async fn delete_all_operations(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CaisseRepository::new((*state.db).clone());
    match repo.delete_all().await {
        Ok(deleted) => {
            info!(deleted, "register emptied");
            success(StatusCode::OK, json!({ "deleted": deleted }))
        }
        Err(e) => failure(&app_error(e)),
    }
}

/// DELETE `/caisse/operations/{id}` - Delete an operation and re-chain.
async fn delete_operation(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let repo = CaisseRepository::new((*state.db).clone());
    match repo.delete_operation(id).await {
        Ok(()) => {
            info!(operation_id = id, "register operation deleted");
            success(StatusCode::OK, json!({}))
        }
        Err(e) => failure(&app_error(e)),
    }
}
