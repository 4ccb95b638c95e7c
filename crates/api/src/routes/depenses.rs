//! Bureau expense routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use cogest_db::ExpenseRepository;
use cogest_db::repositories::expense::{CreateExpenseInput, ExpenseError};
use cogest_shared::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::routes::{failure, success};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/depenses-bureau", get(list_depenses))
        .route("/depenses-bureau", post(create_depense))
        .route("/depenses-bureau/{id}", delete(delete_depense))
}

/// Request body for recording an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Who the money went to.
    pub beneficiaire: String,
    /// What it was for.
    pub libelle: String,
    /// Amount spent, strictly positive.
    pub montant: Decimal,
    /// Expense date; today when omitted.
    pub date_operation: Option<NaiveDate>,
}

fn app_error(e: ExpenseError) -> AppError {
    match e {
        ExpenseError::NotFound(id) => AppError::NotFound(format!("depense {id}")),
        ExpenseError::Validation(m) => AppError::Validation(m),
        ExpenseError::Database(e) => {
            error!(error = %e, "expense database error");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// GET `/depenses-bureau` - List expenses, most recent first.
async fn list_depenses(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(depenses) => success(StatusCode::OK, json!({ "depenses": depenses })),
        Err(e) => failure(&app_error(e)),
    }
}

/// POST `/depenses-bureau` - Record an expense and its register withdrawal.
///
/// A same-day duplicate returns the existing row with 200 instead of 201.
async fn create_depense(
    State(state): State<AppState>,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    let result = repo
        .create(CreateExpenseInput {
            beneficiaire: payload.beneficiaire,
            libelle: payload.libelle,
            montant: payload.montant,
            date_operation: payload.date_operation,
        })
        .await;

    match result {
        Ok(created) => {
            let status = if created.already_exists {
                StatusCode::OK
            } else {
                info!(expense_id = created.expense.id, "expense created");
                StatusCode::CREATED
            };
            let mut body = json!({
                "depense": created.expense,
                "already_exists": created.already_exists,
            });
            if let Some(warning) = created.warning {
                body["warning"] = json!(warning);
            }
            success(status, body)
        }
        Err(e) => failure(&app_error(e)),
    }
}

/// DELETE `/depenses-bureau/{id}` - Delete an expense.
async fn delete_depense(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => {
            info!(expense_id = id, "expense deleted");
            success(StatusCode::OK, json!({}))
        }
        Err(e) => failure(&app_error(e)),
    }
}
