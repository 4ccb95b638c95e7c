//! Monthly charge routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use cogest_db::ChargeRepository;
use cogest_db::repositories::charge::{
    ChargeError, CreateChargeInput, UpdateChargeInput,
};
use cogest_shared::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::AppState;
use crate::routes::{failure, success};

/// Creates the charge routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients/{id}/charges", get(list_year))
        .route("/clients/{id}/charges", post(create_charge))
        .route("/clients/{id}/charges/recalcul", post(recompute_year))
        .route("/charges/{id}", put(update_charge))
        .route("/charges/{id}", delete(delete_charge))
}

/// Query selecting the accounting year to list.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Accounting year.
    pub annee: i32,
}

/// Request body for creating a charge.
#[derive(Debug, Deserialize)]
pub struct CreateChargeRequest {
    /// Charge date; month and year derive from it.
    pub date_charge: NaiveDate,
    /// Free-text label.
    pub libelle: String,
    /// Debit amount.
    #[serde(default)]
    pub montant: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub avance: Decimal,
}

/// Request body for updating a charge. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateChargeRequest {
    /// New charge date.
    pub date_charge: Option<NaiveDate>,
    /// New label.
    pub libelle: Option<String>,
    /// New debit amount.
    pub montant: Option<Decimal>,
    /// New credit amount.
    pub avance: Option<Decimal>,
}

/// Request body for a year recomputation.
#[derive(Debug, Deserialize)]
pub struct RecalculRequest {
    /// Accounting year to rebuild.
    pub annee: i32,
}

fn app_error(e: ChargeError) -> AppError {
    match e {
        ChargeError::NotFound(id) => AppError::NotFound(format!("charge {id}")),
        ChargeError::ClientNotFound(id) => AppError::NotFound(format!("client {id}")),
        ChargeError::Validation(m) => AppError::Validation(m),
        ChargeError::Database(e) => {
            error!(error = %e, "charge database error");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// GET `/clients/{id}/charges?annee=` - One client year in chain order.
///
/// The charge list opens with a synthetic carried-balance row (flagged
/// `"report": true`) holding the previous year's closing balance, even
/// when that balance is zero.
async fn list_year(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Query(query): Query<YearQuery>,
) -> impl IntoResponse {
    let repo = ChargeRepository::new((*state.db).clone());
    match repo.list_year(client_id, query.annee).await {
        Ok(year) => {
            let mut rows: Vec<Value> = Vec::with_capacity(year.charges.len() + 1);
            rows.push(json!({
                "report": true,
                "annee": year.annee,
                "libelle": "Report année précédente",
                "solde_restant": year.report,
            }));
            rows.extend(year.charges.iter().map(|c| json!(c)));

            success(
                StatusCode::OK,
                json!({
                    "annee": year.annee,
                    "charges": rows,
                    "solde_final": year.solde_final,
                }),
            )
        }
        Err(e) => failure(&app_error(e)),
    }
}

/// POST `/clients/{id}/charges` - Record a charge and rebuild its year chain.
async fn create_charge(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(payload): Json<CreateChargeRequest>,
) -> impl IntoResponse {
    let repo = ChargeRepository::new((*state.db).clone());
    let result = repo
        .create(CreateChargeInput {
            client_id,
            date_charge: payload.date_charge,
            libelle: payload.libelle,
            montant: payload.montant,
            avance: payload.avance,
        })
        .await;

    match result {
        Ok(created) => {
            info!(
                charge_id = created.charge.id,
                client_id = created.charge.client_id,
                "charge created"
            );
            let mut body = json!({ "charge": created.charge });
            if let Some(warning) = created.warning {
                body["warning"] = json!(warning);
            }
            success(StatusCode::CREATED, body)
        }
        Err(e) => failure(&app_error(e)),
    }
}

/// POST `/clients/{id}/charges/recalcul` - Rebuild one year chain.
async fn recompute_year(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(payload): Json<RecalculRequest>,
) -> impl IntoResponse {
    let repo = ChargeRepository::new((*state.db).clone());
    match repo.recompute_year_for(client_id, payload.annee).await {
        Ok(()) => {
            info!(client_id, annee = payload.annee, "year chain rebuilt");
            success(StatusCode::OK, json!({ "annee": payload.annee }))
        }
        Err(e) => failure(&app_error(e)),
    }
}

/// PUT `/charges/{id}` - Update a charge and rebuild affected years.
async fn update_charge(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateChargeRequest>,
) -> impl IntoResponse {
    let repo = ChargeRepository::new((*state.db).clone());
    let result = repo
        .update(
            id,
            UpdateChargeInput {
                date_charge: payload.date_charge,
                libelle: payload.libelle,
                montant: payload.montant,
                avance: payload.avance,
            },
        )
        .await;

    match result {
        Ok(charge) => success(StatusCode::OK, json!({ "charge": charge })),
        Err(e) => failure(&app_error(e)),
    }
}

/// DELETE `/charges/{id}` - Delete a charge and rebuild its year chain.
async fn delete_charge(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    let repo = ChargeRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => {
            info!(charge_id = id, "charge deleted");
            success(StatusCode::OK, json!({}))
        }
        Err(e) => failure(&app_error(e)),
    }
}
