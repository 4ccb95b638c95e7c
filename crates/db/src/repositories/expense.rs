//! Bureau expense repository.
//!
//! An expense is money the bureau spent on a beneficiary. Recording one
//! also records the matching register withdrawal, tagged and linked back
//! to the expense, so the register balance reflects the spend. Creation
//! is idempotent on the (beneficiaire, libelle, montant, day) key so the
//! two entry paths (manual expense, charge settlement) never double-book.

use chrono::{NaiveDate, Utc};
use cogest_core::register::OperationKind;
use cogest_shared::types::{montant_valide, normalize};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::warn;

use crate::entities::beneficiaires_bureau;
use crate::repositories::caisse::{CaisseRepository, CreateOperationInput};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(i32),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a bureau expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Who the money went to.
    pub beneficiaire: String,
    /// What it was for.
    pub libelle: String,
    /// Amount spent, strictly positive.
    pub montant: Decimal,
    /// Expense date; today when omitted.
    pub date_operation: Option<NaiveDate>,
}

/// A recorded expense, with the idempotency verdict and any follow-up
/// warning.
#[derive(Debug, Clone)]
pub struct ExpenseCreated {
    /// The expense row, freshly inserted or pre-existing.
    pub expense: beneficiaires_bureau::Model,
    /// True when the same expense was already on file for that day.
    pub already_exists: bool,
    /// Non-fatal follow-up failure (the register withdrawal).
    pub warning: Option<String>,
}

/// Bureau expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists expenses, most recent first.
    pub async fn list(&self) -> Result<Vec<beneficiaires_bureau::Model>, ExpenseError> {
        let rows = beneficiaires_bureau::Entity::find()
            .order_by_desc(beneficiaires_bureau::Column::DateOperation)
            .order_by_desc(beneficiaires_bureau::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Records an expense and its linked register withdrawal.
    ///
    /// A same-day duplicate returns the existing row unchanged without
    /// touching the register. When the withdrawal is rejected (for
    /// example on insufficient register funds) the expense stands and the
    /// failure is returned as a warning.
    pub async fn create(&self, input: CreateExpenseInput) -> Result<ExpenseCreated, ExpenseError> {
        if input.beneficiaire.trim().is_empty() {
            return Err(ExpenseError::Validation(
                "beneficiaire is required".to_string(),
            ));
        }
        if input.libelle.trim().is_empty() {
            return Err(ExpenseError::Validation("libelle is required".to_string()));
        }
        let montant = normalize(input.montant);
        if !montant_valide(montant) {
            return Err(ExpenseError::Validation(
                "montant must be strictly positive".to_string(),
            ));
        }

        let date_operation = input
            .date_operation
            .unwrap_or_else(|| Utc::now().date_naive());

        if let Some(existing) = find_duplicate(
            &self.db,
            &input.beneficiaire,
            &input.libelle,
            montant,
            date_operation,
        )
        .await?
        {
            return Ok(ExpenseCreated {
                expense: existing,
                already_exists: true,
                warning: None,
            });
        }

        let expense = insert_row(
            &self.db,
            &input.beneficiaire,
            &input.libelle,
            montant,
            date_operation,
        )
        .await?;

        let caisse = CaisseRepository::new(self.db.clone());
        let warning = match caisse
            .create_operation(CreateOperationInput {
                kind: OperationKind::Retrait,
                sens: None,
                montant: expense.montant,
                commentaire: Some(format!("BUREAU - {}", expense.libelle)),
                client_id: None,
                utilisateur: None,
                charge_id: None,
                depense_id: Some(expense.id),
            })
            .await
        {
            Ok(_) => None,
            Err(e) => {
                warn!(expense_id = expense.id, error = %e, "expense withdrawal failed");
                Some(format!(
                    "Dépense enregistrée mais retrait caisse impossible: {e}"
                ))
            }
        };

        Ok(ExpenseCreated {
            expense,
            already_exists: false,
            warning,
        })
    }

    /// Deletes an expense. Linked withdrawals keep their snapshots; the
    /// schema clears their expense link.
    pub async fn delete(&self, id: i32) -> Result<(), ExpenseError> {
        beneficiaires_bureau::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        beneficiaires_bureau::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// Finds a same-day expense with the same beneficiary, label and amount.
pub(crate) async fn find_duplicate<C: ConnectionTrait>(
    conn: &C,
    beneficiaire: &str,
    libelle: &str,
    montant: Decimal,
    date_operation: NaiveDate,
) -> Result<Option<beneficiaires_bureau::Model>, DbErr> {
    beneficiaires_bureau::Entity::find()
        .filter(beneficiaires_bureau::Column::Beneficiaire.eq(beneficiaire))
        .filter(beneficiaires_bureau::Column::Libelle.eq(libelle))
        .filter(beneficiaires_bureau::Column::Montant.eq(montant))
        .filter(beneficiaires_bureau::Column::DateOperation.eq(date_operation))
        .one(conn)
        .await
}

/// Inserts a bare expense row, without the register follow-up.
pub(crate) async fn insert_row<C: ConnectionTrait>(
    conn: &C,
    beneficiaire: &str,
    libelle: &str,
    montant: Decimal,
    date_operation: NaiveDate,
) -> Result<beneficiaires_bureau::Model, DbErr> {
    let expense = beneficiaires_bureau::ActiveModel {
        beneficiaire: Set(beneficiaire.to_string()),
        libelle: Set(libelle.to_string()),
        montant: Set(montant),
        date_operation: Set(date_operation),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    expense.insert(conn).await
}
