//! Monthly charge repository: CRUD plus full-year chain recomputation.
//!
//! Every mutation of a (client, annee) chain runs under the matching
//! recompute lock and inside one serializable transaction, then rebuilds
//! the whole year so `solde_restant` stays contiguous regardless of which
//! row changed.

use chrono::{Datelike, NaiveDate, Utc};
use cogest_core::charges::{
    self, ChargeAmounts, carry_in, chain_for_year, predecessor_balance,
};
use cogest_core::register::OperationKind;
use cogest_shared::types::normalize;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IsolationLevel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::warn;

use crate::entities::charges_mensuelles;
use crate::locks::charge_year_lock;
use crate::repositories::caisse::{CaisseRepository, CreateOperationInput};

/// Error types for charge operations.
#[derive(Debug, thiserror::Error)]
pub enum ChargeError {
    /// Charge not found.
    #[error("Charge not found: {0}")]
    NotFound(i32),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(i32),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a monthly charge.
#[derive(Debug, Clone)]
pub struct CreateChargeInput {
    /// Owning client.
    pub client_id: i32,
    /// Charge date; `mois` and `annee` derive from it.
    pub date_charge: NaiveDate,
    /// Free-text label.
    pub libelle: String,
    /// Debit amount.
    pub montant: Decimal,
    /// Credit amount.
    pub avance: Decimal,
}

/// Input for updating a charge. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateChargeInput {
    /// New charge date.
    pub date_charge: Option<NaiveDate>,
    /// New label.
    pub libelle: Option<String>,
    /// New debit amount.
    pub montant: Option<Decimal>,
    /// New credit amount.
    pub avance: Option<Decimal>,
}

/// A freshly written charge, plus a warning when a follow-up side effect
/// (automatic register withdrawal) could not be applied.
#[derive(Debug, Clone)]
pub struct ChargeCreated {
    /// The charge as persisted, after chain recomputation.
    pub charge: charges_mensuelles::Model,
    /// Non-fatal follow-up failure, reported to the caller.
    pub warning: Option<String>,
}

/// One client year of charges with its opening balance.
#[derive(Debug, Clone)]
pub struct YearCharges {
    /// The year listed.
    pub annee: i32,
    /// Balance carried in from the previous year.
    pub report: Decimal,
    /// Charges in chain order.
    pub charges: Vec<charges_mensuelles::Model>,
    /// Balance after the last charge (equals `report` for an empty year).
    pub solde_final: Decimal,
}

/// Charge repository.
#[derive(Debug, Clone)]
pub struct ChargeRepository {
    db: DatabaseConnection,
}

impl ChargeRepository {
    /// Creates a new charge repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists one client year in chain order, with its carry-in balance.
    pub async fn list_year(&self, client_id: i32, annee: i32) -> Result<YearCharges, ChargeError> {
        verify_client(&self.db, client_id).await?;

        let charges = charges_in_chain_order(&self.db, client_id, annee).await?;
        let report = carry_in_for(&self.db, client_id, annee).await?;
        let solde_final = charges.last().map_or(report, |c| c.solde_restant);

        Ok(YearCharges {
            annee,
            report,
            charges,
            solde_final,
        })
    }

    /// Finds a charge by id.
    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<charges_mensuelles::Model>, ChargeError> {
        Ok(charges_mensuelles::Entity::find_by_id(id)
            .one(&self.db)
            .await?)
    }

    /// Records a charge and rebuilds its year chain.
    ///
    /// A card-payment debit additionally attempts an automatic register
    /// withdrawal after the commit; if that withdrawal is rejected (for
    /// example on insufficient register funds) the charge stands and the
    /// failure is returned as a warning.
    pub async fn create(&self, input: CreateChargeInput) -> Result<ChargeCreated, ChargeError> {
        let montant = normalize(input.montant);
        let avance = normalize(input.avance);
        validate_amounts(montant, avance)?;
        if input.libelle.trim().is_empty() {
            return Err(ChargeError::Validation("libelle is required".to_string()));
        }

        let mois = input.date_charge.month().cast_signed();
        let annee = input.date_charge.year();

        let lock = charge_year_lock(input.client_id, annee);
        let _guard = lock.lock().await;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        verify_client(&txn, input.client_id).await?;

        let same_year = latest_balance_before_month(&txn, input.client_id, annee, mois).await?;
        let (prev_december, prev_latest) = previous_year_balances(&txn, input.client_id, annee).await?;
        let avant = predecessor_balance(same_year, prev_december, prev_latest);

        let charge = charges_mensuelles::ActiveModel {
            client_id: Set(input.client_id),
            date_charge: Set(input.date_charge),
            mois: Set(mois),
            annee: Set(annee),
            libelle: Set(input.libelle.clone()),
            montant: Set(montant),
            avance: Set(avance),
            solde_restant: Set(avant + charges::solde_delta(montant, avance)),
            traite: Set(false),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let inserted = charge.insert(&txn).await?;

        // A charge inserted for an earlier month lands mid-chain; rebuild
        // the whole year so every later row shifts.
        recompute_year(&txn, input.client_id, annee).await?;

        let charge = charges_mensuelles::Entity::find_by_id(inserted.id)
            .one(&txn)
            .await?
            .ok_or(ChargeError::NotFound(inserted.id))?;

        txn.commit().await?;
        drop(_guard);

        let mut warning = None;
        let mut charge = charge;
        if charges::labels::triggers_auto_withdrawal(&charge.libelle, charge.montant, charge.avance)
        {
            match self.auto_withdrawal(&charge).await {
                Ok((updated, follow_up)) => {
                    charge = updated;
                    warning = follow_up;
                }
                Err(e) => {
                    warn!(charge_id = charge.id, error = %e, "automatic withdrawal failed");
                    warning = Some(format!(
                        "Charge enregistrée mais retrait automatique impossible: {e}"
                    ));
                }
            }
        }

        Ok(ChargeCreated { charge, warning })
    }

    /// Updates a charge and rebuilds every affected year chain.
    ///
    /// When the edit moves the charge to another year, both the old and
    /// the new year are rebuilt, in ascending order so the earlier year's
    /// closing balance feeds the later year's carry-in.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateChargeInput,
    ) -> Result<charges_mensuelles::Model, ChargeError> {
        let existing = charges_mensuelles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ChargeError::NotFound(id))?;

        let date_charge = input.date_charge.unwrap_or(existing.date_charge);
        let montant = normalize(input.montant.unwrap_or(existing.montant));
        let avance = normalize(input.avance.unwrap_or(existing.avance));
        validate_amounts(montant, avance)?;
        if let Some(ref libelle) = input.libelle {
            if libelle.trim().is_empty() {
                return Err(ChargeError::Validation("libelle is required".to_string()));
            }
        }

        let new_mois = date_charge.month().cast_signed();
        let new_annee = date_charge.year();

        let mut years = vec![existing.annee];
        if new_annee != existing.annee {
            years.push(new_annee);
        }
        years.sort_unstable();

        // Locks are always taken in ascending year order.
        let locks: Vec<_> = years
            .iter()
            .map(|&annee| charge_year_lock(existing.client_id, annee))
            .collect();
        let mut guards = Vec::with_capacity(locks.len());
        for lock in &locks {
            guards.push(lock.lock().await);
        }

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let client_id = existing.client_id;
        let mut active: charges_mensuelles::ActiveModel = existing.into();
        active.date_charge = Set(date_charge);
        active.mois = Set(new_mois);
        active.annee = Set(new_annee);
        active.montant = Set(montant);
        active.avance = Set(avance);
        if let Some(libelle) = input.libelle {
            active.libelle = Set(libelle);
        }
        active.update(&txn).await?;

        for &annee in &years {
            recompute_year(&txn, client_id, annee).await?;
        }

        let charge = charges_mensuelles::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ChargeError::NotFound(id))?;

        txn.commit().await?;
        Ok(charge)
    }

    /// Rebuilds one (client, annee) chain on demand.
    ///
    /// The chain is self-healing after every mutation; this entry point
    /// exists for repairing data touched outside the application.
    pub async fn recompute_year_for(&self, client_id: i32, annee: i32) -> Result<(), ChargeError> {
        verify_client(&self.db, client_id).await?;

        let lock = charge_year_lock(client_id, annee);
        let _guard = lock.lock().await;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;
        recompute_year(&txn, client_id, annee).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Deletes a charge and rebuilds the rest of its year chain.
    pub async fn delete(&self, id: i32) -> Result<(), ChargeError> {
        let existing = charges_mensuelles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ChargeError::NotFound(id))?;

        let lock = charge_year_lock(existing.client_id, existing.annee);
        let _guard = lock.lock().await;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        charges_mensuelles::Entity::delete_by_id(id).exec(&txn).await?;
        recompute_year(&txn, existing.client_id, existing.annee).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Creates the automatic register withdrawal for a card-payment
    /// charge. The withdrawal settles the charge: it flips the handled
    /// flag and records the matching bureau expense.
    async fn auto_withdrawal(
        &self,
        charge: &charges_mensuelles::Model,
    ) -> Result<(charges_mensuelles::Model, Option<String>), String> {
        let caisse = CaisseRepository::new(self.db.clone());
        let created = caisse
            .create_operation(CreateOperationInput {
                kind: OperationKind::Retrait,
                sens: None,
                montant: charge.montant,
                commentaire: Some(format!("[CGM] Charge #{} - {}", charge.id, charge.libelle)),
                client_id: Some(charge.client_id),
                utilisateur: None,
                charge_id: Some(charge.id),
                depense_id: None,
            })
            .await
            .map_err(|e| e.to_string())?;

        let charge = charges_mensuelles::Entity::find_by_id(charge.id)
            .one(&self.db)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("charge {} not found", charge.id))?;
        Ok((charge, created.warning))
    }
}

/// Marks a charge as handled once its register withdrawal exists.
pub(crate) async fn mark_traite<C: ConnectionTrait>(
    conn: &C,
    charge_id: i32,
) -> Result<charges_mensuelles::Model, DbErr> {
    let existing = charges_mensuelles::Entity::find_by_id(charge_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("charge {charge_id}")))?;

    let mut active: charges_mensuelles::ActiveModel = existing.into();
    active.traite = Set(true);
    active.update(conn).await
}

async fn verify_client<C: ConnectionTrait>(conn: &C, client_id: i32) -> Result<(), ChargeError> {
    crate::entities::clients::Entity::find_by_id(client_id)
        .one(conn)
        .await?
        .ok_or(ChargeError::ClientNotFound(client_id))?;
    Ok(())
}

fn validate_amounts(montant: Decimal, avance: Decimal) -> Result<(), ChargeError> {
    if montant < Decimal::ZERO || avance < Decimal::ZERO {
        return Err(ChargeError::Validation(
            "montant and avance must be non-negative".to_string(),
        ));
    }
    if montant == Decimal::ZERO && avance == Decimal::ZERO {
        return Err(ChargeError::Validation(
            "montant and avance cannot both be zero".to_string(),
        ));
    }
    Ok(())
}

/// Loads one client year in chain order: mois, then creation time, then id.
async fn charges_in_chain_order<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    annee: i32,
) -> Result<Vec<charges_mensuelles::Model>, ChargeError> {
    let rows = charges_mensuelles::Entity::find()
        .filter(charges_mensuelles::Column::ClientId.eq(client_id))
        .filter(charges_mensuelles::Column::Annee.eq(annee))
        .order_by_asc(charges_mensuelles::Column::Mois)
        .order_by_asc(charges_mensuelles::Column::CreatedAt)
        .order_by_asc(charges_mensuelles::Column::Id)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Resolves the previous year's December balance and latest balance.
async fn previous_year_balances<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    annee: i32,
) -> Result<(Option<Decimal>, Option<Decimal>), ChargeError> {
    let december = charges_mensuelles::Entity::find()
        .filter(charges_mensuelles::Column::ClientId.eq(client_id))
        .filter(charges_mensuelles::Column::Annee.eq(annee - 1))
        .filter(charges_mensuelles::Column::Mois.eq(12))
        .order_by_desc(charges_mensuelles::Column::CreatedAt)
        .order_by_desc(charges_mensuelles::Column::Id)
        .one(conn)
        .await?
        .map(|c| c.solde_restant);

    let latest = charges_mensuelles::Entity::find()
        .filter(charges_mensuelles::Column::ClientId.eq(client_id))
        .filter(charges_mensuelles::Column::Annee.eq(annee - 1))
        .order_by_desc(charges_mensuelles::Column::Mois)
        .order_by_desc(charges_mensuelles::Column::CreatedAt)
        .order_by_desc(charges_mensuelles::Column::Id)
        .one(conn)
        .await?
        .map(|c| c.solde_restant);

    Ok((december, latest))
}

/// Resolves the opening balance of (client, annee).
async fn carry_in_for<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    annee: i32,
) -> Result<Decimal, ChargeError> {
    let (december, latest) = previous_year_balances(conn, client_id, annee).await?;
    Ok(carry_in(december, latest))
}

/// Balance of the latest same-year charge at or before `mois`, if any.
async fn latest_balance_before_month<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    annee: i32,
    mois: i32,
) -> Result<Option<Decimal>, ChargeError> {
    let row = charges_mensuelles::Entity::find()
        .filter(charges_mensuelles::Column::ClientId.eq(client_id))
        .filter(charges_mensuelles::Column::Annee.eq(annee))
        .filter(charges_mensuelles::Column::Mois.lte(mois))
        .order_by_desc(charges_mensuelles::Column::Mois)
        .order_by_desc(charges_mensuelles::Column::CreatedAt)
        .order_by_desc(charges_mensuelles::Column::Id)
        .one(conn)
        .await?;
    Ok(row.map(|c| c.solde_restant))
}

/// Rebuilds `solde_restant` for the whole (client, annee) chain from its
/// carry-in balance. Only rows whose stored balance drifted are written.
pub(crate) async fn recompute_year<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    annee: i32,
) -> Result<(), ChargeError> {
    let rows = charges_in_chain_order(conn, client_id, annee).await?;
    let carry = carry_in_for(conn, client_id, annee).await?;

    let amounts: Vec<ChargeAmounts> = rows
        .iter()
        .map(|c| ChargeAmounts {
            id: c.id,
            montant: c.montant,
            avance: c.avance,
        })
        .collect();
    let chain = chain_for_year(carry, &amounts);

    for (row, entry) in rows.into_iter().zip(chain) {
        if row.solde_restant != entry.apres {
            let mut active: charges_mensuelles::ActiveModel = row.into();
            active.solde_restant = Set(entry.apres);
            active.update(conn).await?;
        }
    }

    Ok(())
}
