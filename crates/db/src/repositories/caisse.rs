//! Cash register repository.
//!
//! The register balance is virtual: a derived base (historical fee
//! receipts) plus the signed sum of operations, minus a compatibility
//! adjustment for legacy bureau expenses that never got a linked
//! withdrawal. Mutations serialize on the single register lock and run
//! in serializable transactions; the operation chain is rebuilt from the
//! mutated row onward after edits and deletions.

use chrono::Utc;
use cogest_core::charges::labels;
use cogest_core::ledger::{LedgerError, recompute_chain};
use cogest_core::register::{Direction, OperationKind, apply_operation, balance_before, signed_amount};
use cogest_shared::types::normalize;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IsolationLevel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::warn;

use crate::entities::sea_orm_active_enums::{SensOperation, TypeOperation};
use crate::entities::{beneficiaires_bureau, caisse_operations, charges_mensuelles, clients};
use crate::locks::caisse_lock;
use crate::repositories::{charge, expense};

/// Error types for register operations.
#[derive(Debug, thiserror::Error)]
pub enum CaisseError {
    /// Operation not found.
    #[error("Operation not found: {0}")]
    OperationNotFound(i32),

    /// Linked charge not found.
    #[error("Charge not found: {0}")]
    ChargeNotFound(i32),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(i32),

    /// No client carries this username.
    #[error("No client with username {0}")]
    UsernameNotFound(String),

    /// Ledger rule violation (amount, direction or funds).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a register operation.
#[derive(Debug, Clone)]
pub struct CreateOperationInput {
    /// Operation kind.
    pub kind: OperationKind,
    /// Direction, required for `autre`.
    pub sens: Option<Direction>,
    /// Movement amount, strictly positive.
    pub montant: Decimal,
    /// Free-text comment.
    pub commentaire: Option<String>,
    /// Client this operation concerns.
    pub client_id: Option<i32>,
    /// Username to resolve into a client; takes priority over `client_id`.
    pub utilisateur: Option<String>,
    /// Charge this withdrawal settles; triggers the handled flag and the
    /// bureau expense follow-up. Not persisted on the row.
    pub charge_id: Option<i32>,
    /// Bureau expense this operation reconciles.
    pub depense_id: Option<i32>,
}

/// Input for editing a register operation. `None` leaves the field
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateOperationInput {
    /// New operation kind.
    pub kind: Option<OperationKind>,
    /// New direction.
    pub sens: Option<Option<Direction>>,
    /// New amount.
    pub montant: Option<Decimal>,
    /// New comment.
    pub commentaire: Option<Option<String>>,
    /// New client reference.
    pub client_id: Option<Option<i32>>,
    /// New username.
    pub utilisateur: Option<Option<String>>,
}

/// A freshly written operation, plus a warning when a follow-up side
/// effect (handled flag, bureau expense) could not be applied.
#[derive(Debug, Clone)]
pub struct OperationCreated {
    /// The operation as persisted.
    pub operation: caisse_operations::Model,
    /// Non-fatal follow-up failure, reported to the caller.
    pub warning: Option<String>,
}

/// Register balance breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoldeCaisse {
    /// Derived base: sum of historical fee receipts.
    pub base: Decimal,
    /// Signed sum of all recorded operations.
    pub mouvements: Decimal,
    /// Legacy bureau expenses not yet covered by a withdrawal.
    pub ajustement: Decimal,
    /// Available balance: `base + mouvements - ajustement`.
    pub solde: Decimal,
}

/// Cash register repository.
#[derive(Debug, Clone)]
pub struct CaisseRepository {
    db: DatabaseConnection,
}

impl CaisseRepository {
    /// Creates a new register repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the current register balance breakdown.
    pub async fn solde(&self) -> Result<SoldeCaisse, CaisseError> {
        current_balance(&self.db).await
    }

    /// Lists operations, most recent first.
    pub async fn list(&self) -> Result<Vec<caisse_operations::Model>, CaisseError> {
        let rows = caisse_operations::Entity::find()
            .order_by_desc(caisse_operations::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Finds an operation by id.
    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<caisse_operations::Model>, CaisseError> {
        Ok(caisse_operations::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Records an operation at the head of the chain.
    ///
    /// The balance snapshot pair is taken from the current balance, the
    /// non-negative guard applies, and the whole write is rejected on
    /// violation. A withdrawal settling a charge additionally marks the
    /// charge handled and records the matching bureau expense after the
    /// commit; those follow-ups degrade to a warning on failure.
    pub async fn create_operation(
        &self,
        input: CreateOperationInput,
    ) -> Result<OperationCreated, CaisseError> {
        let lock = caisse_lock();
        let guard = lock.lock().await;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let resolved_client = resolve_client(&txn, &input).await?;

        let linked_charge = match input.charge_id {
            Some(charge_id) => Some(
                charges_mensuelles::Entity::find_by_id(charge_id)
                    .one(&txn)
                    .await?
                    .ok_or(CaisseError::ChargeNotFound(charge_id))?,
            ),
            None => None,
        };

        let montant = normalize(input.montant);
        let avant = current_balance(&txn).await?.solde;
        let apres = apply_operation(avant, input.kind, input.sens, montant)?;

        let now = Utc::now();
        let operation = caisse_operations::ActiveModel {
            type_operation: Set(TypeOperation::from_kind(input.kind)),
            sens: Set(input.sens.map(SensOperation::from_direction)),
            montant: Set(montant),
            montant_avant: Set(avant),
            montant_apres: Set(apres),
            commentaire: Set(input.commentaire.clone()),
            client_id: Set(resolved_client.or_else(|| linked_charge.as_ref().map(|c| c.client_id))),
            utilisateur: Set(input.utilisateur.clone()),
            depense_bureau_id: Set(input.depense_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let mut operation = operation.insert(&txn).await?;

        txn.commit().await?;
        drop(guard);

        let mut warning = None;
        if let Some(charge) = linked_charge {
            if input.kind == OperationKind::Retrait {
                match self.settle_charge(&operation, &charge).await {
                    Ok(updated) => operation = updated,
                    Err(e) => {
                        warn!(operation_id = operation.id, charge_id = charge.id, error = %e,
                            "charge settlement follow-up failed");
                        warning = Some(format!(
                            "Opération enregistrée mais suivi de la charge incomplet: {e}"
                        ));
                    }
                }
            }
        }

        Ok(OperationCreated { operation, warning })
    }

    /// Edits an operation in place.
    ///
    /// The balance before the row is recovered by inverting the old
    /// movement against the current balance, the new movement is applied
    /// under the usual guards, and every later row is re-chained from the
    /// new snapshot.
    pub async fn update_operation(
        &self,
        id: i32,
        input: UpdateOperationInput,
    ) -> Result<caisse_operations::Model, CaisseError> {
        let lock = caisse_lock();
        let _guard = lock.lock().await;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let existing = caisse_operations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CaisseError::OperationNotFound(id))?;

        let old_kind = existing.type_operation.to_kind();
        let old_sens = existing.sens.as_ref().map(SensOperation::to_direction);
        let old_montant = existing.montant;

        let new_kind = input.kind.unwrap_or(old_kind);
        let new_sens = input.sens.unwrap_or(old_sens);
        let new_montant = normalize(input.montant.unwrap_or(old_montant));

        let courant = current_balance(&txn).await?.solde;
        let avant = balance_before(courant, old_kind, old_sens, old_montant)?;
        let apres = apply_operation(avant, new_kind, new_sens, new_montant)?;

        let mut active: caisse_operations::ActiveModel = existing.into();
        active.type_operation = Set(TypeOperation::from_kind(new_kind));
        active.sens = Set(new_sens.map(SensOperation::from_direction));
        active.montant = Set(new_montant);
        active.montant_avant = Set(avant);
        active.montant_apres = Set(apres);
        if let Some(commentaire) = input.commentaire {
            active.commentaire = Set(commentaire);
        }
        if let Some(client_id) = input.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(utilisateur) = input.utilisateur {
            active.utilisateur = Set(utilisateur);
        }
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        recompute_following(&txn, id, apres).await?;

        let operation = caisse_operations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CaisseError::OperationNotFound(id))?;

        txn.commit().await?;
        Ok(operation)
    }

    /// Deletes an operation and re-chains every later row over the gap.
    pub async fn delete_operation(&self, id: i32) -> Result<(), CaisseError> {
        let lock = caisse_lock();
        let _guard = lock.lock().await;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        caisse_operations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CaisseError::OperationNotFound(id))?;

        caisse_operations::Entity::delete_by_id(id).exec(&txn).await?;

        let seed = match caisse_operations::Entity::find()
            .filter(caisse_operations::Column::Id.lt(id))
            .order_by_desc(caisse_operations::Column::Id)
            .one(&txn)
            .await?
        {
            Some(prev) => prev.montant_apres,
            None => current_balance(&txn).await?.base,
        };
        recompute_following(&txn, id, seed).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Deletes every operation. The balance collapses to the derived base
    /// (minus any legacy expense adjustment). Returns the row count.
    pub async fn delete_all(&self) -> Result<u64, CaisseError> {
        let lock = caisse_lock();
        let _guard = lock.lock().await;

        let result = caisse_operations::Entity::delete_many()
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Marks the settled charge handled and records the matching bureau
    /// expense, linking it to the withdrawal. Fee receipts never become
    /// expenses.
    async fn settle_charge(
        &self,
        operation: &caisse_operations::Model,
        charge: &charges_mensuelles::Model,
    ) -> Result<caisse_operations::Model, CaisseError> {
        charge::mark_traite(&self.db, charge.id).await?;

        if labels::is_fee_received(&charge.libelle) {
            return Ok(operation.clone());
        }

        let beneficiaire = client_display_name(&self.db, charge.client_id).await?;
        let today = Utc::now().date_naive();
        let expense = match expense::find_duplicate(
            &self.db,
            &beneficiaire,
            &charge.libelle,
            operation.montant,
            today,
        )
        .await?
        {
            Some(existing) => existing,
            None => {
                expense::insert_row(
                    &self.db,
                    &beneficiaire,
                    &charge.libelle,
                    operation.montant,
                    today,
                )
                .await?
            }
        };

        let mut active: caisse_operations::ActiveModel = operation.clone().into();
        active.depense_bureau_id = Set(Some(expense.id));
        Ok(active.update(&self.db).await?)
    }
}

/// Resolves the operation's client reference. A username takes priority
/// and must match an existing client; a bare id must exist.
async fn resolve_client<C: ConnectionTrait>(
    conn: &C,
    input: &CreateOperationInput,
) -> Result<Option<i32>, CaisseError> {
    if let Some(ref nom_utilisateur) = input.utilisateur {
        let client = clients::Entity::find()
            .filter(clients::Column::NomUtilisateur.eq(nom_utilisateur.as_str()))
            .one(conn)
            .await?
            .ok_or_else(|| CaisseError::UsernameNotFound(nom_utilisateur.clone()))?;
        return Ok(Some(client.id));
    }

    if let Some(client_id) = input.client_id {
        clients::Entity::find_by_id(client_id)
            .one(conn)
            .await?
            .ok_or(CaisseError::ClientNotFound(client_id))?;
        return Ok(Some(client_id));
    }

    Ok(None)
}

/// "Nom Prenom" of a client, for the expense beneficiary line.
async fn client_display_name<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
) -> Result<String, CaisseError> {
    let client = clients::Entity::find_by_id(client_id)
        .one(conn)
        .await?
        .ok_or(CaisseError::ClientNotFound(client_id))?;
    Ok(match client.prenom {
        Some(prenom) => format!("{} {prenom}", client.nom),
        None => client.nom,
    })
}

/// Computes the register balance breakdown from first principles.
pub(crate) async fn current_balance<C: ConnectionTrait>(
    conn: &C,
) -> Result<SoldeCaisse, CaisseError> {
    let charges = charges_mensuelles::Entity::find().all(conn).await?;
    let base: Decimal = charges
        .iter()
        .map(|c| labels::base_contribution(&c.libelle, c.montant, c.avance))
        .sum();

    let operations = caisse_operations::Entity::find()
        .order_by_asc(caisse_operations::Column::Id)
        .all(conn)
        .await?;
    let mut mouvements = Decimal::ZERO;
    let mut covered_expense_ids = Vec::new();
    let mut tagged_legacy_retraits = Decimal::ZERO;
    for op in &operations {
        let sens = op.sens.as_ref().map(SensOperation::to_direction);
        mouvements += signed_amount(op.type_operation.to_kind(), sens, op.montant)?;

        match op.depense_bureau_id {
            Some(depense_id) => covered_expense_ids.push(depense_id),
            None => {
                // Legacy rows predate the expense link; recognize them by
                // the comment tags the old entries carried.
                if op.type_operation == TypeOperation::Retrait
                    && op.commentaire.as_deref().is_some_and(|c| {
                        c.contains("BUREAU -") || c.contains("[CGM]")
                    })
                {
                    tagged_legacy_retraits += op.montant;
                }
            }
        }
    }

    let expenses = beneficiaires_bureau::Entity::find().all(conn).await?;
    let uncovered_expenses: Decimal = expenses
        .iter()
        .filter(|e| !covered_expense_ids.contains(&e.id))
        .map(|e| e.montant)
        .sum();

    let ajustement = (uncovered_expenses - tagged_legacy_retraits).max(Decimal::ZERO);
    let solde = base + mouvements - ajustement;

    Ok(SoldeCaisse {
        base,
        mouvements,
        ajustement,
        solde,
    })
}

/// Rebuilds the snapshot pairs of every operation after `after_id`,
/// chaining from `seed`. The non-negative guard is deliberately not
/// re-applied here: already-recorded movements stand even if an earlier
/// edit drives an intermediate snapshot negative.
pub(crate) async fn recompute_following<C: ConnectionTrait>(
    conn: &C,
    after_id: i32,
    seed: Decimal,
) -> Result<(), CaisseError> {
    let following = caisse_operations::Entity::find()
        .filter(caisse_operations::Column::Id.gt(after_id))
        .order_by_asc(caisse_operations::Column::Id)
        .all(conn)
        .await?;

    let mut deltas = Vec::with_capacity(following.len());
    for op in &following {
        let sens = op.sens.as_ref().map(SensOperation::to_direction);
        deltas.push((op.id, signed_amount(op.type_operation.to_kind(), sens, op.montant)?));
    }
    let chain = recompute_chain(seed, &deltas);

    for (op, entry) in following.into_iter().zip(chain) {
        if op.montant_avant != entry.avant || op.montant_apres != entry.apres {
            let mut active: caisse_operations::ActiveModel = op.into();
            active.montant_avant = Set(entry.avant);
            active.montant_apres = Set(entry.apres);
            active.update(conn).await?;
        }
    }

    Ok(())
}
