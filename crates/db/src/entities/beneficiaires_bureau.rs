//! `SeaORM` Entity for the beneficiaires_bureau table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A bureau-level (non-client) expense.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "beneficiaires_bureau")]
pub struct Model {
    /// Expense identifier.
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Beneficiary name.
    pub beneficiaire: String,
    /// Expense label.
    pub libelle: String,
    /// Expense amount.
    pub montant: Decimal,
    /// Expense date; part of the deduplication key.
    pub date_operation: Date,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::caisse_operations::Entity")]
    CaisseOperations,
}

impl Related<super::caisse_operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CaisseOperations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
