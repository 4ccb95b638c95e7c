//! `SeaORM` Entity for the caisse_operations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{SensOperation, TypeOperation};

/// One discrete cash movement of the register.
///
/// `montant_avant`/`montant_apres` snapshot the chain around this row;
/// identifier order is the chronological order for recomputation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "caisse_operations")]
pub struct Model {
    /// Operation identifier; chain position.
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Operation kind.
    pub type_operation: TypeOperation,
    /// Direction, set only for `autre` operations.
    pub sens: Option<SensOperation>,
    /// Movement amount, always positive.
    pub montant: Decimal,
    /// Register balance before this operation.
    pub montant_avant: Decimal,
    /// Register balance after this operation.
    pub montant_apres: Decimal,
    /// Free-text comment.
    pub commentaire: Option<String>,
    /// Client this operation concerns, if any.
    pub client_id: Option<i32>,
    /// Username recorded at entry time, if any.
    pub utilisateur: Option<String>,
    /// Linked bureau expense (explicit reconciliation key).
    pub depense_bureau_id: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(
        belongs_to = "super::beneficiaires_bureau::Entity",
        from = "Column::DepenseBureauId",
        to = "super::beneficiaires_bureau::Column::Id"
    )]
    BeneficiairesBureau,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::beneficiaires_bureau::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BeneficiairesBureau.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
