//! `SeaORM` Entity for the charges_mensuelles table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One billable event for a client in a given month/year.
///
/// `solde_restant` is the cumulative signed balance after this row;
/// the invariant is re-established by a full-year recompute after every
/// mutation of the chain.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "charges_mensuelles")]
pub struct Model {
    /// Charge identifier; also the chain tie-break within a month.
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning client.
    pub client_id: i32,
    /// Charge date.
    pub date_charge: Date,
    /// Month derived from `date_charge` (1-12).
    pub mois: i32,
    /// Year derived from `date_charge`.
    pub annee: i32,
    /// Free-text label; also a semantic tag (fee-received, card-payment).
    pub libelle: String,
    /// Debit amount (increases client debt).
    pub montant: Decimal,
    /// Credit amount (decreases client debt).
    pub avance: Decimal,
    /// Cumulative signed balance after this row.
    pub solde_restant: Decimal,
    /// Set when a register withdrawal has been generated for this charge.
    pub traite: bool,
    /// Creation timestamp; chain tie-break within a month.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
