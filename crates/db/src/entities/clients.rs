//! `SeaORM` Entity for the clients table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A client of the bureau; identity anchor for charges and operations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Client identifier.
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Family name.
    pub nom: String,
    /// First name.
    pub prenom: Option<String>,
    /// Phone number, unique when present.
    pub telephone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Login name used to resolve register operations, unique when present.
    pub nom_utilisateur: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::charges_mensuelles::Entity")]
    ChargesMensuelles,
    #[sea_orm(has_many = "super::caisse_operations::Entity")]
    CaisseOperations,
}

impl Related<super::charges_mensuelles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChargesMensuelles.def()
    }
}

impl Related<super::caisse_operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CaisseOperations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
