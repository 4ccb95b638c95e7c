//! Database enum types.

use cogest_core::register::{Direction, OperationKind};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of a cash register operation.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "type_operation")]
pub enum TypeOperation {
    /// Cash withdrawal.
    #[sea_orm(string_value = "retrait")]
    Retrait,
    /// Cash deposit.
    #[sea_orm(string_value = "versement")]
    Versement,
    /// Payment to a client.
    #[sea_orm(string_value = "paiement_client")]
    PaiementClient,
    /// Other movement, direction given by `sens`.
    #[sea_orm(string_value = "autre")]
    Autre,
}

/// Direction of an "autre" operation.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sens_operation")]
pub enum SensOperation {
    /// Adds to the balance.
    #[sea_orm(string_value = "plus")]
    Plus,
    /// Subtracts from the balance.
    #[sea_orm(string_value = "moins")]
    Moins,
}

impl TypeOperation {
    /// Maps the database enum onto the core domain kind.
    #[must_use]
    pub const fn to_kind(&self) -> OperationKind {
        match self {
            Self::Retrait => OperationKind::Retrait,
            Self::Versement => OperationKind::Versement,
            Self::PaiementClient => OperationKind::PaiementClient,
            Self::Autre => OperationKind::Autre,
        }
    }

    /// Maps a core domain kind onto the database enum.
    #[must_use]
    pub const fn from_kind(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Retrait => Self::Retrait,
            OperationKind::Versement => Self::Versement,
            OperationKind::PaiementClient => Self::PaiementClient,
            OperationKind::Autre => Self::Autre,
        }
    }
}

impl SensOperation {
    /// Maps the database enum onto the core direction.
    #[must_use]
    pub const fn to_direction(&self) -> Direction {
        match self {
            Self::Plus => Direction::Plus,
            Self::Moins => Direction::Moins,
        }
    }

    /// Maps a core direction onto the database enum.
    #[must_use]
    pub const fn from_direction(sens: Direction) -> Self {
        match sens {
            Direction::Plus => Self::Plus,
            Direction::Moins => Self::Moins,
        }
    }
}
