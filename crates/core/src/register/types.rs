//! Cash register operation types.

use serde::{Deserialize, Serialize};

/// Kind of a discrete cash register movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Cash withdrawal from the register.
    Retrait,
    /// Cash deposit into the register.
    Versement,
    /// Payment made to a client.
    PaiementClient,
    /// Other movement; direction comes from the explicit sign.
    Autre,
}

/// Signed direction, only meaningful for [`OperationKind::Autre`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Adds to the register balance.
    Plus,
    /// Subtracts from the register balance.
    Moins,
}

impl OperationKind {
    /// Parses the wire representation used by the API.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "retrait" => Some(Self::Retrait),
            "versement" => Some(Self::Versement),
            "paiement_client" => Some(Self::PaiementClient),
            "autre" => Some(Self::Autre),
            _ => None,
        }
    }

    /// Wire representation used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retrait => "retrait",
            Self::Versement => "versement",
            Self::PaiementClient => "paiement_client",
            Self::Autre => "autre",
        }
    }
}

impl Direction {
    /// Parses the wire representation used by the API.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plus" => Some(Self::Plus),
            "moins" => Some(Self::Moins),
            _ => None,
        }
    }

    /// Wire representation used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Moins => "moins",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            OperationKind::Retrait,
            OperationKind::Versement,
            OperationKind::PaiementClient,
            OperationKind::Autre,
        ] {
            assert_eq!(OperationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(OperationKind::parse("depot"), None);
    }

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!(Direction::parse("PLUS"), Some(Direction::Plus));
        assert_eq!(Direction::parse("moins"), Some(Direction::Moins));
        assert_eq!(Direction::parse("neutre"), None);
    }
}
