//! `SeaORM` entity definitions.

pub mod beneficiaires_bureau;
pub mod caisse_operations;
pub mod charges_mensuelles;
pub mod clients;
pub mod sea_orm_active_enums;
