//! Initial database migration.
//!
//! Creates the enums, tables, and indexes for clients, monthly charges,
//! the cash register operation chain, and bureau expenses.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CLIENTS
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;

        // ============================================================
        // PART 3: MONTHLY CHARGE LEDGER
        // ============================================================
        db.execute_unprepared(CHARGES_MENSUELLES_SQL).await?;

        // ============================================================
        // PART 4: BUREAU EXPENSES
        // ============================================================
        db.execute_unprepared(BENEFICIAIRES_BUREAU_SQL).await?;

        // ============================================================
        // PART 5: CASH REGISTER OPERATION CHAIN
        // ============================================================
        db.execute_unprepared(CAISSE_OPERATIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Cash register operation kinds
CREATE TYPE type_operation AS ENUM (
    'retrait',
    'versement',
    'paiement_client',
    'autre'
);

-- Direction for 'autre' operations
CREATE TYPE sens_operation AS ENUM (
    'plus',
    'moins'
);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id SERIAL PRIMARY KEY,
    nom VARCHAR(255) NOT NULL,
    prenom VARCHAR(255),
    telephone VARCHAR(32) UNIQUE,
    email VARCHAR(255),
    nom_utilisateur VARCHAR(64) UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CHARGES_MENSUELLES_SQL: &str = r"
CREATE TABLE charges_mensuelles (
    id SERIAL PRIMARY KEY,
    client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    date_charge DATE NOT NULL,
    mois INTEGER NOT NULL CHECK (mois BETWEEN 1 AND 12),
    annee INTEGER NOT NULL,
    libelle TEXT NOT NULL,
    montant NUMERIC(14,3) NOT NULL DEFAULT 0 CHECK (montant >= 0),
    avance NUMERIC(14,3) NOT NULL DEFAULT 0 CHECK (avance >= 0),
    solde_restant NUMERIC(14,3) NOT NULL DEFAULT 0,
    traite BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Chain fetch order: (client, annee) then mois ascending
CREATE INDEX idx_charges_client_annee_mois
    ON charges_mensuelles (client_id, annee, mois);
";

const BENEFICIAIRES_BUREAU_SQL: &str = r"
CREATE TABLE beneficiaires_bureau (
    id SERIAL PRIMARY KEY,
    beneficiaire VARCHAR(255) NOT NULL,
    libelle TEXT NOT NULL,
    montant NUMERIC(14,3) NOT NULL CHECK (montant > 0),
    date_operation DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Deduplication key lookup
CREATE INDEX idx_beneficiaires_dedup
    ON beneficiaires_bureau (beneficiaire, libelle, montant, date_operation);
";

const CAISSE_OPERATIONS_SQL: &str = r"
CREATE TABLE caisse_operations (
    id SERIAL PRIMARY KEY,
    type_operation type_operation NOT NULL,
    sens sens_operation,
    montant NUMERIC(14,3) NOT NULL CHECK (montant > 0),
    montant_avant NUMERIC(14,3) NOT NULL,
    montant_apres NUMERIC(14,3) NOT NULL,
    commentaire TEXT,
    client_id INTEGER REFERENCES clients(id) ON DELETE SET NULL,
    utilisateur VARCHAR(64),
    depense_bureau_id INTEGER REFERENCES beneficiaires_bureau(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- 'autre' must carry an explicit direction
    CONSTRAINT chk_autre_sens CHECK (type_operation <> 'autre' OR sens IS NOT NULL)
);

CREATE INDEX idx_caisse_operations_depense
    ON caisse_operations (depense_bureau_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS caisse_operations CASCADE;
DROP TABLE IF EXISTS beneficiaires_bureau CASCADE;
DROP TABLE IF EXISTS charges_mensuelles CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TYPE IF EXISTS sens_operation;
DROP TYPE IF EXISTS type_operation;
";
