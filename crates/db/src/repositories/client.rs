//! Client repository for client database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::entities::{charges_mensuelles, clients};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(i32),

    /// A client with this phone number already exists.
    #[error("A client with phone number {0} already exists")]
    DuplicateTelephone(String),

    /// A client with this username already exists.
    #[error("A client with username {0} already exists")]
    DuplicateUsername(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a client.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    /// Family name (required).
    pub nom: String,
    /// First name.
    pub prenom: Option<String>,
    /// Phone number, unique when present.
    pub telephone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Login name, unique when present.
    pub nom_utilisateur: Option<String>,
}

/// Input for updating a client. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    /// New family name.
    pub nom: Option<String>,
    /// New first name.
    pub prenom: Option<Option<String>>,
    /// New phone number.
    pub telephone: Option<Option<String>>,
    /// New email address.
    pub email: Option<Option<String>>,
    /// New login name.
    pub nom_utilisateur: Option<Option<String>>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all clients ordered by name.
    pub async fn list(&self) -> Result<Vec<clients::Model>, ClientError> {
        let rows = clients::Entity::find()
            .order_by_asc(clients::Column::Nom)
            .order_by_asc(clients::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Finds a client by id.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<clients::Model>, ClientError> {
        Ok(clients::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds a client by username.
    pub async fn find_by_username(
        &self,
        nom_utilisateur: &str,
    ) -> Result<Option<clients::Model>, ClientError> {
        let row = clients::Entity::find()
            .filter(clients::Column::NomUtilisateur.eq(nom_utilisateur))
            .one(&self.db)
            .await?;
        Ok(row)
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTelephone` / `DuplicateUsername` when the unique
    /// contact fields collide with an existing client.
    pub async fn create(&self, input: CreateClientInput) -> Result<clients::Model, ClientError> {
        if input.nom.trim().is_empty() {
            return Err(ClientError::Validation("nom is required".to_string()));
        }

        self.check_uniqueness(&input.telephone, &input.nom_utilisateur, None)
            .await?;

        let client = clients::ActiveModel {
            nom: Set(input.nom),
            prenom: Set(input.prenom),
            telephone: Set(input.telephone),
            email: Set(input.email),
            nom_utilisateur: Set(input.nom_utilisateur),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        Ok(client.insert(&self.db).await?)
    }

    /// Updates a client.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateClientInput,
    ) -> Result<clients::Model, ClientError> {
        let existing = clients::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let telephone = input
            .telephone
            .clone()
            .unwrap_or_else(|| existing.telephone.clone());
        let nom_utilisateur = input
            .nom_utilisateur
            .clone()
            .unwrap_or_else(|| existing.nom_utilisateur.clone());
        self.check_uniqueness(&telephone, &nom_utilisateur, Some(id))
            .await?;

        let mut active: clients::ActiveModel = existing.into();

        if let Some(nom) = input.nom {
            if nom.trim().is_empty() {
                return Err(ClientError::Validation("nom is required".to_string()));
            }
            active.nom = Set(nom);
        }
        if let Some(prenom) = input.prenom {
            active.prenom = Set(prenom);
        }
        if let Some(telephone) = input.telephone {
            active.telephone = Set(telephone);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(nom_utilisateur) = input.nom_utilisateur {
            active.nom_utilisateur = Set(nom_utilisateur);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a client and its monthly charges in one transaction.
    ///
    /// Register operations referencing the client keep their snapshots;
    /// their client reference is cleared by the schema (ON DELETE SET NULL).
    pub async fn delete(&self, id: i32) -> Result<(), ClientError> {
        let txn = self.db.begin().await?;

        clients::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        charges_mensuelles::Entity::delete_many()
            .filter(charges_mensuelles::Column::ClientId.eq(id))
            .exec(&txn)
            .await?;
        clients::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Rejects phone/username values already taken by another client.
    async fn check_uniqueness(
        &self,
        telephone: &Option<String>,
        nom_utilisateur: &Option<String>,
        exclude_id: Option<i32>,
    ) -> Result<(), ClientError> {
        if let Some(telephone) = telephone {
            let mut query = clients::Entity::find()
                .filter(clients::Column::Telephone.eq(telephone.as_str()));
            if let Some(id) = exclude_id {
                query = query.filter(clients::Column::Id.ne(id));
            }
            if query.one(&self.db).await?.is_some() {
                return Err(ClientError::DuplicateTelephone(telephone.clone()));
            }
        }

        if let Some(nom_utilisateur) = nom_utilisateur {
            let mut query = clients::Entity::find()
                .filter(clients::Column::NomUtilisateur.eq(nom_utilisateur.as_str()));
            if let Some(id) = exclude_id {
                query = query.filter(clients::Column::Id.ne(id));
            }
            if query.one(&self.db).await?.is_some() {
                return Err(ClientError::DuplicateUsername(nom_utilisateur.clone()));
            }
        }

        Ok(())
    }
}
