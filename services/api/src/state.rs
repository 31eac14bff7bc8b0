use lectio_auth::{AuthCore, PasswordHasher, TokenSigner};
use sea_orm::DatabaseConnection;

use crate::infra::db::{DbJournalRepository, DbUserRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: AuthCore<DbUserRepository>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, signer: TokenSigner, hasher: PasswordHasher) -> Self {
        let identities = DbUserRepository {
            db: db.clone(),
            hasher: hasher.clone(),
        };
        Self {
            db,
            auth: AuthCore::new(identities, signer, hasher),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
            hasher: self.auth.hasher().clone(),
        }
    }

    pub fn journal_repo(&self) -> DbJournalRepository {
        DbJournalRepository {
            db: self.db.clone(),
        }
    }
}
