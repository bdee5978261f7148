use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Dog, DogUpdate, User};

/// Errors surfaced by the storage collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness violation, e.g. a phone that is already registered
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Lookup and creation of identities
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::Conflict` when `phone` is already taken.
    /// A successful create is visible to the next read.
    async fn create(&self, phone: &str, nickname: &str) -> Result<User, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Persistence for dog profiles.
///
/// Mutations are conditional on the owner, so a row that changed hands or
/// vanished after the caller's ownership check is left untouched.
#[async_trait]
pub trait DogStore: Send + Sync {
    /// Dogs owned by `owner`, newest first
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Dog>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dog>, StoreError>;

    async fn insert(&self, dog: Dog) -> Result<Dog, StoreError>;

    /// `None` when no dog with `id` is owned by `owner`
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &DogUpdate,
    ) -> Result<Option<Dog>, StoreError>;

    /// `false` when no dog with `id` is owned by `owner`
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}
