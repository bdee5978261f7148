use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthError, AuthorizationGuard};
use crate::database::models::{Dog, DogCreate, DogUpdate, User};
use crate::database::DogStore;

const RESOURCE: &str = "dog";

/// Dog profile CRUD with owner-only mutation
#[derive(Clone)]
pub struct DogService {
    dogs: Arc<dyn DogStore>,
}

impl DogService {
    pub fn new(dogs: Arc<dyn DogStore>) -> Self {
        Self { dogs }
    }

    pub async fn list_mine(&self, caller: &User) -> Result<Vec<Dog>, AuthError> {
        Ok(self.dogs.list_by_owner(caller.id).await?)
    }

    pub async fn create(&self, caller: &User, data: DogCreate) -> Result<Dog, AuthError> {
        let dog = self.dogs.insert(Dog::new(caller.id, data)).await?;
        tracing::info!(dog_id = %dog.id, user_id = %caller.id, "Dog created");
        Ok(dog)
    }

    /// Reads are open to any authenticated caller
    pub async fn get(&self, id: Uuid) -> Result<Dog, AuthError> {
        self.dogs
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound(RESOURCE))
    }

    pub async fn update(
        &self,
        caller: &User,
        id: Uuid,
        patch: DogUpdate,
    ) -> Result<Dog, AuthError> {
        self.check_owner(caller, id).await?;

        // Conditional on the owner; None means the row vanished since the check
        let dog = self
            .dogs
            .update_owned(id, caller.id, &patch)
            .await?
            .ok_or(AuthError::NotFound(RESOURCE))?;

        tracing::info!(dog_id = %id, user_id = %caller.id, "Dog updated");
        Ok(dog)
    }

    pub async fn delete(&self, caller: &User, id: Uuid) -> Result<(), AuthError> {
        self.check_owner(caller, id).await?;

        if !self.dogs.delete_owned(id, caller.id).await? {
            return Err(AuthError::NotFound(RESOURCE));
        }

        tracing::info!(dog_id = %id, user_id = %caller.id, "Dog deleted");
        Ok(())
    }

    /// A dog that does not exist is reported the same as someone else's
    async fn check_owner(&self, caller: &User, id: Uuid) -> Result<(), AuthError> {
        match self.dogs.find_by_id(id).await? {
            Some(dog) => AuthorizationGuard::ensure_owner(&dog, caller),
            None => Err(AuthError::Forbidden),
        }
    }
}
