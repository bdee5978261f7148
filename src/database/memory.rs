use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Dog, DogUpdate, User};
use super::store::{DogStore, IdentityStore, StoreError};

/// In-process identity store. Phone uniqueness is enforced under the write lock.
#[derive(Default)]
pub struct MemoryIdentityStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user outright. Used to simulate accounts deleted out of band.
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, phone: &str, nickname: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.phone.as_deref() == Some(phone)) {
            return Err(StoreError::Conflict("phone already registered".to_string()));
        }
        let user = User::new(phone, nickname);
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct MemoryDogStore {
    dogs: RwLock<HashMap<Uuid, Dog>>,
}

impl MemoryDogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DogStore for MemoryDogStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Dog>, StoreError> {
        let dogs = self.dogs.read().await;
        let mut owned: Vec<Dog> = dogs.values().filter(|d| d.user_id == owner).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dog>, StoreError> {
        Ok(self.dogs.read().await.get(&id).cloned())
    }

    async fn insert(&self, dog: Dog) -> Result<Dog, StoreError> {
        self.dogs.write().await.insert(dog.id, dog.clone());
        Ok(dog)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &DogUpdate,
    ) -> Result<Option<Dog>, StoreError> {
        let mut dogs = self.dogs.write().await;
        match dogs.get_mut(&id) {
            Some(dog) if dog.user_id == owner => {
                dog.apply(patch);
                Ok(Some(dog.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut dogs = self.dogs.write().await;
        match dogs.get(&id) {
            Some(dog) if dog.user_id == owner => {
                dogs.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
