use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Dog, DogUpdate, User};
use super::store::{DogStore, IdentityStore, StoreError};

const USER_COLUMNS: &str = "id, phone, nickname, avatar, created_at";

const DOG_COLUMNS: &str =
    "id, user_id, name, breed, size, gender, age_months, mbti, avatar, images, created_at";

/// Identity store backed by the `users` table
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE phone = $1",
            USER_COLUMNS
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, phone: &str, nickname: &str) -> Result<User, StoreError> {
        let user = User::new(phone, nickname);

        // UNIQUE(phone) decides concurrent registrations
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, phone, nickname, avatar, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.phone)
        .bind(&user.nickname)
        .bind(&user.avatar)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict("phone already registered".to_string())
            }
            other => StoreError::Sqlx(other),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Dog store backed by the `dogs` table
#[derive(Clone)]
pub struct PgDogStore {
    pool: PgPool,
}

impl PgDogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DogStore for PgDogStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Dog>, StoreError> {
        let dogs = sqlx::query_as::<_, Dog>(&format!(
            "SELECT {} FROM dogs WHERE user_id = $1 ORDER BY created_at DESC",
            DOG_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(dogs)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dog>, StoreError> {
        let dog = sqlx::query_as::<_, Dog>(&format!(
            "SELECT {} FROM dogs WHERE id = $1",
            DOG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dog)
    }

    async fn insert(&self, dog: Dog) -> Result<Dog, StoreError> {
        let dog = sqlx::query_as::<_, Dog>(&format!(
            "INSERT INTO dogs ({cols})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {cols}",
            cols = DOG_COLUMNS
        ))
        .bind(dog.id)
        .bind(dog.user_id)
        .bind(&dog.name)
        .bind(&dog.breed)
        .bind(dog.size)
        .bind(dog.gender)
        .bind(dog.age_months)
        .bind(&dog.mbti)
        .bind(&dog.avatar)
        .bind(&dog.images)
        .bind(dog.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(dog)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &DogUpdate,
    ) -> Result<Option<Dog>, StoreError> {
        let dog = sqlx::query_as::<_, Dog>(&format!(
            "UPDATE dogs SET
                name = COALESCE($3, name),
                breed = COALESCE($4, breed),
                size = COALESCE($5, size),
                gender = COALESCE($6, gender),
                age_months = COALESCE($7, age_months),
                avatar = CASE WHEN $9 THEN $8 ELSE avatar END
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            DOG_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .bind(&patch.name)
        .bind(&patch.breed)
        .bind(patch.size)
        .bind(patch.gender)
        .bind(patch.age_months)
        .bind(patch.avatar.clone().flatten())
        .bind(patch.avatar.is_some())
        .fetch_optional(&self.pool)
        .await?;

        Ok(dog)
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM dogs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
