use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::validation::{FieldErrors, Validate};
use crate::auth::OwnedResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "dog_size", rename_all = "lowercase")]
pub enum DogSize {
    Small,
    Medium,
    Large,
    Giant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "dog_gender", rename_all = "lowercase")]
pub enum DogGender {
    Male,
    Female,
}

/// Dog profile. Mutations are restricted to the owning user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Dog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub breed: String,
    pub size: DogSize,
    pub gender: DogGender,
    pub age_months: i32,
    pub mbti: Option<String>,
    pub avatar: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for Dog {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Dog {
    pub fn new(owner: Uuid, data: DogCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            name: data.name,
            breed: data.breed,
            size: data.size,
            gender: data.gender,
            age_months: data.age_months,
            mbti: None,
            avatar: data.avatar,
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: &DogUpdate) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(breed) = &patch.breed {
            self.breed = breed.clone();
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(age_months) = patch.age_months {
            self.age_months = age_months;
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = avatar.clone();
        }
    }
}

pub const MAX_AGE_MONTHS: i32 = 360;

#[derive(Debug, Clone, Deserialize)]
pub struct DogCreate {
    pub name: String,
    pub breed: String,
    pub size: DogSize,
    pub gender: DogGender,
    pub age_months: i32,
    pub avatar: Option<String>,
}

impl Validate for DogCreate {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.check_len("name", &self.name, 1, 50);
        errors.check_len("breed", &self.breed, 1, 50);
        errors.check_range("age_months", self.age_months, 0, MAX_AGE_MONTHS);
        errors
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DogUpdate {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub size: Option<DogSize>,
    pub gender: Option<DogGender>,
    pub age_months: Option<i32>,
    /// `None` keeps the avatar, `Some(None)` clears it
    #[serde(default, deserialize_with = "present")]
    pub avatar: Option<Option<String>>,
}

/// Marks a field as present even when its value is `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Validate for DogUpdate {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if let Some(name) = &self.name {
            errors.check_len("name", name, 1, 50);
        }
        if let Some(breed) = &self.breed {
            errors.check_len("breed", breed, 1, 50);
        }
        if let Some(age_months) = self.age_months {
            errors.check_range("age_months", age_months, 0, MAX_AGE_MONTHS);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create() -> DogCreate {
        serde_json::from_value(json!({
            "name": "Biscuit",
            "breed": "Corgi",
            "size": "small",
            "gender": "male",
            "age_months": 18
        }))
        .unwrap()
    }

    #[test]
    fn test_create_validation() {
        assert!(create().validate().is_ok());

        let mut bad = create();
        bad.name = String::new();
        bad.age_months = 400;
        let errors = bad.validate().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("age_months"));
        assert!(!errors.contains("breed"));
    }

    #[test]
    fn test_apply_partial_update() {
        let owner = Uuid::new_v4();
        let mut dog = Dog::new(owner, create());
        let patch = DogUpdate {
            name: Some("Waffles".to_string()),
            age_months: Some(24),
            ..Default::default()
        };
        dog.apply(&patch);

        assert_eq!(dog.name, "Waffles");
        assert_eq!(dog.age_months, 24);
        assert_eq!(dog.breed, "Corgi");
        assert_eq!(dog.owner_id(), owner);
    }

    #[test]
    fn test_avatar_null_clears_absent_keeps() {
        let mut dog = Dog::new(Uuid::new_v4(), create());
        dog.avatar = Some("https://img.example/biscuit.png".to_string());

        let keep: DogUpdate = serde_json::from_value(json!({ "name": "Waffles" })).unwrap();
        assert_eq!(keep.avatar, None);
        dog.apply(&keep);
        assert_eq!(dog.avatar.as_deref(), Some("https://img.example/biscuit.png"));

        let clear: DogUpdate = serde_json::from_value(json!({ "avatar": null })).unwrap();
        assert_eq!(clear.avatar, Some(None));
        dog.apply(&clear);
        assert_eq!(dog.avatar, None);

        let set: DogUpdate =
            serde_json::from_value(json!({ "avatar": "https://img.example/new.png" })).unwrap();
        dog.apply(&set);
        assert_eq!(dog.avatar.as_deref(), Some("https://img.example/new.png"));
    }

    #[test]
    fn test_unknown_size_rejected() {
        let result = serde_json::from_value::<DogCreate>(json!({
            "name": "Rex",
            "breed": "Mastiff",
            "size": "enormous",
            "gender": "male",
            "age_months": 3
        }));
        assert!(result.is_err());
    }
}
