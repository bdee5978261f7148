use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered identity, keyed by phone number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub phone: Option<String>,
    pub nickname: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(phone: &str, nickname: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone: Some(phone.to_string()),
            nickname: nickname.to_string(),
            avatar: None,
            created_at: Utc::now(),
        }
    }
}
