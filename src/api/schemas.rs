// Request and response bodies for the /auth endpoints

use serde::{Deserialize, Serialize};

use super::validation::{FieldErrors, Validate};
use crate::database::models::User;

pub const PHONE_LEN: usize = 11;
pub const CODE_MIN_LEN: usize = 4;
pub const CODE_MAX_LEN: usize = 6;
pub const NICKNAME_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
}

impl Validate for SendCodeRequest {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.check_len("phone", &self.phone, PHONE_LEN, PHONE_LEN);
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub code: String,
}

impl Validate for LoginRequest {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.check_len("phone", &self.phone, PHONE_LEN, PHONE_LEN);
        errors.check_len("code", &self.code, CODE_MIN_LEN, CODE_MAX_LEN);
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub nickname: String,
    pub code: String,
}

impl Validate for RegisterRequest {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.check_len("phone", &self.phone, PHONE_LEN, PHONE_LEN);
        errors.check_len("nickname", &self.nickname, 1, NICKNAME_MAX_LEN);
        errors.check_len("code", &self.code, CODE_MIN_LEN, CODE_MAX_LEN);
        errors
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendCodeResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

impl TokenResponse {
    pub fn bearer(token: String, expires_in: i64, user: User) -> Self {
        Self {
            token,
            token_type: "bearer",
            expires_in,
            user,
        }
    }
}
