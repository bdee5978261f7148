use thiserror::Error;

use super::token::TokenError;
use crate::database::StoreError;

/// Outcomes of the auth flows and the authorization guard
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("phone number already registered")]
    AlreadyRegistered,

    #[error("user not registered, please register first")]
    NotRegistered,

    #[error("invalid verification code")]
    InvalidCode,

    /// Missing, malformed, expired or orphaned token
    #[error("authentication required")]
    Unauthenticated,

    #[error("not allowed to modify this resource")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}
