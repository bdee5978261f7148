pub mod credentials;
pub mod error;
pub mod guard;
pub mod token;

pub use credentials::{CredentialVerifier, LogSmsSender, SmsSender, StubCodeVerifier};
pub use error::AuthError;
pub use guard::{AuthorizationGuard, OwnedResource};
pub use token::{Claims, TokenCodec, TokenError};
