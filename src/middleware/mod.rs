pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{require_auth, CurrentUser};
pub use extract::ValidatedJson;
pub use response::{ApiResponse, ApiResult};
