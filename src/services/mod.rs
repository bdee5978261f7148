pub mod auth_service;
pub mod dog_service;

pub use auth_service::{AuthService, AuthSession};
pub use dog_service::DogService;
