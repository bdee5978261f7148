pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{MemoryDogStore, MemoryIdentityStore};
pub use postgres::{PgDogStore, PgIdentityStore};
pub use store::{DogStore, IdentityStore, StoreError};
