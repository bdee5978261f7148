pub mod dog;
pub mod user;

pub use dog::{Dog, DogCreate, DogGender, DogSize, DogUpdate};
pub use user::User;
