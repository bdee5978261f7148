pub mod schemas;
pub mod validation;
