// Shared error modeling.
pub mod error;
