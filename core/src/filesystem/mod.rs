pub mod acquire;
pub mod error;
pub(crate) mod files;
