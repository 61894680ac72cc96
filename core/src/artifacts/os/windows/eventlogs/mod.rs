mod error;
pub mod parser;
mod record;
