pub mod eventlogs;
pub mod registry;
