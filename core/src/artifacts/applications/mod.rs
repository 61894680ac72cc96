mod chromium;
mod error;
mod firefox;
pub mod store;
