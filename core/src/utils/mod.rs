pub(crate) mod encoding;
mod extraction_toml;
pub(crate) mod logging;
pub(crate) mod nom_helper;
pub(crate) mod strings;
pub mod time;
