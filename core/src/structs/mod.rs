pub(crate) mod toml;
