pub(crate) mod cookies;
pub(crate) mod history;
