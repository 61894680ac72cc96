use std::fmt;

#[derive(Debug, PartialEq)]
pub(crate) enum RegistryError {
    ReadRegistry,
    NotRegistry,
    Parser,
}

impl std::error::Error for RegistryError {}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::ReadRegistry => write!(f, "Failed to read Registry file"),
            RegistryError::NotRegistry => write!(f, "Not a Registry file"),
            RegistryError::Parser => write!(f, "Failed to parse Registry data"),
        }
    }
}
