mod cell;
pub(crate) mod error;
pub mod extractor;
mod hbin;
mod header;
pub(crate) mod hive;
mod keys;
mod lists;
pub mod userassist;

#[cfg(test)]
pub(crate) mod testing;
