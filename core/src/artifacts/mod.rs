pub mod applications;
pub mod artifact;
pub mod error;
pub mod os;
