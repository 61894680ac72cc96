pub mod applications;
pub mod evidence;
pub mod files;
pub mod windows;
