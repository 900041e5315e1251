//! Putting a generated project on disk
//!
//! - `writer`: write generated files and directories
//! - `install`: install the project's npm dependencies

pub mod install;
pub mod writer;

pub use install::DependencyInstaller;
pub use writer::{existing_entries, write_files, write_project};
