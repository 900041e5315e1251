//! Runtime detection
//!
//! This module provides:
//! - Node.js detection
//! - Package manager detection (npm, pnpm, yarn, bun)

pub mod check;

pub use check::{check_node, detect_package_manager, PackageManager, RuntimeInfo};
