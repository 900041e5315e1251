//! kintone scaffold core - shared library for the `kintone-create` CLI
//!
//! Turns kintone app form schemas into TypeScript/JavaScript source: record
//! types, event payload types, field code constants and a ready-to-build
//! customization project.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Generation** - Pure functions from schemas to text (`codegen`)
//! - **Layer 2: Data access and IO** - REST client, local schemas, file writer,
//!   package manager detection (`kintone`, `scaffold`, `runtime`, `config`)
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use kintone_scaffold_core::{codegen, kintone::SchemaSource};
//!
//! let source = SchemaSource::local("./schemas".into());
//! let app = source.fetch_apps().await?.remove(0);
//! let schema = source.fetch_form_fields(&app).await?;
//! let types = codegen::synthesize_event_types(&["app.record.detail.show"], &schema);
//! ```

pub mod codegen;
pub mod config;
pub mod kintone;
pub mod runtime;
pub mod scaffold;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use codegen::{
    map_field_type, synthesize_event_types, synthesize_identifier_table, synthesize_record_type,
    Language, ScriptOptions,
};
pub use config::{ConnectionArgs, ConnectionConfig, Credentials};
pub use kintone::{AppRef, FieldDescriptor, KintoneError, Schema, SchemaSource};

#[cfg(feature = "tui")]
pub use tui::{run, run_tools};
