//! kintone platform model and data access
//!
//! This module provides:
//! - App references and form schemas (with order-preserving deserialization)
//! - The JavaScript API event catalog and its payload categories
//! - A REST client for the apps and form fields endpoints
//! - Schema sources (remote API or local directory)

pub mod app;
pub mod client;
pub mod error;
pub mod events;
pub mod schema;
pub mod source;

pub use app::AppRef;
pub use client::KintoneClient;
pub use error::KintoneError;
pub use events::{event_category, EventCategory, DEFAULT_EVENTS, KINTONE_EVENTS};
pub use schema::{FieldDescriptor, LeafField, Schema, SubTable};
pub use source::SchemaSource;
