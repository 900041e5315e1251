//! Schema to source text generation
//!
//! This module provides:
//! - Field type mapping (kintone type tag to `KintoneRecordField` type)
//! - Record type synthesis (full and creation-event variants)
//! - Event wrapper type synthesis, one per event category
//! - Identifier tables derived from field labels
//! - Project files (package.json, webpack config, starter code, types file)
//!
//! Everything here is pure: inputs in, strings out.

pub mod event;
pub mod field_type;
pub mod identifier;
pub mod project;
pub mod record;

use std::fmt;

pub use event::{event_categories, synthesize_event_types};
pub use field_type::map_field_type;
pub use identifier::{synthesize_identifier_table, IdentifierTable};
pub use project::{GeneratedFile, GeneratedProject, ProjectSpec};
pub use record::{synthesize_record_type, RecordType};

/// One level of indentation in generated code
pub(crate) const INDENT: &str = "  ";

pub(crate) fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

/// Whether `name` can be used as a bare property key / identifier
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Render a string as a double-quoted literal
pub(crate) fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Render an object key, quoting it when it is not a valid identifier
pub(crate) fn render_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// Target language of the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::TypeScript, Language::JavaScript];

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }

    /// Short name, also the source directory under `src/`
    pub fn short_name(&self) -> &'static str {
        match self {
            Language::TypeScript => "ts",
            Language::JavaScript => "js",
        }
    }

    /// Parse `ts`/`typescript`/`js`/`javascript` (case-insensitive)
    pub fn parse(s: &str) -> Option<Language> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Some(Language::TypeScript),
            "javascript" | "js" => Some(Language::JavaScript),
            _ => None,
        }
    }

    pub fn is_typescript(&self) -> bool {
        matches!(self, Language::TypeScript)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Language plus whether React conventions are layered on top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    pub language: Language,
    pub react: bool,
}

impl ScriptOptions {
    pub fn new(language: Language, react: bool) -> Self {
        Self { language, react }
    }

    /// Extension of the entry file
    pub fn extension(&self) -> &'static str {
        match (self.language, self.react) {
            (Language::TypeScript, false) => "ts",
            (Language::TypeScript, true) => "tsx",
            (Language::JavaScript, false) => "js",
            (Language::JavaScript, true) => "jsx",
        }
    }

    /// Source directory, relative to the project root
    pub fn code_dir(&self) -> String {
        format!("src/{}", self.language.short_name())
    }

    /// Path of the entry file, relative to the project root
    pub fn entry_path(&self) -> String {
        format!("{}/main.{}", self.code_dir(), self.extension())
    }
}
