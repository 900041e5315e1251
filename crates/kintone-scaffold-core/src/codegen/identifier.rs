//! Identifier tables: readable constant names for field codes
//!
//! Labels are free text, so each one is reduced to its ASCII alphanumeric
//! characters. Repeated names are numbered in schema order: the first keeps
//! the bare name, later ones get `_0`, `_1`, ... Sub-table fields are numbered
//! in their own namespace, one per sub-table.

use super::{indent, render_key, string_literal, Language};
use crate::kintone::schema::{FieldDescriptor, LeafField, Schema};
use std::collections::{HashMap, HashSet};

/// One entry of an identifier table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierEntry {
    Field {
        identifier: String,
        code: String,
    },
    SubTable {
        identifier: String,
        code: String,
        fields: Vec<(String, String)>,
    },
}

impl IdentifierEntry {
    pub fn identifier(&self) -> &str {
        match self {
            IdentifierEntry::Field { identifier, .. } => identifier,
            IdentifierEntry::SubTable { identifier, .. } => identifier,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            IdentifierEntry::Field { code, .. } => code,
            IdentifierEntry::SubTable { code, .. } => code,
        }
    }
}

/// Identifier to field code mapping of one app
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierTable {
    entries: Vec<IdentifierEntry>,
}

/// Strip everything but ASCII letters and digits
pub fn sanitize_label(label: &str) -> String {
    label.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn candidate(label: &str, code: &str) -> String {
    let sanitized = sanitize_label(label);
    if sanitized.is_empty() {
        code.to_string()
    } else {
        sanitized
    }
}

/// Counts how often each candidate was seen within one namespace and
/// remembers every name handed out
#[derive(Default)]
struct Namespace {
    seen: HashMap<String, usize>,
    used: HashSet<String>,
}

impl Namespace {
    /// Nth occurrence (1-indexed): bare name for N = 1, `_{N-2}` after that.
    /// A name already taken (e.g. a field code that looks like `Name_0`)
    /// moves on to the next free suffix.
    fn assign(&mut self, candidate: String) -> String {
        let count = {
            let count = self.seen.entry(candidate.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let mut suffix = count.checked_sub(2);
        loop {
            let name = match suffix {
                None => candidate.clone(),
                Some(n) => format!("{}_{}", candidate, n),
            };
            if self.used.insert(name.clone()) {
                return name;
            }
            suffix = Some(suffix.map_or(0, |n| n + 1));
        }
    }
}

fn leaf_entries(fields: &[LeafField]) -> Vec<(String, String)> {
    let mut namespace = Namespace::default();
    fields
        .iter()
        .map(|leaf| {
            let identifier = namespace.assign(candidate(&leaf.label, &leaf.code));
            (identifier, leaf.code.clone())
        })
        .collect()
}

/// Derive the identifier table of a schema
pub fn synthesize_identifier_table(schema: &Schema) -> IdentifierTable {
    let mut namespace = Namespace::default();

    let entries = schema
        .iter()
        .map(|field| {
            let identifier = namespace.assign(candidate(field.label(), field.code()));
            match field {
                FieldDescriptor::Leaf(leaf) => IdentifierEntry::Field {
                    identifier,
                    code: leaf.code.clone(),
                },
                FieldDescriptor::SubTable(table) => IdentifierEntry::SubTable {
                    identifier,
                    code: table.code.clone(),
                    fields: leaf_entries(&table.fields),
                },
            }
        })
        .collect();

    IdentifierTable { entries }
}

impl IdentifierTable {
    pub fn entries(&self) -> &[IdentifierEntry] {
        &self.entries
    }

    /// Field code behind a top-level identifier
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.identifier() == identifier)
            .map(IdentifierEntry::code)
    }

    /// Render as `export const <name> = { ... }` (`as const` in TypeScript)
    pub fn render(&self, const_name: &str, language: Language) -> String {
        let l1 = indent(1);
        let l2 = indent(2);
        let l3 = indent(3);

        let mut out = format!("export const {} = {{\n", const_name);
        for entry in &self.entries {
            match entry {
                IdentifierEntry::Field { identifier, code } => {
                    out.push_str(&format!(
                        "{}{}: {},\n",
                        l1,
                        render_key(identifier),
                        string_literal(code)
                    ));
                }
                IdentifierEntry::SubTable {
                    identifier,
                    code,
                    fields,
                } => {
                    out.push_str(&format!("{}{}: {{\n", l1, render_key(identifier)));
                    out.push_str(&format!("{}code: {},\n", l2, string_literal(code)));
                    out.push_str(&format!("{}fields: {{\n", l2));
                    for (identifier, code) in fields {
                        out.push_str(&format!(
                            "{}{}: {},\n",
                            l3,
                            render_key(identifier),
                            string_literal(code)
                        ));
                    }
                    out.push_str(&format!("{}}},\n", l2));
                    out.push_str(&format!("{}}},\n", l1));
                }
            }
        }
        out.push('}');
        if language.is_typescript() {
            out.push_str(" as const");
        }
        out.push_str(";\n");
        out
    }
}
