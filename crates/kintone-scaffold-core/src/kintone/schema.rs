//! Form field schema as returned by the kintone form fields API
//!
//! The remote response is a JSON object keyed by field code. Object order is
//! meaningful (it drives declaration order and label collision numbering), so
//! deserialization goes through an [`IndexMap`] instead of a hash map.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Type tag of the structural sub-table field
pub const SUBTABLE: &str = "SUBTABLE";

/// A scalar field: anything that is not a sub-table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafField {
    pub code: String,
    pub field_type: String,
    pub label: String,
}

impl LeafField {
    pub fn new(
        code: impl Into<String>,
        field_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            field_type: field_type.into(),
            label: label.into(),
        }
    }
}

/// A sub-table field. Its rows only ever contain leaf fields; kintone does
/// not allow tables inside tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTable {
    pub code: String,
    pub label: String,
    pub fields: Vec<LeafField>,
}

/// One entry of an app's form schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDescriptor {
    Leaf(LeafField),
    SubTable(SubTable),
}

impl FieldDescriptor {
    /// Shorthand for building a leaf field
    pub fn leaf(
        code: impl Into<String>,
        field_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::Leaf(LeafField::new(code, field_type, label))
    }

    /// Shorthand for building a sub-table field
    pub fn sub_table(
        code: impl Into<String>,
        label: impl Into<String>,
        fields: Vec<LeafField>,
    ) -> Self {
        Self::SubTable(SubTable {
            code: code.into(),
            label: label.into(),
            fields,
        })
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Leaf(field) => &field.code,
            Self::SubTable(table) => &table.code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Leaf(field) => &field.label,
            Self::SubTable(table) => &table.label,
        }
    }

    /// The remote type tag (`SUBTABLE` for sub-tables)
    pub fn field_type(&self) -> &str {
        match self {
            Self::Leaf(field) => &field.field_type,
            Self::SubTable(_) => SUBTABLE,
        }
    }
}

/// Ordered form schema of one app
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Response body of `GET /k/v1/app/form/fields.json`
#[derive(Debug, Clone, Deserialize)]
pub struct FormFieldsResponse {
    pub properties: Schema,

    #[serde(default)]
    pub revision: Option<String>,
}

#[derive(Deserialize)]
struct RawLeaf {
    #[serde(rename = "type")]
    field_type: String,

    #[serde(default)]
    label: String,
}

#[derive(Deserialize)]
struct RawField {
    #[serde(rename = "type")]
    field_type: String,

    #[serde(default)]
    label: String,

    #[serde(default)]
    fields: IndexMap<String, RawLeaf>,
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, RawField>::deserialize(deserializer)?;

        let fields = raw
            .into_iter()
            .map(|(code, field)| {
                if field.field_type == SUBTABLE {
                    let leaves = field
                        .fields
                        .into_iter()
                        .map(|(code, leaf)| LeafField::new(code, leaf.field_type, leaf.label))
                        .collect();
                    FieldDescriptor::sub_table(code, field.label, leaves)
                } else {
                    FieldDescriptor::leaf(code, field.field_type, field.label)
                }
            })
            .collect();

        Ok(Schema::new(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "properties": {
            "zeta": { "type": "SINGLE_LINE_TEXT", "code": "zeta", "label": "Zeta", "noLabel": false, "required": true },
            "alpha": { "type": "NUMBER", "code": "alpha", "label": "Alpha", "digit": false },
            "items": {
                "type": "SUBTABLE",
                "code": "items",
                "label": "Items",
                "fields": {
                    "qty": { "type": "NUMBER", "code": "qty", "label": "Qty" },
                    "note": { "type": "MULTI_LINE_TEXT", "code": "note", "label": "Note" }
                }
            },
            "Status": { "type": "STATUS", "code": "Status", "label": "Status", "enabled": false }
        },
        "revision": "12"
    }"#;

    #[test]
    fn test_parse_preserves_field_order() {
        let response: FormFieldsResponse = serde_json::from_str(RESPONSE).unwrap();
        let codes: Vec<&str> = response.properties.iter().map(|f| f.code()).collect();
        assert_eq!(codes, vec!["zeta", "alpha", "items", "Status"]);
        assert_eq!(response.revision.as_deref(), Some("12"));
    }

    #[test]
    fn test_parse_sub_table() {
        let response: FormFieldsResponse = serde_json::from_str(RESPONSE).unwrap();
        let table = match &response.properties.fields()[2] {
            FieldDescriptor::SubTable(table) => table,
            other => panic!("expected sub-table, got {:?}", other),
        };
        assert_eq!(table.label, "Items");
        assert_eq!(
            table.fields,
            vec![
                LeafField::new("qty", "NUMBER", "Qty"),
                LeafField::new("note", "MULTI_LINE_TEXT", "Note"),
            ]
        );
    }

    #[test]
    fn test_missing_label_defaults_to_empty() {
        let schema: Schema =
            serde_json::from_str(r#"{ "f": { "type": "CALC" } }"#).unwrap();
        assert_eq!(schema.fields()[0], FieldDescriptor::leaf("f", "CALC", ""));
    }

    #[test]
    fn test_parse_from_yaml() {
        let yaml = "b:\n  type: DATE\n  label: When\na:\n  type: LINK\n  label: Site\n";
        let schema: Schema = serde_yaml::from_str(yaml).unwrap();
        let types: Vec<&str> = schema.iter().map(|f| f.field_type()).collect();
        assert_eq!(types, vec!["DATE", "LINK"]);
    }
}
