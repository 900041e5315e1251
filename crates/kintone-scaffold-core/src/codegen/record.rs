//! Record type synthesis
//!
//! A [`RecordType`] is built from a schema first and rendered afterwards, so
//! the same declaration can be embedded at any indentation depth (as a type
//! alias body, or as the `record`/`records` member of an event wrapper).

use super::field_type::{is_excluded_on_create, map_field_type, qualified};
use super::{indent, render_key};
use crate::kintone::schema::{FieldDescriptor, Schema};

/// One member line (or block) of a record declaration
#[derive(Debug, Clone, PartialEq, Eq)]
enum Member {
    Scalar {
        code: String,
        type_name: &'static str,
    },
    SubTable {
        code: String,
        fields: Vec<(String, &'static str)>,
    },
}

/// Structured record declaration, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    system_fields: bool,
    members: Vec<Member>,
}

impl RecordType {
    /// Build the declaration for a schema.
    ///
    /// Creation-event records carry neither `$id`/`$revision` nor fields
    /// whose value kintone computes. Sub-tables are kept in both variants.
    pub fn from_schema(schema: &Schema, is_creation_event: bool) -> Self {
        let mut members = Vec::new();

        for field in schema {
            match field {
                FieldDescriptor::SubTable(table) => {
                    let fields = table
                        .fields
                        .iter()
                        .filter_map(|leaf| {
                            map_field_type(&leaf.field_type).map(|ty| (leaf.code.clone(), ty))
                        })
                        .collect();
                    members.push(Member::SubTable {
                        code: table.code.clone(),
                        fields,
                    });
                }
                FieldDescriptor::Leaf(leaf) => {
                    if is_creation_event && is_excluded_on_create(&leaf.field_type) {
                        continue;
                    }
                    match map_field_type(&leaf.field_type) {
                        Some(type_name) => members.push(Member::Scalar {
                            code: leaf.code.clone(),
                            type_name,
                        }),
                        None => {
                            tracing::debug!(
                                code = %leaf.code,
                                field_type = %leaf.field_type,
                                "skipping field with unsupported type"
                            );
                        }
                    }
                }
            }
        }

        Self {
            system_fields: !is_creation_event,
            members,
        }
    }

    /// Number of declared members, excluding `$id`/`$revision`
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Render as an object type literal whose closing brace sits at `depth`
    pub fn render(&self, depth: usize) -> String {
        let inner = indent(depth + 1);
        let mut out = String::from("{\n");

        if self.system_fields {
            out.push_str(&format!("{}$id: {};\n", inner, qualified("ID")));
            out.push_str(&format!("{}$revision: {};\n", inner, qualified("Revision")));
        }

        for member in &self.members {
            match member {
                Member::Scalar { code, type_name } => {
                    out.push_str(&format!(
                        "{}{}: {};\n",
                        inner,
                        render_key(code),
                        qualified(type_name)
                    ));
                }
                Member::SubTable { code, fields } => {
                    render_sub_table(&mut out, code, fields, depth + 1);
                }
            }
        }

        out.push_str(&indent(depth));
        out.push('}');
        out
    }
}

fn render_sub_table(out: &mut String, code: &str, fields: &[(String, &'static str)], depth: usize) {
    let pad = indent(depth);
    let l1 = indent(depth + 1);
    let l2 = indent(depth + 2);
    let l3 = indent(depth + 3);

    out.push_str(&format!("{}{}: {{\n", pad, render_key(code)));
    out.push_str(&format!("{}type: 'SUBTABLE';\n", l1));
    out.push_str(&format!("{}value: Array<{{\n", l1));
    out.push_str(&format!("{}id: string;\n", l2));
    out.push_str(&format!("{}value: {{\n", l2));
    for (field_code, type_name) in fields {
        out.push_str(&format!(
            "{}{}: {};\n",
            l3,
            render_key(field_code),
            qualified(type_name)
        ));
    }
    out.push_str(&format!("{}}};\n", l2));
    out.push_str(&format!("{}}}>;\n", l1));
    out.push_str(&format!("{}}};\n", pad));
}

/// Synthesize the record declaration of a schema as an object type literal
pub fn synthesize_record_type(schema: &Schema, is_creation_event: bool) -> String {
    RecordType::from_schema(schema, is_creation_event).render(0)
}

/// `export type <name> = { ... };` for a schema's full record
pub fn record_type_alias(type_name: &str, schema: &Schema) -> String {
    format!(
        "export type {} = {};",
        type_name,
        synthesize_record_type(schema, false)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kintone::schema::LeafField;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::leaf("record_no", "RECORD_NUMBER", "Record number"),
            FieldDescriptor::leaf("title", "SINGLE_LINE_TEXT", "Title"),
            FieldDescriptor::sub_table(
                "items",
                "Items",
                vec![
                    LeafField::new("qty", "NUMBER", "Qty"),
                    LeafField::new("memo", "MULTI_LINE_TEXT", "Memo"),
                ],
            ),
            FieldDescriptor::leaf("future", "UNKNOWN_FUTURE_TYPE", "Future"),
            FieldDescriptor::leaf("Status", "STATUS", "Status"),
            FieldDescriptor::leaf("amount", "NUMBER", "Amount"),
        ])
    }

    #[test]
    fn test_full_record_render() {
        let text = synthesize_record_type(&sample_schema(), false);
        let expected = "{
  $id: KintoneRecordField.ID;
  $revision: KintoneRecordField.Revision;
  record_no: KintoneRecordField.RecordNumber;
  title: KintoneRecordField.SingleLineText;
  items: {
    type: 'SUBTABLE';
    value: Array<{
      id: string;
      value: {
        qty: KintoneRecordField.Number;
        memo: KintoneRecordField.MultiLineText;
      };
    }>;
  };
  Status: KintoneRecordField.Status;
  amount: KintoneRecordField.Number;
}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_creation_record_excludes_system_fields() {
        let text = synthesize_record_type(&sample_schema(), true);
        assert!(!text.contains("$id"));
        assert!(!text.contains("$revision"));
        assert!(!text.contains("record_no"));
        assert!(!text.contains("Status"));
        assert!(text.contains("title: KintoneRecordField.SingleLineText;"));
        assert!(text.contains("amount: KintoneRecordField.Number;"));
    }

    #[test]
    fn test_sub_table_kept_in_creation_record() {
        let text = synthesize_record_type(&sample_schema(), true);
        assert!(text.contains("items: {"));
        assert!(text.contains("qty: KintoneRecordField.Number;"));
    }

    #[test]
    fn test_sub_table_has_no_flat_line() {
        let text = synthesize_record_type(&sample_schema(), false);
        assert_eq!(text.matches("items:").count(), 1);
        assert!(!text.contains("items: KintoneRecordField"));
    }

    #[test]
    fn test_unknown_type_omitted() {
        let text = synthesize_record_type(&sample_schema(), false);
        assert!(!text.contains("future"));
    }

    #[test]
    fn test_only_category_field_on_creation() {
        let schema = Schema::new(vec![FieldDescriptor::leaf("cat", "CATEGORY", "Category")]);
        assert_eq!(synthesize_record_type(&schema, true), "{\n}");
        assert!(synthesize_record_type(&schema, false).contains("cat: KintoneRecordField.Category;"));
    }

    #[test]
    fn test_member_count_matches_mappable_fields() {
        let schema = sample_schema();
        // record_no, title, items, Status, amount
        assert_eq!(RecordType::from_schema(&schema, false).member_count(), 5);
        // title, items, amount
        assert_eq!(RecordType::from_schema(&schema, true).member_count(), 3);
    }

    #[test]
    fn test_render_nested_depth() {
        let schema = Schema::new(vec![FieldDescriptor::leaf("n", "NUMBER", "N")]);
        let text = RecordType::from_schema(&schema, true).render(1);
        assert_eq!(text, "{\n    n: KintoneRecordField.Number;\n  }");
    }

    #[test]
    fn test_quotes_non_identifier_codes() {
        let schema = Schema::new(vec![FieldDescriptor::leaf("2nd-field", "DATE", "")]);
        let text = synthesize_record_type(&schema, true);
        assert!(text.contains("\"2nd-field\": KintoneRecordField.Date;"));
    }

    #[test]
    fn test_alias() {
        let alias = record_type_alias("Orders", &Schema::default());
        assert!(alias.starts_with("export type Orders = {\n  $id"));
        assert!(alias.ends_with("};"));
    }
}
