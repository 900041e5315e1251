//! kintone field type tag to `KintoneRecordField` type mapping

/// Namespace the record field types are exported from by `@kintone/rest-api-client`
pub const RECORD_FIELD_NAMESPACE: &str = "KintoneRecordField";

/// Field types computed by kintone and therefore absent from creation payloads
pub const EXCLUDED_ON_CREATE: &[&str] = &[
    "RECORD_NUMBER",
    "CREATOR",
    "CREATED_TIME",
    "MODIFIER",
    "UPDATED_TIME",
    "CATEGORY",
    "STATUS",
    "STATUS_ASSIGNEE",
];

/// Map a field type tag to its `KintoneRecordField` type name.
///
/// Returns `None` for `SUBTABLE` and for any tag this version does not know,
/// so newer field types are skipped instead of breaking generation.
pub fn map_field_type(tag: &str) -> Option<&'static str> {
    let name = match tag {
        "RECORD_NUMBER" => "RecordNumber",
        "CREATOR" => "Creator",
        "CREATED_TIME" => "CreatedTime",
        "MODIFIER" => "Modifier",
        "UPDATED_TIME" => "UpdatedTime",
        "SINGLE_LINE_TEXT" => "SingleLineText",
        "MULTI_LINE_TEXT" => "MultiLineText",
        "RICH_TEXT" => "RichText",
        "NUMBER" => "Number",
        "CALC" => "Calc",
        "CHECK_BOX" => "CheckBox",
        "RADIO_BUTTON" => "RadioButton",
        "MULTI_SELECT" => "MultiSelect",
        "DROP_DOWN" => "Dropdown",
        "USER_SELECT" => "UserSelect",
        "ORGANIZATION_SELECT" => "OrganizationSelect",
        "GROUP_SELECT" => "GroupSelect",
        "DATE" => "Date",
        "TIME" => "Time",
        "DATETIME" => "DateTime",
        "LINK" => "Link",
        "FILE" => "File",
        "CATEGORY" => "Category",
        "STATUS" => "Status",
        "STATUS_ASSIGNEE" => "StatusAssignee",
        _ => return None,
    };
    Some(name)
}

/// Whether a field of this type is left out of creation-event records
pub fn is_excluded_on_create(tag: &str) -> bool {
    EXCLUDED_ON_CREATE.contains(&tag)
}

/// Fully qualified type reference, e.g. `KintoneRecordField.Number`
pub(crate) fn qualified(type_name: &str) -> String {
    format!("{}.{}", RECORD_FIELD_NAMESPACE, type_name)
}
