//! Event wrapper type synthesis
//!
//! Selected events are reduced to their payload categories; each category
//! yields one `export interface` no matter how many events share it.

use super::record::RecordType;
use super::INDENT;
use crate::kintone::events::{event_category, EventCategory};
use crate::kintone::schema::Schema;
use std::collections::HashSet;

/// Distinct categories of the given events, in order of first appearance.
/// Events missing from the catalog are ignored.
pub fn event_categories<I, S>(events: I) -> Vec<EventCategory>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut emitted = HashSet::new();
    let mut categories = Vec::new();

    for event in events {
        let event = event.as_ref();
        match event_category(event) {
            Some(category) => {
                if emitted.insert(category) {
                    categories.push(category);
                }
            }
            None => tracing::debug!(event, "event has no known category"),
        }
    }

    categories
}

/// Wrapper interface for one category
pub fn event_wrapper(category: EventCategory, schema: &Schema) -> String {
    let record = |is_creation_event: bool| {
        RecordType::from_schema(schema, is_creation_event).render(1)
    };

    let members: Vec<String> = match category {
        EventCategory::List => vec![
            "appId: number;".to_string(),
            "viewType: string;".to_string(),
            "viewId: number;".to_string(),
            "viewName: string;".to_string(),
            format!("records: {}[];", record(false)),
            "offset: number;".to_string(),
            "size: number;".to_string(),
            "type: string;".to_string(),
        ],
        EventCategory::Record => vec![
            "appId: number;".to_string(),
            "recordId: number;".to_string(),
            format!("record: {};", record(false)),
            "type: string;".to_string(),
        ],
        EventCategory::Create => vec![
            "appId: number;".to_string(),
            "recordId: number;".to_string(),
            format!("record: {};", record(true)),
            "type: string;".to_string(),
        ],
        EventCategory::CreateShow => vec![
            "appId: number;".to_string(),
            "reuse: boolean;".to_string(),
            format!("record: {};", record(true)),
            "type: string;".to_string(),
        ],
        EventCategory::Report => vec!["appId: number;".to_string(), "type: string;".to_string()],
        EventCategory::Portal => vec!["type: string;".to_string()],
        EventCategory::SpacePortal => {
            vec!["spaceId: string;".to_string(), "type: string;".to_string()]
        }
    };

    let mut out = format!("export interface {} {{\n", category.interface_name());
    for member in members {
        out.push_str(INDENT);
        out.push_str(&member);
        out.push('\n');
    }
    out.push('}');
    out
}

/// Synthesize the wrapper interfaces for the selected events, separated by
/// blank lines. Each category appears at most once.
pub fn synthesize_event_types<S: AsRef<str>>(events: &[S], schema: &Schema) -> String {
    event_categories(events)
        .into_iter()
        .map(|category| event_wrapper(category, schema))
        .collect::<Vec<_>>()
        .join("\n\n")
}
