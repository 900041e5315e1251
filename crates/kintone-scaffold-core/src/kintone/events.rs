//! kintone JavaScript API event catalog
//!
//! Each concrete event belongs to exactly one payload category. The table is
//! static configuration; generation only ever looks events up in it.

use std::fmt;

/// Group of events sharing an identical payload shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    List,
    Record,
    Create,
    CreateShow,
    Report,
    Portal,
    SpacePortal,
}

impl EventCategory {
    pub const ALL: [EventCategory; 7] = [
        EventCategory::List,
        EventCategory::Record,
        EventCategory::Create,
        EventCategory::CreateShow,
        EventCategory::Report,
        EventCategory::Portal,
        EventCategory::SpacePortal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            EventCategory::List => "list",
            EventCategory::Record => "record",
            EventCategory::Create => "create",
            EventCategory::CreateShow => "createShow",
            EventCategory::Report => "report",
            EventCategory::Portal => "portal",
            EventCategory::SpacePortal => "spacePortal",
        }
    }

    /// Name of the generated wrapper interface
    pub fn interface_name(&self) -> &'static str {
        match self {
            EventCategory::List => "ListShowEvent",
            EventCategory::Record => "DefaultRecordEvent",
            EventCategory::Create => "CreateRecordEvent",
            EventCategory::CreateShow => "CreateShowRecordEvent",
            EventCategory::Report => "ReportEvent",
            EventCategory::Portal => "PortalEvent",
            EventCategory::SpacePortal => "SpacePortalEvent",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Every supported event with its category, desktop first then mobile
pub const KINTONE_EVENTS: &[(&str, EventCategory)] = &[
    ("app.record.index.show", EventCategory::List),
    ("app.record.index.edit.show", EventCategory::Record),
    ("app.record.index.edit.submit", EventCategory::Record),
    ("app.record.index.edit.submit.success", EventCategory::Record),
    ("app.record.index.delete.submit", EventCategory::Record),
    ("app.record.detail.show", EventCategory::Record),
    ("app.record.detail.delete.submit", EventCategory::Record),
    ("app.record.detail.process.proceed", EventCategory::Record),
    ("app.record.create.show", EventCategory::CreateShow),
    ("app.record.create.submit", EventCategory::Create),
    ("app.record.create.submit.success", EventCategory::Create),
    ("app.record.edit.show", EventCategory::Record),
    ("app.record.edit.submit", EventCategory::Record),
    ("app.record.edit.submit.success", EventCategory::Record),
    ("app.record.print.show", EventCategory::Record),
    ("app.report.show", EventCategory::Report),
    ("portal.show", EventCategory::Portal),
    ("space.portal.show", EventCategory::SpacePortal),
    ("mobile.app.record.index.show", EventCategory::List),
    ("mobile.app.record.detail.show", EventCategory::Record),
    ("mobile.app.record.detail.delete.submit", EventCategory::Record),
    ("mobile.app.record.detail.process.proceed", EventCategory::Record),
    ("mobile.app.record.create.show", EventCategory::CreateShow),
    ("mobile.app.record.create.submit", EventCategory::Create),
    ("mobile.app.record.create.submit.success", EventCategory::Create),
    ("mobile.app.record.edit.show", EventCategory::Record),
    ("mobile.app.record.edit.submit", EventCategory::Record),
    ("mobile.app.record.edit.submit.success", EventCategory::Record),
    ("mobile.app.report.show", EventCategory::Report),
    ("mobile.portal.show", EventCategory::Portal),
    ("mobile.space.portal.show", EventCategory::SpacePortal),
];

/// Events registered by the starter code when none were selected
pub const DEFAULT_EVENTS: &[&str] = &["app.record.index.show", "mobile.app.record.index.show"];

/// Look up the payload category of an event
pub fn event_category(event: &str) -> Option<EventCategory> {
    KINTONE_EVENTS
        .iter()
        .find(|(name, _)| *name == event)
        .map(|(_, category)| *category)
}

/// All known event names in catalog order
pub fn event_names() -> impl Iterator<Item = &'static str> {
    KINTONE_EVENTS.iter().map(|(name, _)| *name)
}

pub fn is_mobile_event(event: &str) -> bool {
    event.starts_with("mobile.")
}
