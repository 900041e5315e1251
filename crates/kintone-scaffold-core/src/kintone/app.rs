//! App references returned by the apps endpoint

use serde::Deserialize;
use std::fmt;

/// Characters that cannot appear in a directory name on common platforms
const PATH_UNSAFE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// A kintone app, as listed by `GET /k/v1/apps.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRef {
    pub app_id: String,
    pub name: String,
}

impl AppRef {
    pub fn new(app_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            name: name.into(),
        }
    }

    /// Directory/file stem for this app: name words joined by `_`
    pub fn dir_name(&self) -> String {
        let name = self
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .replace(PATH_UNSAFE, "");

        if name.is_empty() {
            format!("app_{}", self.app_id)
        } else {
            name
        }
    }

    /// Identifier used for the exported record type and field constants
    pub fn type_name(&self) -> String {
        let name: String = self
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match name.chars().next() {
            None => format!("App{}", self.app_id),
            Some(c) if c.is_ascii_digit() => format!("App{}", name),
            Some(_) => name,
        }
    }
}

impl fmt::Display for AppRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.name, self.app_id)
    }
}

/// Response body of `GET /k/v1/apps.json`
#[derive(Debug, Clone, Deserialize)]
pub struct AppsResponse {
    pub apps: Vec<AppRef>,
}
