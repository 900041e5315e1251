//! Schema source - either the kintone REST API or a local directory
//!
//! A local source mirrors the REST responses on disk, which keeps the
//! generation path identical between development and production:
//!
//! ```text
//! <dir>/apps.yaml        same shape as GET /k/v1/apps.json
//! <dir>/<app_id>.yaml    same shape as GET /k/v1/app/form/fields.json
//! ```
//!
//! JSON files (`apps.json`, `<app_id>.json`) are accepted as well.

use super::app::{AppRef, AppsResponse};
use super::client::KintoneClient;
use super::schema::{FormFieldsResponse, Schema};
use crate::config::ConnectionConfig;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where app lists and form schemas are read from
pub enum SchemaSource {
    Remote(KintoneClient),
    Local(PathBuf),
}

impl SchemaSource {
    /// Create a remote source for the given environment
    pub fn remote(config: &ConnectionConfig, user_agent: &str) -> Result<Self> {
        let client = KintoneClient::new(config, user_agent)
            .context("Failed to set up the kintone client")?;
        Ok(Self::Remote(client))
    }

    /// Create a local source from a directory
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    /// Human-readable description for log messages
    pub fn describe(&self) -> String {
        match self {
            SchemaSource::Remote(client) => client.base_url().to_string(),
            SchemaSource::Local(path) => path.display().to_string(),
        }
    }

    /// List every app
    pub async fn fetch_apps(&self) -> Result<Vec<AppRef>> {
        match self {
            SchemaSource::Remote(client) => Ok(client.get_all_apps().await?),
            SchemaSource::Local(path) => {
                let response: AppsResponse = read_document(path, "apps").await?;
                Ok(response.apps)
            }
        }
    }

    /// Fetch the form schema of one app
    pub async fn fetch_form_fields(&self, app: &AppRef) -> Result<Schema> {
        let schema = match self {
            SchemaSource::Remote(client) => client
                .get_form_fields(&app.app_id)
                .await
                .with_context(|| format!("Failed to fetch form fields of '{}'", app))?,
            SchemaSource::Local(path) => {
                let response: FormFieldsResponse = read_document(path, &app.app_id)
                    .await
                    .with_context(|| format!("Failed to read form fields of '{}'", app))?;
                response.properties
            }
        };
        tracing::debug!(app = %app, fields = schema.len(), "loaded schema");
        Ok(schema)
    }

    /// Fetch the schemas of several apps, in order
    pub async fn fetch_all_form_fields(&self, apps: &[AppRef]) -> Result<Vec<Schema>> {
        let mut schemas = Vec::with_capacity(apps.len());
        for app in apps {
            schemas.push(self.fetch_form_fields(app).await?);
        }
        Ok(schemas)
    }
}

/// Read `<dir>/<stem>.yaml`, `<dir>/<stem>.yml` or `<dir>/<stem>.json`
async fn read_document<T: DeserializeOwned>(dir: &Path, stem: &str) -> Result<T> {
    for ext in ["yaml", "yml", "json"] {
        let path = dir.join(format!("{}.{}", stem, ext));
        if !fs::try_exists(&path).await.unwrap_or(false) {
            continue;
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()));
    }

    anyhow::bail!("No {}.yaml or {}.json found in {}", stem, stem, dir.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kintone::schema::FieldDescriptor;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_local_source_reads_apps_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "apps.yaml",
            "apps:\n  - appId: \"3\"\n    name: Orders\n  - appId: \"4\"\n    name: Customers\n",
        );
        write(
            dir.path(),
            "3.json",
            r#"{ "properties": { "title": { "type": "SINGLE_LINE_TEXT", "label": "Title" } } }"#,
        );

        let source = SchemaSource::local(dir.path().to_path_buf());
        let apps = source.fetch_apps().await.unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0], AppRef::new("3", "Orders"));

        let schema = source.fetch_form_fields(&apps[0]).await.unwrap();
        assert_eq!(
            schema.fields(),
            &[FieldDescriptor::leaf("title", "SINGLE_LINE_TEXT", "Title")]
        );
    }

    #[tokio::test]
    async fn test_local_source_missing_schema() {
        let dir = tempfile::tempdir().unwrap();
        let source = SchemaSource::local(dir.path().to_path_buf());
        let err = source
            .fetch_form_fields(&AppRef::new("9", "Ghost"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("9.yaml"));
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1.yaml", "properties:\n  a:\n    type: DATE\n");
        write(dir.path(), "2.yaml", "properties: {}\n");

        let source = SchemaSource::local(dir.path().to_path_buf());
        let schemas = source
            .fetch_all_form_fields(&[AppRef::new("2", "Two"), AppRef::new("1", "One")])
            .await
            .unwrap();
        assert!(schemas[0].is_empty());
        assert_eq!(schemas[1].len(), 1);
    }
}
