//! Minimal kintone REST API client
//!
//! Only the two read endpoints the scaffolder needs are covered:
//! the app list (paged) and the form field description of one app.

use super::app::{AppRef, AppsResponse};
use super::error::{ApiErrorBody, KintoneError};
use super::schema::{FormFieldsResponse, Schema};
use crate::config::{ConnectionConfig, Credentials};
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::future::Future;
use url::Url;

/// Maximum page size accepted by the apps endpoint
pub const APPS_PAGE_SIZE: usize = 100;

/// Header carrying password authentication
const AUTH_HEADER: &str = "x-cybozu-authorization";

/// Build the password authentication header value (`base64(user:pass)`)
pub fn auth_header_value(credentials: &Credentials) -> String {
    base64::engine::general_purpose::STANDARD.encode(format!(
        "{}:{}",
        credentials.username, credentials.password
    ))
}

/// Client for a single kintone environment
pub struct KintoneClient {
    base_url: Url,
    client: reqwest::Client,
}

impl KintoneClient {
    /// Create a client that authenticates every request with the given credentials
    pub fn new(config: &ConnectionConfig, user_agent: &str) -> Result<Self, KintoneError> {
        let mut auth = HeaderValue::from_str(&auth_header_value(&config.credentials))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, auth);

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(KintoneError::Client)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an API URL from a path and query pairs
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, KintoneError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| KintoneError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, KintoneError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| KintoneError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ApiErrorBody>().await.ok();
            tracing::debug!(%url, status = status.as_u16(), "request rejected");
            return Err(match body {
                Some(body) => KintoneError::Api {
                    status: status.as_u16(),
                    code: body.code,
                    message: body.message,
                },
                None => KintoneError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                },
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| KintoneError::Decode {
                url: url.to_string(),
                source,
            })
    }

    /// Fetch one page of apps
    pub async fn get_apps_page(&self, offset: usize) -> Result<Vec<AppRef>, KintoneError> {
        let url = self.endpoint(
            "k/v1/apps.json",
            &[
                ("offset", offset.to_string()),
                ("limit", APPS_PAGE_SIZE.to_string()),
            ],
        )?;
        let response: AppsResponse = self.get_json(url).await?;
        Ok(response.apps)
    }

    /// Fetch every app visible to the user
    pub async fn get_all_apps(&self) -> Result<Vec<AppRef>, KintoneError> {
        collect_pages(APPS_PAGE_SIZE, |offset| self.get_apps_page(offset)).await
    }

    /// Fetch the form field description of one app
    pub async fn get_form_fields(&self, app_id: &str) -> Result<Schema, KintoneError> {
        let url = self.endpoint("k/v1/app/form/fields.json", &[("app", app_id.to_string())])?;
        let response: FormFieldsResponse = self.get_json(url).await?;
        tracing::debug!(
            app_id,
            fields = response.properties.len(),
            revision = response.revision.as_deref().unwrap_or("unknown"),
            "fetched form fields"
        );
        Ok(response.properties)
    }
}

/// Keep requesting pages until one comes back shorter than `page_size`
async fn collect_pages<T, E, F, Fut>(page_size: usize, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut items = Vec::new();
    loop {
        let page = fetch(items.len()).await?;
        let done = page.len() < page_size;
        items.extend(page);
        if done {
            return Ok(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;
    use std::cell::RefCell;

    fn test_client() -> KintoneClient {
        let config = ConnectionConfig {
            base_url: parse_base_url("https://example.kintone.com").unwrap(),
            credentials: Credentials::new("alice", "secret"),
        };
        KintoneClient::new(&config, "kintone-create-test").unwrap()
    }

    #[test]
    fn test_auth_header_value() {
        let credentials = Credentials::new("alice", "secret");
        // base64("alice:secret")
        assert_eq!(auth_header_value(&credentials), "YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn test_endpoint_with_query() {
        let client = test_client();
        let url = client
            .endpoint("k/v1/apps.json", &[("offset", "200".to_string()), ("limit", "100".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.kintone.com/k/v1/apps.json?offset=200&limit=100"
        );
    }

    #[test]
    fn test_endpoint_form_fields() {
        let client = test_client();
        let url = client
            .endpoint("k/v1/app/form/fields.json", &[("app", "42".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.kintone.com/k/v1/app/form/fields.json?app=42"
        );
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_short_page() {
        let total = 250;
        let offsets = RefCell::new(Vec::new());
        let items = collect_pages(100, |offset| {
            offsets.borrow_mut().push(offset);
            let page: Vec<usize> = (offset..total.min(offset + 100)).collect();
            async move { Ok::<_, ()>(page) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 250);
        assert_eq!(*offsets.borrow(), vec![0, 100, 200]);
    }

    #[tokio::test]
    async fn test_collect_pages_requests_empty_page_after_full_one() {
        let mut calls = 0;
        let items = collect_pages(2, |offset| {
            calls += 1;
            let page: Vec<usize> = if offset < 2 { vec![1, 2] } else { Vec::new() };
            async move { Ok::<_, ()>(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let result: Result<Vec<u8>, &str> =
            collect_pages(10, |_| async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
    }
}
