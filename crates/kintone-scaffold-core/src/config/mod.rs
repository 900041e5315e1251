//! Connection configuration
//!
//! Values come from CLI flags first, then from environment variables.

use crate::kintone::KintoneError;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Environment variable holding the kintone base URL
pub const BASE_URL_ENV: &str = "KINTONE_BASE_URL";

/// Environment variable holding the login name
pub const USERNAME_ENV: &str = "KINTONE_USERNAME";

/// Environment variable holding the password
pub const PASSWORD_ENV: &str = "KINTONE_PASSWORD";

/// Environment variable pointing at a local schema directory
pub const SCHEMA_DIR_ENV: &str = "KINTONE_SCHEMA_DIR";

/// Hosting domain of a kintone environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKind {
    Kintone,
    Cybozu,
}

impl DomainKind {
    pub const ALL: [DomainKind; 2] = [DomainKind::Kintone, DomainKind::Cybozu];

    pub fn host_suffix(&self) -> &'static str {
        match self {
            DomainKind::Kintone => ".kintone.com",
            DomainKind::Cybozu => ".cybozu.com",
        }
    }

    /// Example URL shown in prompts and error messages
    pub fn example_url(&self) -> &'static str {
        match self {
            DomainKind::Kintone => "https://example.kintone.com",
            DomainKind::Cybozu => "https://example.cybozu.com",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainKind::Kintone => write!(f, "kintone.com"),
            DomainKind::Cybozu => write!(f, "cybozu.com"),
        }
    }
}

/// Parse and validate a kintone base URL (`https://<subdomain>.kintone.com`
/// or `https://<subdomain>.cybozu.com`, nothing after the host)
pub fn parse_base_url(input: &str) -> Result<Url, KintoneError> {
    let invalid = |reason: &str| KintoneError::InvalidUrl {
        url: input.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(input.trim()).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme() != "https" {
        return Err(invalid("only https is supported"));
    }
    if url.port().is_some() || !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("port and user info are not allowed"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("expected a bare domain without path or query"));
    }

    let host = url.host_str().unwrap_or_default();
    let subdomain = DomainKind::ALL
        .iter()
        .find_map(|kind| host.strip_suffix(kind.host_suffix()))
        .ok_or_else(|| invalid("host must end with .kintone.com or .cybozu.com"))?;

    if subdomain.is_empty()
        || !subdomain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(invalid("subdomain may only contain letters, digits and '-'"));
    }

    Ok(url)
}

/// Username/password pair for password authentication
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to talk to one kintone environment
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub base_url: Url,
    pub credentials: Credentials,
}

/// Connection inputs gathered from the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// kintone base URL
    pub url: Option<String>,

    /// Login name
    pub username: Option<String>,

    /// Password
    pub password: Option<String>,

    /// Local directory to read app schemas from instead of the REST API
    pub schema_dir: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Fill unset values from the environment
    pub fn with_env_fallback(self) -> Self {
        self.with_fallback(|name| std::env::var(name).ok())
    }

    fn with_fallback(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            url: self.url.or_else(|| lookup(BASE_URL_ENV)),
            username: self.username.or_else(|| lookup(USERNAME_ENV)),
            password: self.password.or_else(|| lookup(PASSWORD_ENV)),
            schema_dir: self
                .schema_dir
                .or_else(|| lookup(SCHEMA_DIR_ENV).map(PathBuf::from)),
        }
    }
}
