//! Cookie records and reserved-prefix rules
//!
//! Browsers reject prefixed cookies whose attributes break the prefix
//! contract:
//! ```text
//! __Secure-*  secure
//! __Host-*    secure, path "/", no domain, no sameSite
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

pub const SECURE_PREFIX: &str = "__Secure-";
pub const HOST_PREFIX: &str = "__Host-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
    /// Seconds since the Unix epoch; `None` for session cookies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            same_site: None,
            expiration_date: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn with_expiration(mut self, expiration_date: f64) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    pub fn is_host_prefixed(&self) -> bool {
        self.name.starts_with(HOST_PREFIX)
    }

    pub fn is_secure_prefixed(&self) -> bool {
        self.name.starts_with(SECURE_PREFIX)
    }

    /// Apply the reserved-prefix rules.
    pub fn normalized(mut self) -> Self {
        if self.is_host_prefixed() {
            self.secure = true;
            self.path = Some("/".to_string());
            self.domain = None;
            self.same_site = None;
        } else if self.is_secure_prefixed() {
            self.secure = true;
        }
        self
    }

    /// Domain without the leading dot used for domain cookies.
    pub fn host(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(|domain| domain.trim().trim_start_matches('.'))
            .filter(|host| !host.is_empty())
    }

    /// `https://<host>`, or `None` when the cookie has no usable domain.
    pub fn install_url(&self) -> Option<String> {
        let host = self.host()?;
        let url = format!("https://{host}");
        match Url::parse(&url) {
            Ok(parsed) if parsed.host_str().is_some() => Some(url),
            _ => None,
        }
    }
}

/// A cookie ready to hand to the host cookie jar.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieInstall {
    pub url: String,
    pub cookie: Cookie,
}

impl CookieInstall {
    /// Build the install for a stored cookie.
    ///
    /// The URL comes from the stored domain before normalisation, since
    /// `__Host-` cookies lose their domain attribute.
    pub fn prepare(cookie: &Cookie) -> Option<Self> {
        let url = cookie.install_url()?;
        Some(Self {
            url,
            cookie: cookie.clone().normalized(),
        })
    }
}
