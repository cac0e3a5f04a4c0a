// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::DavError;

/// Server authentication method.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type")]
pub enum AuthMethod {
    /// No authentication.
    #[serde(rename = "none")]
    #[default]
    None,
    /// Basic authentication (username/password).
    #[serde(rename = "basic")]
    Basic {
        /// Username for authentication.
        username: String,
        /// Password for authentication.
        password: String,
    },
    /// Bearer token authentication (OAuth).
    #[serde(rename = "bearer")]
    Bearer {
        /// Bearer token.
        token: String,
    },
}

/// `CalDAV`/`CardDAV` server configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct DavConfig {
    /// Base URL of the server.
    pub base_url: String,
    /// Calendar home path (e.g., /dav/calendars/user/).
    #[serde(default)]
    pub calendar_home: Option<String>,
    /// Address book home path (e.g., /dav/addressbooks/user/).
    #[serde(default)]
    pub addressbook_home: Option<String>,
    /// Authentication method.
    #[serde(default)]
    pub auth: AuthMethod,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("davsync/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for DavConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            calendar_home: None,
            addressbook_home: None,
            auth: AuthMethod::default(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl DavConfig {
    /// Checks that the configuration can reach a server.
    ///
    /// # Errors
    ///
    /// Returns [`DavError::Config`] if the base URL is missing or not HTTP(S), or the
    /// timeout is zero.
    pub fn validate(&self) -> Result<(), DavError> {
        if self.base_url.is_empty() {
            return Err(DavError::Config("base_url is required".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DavError::Config(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(DavError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let config: DavConfig = serde_json::from_str(
            r#"{
                "base_url": "https://dav.example.com",
                "addressbook_home": "/addressbooks/jane/",
                "auth": { "type": "basic", "username": "jane", "password": "secret" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("davsync/"));
        assert_eq!(config.calendar_home, None);
        assert_eq!(
            config.auth,
            AuthMethod::Basic {
                username: "jane".into(),
                password: "secret".into()
            }
        );
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_urls() {
        assert!(DavConfig::default().validate().is_err());
        let config = DavConfig {
            base_url: "ftp://example.com".into(),
            ..DavConfig::default()
        };
        assert!(matches!(config.validate(), Err(DavError::Config(_))));
    }
}
