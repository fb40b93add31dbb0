//! Client configuration: API base URL, push-channel URL, page sizes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Loaded once at app boot and provided through context. Deployments can
//! override the defaults by writing a JSON object under [`CONFIG_STORAGE_KEY`]
//! in `localStorage`; missing keys fall back to the defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

/// `localStorage` key holding optional configuration overrides.
pub const CONFIG_STORAGE_KEY: &str = "fieldwork_config";

/// Fixed page size for the notification feed.
pub const NOTIFICATION_PAGE_SIZE: u32 = 20;

/// Fixed page size for the homework list.
pub const HOMEWORK_PAGE_SIZE: u32 = 10;

const DEFAULT_API_BASE: &str = "/api";
const DEFAULT_PUSH_PATH: &str = "/socket";

/// Runtime endpoints for the REST backend and the push channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Prefix for every REST path, without a trailing slash.
    pub api_base: String,
    /// Absolute websocket URL of the push channel; derived from the page origin when unset.
    pub push_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base: DEFAULT_API_BASE.to_owned(), push_url: None }
    }
}

impl ClientConfig {
    /// Load overrides from `localStorage`, falling back to defaults.
    pub fn load() -> Self {
        crate::util::storage::load_json::<Self>(CONFIG_STORAGE_KEY)
            .map(Self::normalized)
            .unwrap_or_default()
    }

    /// Strip trailing slashes so paths can be appended verbatim.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let trimmed = self.api_base.trim_end_matches('/');
        self.api_base = if trimmed.is_empty() { DEFAULT_API_BASE.to_owned() } else { trimmed.to_owned() };
        self
    }

    /// Push-channel URL for the given page location, with the auth token attached.
    pub fn push_endpoint(&self, page_href: &str, host: &str, token: &str) -> String {
        let base = self
            .push_url
            .clone()
            .unwrap_or_else(|| derive_push_url(page_href, host));
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}token={}", urlencoding::encode(token))
    }
}

/// Derive `ws(s)://host/socket` from the current page location.
pub fn derive_push_url(page_href: &str, host: &str) -> String {
    let proto = if page_href.starts_with("https") { "wss" } else { "ws" };
    format!("{proto}://{host}{DEFAULT_PUSH_PATH}")
}
