//! Collaborator configuration.
//!
//! Each collaborator is enabled only when its credentials are present; a
//! missing credential yields `None` rather than an error.
//!
//! ## Environment Variables
//!
//! - `EMAIL_API_URL`: transactional email endpoint (default: Resend)
//! - `EMAIL_API_KEY`, `EMAIL_FROM`: required to enable email
//! - `EMAIL_FROM_NAME`, `EMAIL_SUBJECT`: sender display name and subject line
//! - `ZOOM_ACCOUNT_ID`, `ZOOM_CLIENT_ID`, `ZOOM_CLIENT_SECRET`: required to enable Zoom
//! - `ZOOM_OAUTH_URL`, `ZOOM_API_URL`: endpoint overrides
//! - `ZOOM_MEETING_TOPIC`: meeting topic prefix

use std::env;

pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
pub const DEFAULT_ZOOM_OAUTH_URL: &str = "https://zoom.us";
pub const DEFAULT_ZOOM_API_URL: &str = "https://api.zoom.us/v2";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub from_name: String,
    pub subject: String,
}

impl EmailConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(var("EMAIL_API_KEY"))?;
        let from = non_empty(var("EMAIL_FROM"))?;

        Some(Self {
            api_url: non_empty(var("EMAIL_API_URL"))
                .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
            api_key,
            from,
            from_name: non_empty(var("EMAIL_FROM_NAME"))
                .unwrap_or_else(|| "Coach Calendar".to_string()),
            subject: non_empty(var("EMAIL_SUBJECT"))
                .unwrap_or_else(|| "Your coaching session is confirmed".to_string()),
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "email via {} as {} <{}>, key {}",
            self.api_url,
            self.from_name,
            self.from,
            mask_secret(&self.api_key)
        )
    }
}

#[derive(Debug, Clone)]
pub struct ZoomConfig {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub oauth_url: String,
    pub api_url: String,
    pub topic: String,
}

impl ZoomConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account_id = non_empty(var("ZOOM_ACCOUNT_ID"))?;
        let client_id = non_empty(var("ZOOM_CLIENT_ID"))?;
        let client_secret = non_empty(var("ZOOM_CLIENT_SECRET"))?;

        Some(Self {
            account_id,
            client_id,
            client_secret,
            oauth_url: non_empty(var("ZOOM_OAUTH_URL"))
                .unwrap_or_else(|| DEFAULT_ZOOM_OAUTH_URL.to_string()),
            api_url: non_empty(var("ZOOM_API_URL"))
                .unwrap_or_else(|| DEFAULT_ZOOM_API_URL.to_string()),
            topic: non_empty(var("ZOOM_MEETING_TOPIC"))
                .unwrap_or_else(|| "Coaching session".to_string()),
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "zoom account {} client {} secret {}",
            mask_secret(&self.account_id),
            mask_secret(&self.client_id),
            mask_secret(&self.client_secret)
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Keeps the first four characters of a credential.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if prefix.chars().count() == secret.chars().count() {
        return "****".to_string();
    }
    format!("{}****", prefix)
}
