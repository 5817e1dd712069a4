//! Zoom meetings via Server-to-Server OAuth.

use std::time::Duration;

use async_trait::async_trait;
use coachcal_core::models::meeting::{Meeting, MeetingRequest};
use coachcal_core::store::MeetingProvider;
use eyre::{eyre, Result, WrapErr};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ZoomConfig;
use crate::token::{IssuedToken, TokenCache, TokenFetcher};

const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Scheduled (as opposed to instant or recurring) meeting.
const SCHEDULED_MEETING: u8 = 2;

#[derive(Debug, Serialize)]
struct CreateMeetingBody {
    topic: String,
    #[serde(rename = "type")]
    kind: u8,
    start_time: String,
    duration: i64,
    timezone: &'static str,
    agenda: String,
    settings: MeetingSettings,
}

#[derive(Debug, Serialize)]
struct MeetingSettings {
    host_video: bool,
    participant_video: bool,
    join_before_host: bool,
    mute_upon_entry: bool,
    waiting_room: bool,
    auto_recording: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreatedMeeting {
    id: i64,
    join_url: String,
}

struct ZoomTokenFetcher {
    http: Client,
    oauth_url: String,
    account_id: String,
    client_id: String,
    client_secret: String,
}

#[async_trait]
impl TokenFetcher for ZoomTokenFetcher {
    async fn fetch_token(&self) -> Result<IssuedToken> {
        let url = format!(
            "{}/oauth/token?grant_type=account_credentials&account_id={}",
            self.oauth_url.trim_end_matches('/'),
            urlencoding::encode(&self.account_id)
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .timeout(TOKEN_TIMEOUT)
            .send()
            .await
            .wrap_err("Failed to request Zoom access token")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!(
                "Zoom token request failed with status {}: {}",
                status,
                body
            ));
        }

        response
            .json::<IssuedToken>()
            .await
            .wrap_err("Failed to decode Zoom token response")
    }
}

pub struct ZoomClient {
    http: Client,
    api_url: String,
    topic: String,
    tokens: TokenCache<ZoomTokenFetcher>,
}

impl ZoomClient {
    pub fn new(config: ZoomConfig) -> Self {
        let http = Client::new();
        let fetcher = ZoomTokenFetcher {
            http: http.clone(),
            oauth_url: config.oauth_url,
            account_id: config.account_id,
            client_id: config.client_id,
            client_secret: config.client_secret,
        };

        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            topic: config.topic,
            tokens: TokenCache::new(fetcher),
        }
    }

    fn meeting_body(&self, request: &MeetingRequest) -> CreateMeetingBody {
        CreateMeetingBody {
            topic: format!("{} - {}", self.topic, request.name),
            kind: SCHEDULED_MEETING,
            start_time: request.start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            duration: request.duration_minutes,
            timezone: "UTC",
            agenda: format!("{} with {} ({})", self.topic, request.name, request.email),
            settings: MeetingSettings {
                host_video: true,
                participant_video: true,
                join_before_host: false,
                mute_upon_entry: true,
                waiting_room: true,
                auto_recording: "none",
            },
        }
    }
}

#[async_trait]
impl MeetingProvider for ZoomClient {
    async fn create_meeting(&self, request: &MeetingRequest) -> Result<Meeting> {
        let token = self
            .tokens
            .valid_token()
            .await
            .wrap_err("Failed to get Zoom access token")?;

        let response = self
            .http
            .post(format!("{}/users/me/meetings", self.api_url))
            .bearer_auth(token)
            .json(&self.meeting_body(request))
            .timeout(API_TIMEOUT)
            .send()
            .await
            .wrap_err("Failed to send Zoom meeting request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Zoom API returned status {}: {}", status, body));
        }

        let created: CreatedMeeting = response
            .json()
            .await
            .wrap_err("Failed to decode Zoom meeting response")?;

        info!("Zoom meeting {} created for {}", created.id, request.start);
        Ok(Meeting {
            id: created.id.to_string(),
            join_url: created.join_url,
        })
    }

    async fn delete_meeting(&self, meeting_ref: &str) -> Result<()> {
        let token = self
            .tokens
            .valid_token()
            .await
            .wrap_err("Failed to get Zoom access token")?;

        let response = self
            .http
            .delete(format!(
                "{}/meetings/{}",
                self.api_url,
                urlencoding::encode(meeting_ref)
            ))
            .bearer_auth(token)
            .timeout(API_TIMEOUT)
            .send()
            .await
            .wrap_err("Failed to send Zoom meeting deletion")?;

        match response.status() {
            status if status.is_success() => {
                info!("Zoom meeting {} deleted", meeting_ref);
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                warn!("Zoom meeting {} was already gone", meeting_ref);
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(eyre!("Zoom API returned status {}: {}", status, body))
            }
        }
    }
}
