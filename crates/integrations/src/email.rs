//! # Confirmation Email
//!
//! Sends the booking confirmation through an HTTP transactional email API
//! (Resend-compatible JSON). The message carries an HTML body, a plain-text
//! fallback, and an `invite.ics` calendar attachment.

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use coachcal_core::models::meeting::BookingConfirmation;
use coachcal_core::schedule::slot_length;
use coachcal_core::store::ConfirmationSender;
use eyre::{eyre, Result, WrapErr};
use handlebars::Handlebars;
use icalendar::{Alarm, Calendar, Component, EventLike, Trigger};
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::EmailConfig;

const API_TIMEOUT: StdDuration = StdDuration::from_secs(30);
const CALENDAR_STAMP: &str = "%Y%m%dT%H%M%SZ";

const HTML_TEMPLATE_NAME: &str = "confirmation_html";
const TEXT_TEMPLATE_NAME: &str = "confirmation_text";

// `{{...}}` is HTML-escaped by handlebars; the text body uses `{{{...}}}`.
const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body>
  <div class="container">
    <h1>{{subject}}</h1>
    <p>Hello <strong>{{name}}</strong>,</p>
    <p>Thank you for booking a session.</p>
    <div class="details">
      <div>Date and time: <strong>{{when}}</strong></div>
      <div>Duration: {{minutes}} minutes</div>
      <div>Name: {{name}}</div>
      <div>Email: {{email}}</div>
    </div>
    {{#if meeting_url}}
    <div class="section meeting">
      <h3>Online meeting</h3>
      <p><a href="{{meeting_url}}" class="btn">Join the meeting</a></p>
      <p class="hint">The link opens 10 minutes before the start.</p>
    </div>
    {{/if}}
    <div class="section calendar">
      <h3>Add to your calendar</h3>
      <p><a href="{{calendar_url}}" class="btn">Add to Google Calendar</a></p>
      <p class="hint">Or open the attached invite.ics in Outlook, Apple Calendar and others.</p>
    </div>
    <p>If you need to cancel or reschedule, please get in touch as soon as possible.</p>
    <p class="footer">This is an automated message. Please do not reply.</p>
  </div>
</body>
</html>
"#;

const TEXT_TEMPLATE: &str = "Hello {{{name}}},

Thank you for booking a session.

Date and time: {{{when}}}
Duration: {{minutes}} minutes
Name: {{{name}}}
Email: {{{email}}}
{{#if meeting_url}}
Online meeting:
{{{meeting_url}}}
{{/if}}
Add to Google Calendar:
{{{calendar_url}}}

Or open the attached invite.ics for other calendars.

If you need to cancel or reschedule, please get in touch as soon as possible.

This is an automated message. Please do not reply.
";

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: String,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Attachment {
    filename: &'static str,
    content: String,
    content_type: &'static str,
}

/// Values both bodies are rendered from.
#[derive(Debug, Serialize)]
struct ConfirmationView<'a> {
    subject: &'a str,
    name: &'a str,
    email: &'a str,
    when: String,
    minutes: i64,
    meeting_url: Option<&'a str>,
    calendar_url: String,
}

/// Rendered parts of a confirmation email.
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
    pub ics: String,
}

pub struct EmailSender {
    http: Client,
    config: EmailConfig,
    timezone: Tz,
    templates: Handlebars<'static>,
}

/// Registry holding the HTML and plain-text confirmation bodies.
fn templates() -> Result<Handlebars<'static>> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(HTML_TEMPLATE_NAME, HTML_TEMPLATE)
        .wrap_err("Failed to register the HTML confirmation template")?;
    registry
        .register_template_string(TEXT_TEMPLATE_NAME, TEXT_TEMPLATE)
        .wrap_err("Failed to register the text confirmation template")?;
    Ok(registry)
}

impl EmailSender {
    /// `timezone` is the zone the appointment time is shown in.
    pub fn new(config: EmailConfig, timezone: Tz) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            config,
            timezone,
            templates: templates()?,
        })
    }

    pub fn compose(&self, confirmation: &BookingConfirmation) -> Result<EmailContent> {
        let view = ConfirmationView {
            subject: &self.config.subject,
            name: &confirmation.name,
            email: &confirmation.email,
            when: confirmation
                .slot_time
                .with_timezone(&self.timezone)
                .format("%A, %B %-d, %Y at %-I:%M %p %Z")
                .to_string(),
            minutes: slot_length().num_minutes(),
            meeting_url: confirmation.meeting_url.as_deref(),
            calendar_url: google_calendar_url(confirmation),
        };

        let html = self
            .templates
            .render(HTML_TEMPLATE_NAME, &view)
            .wrap_err("Failed to render the HTML confirmation")?;
        let text = self
            .templates
            .render(TEXT_TEMPLATE_NAME, &view)
            .wrap_err("Failed to render the text confirmation")?;

        Ok(EmailContent {
            subject: self.config.subject.clone(),
            html,
            text,
            ics: invite_ics(confirmation, &format!("{}@coachcal", Uuid::new_v4())),
        })
    }
}

#[async_trait]
impl ConfirmationSender for EmailSender {
    async fn send_confirmation(&self, confirmation: &BookingConfirmation) -> Result<()> {
        let content = self.compose(confirmation)?;

        let body = SendEmailBody {
            from: format!("{} <{}>", self.config.from_name, self.config.from),
            to: vec![confirmation.email.as_str()],
            subject: &content.subject,
            html: &content.html,
            text: &content.text,
            attachments: vec![Attachment {
                filename: "invite.ics",
                content: STANDARD.encode(content.ics.as_bytes()),
                content_type: "text/calendar; charset=UTF-8; method=REQUEST",
            }],
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .timeout(API_TIMEOUT)
            .send()
            .await
            .wrap_err("Failed to reach the email API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Email API returned status {}: {}", status, body));
        }

        info!("Confirmation email sent to {}", confirmation.email);
        Ok(())
    }
}

/// Prefilled Google Calendar "create event" link for the session.
pub fn google_calendar_url(confirmation: &BookingConfirmation) -> String {
    let start = confirmation.slot_time;
    let end = start + slot_length();
    let title = format!("Coaching session with {}", confirmation.name);

    let mut url = format!(
        "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&dates={}/{}",
        urlencoding::encode(&title),
        stamp(&start),
        stamp(&end)
    );
    if let Some(meeting_url) = &confirmation.meeting_url {
        url.push_str("&location=");
        url.push_str(&urlencoding::encode(meeting_url));
    }
    url
}

/// Single-event calendar with a 15-minute reminder.
pub fn invite_ics(confirmation: &BookingConfirmation, uid: &str) -> String {
    let start = confirmation.slot_time;
    let summary = format!("Coaching session with {}", confirmation.name);

    let mut description = format!(
        "Your coaching appointment has been confirmed.\n\nClient: {}\nEmail: {}",
        confirmation.name, confirmation.email
    );
    if let Some(meeting_url) = &confirmation.meeting_url {
        description.push_str("\nMeeting: ");
        description.push_str(meeting_url);
    }

    let mut event = icalendar::Event::new();
    event
        .uid(uid)
        .summary(&summary)
        .description(&description)
        .starts(start)
        .ends(start + slot_length())
        .location(confirmation.meeting_url.as_deref().unwrap_or("Online"))
        .add_property("STATUS", "CONFIRMED")
        .add_property("SEQUENCE", "0");
    event.alarm(Alarm::display(
        &format!("Reminder: {} starts in 15 minutes", summary),
        Trigger::before_start(chrono::Duration::minutes(15)),
    ));

    let mut calendar = Calendar::new();
    calendar.push(event.done());
    calendar.done().to_string()
}

fn stamp(instant: &DateTime<Utc>) -> String {
    instant.format(CALENDAR_STAMP).to_string()
}
