use chrono::{DateTime, Utc};
use coachcal_core::models::meeting::BookingConfirmation;
use coachcal_core::store::ConfirmationSender;
use coachcal_integrations::email::{google_calendar_url, invite_ics};
use coachcal_integrations::{EmailConfig, EmailSender};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;

fn confirmation(meeting_url: Option<&str>) -> BookingConfirmation {
    BookingConfirmation {
        name: "Olena <Kovalenko>".to_string(),
        email: "olena@example.com".to_string(),
        slot_time: DateTime::parse_from_rfc3339("2025-06-02T11:30:00+02:00")
            .unwrap()
            .with_timezone(&Utc),
        meeting_url: meeting_url.map(str::to_string),
    }
}

fn config(api_url: String) -> EmailConfig {
    EmailConfig {
        api_url,
        api_key: "re_test_key".to_string(),
        from: "sessions@coach.example.com".to_string(),
        from_name: "Coach Calendar".to_string(),
        subject: "Your coaching session is confirmed".to_string(),
    }
}

fn sender(api_url: String) -> EmailSender {
    EmailSender::new(config(api_url), chrono_tz::Europe::Amsterdam).unwrap()
}

#[test]
fn test_compose_renders_local_time_and_escapes_names() {
    let content = sender("http://localhost".to_string())
        .compose(&confirmation(None))
        .unwrap();

    assert_eq!(content.subject, "Your coaching session is confirmed");
    assert!(content.text.contains("Monday, June 2, 2025 at 11:30 AM CEST"));
    assert!(content.text.contains("Duration: 30 minutes"));
    assert!(content.text.contains("Hello Olena <Kovalenko>,"));
    assert!(content.html.contains("<strong>Olena &lt;Kovalenko&gt;</strong>"));
    assert!(!content.html.contains("<Kovalenko>"));
    assert!(!content.html.contains("Join the meeting"));
    assert!(!content.text.contains("Online meeting:"));
}

#[test]
fn test_compose_escapes_markup_in_html_only() {
    let mut booking = confirmation(None);
    booking.name = "<script>alert(1)</script>".to_string();
    booking.email = "x\"@example.com".to_string();

    let content = sender("http://localhost".to_string())
        .compose(&booking)
        .unwrap();

    assert!(!content.html.contains("<script>"));
    assert!(content.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(content.html.contains("Email: x&quot;@example.com"));
    assert!(content.text.contains("Name: <script>alert(1)</script>"));
    assert!(content.text.contains("Email: x\"@example.com"));
}

#[test]
fn test_compose_includes_meeting_link_when_present() {
    let content = sender("http://localhost".to_string())
        .compose(&confirmation(Some("https://zoom.us/j/84120593311")))
        .unwrap();

    assert!(content.html.contains("Join the meeting"));
    assert!(content.html.contains(r#"href="https://zoom.us/j/84120593311""#));
    assert!(content.text.contains("Online meeting:"));
    assert!(content.html.contains("https://zoom.us/j/84120593311"));
    assert!(content.text.contains("https://zoom.us/j/84120593311"));
}

#[test]
fn test_google_calendar_url() {
    let mut booking = confirmation(None);
    booking.name = "Olena".to_string();

    assert_eq!(
        google_calendar_url(&booking),
        "https://calendar.google.com/calendar/render?action=TEMPLATE\
         &text=Coaching%20session%20with%20Olena\
         &dates=20250602T093000Z/20250602T100000Z"
    );
}

#[test]
fn test_invite_ics() {
    let ics = invite_ics(&confirmation(None), "booking-1@coachcal");

    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("BEGIN:VEVENT"));
    assert!(ics.contains("UID:booking-1@coachcal"));
    assert!(ics.contains("DTSTART:20250602T093000Z"));
    assert!(ics.contains("DTEND:20250602T100000Z"));
    assert!(ics.contains("BEGIN:VALARM"));
    assert!(ics.contains("ACTION:DISPLAY"));
}

#[tokio::test]
async fn test_send_posts_to_email_api() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/emails")
        .match_header("authorization", "Bearer re_test_key")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "from": "Coach Calendar <sessions@coach.example.com>",
                "subject": "Your coaching session is confirmed",
            })),
            Matcher::Regex("invite\\.ics".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"}"#)
        .expect(1)
        .create_async()
        .await;

    sender(format!("{}/emails", server.url()))
        .send_confirmation(&confirmation(None))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_reports_api_errors() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/emails")
        .with_status(422)
        .with_body(r#"{"message":"Invalid `to` field"}"#)
        .create_async()
        .await;

    let err = sender(format!("{}/emails", server.url()))
        .send_confirmation(&confirmation(None))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("422"));
}
