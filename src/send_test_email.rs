//! Sends one confirmation email for a made-up booking tomorrow at 14:00, to
//! check the email settings end to end.

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Parser;
use coachcal_core::models::meeting::BookingConfirmation;
use coachcal_core::normalize::normalize;
use coachcal_core::schedule::parse_timezone;
use coachcal_core::store::ConfirmationSender;
use coachcal_integrations::{EmailConfig, EmailSender};
use color_eyre::eyre::{eyre, Result, WrapErr};
use dotenv::dotenv;

#[derive(Parser)]
#[command(name = "send-test-email")]
#[command(about = "Send a test booking confirmation using the EMAIL_* settings")]
struct Cli {
    /// Recipient email address
    #[arg(long)]
    to: String,

    /// Recipient name
    #[arg(long, default_value = "Test User")]
    name: String,

    /// Meeting link to include
    #[arg(long)]
    meeting: Option<String>,
}

/// Tomorrow at 14:00 local time, or `None` if that wall-clock time does not exist.
fn sample_slot_time(now: DateTime<Utc>, timezone: &Tz) -> Option<DateTime<Utc>> {
    let tomorrow = now
        .with_timezone(timezone)
        .date_naive()
        .checked_add_days(Days::new(1))?;
    let local = tomorrow.and_time(NaiveTime::from_hms_opt(14, 0, 0)?);
    timezone
        .from_local_datetime(&local)
        .earliest()
        .map(|slot| normalize(&slot))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    let cli = Cli::parse();

    let config = EmailConfig::from_env()
        .ok_or_else(|| eyre!("Email is not configured: set EMAIL_API_KEY and EMAIL_FROM"))?;
    let timezone = match std::env::var("BUSINESS_TIMEZONE") {
        Ok(raw) => parse_timezone(&raw).wrap_err("Invalid BUSINESS_TIMEZONE value")?,
        Err(_) => chrono_tz::Europe::Amsterdam,
    };

    let slot_time = sample_slot_time(Utc::now(), &timezone)
        .ok_or_else(|| eyre!("Tomorrow 14:00 does not exist in {}", timezone))?;
    let confirmation = BookingConfirmation {
        name: cli.name,
        email: cli.to,
        slot_time,
        meeting_url: cli.meeting,
    };

    println!("Sending test confirmation");
    println!("  {}", config.summary());
    println!("  To: {} <{}>", confirmation.name, confirmation.email);
    println!(
        "  Slot: {}",
        slot_time
            .with_timezone(&timezone)
            .format("%A, %B %-d, %Y at %-I:%M %p %Z")
    );
    if let Some(url) = &confirmation.meeting_url {
        println!("  Meeting: {}", url);
    }

    let sender = EmailSender::new(config, timezone)?;
    sender
        .send_confirmation(&confirmation)
        .await
        .wrap_err("Failed to send test email")?;

    println!("Test email sent to {}", confirmation.email);
    println!("It may take a few moments to arrive and might land in the spam folder.");
    Ok(())
}
