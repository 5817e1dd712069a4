//! Blocks the recurring unavailable hours through the admin API:
//! Monday-Thursday 11:30-15:00 and all of Sunday 09:00-20:00, Amsterdam time.

use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use clap::Parser;
use coachcal_core::normalize::format_in_zone;
use coachcal_core::schedule::wall_clock_slots;
use color_eyre::eyre::{eyre, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const BUSINESS_TIMEZONE: Tz = chrono_tz::Europe::Amsterdam;

#[derive(Parser)]
#[command(name = "block-slots")]
#[command(about = "Block recurring unavailable hours through the admin API")]
struct Cli {
    /// API base URL
    #[arg(long, default_value = "http://localhost:8080")]
    api: String,

    /// Number of days ahead to block, starting today
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Show what would be blocked without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
struct BlockSlotRequest<'a> {
    slot_time: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Blocked,
    AlreadyBlocked,
    Failed(String),
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    blocked: usize,
    skipped: usize,
    failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Blocked => self.blocked += 1,
            Outcome::AlreadyBlocked => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Local wall-clock range to block on `weekday`, inclusive.
fn blocked_hours(weekday: Weekday) -> Option<(NaiveTime, NaiveTime)> {
    let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0);
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => Some((hm(11, 30)?, hm(15, 0)?)),
        Weekday::Sun => Some((hm(9, 0)?, hm(20, 0)?)),
        Weekday::Fri | Weekday::Sat => None,
    }
}

/// Every slot to block over `days` local days starting at `today`.
fn plan(today: NaiveDate, days: u32) -> Vec<DateTime<Utc>> {
    today
        .iter_days()
        .take(days as usize)
        .filter_map(|day| blocked_hours(day.weekday()).map(|(from, to)| (day, from, to)))
        .flat_map(|(day, from, to)| wall_clock_slots(&BUSINESS_TIMEZONE, day, from, to))
        .collect()
}

async fn block(client: &Client, api: &str, slot_time: &str) -> Outcome {
    let url = format!("{}/api/admin/block", api.trim_end_matches('/'));
    let response = match client
        .post(&url)
        .json(&BlockSlotRequest { slot_time })
        .timeout(Duration::from_secs(30))
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => return Outcome::Failed(err.to_string()),
    };

    let status = response.status();
    if status.is_success() {
        return Outcome::Blocked;
    }

    let body = response.json::<ErrorBody>().await.ok();
    classify_failure(status, body)
}

fn classify_failure(status: StatusCode, body: Option<ErrorBody>) -> Outcome {
    match body {
        Some(body) if status == StatusCode::CONFLICT && body.code == "already_blocked" => {
            Outcome::AlreadyBlocked
        }
        Some(body) => Outcome::Failed(format!("{}: {}", status, body.error)),
        None => Outcome::Failed(status.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let today = Utc::now().with_timezone(&BUSINESS_TIMEZONE).date_naive();
    let slots = plan(today, cli.days);
    if slots.is_empty() {
        println!("No slots to block");
        return Ok(());
    }

    println!("Blocking {} slots over the next {} days", slots.len(), cli.days);
    println!("  Monday-Thursday: 11:30-15:00");
    println!("  Sunday: 09:00-20:00");
    if cli.dry_run {
        println!("Dry run: the API will not be called");
    }

    let client = Client::new();
    let mut summary = Summary::default();
    let total = slots.len();

    for (i, slot) in slots.iter().enumerate() {
        let slot_time = format_in_zone(slot, &BUSINESS_TIMEZONE);
        let label = slot
            .with_timezone(&BUSINESS_TIMEZONE)
            .format("%a, %b %-d, %Y %H:%M %Z");

        if cli.dry_run {
            println!("[{}/{}] Would block: {} ({})", i + 1, total, label, slot_time);
            summary.record(&Outcome::Blocked);
            continue;
        }

        let outcome = block(&client, &cli.api, &slot_time).await;
        match &outcome {
            Outcome::Blocked => println!("[{}/{}] Blocked: {}", i + 1, total, label),
            Outcome::AlreadyBlocked => println!("[{}/{}] Already blocked: {}", i + 1, total, label),
            Outcome::Failed(reason) => {
                println!("[{}/{}] Failed to block {}: {}", i + 1, total, label, reason)
            }
        }
        summary.record(&outcome);

        if i + 1 < total {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    println!("Summary:");
    println!("  Blocked: {}", summary.blocked);
    println!("  Skipped: {}", summary.skipped);
    println!("  Failed: {}", summary.failed);

    if summary.failed > 0 {
        return Err(eyre!("{} slots could not be blocked", summary.failed));
    }
    Ok(())
}
