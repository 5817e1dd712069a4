//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: host address to bind to (default: "0.0.0.0")
//! - `API_PORT` or `PORT`: port to listen on (default: 8080)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: server-side request timeout (default: 30)
//! - `BUSINESS_TIMEZONE`: IANA zone slots are laid out in (default: "Europe/Amsterdam")
//! - `BUSINESS_OPEN` / `BUSINESS_CLOSE`: first and last slot start, `HH:MM` (default: 09:00 / 20:00)
//! - `BUSINESS_DAYS`: comma-separated weekdays (default: every day)
//! - `BOOKING_HORIZON`: `days:<n>` or `month:<m>` (default: "days:30")
//! - `SEND_CONFIRMATION_EMAIL`: `yes`/`true` to email confirmations
//! - `CREATE_ZOOM_MEETING`: `yes`/`true` to provision a meeting per booking

use std::env;

use coachcal_core::schedule::{
    parse_timezone, parse_wall_clock, parse_weekdays, Horizon, SlotSchedule, ALL_WEEKDAYS,
};
use eyre::{Result, WrapErr};
use tracing::Level;

/// Configuration for the coachcal API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use coachcal_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Rule candidate slots are generated from
    pub schedule: SlotSchedule,

    /// Whether a confirmation email goes out for every booking
    pub send_confirmation_email: bool,

    /// Whether a video meeting is provisioned for every booking
    pub create_meeting: bool,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The port value cannot be parsed as a u16
    /// - Any of the business schedule variables is malformed or inconsistent
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("API_PORT")
            .or_else(|| var("PORT"))
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = var("DATABASE_URL")
            .ok_or_else(|| eyre::eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = parse_log_level(&var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()));

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(30);

        let schedule = schedule_from_vars(&var)?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            schedule,
            send_confirmation_email: is_enabled(var("SEND_CONFIRMATION_EMAIL")),
            create_meeting: is_enabled(var("CREATE_ZOOM_MEETING")),
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// One line per setting, safe to log.
    pub fn summary(&self) -> Vec<String> {
        let days: Vec<String> = ALL_WEEKDAYS
            .iter()
            .filter(|day| self.schedule.is_business_day(**day))
            .map(|day| day.to_string())
            .collect();

        vec![
            format!("listen address: {}", self.server_addr()),
            format!("database: {}", mask_password(&self.database_url)),
            format!("log level: {}", self.log_level),
            format!(
                "cors origins: {}",
                self.cors_origins
                    .as_ref()
                    .map(|origins| origins.join(","))
                    .unwrap_or_else(|| "none".to_string())
            ),
            format!("request timeout: {}s", self.request_timeout),
            format!("business timezone: {}", self.schedule.timezone()),
            format!(
                "opening hours: {}-{}",
                self.schedule.opens().format("%H:%M"),
                self.schedule.closes().format("%H:%M")
            ),
            format!("business days: {}", days.join(",")),
            format!("booking horizon: {:?}", self.schedule.horizon()),
            format!("confirmation email: {}", on_off(self.send_confirmation_email)),
            format!("meeting provisioning: {}", on_off(self.create_meeting)),
        ]
    }
}

fn schedule_from_vars<F>(var: &F) -> Result<SlotSchedule>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = SlotSchedule::default();

    let timezone = match var("BUSINESS_TIMEZONE") {
        Some(raw) => parse_timezone(&raw).wrap_err("Invalid BUSINESS_TIMEZONE value")?,
        None => *defaults.timezone(),
    };
    let opens = match var("BUSINESS_OPEN") {
        Some(raw) => parse_wall_clock(&raw).wrap_err("Invalid BUSINESS_OPEN value")?,
        None => defaults.opens(),
    };
    let closes = match var("BUSINESS_CLOSE") {
        Some(raw) => parse_wall_clock(&raw).wrap_err("Invalid BUSINESS_CLOSE value")?,
        None => defaults.closes(),
    };
    let days = match var("BUSINESS_DAYS") {
        Some(raw) => parse_weekdays(&raw).wrap_err("Invalid BUSINESS_DAYS value")?,
        None => ALL_WEEKDAYS.to_vec(),
    };
    let horizon = match var("BOOKING_HORIZON") {
        Some(raw) => raw
            .parse::<Horizon>()
            .wrap_err("Invalid BOOKING_HORIZON value")?,
        None => defaults.horizon(),
    };

    SlotSchedule::new(timezone, opens, closes, days, horizon)
        .wrap_err("Invalid business schedule")
}

fn parse_log_level(raw: &str) -> Level {
    match raw.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Feature toggles accept `yes` or `true`, case-insensitively.
pub fn is_enabled(raw: Option<String>) -> bool {
    raw.map(|value| {
        let value = value.trim().to_lowercase();
        value == "yes" || value == "true"
    })
    .unwrap_or(false)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

/// Replaces the password of a connection URL with `****`.
pub fn mask_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:****@{}", scheme, user, host),
        None => url.to_string(),
    }
}
