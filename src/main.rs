use std::sync::Arc;

use coachcal_api::config::ApiConfig;
use coachcal_core::booking::BookingService;
use coachcal_db::{create_pool, schema::initialize_database, PgSlotStore};
use coachcal_integrations::{EmailConfig, EmailSender, ZoomClient, ZoomConfig};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    coachcal_api::init_tracing(config.log_level)?;
    for line in config.summary() {
        info!("config: {}", line);
    }

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let mut service = BookingService::new(
        Arc::new(PgSlotStore::new(db_pool)),
        config.schedule.clone(),
    );

    if config.create_meeting {
        match ZoomConfig::from_env() {
            Some(zoom) => {
                info!("config: {}", zoom.summary());
                service = service.with_meetings(Arc::new(ZoomClient::new(zoom)));
            }
            None => warn!(
                "CREATE_ZOOM_MEETING is set but ZOOM_ACCOUNT_ID, ZOOM_CLIENT_ID or ZOOM_CLIENT_SECRET is missing; meetings disabled"
            ),
        }
    }

    if config.send_confirmation_email {
        match EmailConfig::from_env() {
            Some(email) => {
                info!("config: {}", email.summary());
                let sender = EmailSender::new(email, *config.schedule.timezone())?;
                service = service.with_confirmations(Arc::new(sender));
            }
            None => warn!(
                "SEND_CONFIRMATION_EMAIL is set but EMAIL_API_KEY or EMAIL_FROM is missing; confirmations disabled"
            ),
        }
    }

    // Start API server
    coachcal_api::start_server(config, service).await?;

    Ok(())
}
