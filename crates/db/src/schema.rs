use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id SERIAL PRIMARY KEY,
            slot_time TIMESTAMP WITH TIME ZONE NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            duration INTEGER NOT NULL DEFAULT 30,
            meeting_ref TEXT NULL,
            meeting_url TEXT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Older deployments predate meeting provisioning
    sqlx::query(
        r#"
        ALTER TABLE bookings ADD COLUMN IF NOT EXISTS meeting_ref TEXT NULL;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        ALTER TABLE bookings ADD COLUMN IF NOT EXISTS meeting_url TEXT NULL;
        "#,
    )
    .execute(pool)
    .await?;

    // Create blocked_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blocked_slots (
            id SERIAL PRIMARY KEY,
            slot_time TIMESTAMP WITH TIME ZONE NOT NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_bookings_slot_time ON bookings(slot_time);
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_blocked_slots_slot_time ON blocked_slots(slot_time);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
