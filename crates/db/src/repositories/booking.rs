use crate::models::DbBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};

/// Inserts a booking unless one already exists at `slot_time`.
///
/// Returns `None` when the unique constraint on `slot_time` rejected the row.
pub async fn insert_booking(
    pool: &Pool<Postgres>,
    slot_time: DateTime<Utc>,
    name: &str,
    email: &str,
    meeting_ref: Option<&str>,
    meeting_url: Option<&str>,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (slot_time, name, email, meeting_ref, meeting_url)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (slot_time) DO NOTHING
        RETURNING id, slot_time, name, email, created_at, duration, meeting_ref, meeting_url
        "#,
    )
    .bind(slot_time)
    .bind(name)
    .bind(email)
    .bind(meeting_ref)
    .bind(meeting_url)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings(pool: &Pool<Postgres>) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, slot_time, name, email, created_at, duration, meeting_ref, meeting_url
        FROM bookings
        ORDER BY slot_time ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_booking_by_slot_time(
    pool: &Pool<Postgres>,
    slot_time: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, slot_time, name, email, created_at, duration, meeting_ref, meeting_url
        FROM bookings
        WHERE slot_time = $1
        "#,
    )
    .bind(slot_time)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn delete_booking(
    pool: &Pool<Postgres>,
    slot_time: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        DELETE FROM bookings
        WHERE slot_time = $1
        RETURNING id, slot_time, name, email, created_at, duration, meeting_ref, meeting_url
        "#,
    )
    .bind(slot_time)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}
