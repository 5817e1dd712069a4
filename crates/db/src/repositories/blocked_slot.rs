use crate::models::DbBlockedSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};

/// Returns `None` when `slot_time` is already blocked.
pub async fn insert_blocked_slot(
    pool: &Pool<Postgres>,
    slot_time: DateTime<Utc>,
) -> Result<Option<DbBlockedSlot>> {
    let blocked = sqlx::query_as::<_, DbBlockedSlot>(
        r#"
        INSERT INTO blocked_slots (slot_time)
        VALUES ($1)
        ON CONFLICT (slot_time) DO NOTHING
        RETURNING id, slot_time, created_at
        "#,
    )
    .bind(slot_time)
    .fetch_optional(pool)
    .await?;

    Ok(blocked)
}

pub async fn get_blocked_slots(pool: &Pool<Postgres>) -> Result<Vec<DbBlockedSlot>> {
    let blocked = sqlx::query_as::<_, DbBlockedSlot>(
        r#"
        SELECT id, slot_time, created_at
        FROM blocked_slots
        ORDER BY slot_time ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(blocked)
}

pub async fn is_slot_blocked(pool: &Pool<Postgres>, slot_time: DateTime<Utc>) -> Result<bool> {
    let blocked: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(SELECT 1 FROM blocked_slots WHERE slot_time = $1)
        "#,
    )
    .bind(slot_time)
    .fetch_one(pool)
    .await?;

    Ok(blocked)
}

pub async fn delete_blocked_slot(pool: &Pool<Postgres>, slot_time: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM blocked_slots
        WHERE slot_time = $1
        "#,
    )
    .bind(slot_time)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_all_blocked_slots(pool: &Pool<Postgres>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM blocked_slots
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
