use crate::models::DbSharedScheduleSlot;
use chrono::NaiveDateTime;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str = "id, shared_schedule_id, slot_time, selected_at, selected_by, created_at";

/// Inserts the given instants, silently skipping any the schedule already
/// offers. Returns only the rows actually inserted.
pub async fn insert_slots(
    conn: &mut PgConnection,
    shared_schedule_id: Uuid,
    slot_times: &[NaiveDateTime],
) -> Result<Vec<DbSharedScheduleSlot>> {
    tracing::debug!(
        "Inserting slots: shared_schedule_id={}, count={}",
        shared_schedule_id,
        slot_times.len()
    );

    let slots = sqlx::query_as::<_, DbSharedScheduleSlot>(&format!(
        r#"
        INSERT INTO shared_schedule_slots (shared_schedule_id, slot_time)
        SELECT $1, t FROM UNNEST($2::timestamp[]) AS t
        ON CONFLICT (shared_schedule_id, slot_time) DO NOTHING
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(shared_schedule_id)
    .bind(slot_times)
    .fetch_all(conn)
    .await?;

    Ok(slots)
}

pub async fn add_slots(
    pool: &Pool<Postgres>,
    shared_schedule_id: Uuid,
    slot_times: &[NaiveDateTime],
) -> Result<Vec<DbSharedScheduleSlot>> {
    let mut conn = pool.acquire().await?;
    let mut slots = insert_slots(&mut conn, shared_schedule_id, slot_times).await?;
    slots.sort_by_key(|s| s.slot_time);
    Ok(slots)
}

pub async fn get_slots_by_schedule_id(
    pool: &Pool<Postgres>,
    shared_schedule_id: Uuid,
) -> Result<Vec<DbSharedScheduleSlot>> {
    let slots = sqlx::query_as::<_, DbSharedScheduleSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM shared_schedule_slots
        WHERE shared_schedule_id = $1
        ORDER BY slot_time ASC
        "#
    ))
    .bind(shared_schedule_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Deletes the given slots of one schedule. Selected slots are left alone,
/// so the returned count may be lower than `slot_ids.len()`.
pub async fn remove_slots(
    pool: &Pool<Postgres>,
    shared_schedule_id: Uuid,
    slot_ids: &[Uuid],
) -> Result<u64> {
    tracing::debug!(
        "Removing slots: shared_schedule_id={}, ids={:?}",
        shared_schedule_id, slot_ids
    );

    let result = sqlx::query(
        r#"
        DELETE FROM shared_schedule_slots
        WHERE shared_schedule_id = $1
          AND id = ANY($2)
          AND selected_at IS NULL
        "#,
    )
    .bind(shared_schedule_id)
    .bind(slot_ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Marks a slot as taken. The first caller wins; later callers get `None`.
pub async fn select_slot(
    pool: &Pool<Postgres>,
    shared_schedule_id: Uuid,
    slot_id: Uuid,
    selected_by: &str,
) -> Result<Option<DbSharedScheduleSlot>> {
    let slot = sqlx::query_as::<_, DbSharedScheduleSlot>(&format!(
        r#"
        UPDATE shared_schedule_slots
        SET selected_at = NOW(), selected_by = $3
        WHERE id = $2
          AND shared_schedule_id = $1
          AND selected_at IS NULL
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(shared_schedule_id)
    .bind(slot_id)
    .bind(selected_by)
    .fetch_optional(pool)
    .await?;

    match &slot {
        Some(s) => tracing::debug!("Slot selected: id={}", s.id),
        None => tracing::debug!("Slot not selectable: id={}", slot_id),
    }

    Ok(slot)
}
