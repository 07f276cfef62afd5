use crate::models::{DbOption, DbSharedSchedule, DbSharedScheduleSlot, DbSharedScheduleSummary};
use crate::repositories::{Association, slot};
use chrono::NaiveDateTime;
use eyre::{Result, eyre};
use slotshare_core::errors::TokenInUse;
use slotshare_core::models::shared_schedule::{CreateSharedScheduleRequest, UpdateSharedScheduleRequest};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const SCHEDULE_COLUMNS: &str =
    "id, token, title, start_date, end_date, created_by, is_active, created_at, updated_at";

pub async fn token_exists(pool: &Pool<Postgres>, token: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM shared_schedules WHERE token = $1
        );
        "#,
    )
    .bind(token)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

fn token_violation(error: sqlx::Error, token: &str) -> eyre::Report {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return TokenInUse(token.to_string()).into();
        }
    }
    eyre::Report::new(error)
}

async fn insert_associations(
    conn: &mut PgConnection,
    association: Association,
    shared_schedule_id: Uuid,
    ids: &[Uuid],
) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(&format!(
        r#"
        INSERT INTO {table} (shared_schedule_id, {column})
        SELECT $1, id FROM UNNEST($2::uuid[]) AS id
        ON CONFLICT DO NOTHING
        "#,
        table = association.join_table(),
        column = association.id_column(),
    ))
    .bind(shared_schedule_id)
    .bind(ids)
    .execute(conn)
    .await?;

    Ok(())
}

async fn replace_associations(
    conn: &mut PgConnection,
    association: Association,
    shared_schedule_id: Uuid,
    ids: &[Uuid],
) -> Result<()> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE shared_schedule_id = $1",
        association.join_table()
    ))
    .bind(shared_schedule_id)
    .execute(&mut *conn)
    .await?;

    insert_associations(conn, association, shared_schedule_id, ids).await
}

/// Writes the schedule row, its three association sets and its slots in one
/// transaction. Nothing is left behind if any insert fails.
pub async fn create_shared_schedule(
    pool: &Pool<Postgres>,
    created_by: Uuid,
    request: &CreateSharedScheduleRequest,
) -> Result<DbSharedSchedule> {
    tracing::debug!(
        "Creating shared schedule: token={}, title={}, created_by={}, slots={}",
        request.token,
        request.title,
        created_by,
        request.slots.len()
    );

    let mut tx = pool.begin().await?;

    let schedule = sqlx::query_as::<_, DbSharedSchedule>(&format!(
        r#"
        INSERT INTO shared_schedules (token, title, start_date, end_date, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {SCHEDULE_COLUMNS}
        "#
    ))
    .bind(&request.token)
    .bind(&request.title)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| token_violation(e, &request.token))?;

    insert_associations(&mut tx, Association::Services, schedule.id, &request.service_ids).await?;
    insert_associations(&mut tx, Association::Locations, schedule.id, &request.location_ids).await?;
    insert_associations(&mut tx, Association::Companies, schedule.id, &request.company_ids).await?;

    let slot_times: Vec<NaiveDateTime> = request.slots.iter().map(|s| s.as_naive()).collect();
    slot::insert_slots(&mut tx, schedule.id, &slot_times).await?;

    tx.commit().await?;

    tracing::debug!("Shared schedule created successfully: id={}", schedule.id);
    Ok(schedule)
}

pub async fn get_shared_schedule_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSharedSchedule>> {
    tracing::debug!("Getting shared schedule by id: {}", id);

    let schedule = sqlx::query_as::<_, DbSharedSchedule>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM shared_schedules WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

pub async fn get_shared_schedule_by_token(
    pool: &Pool<Postgres>,
    token: &str,
) -> Result<Option<DbSharedSchedule>> {
    tracing::debug!("Getting shared schedule by token: {}", token);

    let schedule = sqlx::query_as::<_, DbSharedSchedule>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM shared_schedules WHERE token = $1"
    ))
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

/// Applies the present fields of `changes`. Association lists, when given,
/// replace the stored set entirely.
pub async fn update_shared_schedule(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdateSharedScheduleRequest,
) -> Result<DbSharedSchedule> {
    let mut tx = pool.begin().await?;

    let schedule = sqlx::query_as::<_, DbSharedSchedule>(&format!(
        r#"
        UPDATE shared_schedules
        SET title = COALESCE($2, title),
            start_date = COALESCE($3, start_date),
            end_date = COALESCE($4, end_date),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {SCHEDULE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(changes.title.as_deref().map(str::trim))
    .bind(changes.start_date)
    .bind(changes.end_date)
    .bind(changes.is_active)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| eyre!("Shared schedule not found"))?;

    for (association, ids) in [
        (Association::Services, &changes.service_ids),
        (Association::Locations, &changes.location_ids),
        (Association::Companies, &changes.company_ids),
    ] {
        if let Some(ids) = ids {
            replace_associations(&mut tx, association, id, ids).await?;
        }
    }

    tx.commit().await?;

    tracing::debug!("Shared schedule updated: id={}", id);
    Ok(schedule)
}

/// Lists a professional's schedules, newest first, with slot counts.
/// `is_active` of `None` lists every schedule.
pub async fn list_shared_schedules(
    pool: &Pool<Postgres>,
    created_by: Uuid,
    is_active: Option<bool>,
) -> Result<Vec<DbSharedScheduleSummary>> {
    let schedules = sqlx::query_as::<_, DbSharedScheduleSummary>(
        r#"
        SELECT s.id, s.token, s.title, s.start_date, s.end_date, s.created_by,
               s.is_active, s.created_at, s.updated_at,
               COUNT(sl.id) AS slot_count,
               COUNT(sl.selected_at) AS selected_count
        FROM shared_schedules s
        LEFT JOIN shared_schedule_slots sl ON sl.shared_schedule_id = s.id
        WHERE s.created_by = $1
          AND ($2::boolean IS NULL OR s.is_active = $2)
        GROUP BY s.id
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(created_by)
    .bind(is_active)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

pub async fn get_associated_options(
    pool: &Pool<Postgres>,
    association: Association,
    shared_schedule_id: Uuid,
) -> Result<Vec<DbOption>> {
    let options = sqlx::query_as::<_, DbOption>(&format!(
        r#"
        SELECT o.id, o.name
        FROM {join} j
        JOIN {options} o ON o.id = j.{column}
        WHERE j.shared_schedule_id = $1
        ORDER BY o.name ASC
        "#,
        join = association.join_table(),
        options = association.option_table(),
        column = association.id_column(),
    ))
    .bind(shared_schedule_id)
    .fetch_all(pool)
    .await?;

    Ok(options)
}

pub async fn get_slots(pool: &Pool<Postgres>, shared_schedule_id: Uuid) -> Result<Vec<DbSharedScheduleSlot>> {
    slot::get_slots_by_schedule_id(pool, shared_schedule_id).await
}
