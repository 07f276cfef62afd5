use crate::models::DbConflict;
use chrono::NaiveDateTime;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Returns the first live appointment the professional already has at
/// exactly `scheduled_at`. Cancelled and no-show appointments free the slot.
pub async fn find_conflict(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
    scheduled_at: NaiveDateTime,
) -> Result<Option<DbConflict>> {
    tracing::debug!(
        "Checking conflicts: professional_id={}, scheduled_at={}",
        professional_id, scheduled_at
    );

    let conflict = sqlx::query_as::<_, DbConflict>(
        r#"
        SELECT a.id AS appointment_id, a.scheduled_at, a.patient_name, s.name AS service_name
        FROM appointments a
        LEFT JOIN services s ON s.id = a.service_id
        WHERE a.professional_id = $1
          AND a.scheduled_at = $2
          AND a.status NOT IN ('cancelled', 'no_show')
        ORDER BY a.created_at ASC
        LIMIT 1
        "#,
    )
    .bind(professional_id)
    .bind(scheduled_at)
    .fetch_optional(pool)
    .await?;

    if let Some(c) = &conflict {
        tracing::debug!("Conflict found: appointment_id={}", c.appointment_id);
    }

    Ok(conflict)
}
