use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use slotshare_core::models::{
    appointment::ConflictRecord,
    options::SelectOption,
    shared_schedule::{SharedSchedule, SharedScheduleSlot, SharedScheduleSummary},
};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of `services`, `locations` or `billing_companies`, reduced to what
/// the wizard's pickers show.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOption {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbConflict {
    pub appointment_id: Uuid,
    pub scheduled_at: NaiveDateTime,
    pub patient_name: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSharedSchedule {
    pub id: Uuid,
    pub token: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSharedScheduleSummary {
    #[sqlx(flatten)]
    pub schedule: DbSharedSchedule,
    pub slot_count: i64,
    pub selected_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSharedScheduleSlot {
    pub id: Uuid,
    pub shared_schedule_id: Uuid,
    pub slot_time: NaiveDateTime,
    pub selected_at: Option<DateTime<Utc>>,
    pub selected_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbOption> for SelectOption {
    fn from(row: DbOption) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<DbConflict> for ConflictRecord {
    fn from(row: DbConflict) -> Self {
        Self {
            appointment_id: row.appointment_id,
            scheduled_at: row.scheduled_at.into(),
            patient_name: row.patient_name,
            service_name: row.service_name,
        }
    }
}

impl From<DbSharedSchedule> for SharedSchedule {
    fn from(row: DbSharedSchedule) -> Self {
        Self {
            id: row.id,
            token: row.token,
            title: row.title,
            start_date: row.start_date,
            end_date: row.end_date,
            created_by: row.created_by,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbSharedScheduleSummary> for SharedScheduleSummary {
    fn from(row: DbSharedScheduleSummary) -> Self {
        Self {
            schedule: row.schedule.into(),
            slot_count: row.slot_count,
            selected_count: row.selected_count,
        }
    }
}

/// A slot counts as selected once `selected_at` is set.
impl From<DbSharedScheduleSlot> for SharedScheduleSlot {
    fn from(row: DbSharedScheduleSlot) -> Self {
        Self {
            id: row.id,
            slot: row.slot_time.into(),
            is_selected: row.selected_at.is_some(),
            selected_by: row.selected_by,
            selected_at: row.selected_at,
        }
    }
}
