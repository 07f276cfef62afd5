use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::options::SelectOption, slot::Slot};

/// Path segment under the public base URL where shared schedules are served.
pub const SHARE_PATH: &str = "shared-schedule";

/// Builds the public link patients open to pick a slot.
pub fn share_link(base_url: &str, token: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), SHARE_PATH, token)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSchedule {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedScheduleSlot {
    pub id: Uuid,
    pub slot: Slot,
    pub is_selected: bool,
    pub selected_by: Option<String>,
    pub selected_at: Option<DateTime<Utc>>,
}

/// A schedule together with its associations and slots, ordered by slot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedScheduleDetail {
    #[serde(flatten)]
    pub schedule: SharedSchedule,
    pub services: Vec<SelectOption>,
    pub locations: Vec<SelectOption>,
    pub companies: Vec<SelectOption>,
    pub slots: Vec<SharedScheduleSlot>,
}

impl SharedScheduleDetail {
    /// Strips who picked which slot, for the unauthenticated view.
    pub fn redacted(mut self) -> Self {
        for slot in &mut self.slots {
            slot.selected_by = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedScheduleSummary {
    #[serde(flatten)]
    pub schedule: SharedSchedule,
    pub slot_count: i64,
    pub selected_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// The `is_active` value rows must have, or `None` for no filtering.
    pub fn is_active(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(true),
            Self::Inactive => Some(false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSharedSchedulesQuery {
    #[serde(default)]
    pub status: StatusFilter,
}

/// Creation payload assembled by the wizard once every step validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSharedScheduleRequest {
    pub token: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub service_ids: Vec<Uuid>,
    pub location_ids: Vec<Uuid>,
    pub company_ids: Vec<Uuid>,
    pub slots: Vec<Slot>,
}

/// The stored schedule plus the link to hand to patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSharedScheduleResponse {
    #[serde(flatten)]
    pub schedule: SharedSchedule,
    pub link: String,
}

/// Field and association edits. `None` leaves the current value untouched;
/// an association list replaces the current set entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSharedScheduleRequest {
    pub title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub service_ids: Option<Vec<Uuid>>,
    pub location_ids: Option<Vec<Uuid>>,
    pub company_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlotsRequest {
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlotsResponse {
    pub added: Vec<SharedScheduleSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveSlotResponse {
    pub removed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectSlotRequest {
    pub selected_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenAvailabilityResponse {
    pub token: String,
    pub available: bool,
}
