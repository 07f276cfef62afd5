use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slot::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Whether an appointment in this status still occupies its time.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::NoShow)
    }
}

/// An existing appointment that already occupies a candidate slot.
///
/// Only read to warn the operator; never written by the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub appointment_id: Uuid,
    pub scheduled_at: Slot,
    pub patient_name: Option<String>,
    pub service_name: Option<String>,
}

impl ConflictRecord {
    /// Short operator-facing description, e.g. "Maria Silva (Consulta)".
    pub fn describe(&self) -> String {
        let patient = self.patient_name.as_deref().unwrap_or("Unknown patient");
        match &self.service_name {
            Some(service) => format!("{} ({})", patient, service),
            None => patient.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictQuery {
    pub slot: Slot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResponse {
    pub slot: Slot,
    pub conflict: Option<ConflictRecord>,
}
