use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One selectable entry in the wizard pickers: a service, a location or a
/// billing company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: Uuid,
    pub name: String,
}

/// Everything the wizard needs to render its pickers. Only active rows are
/// included, each list ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    pub services: Vec<SelectOption>,
    pub locations: Vec<SelectOption>,
    pub companies: Vec<SelectOption>,
}
