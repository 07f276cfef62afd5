//! # Schedule Store
//!
//! The storage seam between the scheduling logic and whatever backend holds
//! the data. `slotshare-db` implements it over PostgreSQL and
//! `slotshare-client` over HTTP, so a [`WizardSession`](crate::session::WizardSession)
//! runs unchanged in-process or against a remote server.
//!
//! Implementations report failures as `eyre` reports; callers map them to
//! [`ScheduleError::Database`](crate::errors::ScheduleError::Database).

use async_trait::async_trait;
use eyre::Result;
use uuid::Uuid;

use crate::{
    models::{
        appointment::ConflictRecord,
        options::{ScheduleOptions, SelectOption},
        shared_schedule::{
            CreateSharedScheduleRequest, SharedSchedule, SharedScheduleDetail, SharedScheduleSlot,
            SharedScheduleSummary, StatusFilter, UpdateSharedScheduleRequest,
        },
    },
    slot::Slot,
};

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Active services ordered by name.
    async fn list_services(&self) -> Result<Vec<SelectOption>>;

    /// Active locations ordered by name.
    async fn list_locations(&self) -> Result<Vec<SelectOption>>;

    /// Active billing companies ordered by name.
    async fn list_companies(&self) -> Result<Vec<SelectOption>>;

    /// Existing appointment of the professional occupying `slot`, if any.
    async fn find_conflict(&self, professional_id: Uuid, slot: Slot) -> Result<Option<ConflictRecord>>;

    async fn is_token_available(&self, token: &str) -> Result<bool>;

    /// Persists the schedule with its associations and slots, all or nothing.
    async fn create_shared_schedule(
        &self,
        created_by: Uuid,
        request: &CreateSharedScheduleRequest,
    ) -> Result<SharedSchedule>;

    async fn update_shared_schedule(
        &self,
        id: Uuid,
        changes: &UpdateSharedScheduleRequest,
    ) -> Result<SharedSchedule>;

    /// Inserts slots, skipping instants the schedule already has. Returns
    /// only the rows that were inserted.
    async fn add_slots(&self, schedule_id: Uuid, slots: &[Slot]) -> Result<Vec<SharedScheduleSlot>>;

    /// Deletes unselected slots by ID and returns how many were removed.
    async fn remove_slots(&self, schedule_id: Uuid, slot_ids: &[Uuid]) -> Result<u64>;

    async fn list_shared_schedules(
        &self,
        professional_id: Uuid,
        status: StatusFilter,
    ) -> Result<Vec<SharedScheduleSummary>>;

    async fn get_shared_schedule(&self, id: Uuid) -> Result<Option<SharedScheduleDetail>>;

    async fn get_shared_schedule_by_token(&self, token: &str) -> Result<Option<SharedScheduleDetail>>;

    /// Marks a slot as picked. Returns `None` when the slot does not exist in
    /// that schedule or was already picked.
    async fn select_slot(
        &self,
        token: &str,
        slot_id: Uuid,
        selected_by: &str,
    ) -> Result<Option<SharedScheduleSlot>>;
}

/// Loads the three option lists the wizard pickers need.
pub async fn load_options<S: ScheduleStore + ?Sized>(store: &S) -> Result<ScheduleOptions> {
    let services = store.list_services().await?;
    let locations = store.list_locations().await?;
    let companies = store.list_companies().await?;

    tracing::debug!(
        "Loaded schedule options: {} services, {} locations, {} companies",
        services.len(),
        locations.len(),
        companies.len()
    );

    Ok(ScheduleOptions {
        services,
        locations,
        companies,
    })
}
