//! # Shared Schedule Editor
//!
//! Re-opens a persisted schedule for changes. Field edits, slot additions and
//! slot removals are independent round trips, each succeeding or failing on
//! its own. There is no version check: the last write wins.
//!
//! The validation helpers are also used by the HTTP handlers so both paths
//! enforce the same rules.

use std::{collections::BTreeSet, sync::Arc};

use uuid::Uuid;

use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        options::SelectOption,
        shared_schedule::{SharedSchedule, SharedScheduleDetail, SharedScheduleSlot, UpdateSharedScheduleRequest},
    },
    slot::Slot,
    store::{ScheduleStore, load_options},
    wizard::{WizardNotice, validate_date_range, validate_slot_range, validate_title},
};

/// Checks an update against the schedule it applies to. Dates are validated
/// as a pair, falling back to the current value for the one not being changed,
/// and may not shrink past a slot the schedule already has.
pub fn validate_changes(
    current: &SharedScheduleDetail,
    changes: &UpdateSharedScheduleRequest,
) -> ScheduleResult<()> {
    if let Some(title) = &changes.title {
        validate_title(title)?;
    }

    let (start, end) = validate_date_range(
        Some(changes.start_date.unwrap_or(current.schedule.start_date)),
        Some(changes.end_date.unwrap_or(current.schedule.end_date)),
    )?;
    let slots: Vec<Slot> = current.slots.iter().map(|s| s.slot).collect();
    validate_slot_range(&slots, start, end)?;

    if changes.service_ids.as_ref().is_some_and(Vec::is_empty) {
        return Err(WizardNotice::NoServices.into());
    }
    if changes.location_ids.as_ref().is_some_and(Vec::is_empty) {
        return Err(WizardNotice::NoLocations.into());
    }
    if changes.company_ids.as_ref().is_some_and(Vec::is_empty) {
        return Err(WizardNotice::NoCompanies.into());
    }

    Ok(())
}

fn first_unoffered(offered: &[SelectOption], ids: &[Uuid]) -> Option<Uuid> {
    ids.iter().copied().find(|id| !offered.iter().any(|option| option.id == *id))
}

/// Rejects association IDs that are not among the active options. Lists left
/// as `None` are not checked, and nothing is loaded when all of them are.
pub async fn ensure_offered(
    store: &dyn ScheduleStore,
    service_ids: Option<&[Uuid]>,
    location_ids: Option<&[Uuid]>,
    company_ids: Option<&[Uuid]>,
) -> ScheduleResult<()> {
    if service_ids.is_none() && location_ids.is_none() && company_ids.is_none() {
        return Ok(());
    }

    let options = load_options(store).await?;
    for (kind, offered, ids) in [
        ("Service", &options.services, service_ids),
        ("Location", &options.locations, location_ids),
        ("Billing company", &options.companies, company_ids),
    ] {
        if let Some(id) = first_unoffered(offered, ids.unwrap_or_default()) {
            return Err(ScheduleError::Validation(format!("{} {} is not available", kind, id)));
        }
    }
    Ok(())
}

/// Message of the validation error raised when a batch adds nothing new.
pub const NOTHING_NEW_TO_ADD: &str = "No new slots to add; every slot is already in the schedule";

/// Drops candidates the schedule already has and repeats within the batch,
/// keeping the first occurrence. Fails when a candidate lies outside the
/// schedule's dates or when nothing new is left.
pub fn plan_slot_additions(detail: &SharedScheduleDetail, candidates: &[Slot]) -> ScheduleResult<Vec<Slot>> {
    validate_slot_range(candidates, detail.schedule.start_date, detail.schedule.end_date)?;

    let mut seen: BTreeSet<Slot> = detail.slots.iter().map(|s| s.slot).collect();
    let additions: Vec<Slot> = candidates
        .iter()
        .copied()
        .filter(|slot| seen.insert(*slot))
        .collect();

    if additions.is_empty() {
        return Err(ScheduleError::Validation(NOTHING_NEW_TO_ADD.to_string()));
    }
    Ok(additions)
}

/// Finds the slot and checks nobody has picked it yet.
pub fn ensure_removable(detail: &SharedScheduleDetail, slot_id: Uuid) -> ScheduleResult<&SharedScheduleSlot> {
    let slot = detail
        .slots
        .iter()
        .find(|s| s.id == slot_id)
        .ok_or_else(|| ScheduleError::NotFound(format!("Slot with ID {} not found", slot_id)))?;

    if slot.is_selected {
        return Err(ScheduleError::Validation(format!(
            "Slot {} has already been selected and cannot be removed",
            slot.slot
        )));
    }
    Ok(slot)
}

pub struct ScheduleEditor {
    store: Arc<dyn ScheduleStore>,
    detail: SharedScheduleDetail,
}

impl ScheduleEditor {
    pub async fn open(store: Arc<dyn ScheduleStore>, id: Uuid) -> ScheduleResult<Self> {
        let detail = store
            .get_shared_schedule(id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Shared schedule with ID {} not found", id)))?;

        Ok(Self { store, detail })
    }

    pub fn detail(&self) -> &SharedScheduleDetail {
        &self.detail
    }

    pub fn into_detail(self) -> SharedScheduleDetail {
        self.detail
    }

    pub async fn update(&mut self, changes: &UpdateSharedScheduleRequest) -> ScheduleResult<&SharedSchedule> {
        let id = self.detail.schedule.id;
        validate_changes(&self.detail, changes)?;
        ensure_offered(
            self.store.as_ref(),
            changes.service_ids.as_deref(),
            changes.location_ids.as_deref(),
            changes.company_ids.as_deref(),
        )
        .await?;

        let updated = self.store.update_shared_schedule(id, changes).await?;
        tracing::info!("Updated shared schedule {}", id);

        let associations_changed = changes.service_ids.is_some()
            || changes.location_ids.is_some()
            || changes.company_ids.is_some();
        if associations_changed {
            self.reload().await?;
        } else {
            self.detail.schedule = updated;
        }
        Ok(&self.detail.schedule)
    }

    pub async fn add_slots(&mut self, candidates: &[Slot]) -> ScheduleResult<Vec<SharedScheduleSlot>> {
        let id = self.detail.schedule.id;
        let additions = plan_slot_additions(&self.detail, candidates)?;

        let added = self.store.add_slots(id, &additions).await?;
        tracing::info!("Added {} slots to shared schedule {}", added.len(), id);

        self.detail.slots.extend(added.iter().cloned());
        self.detail.slots.sort_by_key(|s| s.slot);
        Ok(added)
    }

    pub async fn remove_slot(&mut self, slot_id: Uuid) -> ScheduleResult<()> {
        let id = self.detail.schedule.id;
        ensure_removable(&self.detail, slot_id)?;

        let removed = self.store.remove_slots(id, &[slot_id]).await?;
        if removed == 0 {
            // Picked by a patient since the editor loaded.
            self.reload().await?;
            return Err(ScheduleError::Conflict(format!(
                "Slot with ID {} was selected before it could be removed",
                slot_id
            )));
        }

        self.detail.slots.retain(|s| s.id != slot_id);
        tracing::info!("Removed slot {} from shared schedule {}", slot_id, id);
        Ok(())
    }

    pub async fn reload(&mut self) -> ScheduleResult<()> {
        let id = self.detail.schedule.id;
        self.detail = self
            .store
            .get_shared_schedule(id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Shared schedule with ID {} not found", id)))?;
        Ok(())
    }
}
