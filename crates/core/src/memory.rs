//! In-memory [`ScheduleStore`], for tests and local demos.
//!
//! Mirrors the PostgreSQL store's observable behavior: inactive options are
//! hidden, option lists are sorted by name, cancelled and no-show
//! appointments never conflict, duplicate slot instants are skipped on insert
//! and selected slots are never removed.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use eyre::{Result, eyre};
use uuid::Uuid;

use crate::{
    errors::TokenInUse,
    models::{
        appointment::{AppointmentStatus, ConflictRecord},
        options::SelectOption,
        shared_schedule::{
            CreateSharedScheduleRequest, SharedSchedule, SharedScheduleDetail, SharedScheduleSlot,
            SharedScheduleSummary, StatusFilter, UpdateSharedScheduleRequest,
        },
    },
    slot::Slot,
    store::ScheduleStore,
};

#[derive(Debug, Clone)]
struct OptionRow {
    option: SelectOption,
    is_active: bool,
}

#[derive(Debug, Clone)]
struct AppointmentRow {
    id: Uuid,
    professional_id: Uuid,
    scheduled_at: Slot,
    patient_name: Option<String>,
    service_id: Option<Uuid>,
    status: AppointmentStatus,
}

#[derive(Debug, Clone)]
struct ScheduleRow {
    schedule: SharedSchedule,
    service_ids: Vec<Uuid>,
    location_ids: Vec<Uuid>,
    company_ids: Vec<Uuid>,
    slots: Vec<SharedScheduleSlot>,
}

#[derive(Debug, Default)]
struct MemoryData {
    services: Vec<OptionRow>,
    locations: Vec<OptionRow>,
    companies: Vec<OptionRow>,
    appointments: Vec<AppointmentRow>,
    schedules: HashMap<Uuid, ScheduleRow>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_service(&self, name: &str, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.data().services.push(option_row(id, name, is_active));
        id
    }

    pub fn add_location(&self, name: &str, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.data().locations.push(option_row(id, name, is_active));
        id
    }

    pub fn add_company(&self, name: &str, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.data().companies.push(option_row(id, name, is_active));
        id
    }

    pub fn add_appointment(
        &self,
        professional_id: Uuid,
        scheduled_at: Slot,
        patient_name: Option<&str>,
        service_id: Option<Uuid>,
        status: AppointmentStatus,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.data().appointments.push(AppointmentRow {
            id,
            professional_id,
            scheduled_at,
            patient_name: patient_name.map(str::to_string),
            service_id,
            status,
        });
        id
    }

    pub fn schedule_count(&self) -> usize {
        self.data().schedules.len()
    }
}

fn option_row(id: Uuid, name: &str, is_active: bool) -> OptionRow {
    OptionRow {
        option: SelectOption {
            id,
            name: name.to_string(),
        },
        is_active,
    }
}

fn active_sorted(rows: &[OptionRow]) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = rows
        .iter()
        .filter(|row| row.is_active)
        .map(|row| row.option.clone())
        .collect();
    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}

fn named(rows: &[OptionRow], ids: &[Uuid]) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = rows
        .iter()
        .filter(|row| ids.contains(&row.option.id))
        .map(|row| row.option.clone())
        .collect();
    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}

fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

fn new_slot(slot: Slot) -> SharedScheduleSlot {
    SharedScheduleSlot {
        id: Uuid::new_v4(),
        slot,
        is_selected: false,
        selected_by: None,
        selected_at: None,
    }
}

impl MemoryData {
    fn detail(&self, row: &ScheduleRow) -> SharedScheduleDetail {
        SharedScheduleDetail {
            schedule: row.schedule.clone(),
            services: named(&self.services, &row.service_ids),
            locations: named(&self.locations, &row.location_ids),
            companies: named(&self.companies, &row.company_ids),
            slots: row.slots.clone(),
        }
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list_services(&self) -> Result<Vec<SelectOption>> {
        Ok(active_sorted(&self.data().services))
    }

    async fn list_locations(&self) -> Result<Vec<SelectOption>> {
        Ok(active_sorted(&self.data().locations))
    }

    async fn list_companies(&self) -> Result<Vec<SelectOption>> {
        Ok(active_sorted(&self.data().companies))
    }

    async fn find_conflict(&self, professional_id: Uuid, slot: Slot) -> Result<Option<ConflictRecord>> {
        let data = self.data();
        let conflict = data
            .appointments
            .iter()
            .find(|a| a.professional_id == professional_id && a.scheduled_at == slot && a.status.occupies_slot())
            .map(|a| ConflictRecord {
                appointment_id: a.id,
                scheduled_at: a.scheduled_at,
                patient_name: a.patient_name.clone(),
                service_name: a.service_id.and_then(|id| {
                    data.services
                        .iter()
                        .find(|row| row.option.id == id)
                        .map(|row| row.option.name.clone())
                }),
            });
        Ok(conflict)
    }

    async fn is_token_available(&self, token: &str) -> Result<bool> {
        Ok(!self.data().schedules.values().any(|row| row.schedule.token == token))
    }

    async fn create_shared_schedule(
        &self,
        created_by: Uuid,
        request: &CreateSharedScheduleRequest,
    ) -> Result<SharedSchedule> {
        let mut data = self.data();
        if data.schedules.values().any(|row| row.schedule.token == request.token) {
            return Err(TokenInUse(request.token.clone()).into());
        }
        if request.end_date < request.start_date {
            return Err(eyre!("End date is before start date"));
        }

        let now = Utc::now();
        let schedule = SharedSchedule {
            id: Uuid::new_v4(),
            token: request.token.clone(),
            title: request.title.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            created_by,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let mut slots: Vec<Slot> = request.slots.clone();
        slots.sort();
        slots.dedup();

        data.schedules.insert(
            schedule.id,
            ScheduleRow {
                schedule: schedule.clone(),
                service_ids: dedup(&request.service_ids),
                location_ids: dedup(&request.location_ids),
                company_ids: dedup(&request.company_ids),
                slots: slots.into_iter().map(new_slot).collect(),
            },
        );
        Ok(schedule)
    }

    async fn update_shared_schedule(
        &self,
        id: Uuid,
        changes: &UpdateSharedScheduleRequest,
    ) -> Result<SharedSchedule> {
        let mut data = self.data();
        let row = data
            .schedules
            .get_mut(&id)
            .ok_or_else(|| eyre!("Shared schedule not found"))?;

        if let Some(title) = &changes.title {
            row.schedule.title = title.trim().to_string();
        }
        if let Some(start_date) = changes.start_date {
            row.schedule.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            row.schedule.end_date = end_date;
        }
        if let Some(is_active) = changes.is_active {
            row.schedule.is_active = is_active;
        }
        if let Some(ids) = &changes.service_ids {
            row.service_ids = dedup(ids);
        }
        if let Some(ids) = &changes.location_ids {
            row.location_ids = dedup(ids);
        }
        if let Some(ids) = &changes.company_ids {
            row.company_ids = dedup(ids);
        }
        row.schedule.updated_at = Utc::now();

        Ok(row.schedule.clone())
    }

    async fn add_slots(&self, schedule_id: Uuid, slots: &[Slot]) -> Result<Vec<SharedScheduleSlot>> {
        let mut data = self.data();
        let row = data
            .schedules
            .get_mut(&schedule_id)
            .ok_or_else(|| eyre!("Shared schedule not found"))?;

        let mut added = Vec::new();
        for slot in slots {
            if row.slots.iter().any(|s| s.slot == *slot) {
                continue;
            }
            let inserted = new_slot(*slot);
            row.slots.push(inserted.clone());
            added.push(inserted);
        }
        row.slots.sort_by_key(|s| s.slot);
        Ok(added)
    }

    async fn remove_slots(&self, schedule_id: Uuid, slot_ids: &[Uuid]) -> Result<u64> {
        let mut data = self.data();
        let Some(row) = data.schedules.get_mut(&schedule_id) else {
            return Ok(0);
        };

        let before = row.slots.len();
        row.slots.retain(|s| s.is_selected || !slot_ids.contains(&s.id));
        Ok((before - row.slots.len()) as u64)
    }

    async fn list_shared_schedules(
        &self,
        professional_id: Uuid,
        status: StatusFilter,
    ) -> Result<Vec<SharedScheduleSummary>> {
        let data = self.data();
        let mut summaries: Vec<SharedScheduleSummary> = data
            .schedules
            .values()
            .filter(|row| row.schedule.created_by == professional_id)
            .filter(|row| status.is_active().is_none_or(|active| row.schedule.is_active == active))
            .map(|row| SharedScheduleSummary {
                schedule: row.schedule.clone(),
                slot_count: row.slots.len() as i64,
                selected_count: row.slots.iter().filter(|s| s.is_selected).count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| b.schedule.created_at.cmp(&a.schedule.created_at));
        Ok(summaries)
    }

    async fn get_shared_schedule(&self, id: Uuid) -> Result<Option<SharedScheduleDetail>> {
        let data = self.data();
        Ok(data.schedules.get(&id).map(|row| data.detail(row)))
    }

    async fn get_shared_schedule_by_token(&self, token: &str) -> Result<Option<SharedScheduleDetail>> {
        let data = self.data();
        Ok(data
            .schedules
            .values()
            .find(|row| row.schedule.token == token)
            .map(|row| data.detail(row)))
    }

    async fn select_slot(
        &self,
        token: &str,
        slot_id: Uuid,
        selected_by: &str,
    ) -> Result<Option<SharedScheduleSlot>> {
        let mut data = self.data();
        let Some(row) = data.schedules.values_mut().find(|row| row.schedule.token == token) else {
            return Ok(None);
        };
        let Some(slot) = row.slots.iter_mut().find(|s| s.id == slot_id && !s.is_selected) else {
            return Ok(None);
        };

        slot.is_selected = true;
        slot.selected_by = Some(selected_by.to_string());
        slot.selected_at = Some(Utc::now());
        Ok(Some(slot.clone()))
    }
}
