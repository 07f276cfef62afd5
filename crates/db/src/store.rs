use async_trait::async_trait;
use eyre::Result;
use slotshare_core::{
    models::{
        appointment::ConflictRecord,
        options::SelectOption,
        shared_schedule::{
            CreateSharedScheduleRequest, SharedSchedule, SharedScheduleDetail, SharedScheduleSlot,
            SharedScheduleSummary, StatusFilter, UpdateSharedScheduleRequest,
        },
    },
    slot::Slot,
    store::ScheduleStore,
};
use uuid::Uuid;

use crate::{
    DbPool,
    models::{DbOption, DbSharedSchedule, DbSharedScheduleSlot},
    repositories::{Association, appointment, options, shared_schedule, slot},
};

/// [`ScheduleStore`] over the PostgreSQL schema created by
/// [`initialize_database`](crate::schema::initialize_database).
#[derive(Debug, Clone)]
pub struct PgScheduleStore {
    pool: DbPool,
}

impl PgScheduleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn load_detail(&self, schedule: DbSharedSchedule) -> Result<SharedScheduleDetail> {
        let services =
            shared_schedule::get_associated_options(&self.pool, Association::Services, schedule.id).await?;
        let locations =
            shared_schedule::get_associated_options(&self.pool, Association::Locations, schedule.id).await?;
        let companies =
            shared_schedule::get_associated_options(&self.pool, Association::Companies, schedule.id).await?;
        let slots = shared_schedule::get_slots(&self.pool, schedule.id).await?;

        Ok(assemble_detail(schedule, services, locations, companies, slots))
    }
}

pub fn assemble_detail(
    schedule: DbSharedSchedule,
    services: Vec<DbOption>,
    locations: Vec<DbOption>,
    companies: Vec<DbOption>,
    slots: Vec<DbSharedScheduleSlot>,
) -> SharedScheduleDetail {
    let mut slots: Vec<SharedScheduleSlot> = slots.into_iter().map(Into::into).collect();
    slots.sort_by_key(|s| s.slot);

    SharedScheduleDetail {
        schedule: schedule.into(),
        services: services.into_iter().map(Into::into).collect(),
        locations: locations.into_iter().map(Into::into).collect(),
        companies: companies.into_iter().map(Into::into).collect(),
        slots,
    }
}

fn into_options(rows: Vec<DbOption>) -> Vec<SelectOption> {
    rows.into_iter().map(Into::into).collect()
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn list_services(&self) -> Result<Vec<SelectOption>> {
        Ok(into_options(options::list_active_services(&self.pool).await?))
    }

    async fn list_locations(&self) -> Result<Vec<SelectOption>> {
        Ok(into_options(options::list_active_locations(&self.pool).await?))
    }

    async fn list_companies(&self) -> Result<Vec<SelectOption>> {
        Ok(into_options(options::list_active_companies(&self.pool).await?))
    }

    async fn find_conflict(&self, professional_id: Uuid, slot: Slot) -> Result<Option<ConflictRecord>> {
        let conflict = appointment::find_conflict(&self.pool, professional_id, slot.as_naive()).await?;
        Ok(conflict.map(Into::into))
    }

    async fn is_token_available(&self, token: &str) -> Result<bool> {
        Ok(!shared_schedule::token_exists(&self.pool, token).await?)
    }

    async fn create_shared_schedule(
        &self,
        created_by: Uuid,
        request: &CreateSharedScheduleRequest,
    ) -> Result<SharedSchedule> {
        let schedule = shared_schedule::create_shared_schedule(&self.pool, created_by, request).await?;
        Ok(schedule.into())
    }

    async fn update_shared_schedule(
        &self,
        id: Uuid,
        changes: &UpdateSharedScheduleRequest,
    ) -> Result<SharedSchedule> {
        let schedule = shared_schedule::update_shared_schedule(&self.pool, id, changes).await?;
        Ok(schedule.into())
    }

    async fn add_slots(&self, schedule_id: Uuid, slots: &[Slot]) -> Result<Vec<SharedScheduleSlot>> {
        let slot_times: Vec<_> = slots.iter().map(Slot::as_naive).collect();
        let inserted = slot::add_slots(&self.pool, schedule_id, &slot_times).await?;
        Ok(inserted.into_iter().map(Into::into).collect())
    }

    async fn remove_slots(&self, schedule_id: Uuid, slot_ids: &[Uuid]) -> Result<u64> {
        slot::remove_slots(&self.pool, schedule_id, slot_ids).await
    }

    async fn list_shared_schedules(
        &self,
        professional_id: Uuid,
        status: StatusFilter,
    ) -> Result<Vec<SharedScheduleSummary>> {
        let rows = shared_schedule::list_shared_schedules(&self.pool, professional_id, status.is_active()).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_shared_schedule(&self, id: Uuid) -> Result<Option<SharedScheduleDetail>> {
        match shared_schedule::get_shared_schedule_by_id(&self.pool, id).await? {
            Some(schedule) => Ok(Some(self.load_detail(schedule).await?)),
            None => Ok(None),
        }
    }

    async fn get_shared_schedule_by_token(&self, token: &str) -> Result<Option<SharedScheduleDetail>> {
        match shared_schedule::get_shared_schedule_by_token(&self.pool, token).await? {
            Some(schedule) => Ok(Some(self.load_detail(schedule).await?)),
            None => Ok(None),
        }
    }

    async fn select_slot(
        &self,
        token: &str,
        slot_id: Uuid,
        selected_by: &str,
    ) -> Result<Option<SharedScheduleSlot>> {
        let Some(schedule) = shared_schedule::get_shared_schedule_by_token(&self.pool, token).await? else {
            return Ok(None);
        };

        let selected = slot::select_slot(&self.pool, schedule.id, slot_id, selected_by).await?;
        Ok(selected.map(Into::into))
    }
}
