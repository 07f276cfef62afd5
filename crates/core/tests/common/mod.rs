#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
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

mock! {
    pub Store {}

    #[async_trait]
    impl ScheduleStore for Store {
        async fn list_services(&self) -> eyre::Result<Vec<SelectOption>>;
        async fn list_locations(&self) -> eyre::Result<Vec<SelectOption>>;
        async fn list_companies(&self) -> eyre::Result<Vec<SelectOption>>;
        async fn find_conflict(&self, professional_id: Uuid, slot: Slot) -> eyre::Result<Option<ConflictRecord>>;
        async fn is_token_available(&self, token: &str) -> eyre::Result<bool>;
        async fn create_shared_schedule(
            &self,
            created_by: Uuid,
            request: &CreateSharedScheduleRequest,
        ) -> eyre::Result<SharedSchedule>;
        async fn update_shared_schedule(
            &self,
            id: Uuid,
            changes: &UpdateSharedScheduleRequest,
        ) -> eyre::Result<SharedSchedule>;
        async fn add_slots(&self, schedule_id: Uuid, slots: &[Slot]) -> eyre::Result<Vec<SharedScheduleSlot>>;
        async fn remove_slots(&self, schedule_id: Uuid, slot_ids: &[Uuid]) -> eyre::Result<u64>;
        async fn list_shared_schedules(
            &self,
            professional_id: Uuid,
            status: StatusFilter,
        ) -> eyre::Result<Vec<SharedScheduleSummary>>;
        async fn get_shared_schedule(&self, id: Uuid) -> eyre::Result<Option<SharedScheduleDetail>>;
        async fn get_shared_schedule_by_token(&self, token: &str) -> eyre::Result<Option<SharedScheduleDetail>>;
        async fn select_slot(
            &self,
            token: &str,
            slot_id: Uuid,
            selected_by: &str,
        ) -> eyre::Result<Option<SharedScheduleSlot>>;
    }
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

pub fn slot(s: &str) -> Slot {
    s.parse().expect("valid slot")
}
