//! # SlotShare Client
//!
//! [`HttpScheduleStore`] implements [`ScheduleStore`] over the SlotShare HTTP
//! API, so the wizard and editor from `slotshare-core` can run against a
//! remote server exactly as they do in-process.

pub mod config;

use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use slotshare_core::{
    editor::NOTHING_NEW_TO_ADD,
    errors::{ScheduleResult, TokenInUse},
    models::{
        PROFESSIONAL_ID_HEADER,
        appointment::{ConflictRecord, ConflictResponse},
        options::SelectOption,
        shared_schedule::{
            AddSlotsRequest, AddSlotsResponse, CreateSharedScheduleRequest, CreateSharedScheduleResponse,
            RemoveSlotResponse, SharedSchedule, SharedScheduleDetail, SharedScheduleSlot, SharedScheduleSummary,
            SelectSlotRequest, StatusFilter, TokenAvailabilityResponse, UpdateSharedScheduleRequest,
        },
    },
    session::WizardSession,
    slot::Slot,
    store::ScheduleStore,
};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ClientConfig;

/// A non-success response from the server. Travels inside `eyre` reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{action} failed with status {status}: {message}")]
pub struct ApiError {
    pub action: &'static str,
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn api_error(response: Response, action: &'static str) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => text,
    };
    ApiError {
        action,
        status,
        message,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, action: &'static str) -> Result<T> {
    if !response.status().is_success() {
        return Err(api_error(response, action).await.into());
    }
    Ok(response.json::<T>().await?)
}

/// Like [`read_json`], but the listed statuses mean "nothing there".
async fn read_optional<T: DeserializeOwned>(
    response: Response,
    action: &'static str,
    absent: &[StatusCode],
) -> Result<Option<T>> {
    if absent.contains(&response.status()) {
        tracing::debug!("{} answered {}", action, response.status());
        return Ok(None);
    }
    read_json(response, action).await.map(Some)
}

#[derive(Debug, Clone)]
pub struct HttpScheduleStore {
    client: Client,
    api_url: String,
    professional_id: Uuid,
}

impl HttpScheduleStore {
    pub fn new(api_url: impl Into<String>, professional_id: Uuid) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            professional_id,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone(), config.professional_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn as_professional(&self, builder: RequestBuilder, professional_id: Uuid) -> RequestBuilder {
        builder.header(PROFESSIONAL_ID_HEADER, professional_id.to_string())
    }

    fn operator(&self, builder: RequestBuilder) -> RequestBuilder {
        self.as_professional(builder, self.professional_id)
    }

    async fn get_options(&self, kind: &str) -> Result<Vec<SelectOption>> {
        let response = self
            .client
            .get(self.url(&format!("/api/options/{}", kind)))
            .send()
            .await?;
        read_json(response, "Loading options").await
    }
}

/// Opens a creation wizard that talks to the configured server.
pub async fn open_session(config: &ClientConfig) -> ScheduleResult<WizardSession> {
    let store: Arc<dyn ScheduleStore> = Arc::new(HttpScheduleStore::from_config(config));
    WizardSession::open(store, config.session_config()).await
}

#[async_trait]
impl ScheduleStore for HttpScheduleStore {
    async fn list_services(&self) -> Result<Vec<SelectOption>> {
        self.get_options("services").await
    }

    async fn list_locations(&self) -> Result<Vec<SelectOption>> {
        self.get_options("locations").await
    }

    async fn list_companies(&self) -> Result<Vec<SelectOption>> {
        self.get_options("companies").await
    }

    async fn find_conflict(&self, professional_id: Uuid, slot: Slot) -> Result<Option<ConflictRecord>> {
        let request = self
            .client
            .get(self.url("/api/conflicts"))
            .query(&[("slot", slot.to_string())]);
        let response = self.as_professional(request, professional_id).send().await?;
        let body: ConflictResponse = read_json(response, "Conflict check").await?;
        Ok(body.conflict)
    }

    async fn is_token_available(&self, token: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.url(&format!("/api/tokens/{}/availability", token)))
            .send()
            .await?;
        let body: TokenAvailabilityResponse = read_json(response, "Token check").await?;
        Ok(body.available)
    }

    async fn create_shared_schedule(
        &self,
        created_by: Uuid,
        request: &CreateSharedScheduleRequest,
    ) -> Result<SharedSchedule> {
        let builder = self.client.post(self.url("/api/shared-schedules")).json(request);
        let response = self.as_professional(builder, created_by).send().await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(TokenInUse(request.token.clone()).into());
        }
        let body: CreateSharedScheduleResponse = read_json(response, "Creating shared schedule").await?;
        tracing::debug!("Server issued link {}", body.link);
        Ok(body.schedule)
    }

    async fn update_shared_schedule(
        &self,
        id: Uuid,
        changes: &UpdateSharedScheduleRequest,
    ) -> Result<SharedSchedule> {
        let builder = self
            .client
            .put(self.url(&format!("/api/shared-schedules/{}", id)))
            .json(changes);
        let response = self.operator(builder).send().await?;
        read_json(response, "Updating shared schedule").await
    }

    async fn add_slots(&self, schedule_id: Uuid, slots: &[Slot]) -> Result<Vec<SharedScheduleSlot>> {
        let builder = self
            .client
            .post(self.url(&format!("/api/shared-schedules/{}/slots", schedule_id)))
            .json(&AddSlotsRequest {
                slots: slots.to_vec(),
            });
        let response = self.operator(builder).send().await?;

        // The server refuses a batch with nothing new in it; the store
        // contract reports that as an empty insert.
        if response.status() == StatusCode::BAD_REQUEST {
            let error = api_error(response, "Adding slots").await;
            if error.message.contains(NOTHING_NEW_TO_ADD) {
                tracing::debug!("{}", error);
                return Ok(Vec::new());
            }
            return Err(error.into());
        }
        let body: AddSlotsResponse = read_json(response, "Adding slots").await?;
        Ok(body.added)
    }

    /// Removes slots one request at a time. Slots the server refuses to
    /// remove because they are missing or already selected are not counted.
    async fn remove_slots(&self, schedule_id: Uuid, slot_ids: &[Uuid]) -> Result<u64> {
        let mut removed = 0;
        for slot_id in slot_ids {
            let builder = self.client.delete(self.url(&format!(
                "/api/shared-schedules/{}/slots/{}",
                schedule_id, slot_id
            )));
            let response = self.operator(builder).send().await?;
            let body: Option<RemoveSlotResponse> = read_optional(
                response,
                "Removing slot",
                &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST, StatusCode::CONFLICT],
            )
            .await?;
            removed += body.map_or(0, |b| b.removed);
        }
        Ok(removed)
    }

    async fn list_shared_schedules(
        &self,
        professional_id: Uuid,
        status: StatusFilter,
    ) -> Result<Vec<SharedScheduleSummary>> {
        let builder = self
            .client
            .get(self.url("/api/shared-schedules"))
            .query(&[("status", status.as_str())]);
        let response = self.as_professional(builder, professional_id).send().await?;
        read_json(response, "Listing shared schedules").await
    }

    async fn get_shared_schedule(&self, id: Uuid) -> Result<Option<SharedScheduleDetail>> {
        let builder = self.client.get(self.url(&format!("/api/shared-schedules/{}", id)));
        let response = self.operator(builder).send().await?;
        read_optional(response, "Loading shared schedule", &[StatusCode::NOT_FOUND]).await
    }

    /// Goes through the public endpoint, so inactive schedules read as
    /// missing and patient names are not included.
    async fn get_shared_schedule_by_token(&self, token: &str) -> Result<Option<SharedScheduleDetail>> {
        let response = self
            .client
            .get(self.url(&format!("/api/public/shared-schedules/{}", token)))
            .send()
            .await?;
        read_optional(response, "Loading shared schedule", &[StatusCode::NOT_FOUND]).await
    }

    async fn select_slot(
        &self,
        token: &str,
        slot_id: Uuid,
        selected_by: &str,
    ) -> Result<Option<SharedScheduleSlot>> {
        let response = self
            .client
            .post(self.url(&format!(
                "/api/public/shared-schedules/{}/slots/{}/select",
                token, slot_id
            )))
            .json(&SelectSlotRequest {
                selected_by: selected_by.to_string(),
            })
            .send()
            .await?;
        read_optional(
            response,
            "Selecting slot",
            &[StatusCode::NOT_FOUND, StatusCode::CONFLICT],
        )
        .await
    }
}
