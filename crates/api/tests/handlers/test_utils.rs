use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{Value, json};
use slotshare_api::{ApiState, app, middleware::auth::PROFESSIONAL_ID_HEADER};
use slotshare_core::{memory::MemoryStore, models::shared_schedule::CreateSharedScheduleResponse, slot::Slot, store::ScheduleStore};
use uuid::Uuid;

pub const BASE_URL: &str = "https://clinic.example.com";

pub fn date(text: &str) -> NaiveDate {
    text.parse().unwrap()
}

pub fn slot(text: &str) -> Slot {
    text.parse().unwrap()
}

pub fn server_for(store: Arc<dyn ScheduleStore>) -> TestServer {
    TestServer::new(app(Arc::new(ApiState::new(store, BASE_URL)))).unwrap()
}

pub fn professional_header(id: Uuid) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(PROFESSIONAL_ID_HEADER),
        HeaderValue::from_str(&id.to_string()).unwrap(),
    )
}

/// A server over a memory store seeded with one option of each kind.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub server: TestServer,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub location_id: Uuid,
    pub company_id: Uuid,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let service_id = store.add_service("Consulta", true);
        let location_id = store.add_location("Unidade Centro", true);
        let company_id = store.add_company("Particular", true);
        let server = server_for(Arc::clone(&store) as Arc<dyn ScheduleStore>);

        Self {
            store,
            server,
            professional_id: Uuid::new_v4(),
            service_id,
            location_id,
            company_id,
        }
    }

    pub fn header(&self) -> (HeaderName, HeaderValue) {
        professional_header(self.professional_id)
    }

    pub fn create_body(&self, token: &str) -> Value {
        json!({
            "token": token,
            "title": "Week 1",
            "start_date": "2025-01-06",
            "end_date": "2025-01-10",
            "service_ids": [self.service_id],
            "location_ids": [self.location_id],
            "company_ids": [self.company_id],
            "slots": ["2025-01-06T09:00:00", "2025-01-06T08:00:00"],
        })
    }

    pub async fn create_schedule(&self, token: &str) -> CreateSharedScheduleResponse {
        let (name, value) = self.header();
        self.server
            .post("/api/shared-schedules")
            .add_header(name, value)
            .json(&self.create_body(token))
            .await
            .json::<CreateSharedScheduleResponse>()
    }
}
