use std::sync::Arc;

use axum::http::StatusCode;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use slotshare_core::models::{
    appointment::{AppointmentStatus, ConflictResponse},
    shared_schedule::TokenAvailabilityResponse,
};
use slotshare_db::mock::MockScheduleStore;
use uuid::Uuid;

use crate::test_utils::{TestContext, professional_header, server_for, slot};

#[tokio::test]
async fn test_conflict_reports_existing_appointment() {
    let ctx = TestContext::new();
    ctx.store.add_appointment(
        ctx.professional_id,
        slot("2025-01-06T08:00:00"),
        Some("Maria Silva"),
        Some(ctx.service_id),
        AppointmentStatus::Scheduled,
    );
    let (name, value) = ctx.header();

    let response = ctx
        .server
        .get("/api/conflicts")
        .add_query_param("slot", "2025-01-06T08:00:00")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body = response.json::<ConflictResponse>();
    assert_eq!(body.slot, slot("2025-01-06T08:00:00"));
    assert_eq!(body.conflict.unwrap().describe(), "Maria Silva (Consulta)");
}

#[tokio::test]
async fn test_conflicts_are_per_professional() {
    let ctx = TestContext::new();
    ctx.store.add_appointment(
        Uuid::new_v4(),
        slot("2025-01-06T08:00:00"),
        Some("Maria Silva"),
        None,
        AppointmentStatus::Confirmed,
    );
    let (name, value) = ctx.header();

    let body = ctx
        .server
        .get("/api/conflicts")
        .add_query_param("slot", "2025-01-06T08:00:00")
        .add_header(name, value)
        .await
        .json::<ConflictResponse>();

    assert!(body.conflict.is_none());
}

#[tokio::test]
async fn test_conflict_check_requires_professional() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/conflicts")
        .add_query_param("slot", "2025-01-06T08:00:00")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_conflict_check_rejects_malformed_slot() {
    let ctx = TestContext::new();
    let (name, value) = ctx.header();

    let response = ctx
        .server
        .get("/api/conflicts")
        .add_query_param("slot", "2025-01-06 8am")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conflict_check_queries_store_with_caller() {
    let professional_id = Uuid::new_v4();
    let mut store = MockScheduleStore::new();
    store
        .expect_find_conflict()
        .with(eq(professional_id), eq(slot("2025-01-07T14:30:00")))
        .times(1)
        .returning(|_, _| Ok(None));
    let server = server_for(Arc::new(store));
    let (name, value) = professional_header(professional_id);

    server
        .get("/api/conflicts")
        .add_query_param("slot", "2025-01-07T14:30:00")
        .add_header(name, value)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_token_availability() {
    let ctx = TestContext::new();
    ctx.create_schedule("abcdef123456").await;

    let taken = ctx
        .server
        .get("/api/tokens/abcdef123456/availability")
        .await
        .json::<TokenAvailabilityResponse>();
    assert!(!taken.available);

    let free = ctx
        .server
        .get("/api/tokens/zzzzzz999999/availability")
        .await
        .json::<TokenAvailabilityResponse>();
    assert!(free.available);
    assert_eq!(free.token, "zzzzzz999999");
}

#[tokio::test]
async fn test_malformed_token_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/tokens/ABC/availability").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
