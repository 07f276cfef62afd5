use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use slotshare_core::{
    errors::TokenInUse,
    models::shared_schedule::{
        AddSlotsResponse, RemoveSlotResponse, SharedSchedule, SharedScheduleDetail, SharedScheduleSummary,
    },
    store::ScheduleStore,
};
use slotshare_db::mock::MockScheduleStore;
use uuid::Uuid;

use crate::test_utils::{BASE_URL, TestContext, date, professional_header, server_for, slot};

#[tokio::test]
async fn test_create_returns_schedule_and_link() {
    let ctx = TestContext::new();
    let (name, value) = ctx.header();

    let response = ctx
        .server
        .post("/api/shared-schedules")
        .add_header(name, value)
        .json(&ctx.create_body("abcdef123456"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["token"], "abcdef123456");
    assert_eq!(body["created_by"], json!(ctx.professional_id));
    assert_eq!(
        body["link"],
        format!("{}/shared-schedule/abcdef123456", BASE_URL).as_str()
    );

    let detail = ctx
        .store
        .get_shared_schedule_by_token("abcdef123456")
        .await
        .unwrap()
        .unwrap();
    let times: Vec<String> = detail.slots.iter().map(|s| s.slot.to_string()).collect();
    assert_eq!(times, vec!["2025-01-06T08:00:00", "2025-01-06T09:00:00"]);
}

#[tokio::test]
async fn test_create_requires_professional() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/shared-schedules")
        .json(&ctx.create_body("abcdef123456"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.store.schedule_count(), 0);
}

#[tokio::test]
async fn test_create_validates_payload() {
    let ctx = TestContext::new();

    for (field, bad) in [
        ("title", json!("  ")),
        ("end_date", json!("2025-01-01")),
        ("service_ids", json!([])),
        ("slots", json!([])),
        ("slots", json!(["2025-01-11T08:00:00"])),
        ("title", json!("W".repeat(256))),
        ("token", json!("NOT-A-TOKEN")),
    ] {
        let mut body = ctx.create_body("abcdef123456");
        body[field] = bad;
        let (name, value) = ctx.header();

        let response = ctx
            .server
            .post("/api/shared-schedules")
            .add_header(name, value)
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
    assert_eq!(ctx.store.schedule_count(), 0);
}

#[tokio::test]
async fn test_create_rejects_unknown_or_inactive_options() {
    let ctx = TestContext::new();
    let retired = ctx.store.add_company("Convênio Encerrado", false);

    for (field, bad) in [
        ("service_ids", json!([Uuid::new_v4()])),
        ("location_ids", json!([ctx.location_id, Uuid::new_v4()])),
        ("company_ids", json!([retired])),
    ] {
        let mut body = ctx.create_body("abcdef123456");
        body[field] = bad;
        let (name, value) = ctx.header();

        let response = ctx
            .server
            .post("/api/shared-schedules")
            .add_header(name, value)
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].as_str().unwrap().contains("is not available"));
    }
    assert_eq!(ctx.store.schedule_count(), 0);
}

#[tokio::test]
async fn test_duplicate_token_is_a_conflict() {
    let ctx = TestContext::new();
    ctx.create_schedule("abcdef123456").await;
    let (name, value) = ctx.header();

    let response = ctx
        .server
        .post("/api/shared-schedules")
        .add_header(name, value)
        .json(&ctx.create_body("abcdef123456"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(ctx.store.schedule_count(), 1);
}

#[tokio::test]
async fn test_token_race_in_store_is_a_conflict() {
    let ctx = TestContext::new();
    let options = ctx.store.as_ref();
    let (services, locations, companies) = (
        options.list_services().await.unwrap(),
        options.list_locations().await.unwrap(),
        options.list_companies().await.unwrap(),
    );

    let mut store = MockScheduleStore::new();
    store.expect_list_services().returning(move || Ok(services.clone()));
    store.expect_list_locations().returning(move || Ok(locations.clone()));
    store.expect_list_companies().returning(move || Ok(companies.clone()));
    store
        .expect_create_shared_schedule()
        .returning(|_, request| Err(TokenInUse(request.token.clone()).into()));
    let server = server_for(Arc::new(store));
    let (name, value) = professional_header(Uuid::new_v4());

    let response = server
        .post("/api/shared-schedules")
        .add_header(name, value)
        .json(&ctx.create_body("abcdef123456"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_filters_by_owner_and_status() {
    let ctx = TestContext::new();
    let first = ctx.create_schedule("aaaaaa111111").await;
    ctx.create_schedule("bbbbbb222222").await;
    ctx.store
        .update_shared_schedule(
            first.schedule.id,
            &slotshare_core::models::shared_schedule::UpdateSharedScheduleRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let (name, value) = ctx.header();

    let all = ctx
        .server
        .get("/api/shared-schedules")
        .add_header(name.clone(), value.clone())
        .await
        .json::<Vec<SharedScheduleSummary>>();
    assert_eq!(all.len(), 2);

    let inactive = ctx
        .server
        .get("/api/shared-schedules")
        .add_query_param("status", "inactive")
        .add_header(name, value)
        .await
        .json::<Vec<SharedScheduleSummary>>();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].schedule.token, "aaaaaa111111");
    assert_eq!(inactive[0].slot_count, 2);

    let (name, value) = professional_header(Uuid::new_v4());
    let stranger = ctx
        .server
        .get("/api/shared-schedules")
        .add_header(name, value)
        .await
        .json::<Vec<SharedScheduleSummary>>();
    assert!(stranger.is_empty());
}

#[tokio::test]
async fn test_detail_is_owner_only() {
    let ctx = TestContext::new();
    let created = ctx.create_schedule("abcdef123456").await;
    let path = format!("/api/shared-schedules/{}", created.schedule.id);

    let (name, value) = ctx.header();
    let detail = ctx
        .server
        .get(&path)
        .add_header(name, value)
        .await
        .json::<SharedScheduleDetail>();
    assert_eq!(detail.services[0].name, "Consulta");
    assert_eq!(detail.slots.len(), 2);

    let (name, value) = professional_header(Uuid::new_v4());
    ctx.server
        .get(&path)
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (name, value) = ctx.header();
    ctx.server
        .get(&format!("/api/shared-schedules/{}", Uuid::new_v4()))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_schedule() {
    let ctx = TestContext::new();
    let created = ctx.create_schedule("abcdef123456").await;
    let path = format!("/api/shared-schedules/{}", created.schedule.id);
    let (name, value) = ctx.header();

    let updated = ctx
        .server
        .put(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "title": "Week 2", "end_date": "2025-01-17" }))
        .await
        .json::<SharedSchedule>();
    assert_eq!(updated.title, "Week 2");
    assert_eq!(updated.end_date, date("2025-01-17"));

    let rejected = ctx
        .server
        .put(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "start_date": "2025-02-01" }))
        .await;
    rejected.assert_status(StatusCode::BAD_REQUEST);

    let unknown_service = ctx
        .server
        .put(&path)
        .add_header(name, value)
        .json(&json!({ "service_ids": [Uuid::new_v4()] }))
        .await;
    unknown_service.assert_status(StatusCode::BAD_REQUEST);

    let detail = ctx.store.get_shared_schedule(created.schedule.id).await.unwrap().unwrap();
    assert_eq!(detail.services.len(), 1);
}

#[tokio::test]
async fn test_add_and_remove_slots() {
    let ctx = TestContext::new();
    let created = ctx.create_schedule("abcdef123456").await;
    let slots_path = format!("/api/shared-schedules/{}/slots", created.schedule.id);
    let (name, value) = ctx.header();

    let added = ctx
        .server
        .post(&slots_path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "slots": ["2025-01-06T08:00:00", "2025-01-07T10:00:00"] }))
        .await
        .json::<AddSlotsResponse>();
    assert_eq!(added.added.len(), 1);
    assert_eq!(added.added[0].slot, slot("2025-01-07T10:00:00"));

    let only_existing = ctx
        .server
        .post(&slots_path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "slots": ["2025-01-06T08:00:00"] }))
        .await;
    only_existing.assert_status(StatusCode::BAD_REQUEST);

    let removed = ctx
        .server
        .delete(&format!("{}/{}", slots_path, added.added[0].id))
        .add_header(name.clone(), value.clone())
        .await
        .json::<RemoveSlotResponse>();
    assert_eq!(removed.removed, 1);

    ctx.server
        .delete(&format!("{}/{}", slots_path, Uuid::new_v4()))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_selected_slot_cannot_be_removed() {
    let ctx = TestContext::new();
    let created = ctx.create_schedule("abcdef123456").await;
    let detail = ctx
        .store
        .get_shared_schedule(created.schedule.id)
        .await
        .unwrap()
        .unwrap();
    let target = detail.slots[0].id;
    ctx.store
        .select_slot("abcdef123456", target, "Maria Silva")
        .await
        .unwrap();
    let (name, value) = ctx.header();

    let response = ctx
        .server
        .delete(&format!("/api/shared-schedules/{}/slots/{}", created.schedule.id, target))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let still_there = ctx
        .store
        .get_shared_schedule(created.schedule.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_there.slots.len(), 2);
}

#[tokio::test]
async fn test_edits_by_another_professional_are_forbidden() {
    let ctx = TestContext::new();
    let created = ctx.create_schedule("abcdef123456").await;
    let (name, value) = professional_header(Uuid::new_v4());

    ctx.server
        .post(&format!("/api/shared-schedules/{}/slots", created.schedule.id))
        .add_header(name, value)
        .json(&json!({ "slots": ["2025-01-08T08:00:00"] }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
