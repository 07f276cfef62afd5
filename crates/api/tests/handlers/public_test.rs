use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotshare_core::{
    models::shared_schedule::{SharedScheduleDetail, SharedScheduleSlot, UpdateSharedScheduleRequest},
    store::ScheduleStore,
};
use uuid::Uuid;

use crate::test_utils::TestContext;

fn select_path(token: &str, slot_id: Uuid) -> String {
    format!("/api/public/shared-schedules/{}/slots/{}/select", token, slot_id)
}

#[tokio::test]
async fn test_public_view_needs_no_header_and_hides_names() {
    let ctx = TestContext::new();
    ctx.create_schedule("abcdef123456").await;
    let detail = ctx
        .store
        .get_shared_schedule_by_token("abcdef123456")
        .await
        .unwrap()
        .unwrap();
    ctx.store
        .select_slot("abcdef123456", detail.slots[0].id, "Maria Silva")
        .await
        .unwrap();

    let response = ctx.server.get("/api/public/shared-schedules/abcdef123456").await;

    response.assert_status_ok();
    let view = response.json::<SharedScheduleDetail>();
    assert_eq!(view.schedule.title, "Week 1");
    assert!(view.slots[0].is_selected);
    assert_eq!(view.slots[0].selected_by, None);
}

#[tokio::test]
async fn test_unknown_or_inactive_token_is_not_found() {
    let ctx = TestContext::new();
    let created = ctx.create_schedule("abcdef123456").await;

    ctx.server
        .get("/api/public/shared-schedules/zzzzzz999999")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.store
        .update_shared_schedule(
            created.schedule.id,
            &UpdateSharedScheduleRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    ctx.server
        .get("/api/public/shared-schedules/abcdef123456")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_first_patient_to_select_wins() {
    let ctx = TestContext::new();
    ctx.create_schedule("abcdef123456").await;
    let view = ctx
        .server
        .get("/api/public/shared-schedules/abcdef123456")
        .await
        .json::<SharedScheduleDetail>();
    let target = view.slots[1].id;

    let first = ctx
        .server
        .post(&select_path("abcdef123456", target))
        .json(&json!({ "selected_by": "  Maria Silva " }))
        .await;
    first.assert_status_ok();
    let picked = first.json::<SharedScheduleSlot>();
    assert!(picked.is_selected);
    assert_eq!(picked.selected_by.as_deref(), Some("Maria Silva"));

    let second = ctx
        .server
        .post(&select_path("abcdef123456", target))
        .json(&json!({ "selected_by": "João Pereira" }))
        .await;
    second.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_select_rejects_blank_name_and_unknown_slot() {
    let ctx = TestContext::new();
    ctx.create_schedule("abcdef123456").await;
    let view = ctx
        .server
        .get("/api/public/shared-schedules/abcdef123456")
        .await
        .json::<SharedScheduleDetail>();

    ctx.server
        .post(&select_path("abcdef123456", view.slots[0].id))
        .json(&json!({ "selected_by": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post(&select_path("abcdef123456", Uuid::new_v4()))
        .json(&json!({ "selected_by": "Maria Silva" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_select_rejects_overlong_name() {
    let ctx = TestContext::new();
    ctx.create_schedule("abcdef123456").await;
    let view = ctx
        .server
        .get("/api/public/shared-schedules/abcdef123456")
        .await
        .json::<SharedScheduleDetail>();

    ctx.server
        .post(&select_path("abcdef123456", view.slots[0].id))
        .json(&json!({ "selected_by": "M".repeat(256) }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let after = ctx
        .store
        .get_shared_schedule_by_token("abcdef123456")
        .await
        .unwrap()
        .unwrap();
    assert!(after.slots.iter().all(|s| !s.is_selected));
}
