use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use slotshare_core::models::options::{ScheduleOptions, SelectOption};
use slotshare_db::mock::MockScheduleStore;

use crate::test_utils::{TestContext, server_for};

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let health = ctx.server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<serde_json::Value>()["status"], "ok");

    let version = ctx.server.get("/version").await;
    assert_eq!(
        version.json::<serde_json::Value>()["version"],
        env!("CARGO_PKG_VERSION")
    );
}

#[tokio::test]
async fn test_options_hide_inactive_and_sort_by_name() {
    let ctx = TestContext::new();
    ctx.store.add_service("Avaliação", true);
    ctx.store.add_service("Retorno antigo", false);

    let response = ctx.server.get("/api/options/services").await;

    response.assert_status_ok();
    let names: Vec<String> = response
        .json::<Vec<SelectOption>>()
        .into_iter()
        .map(|o| o.name)
        .collect();
    assert_eq!(names, vec!["Avaliação", "Consulta"]);
}

#[tokio::test]
async fn test_all_options_at_once() {
    let ctx = TestContext::new();

    let options = ctx.server.get("/api/options").await.json::<ScheduleOptions>();

    assert_eq!(options.services.len(), 1);
    assert_eq!(options.locations[0].id, ctx.location_id);
    assert_eq!(options.companies[0].name, "Particular");
}

#[tokio::test]
async fn test_option_failure_is_a_server_error() {
    let mut store = MockScheduleStore::new();
    store
        .expect_list_locations()
        .returning(|| Err(eyre::eyre!("connection reset")));
    let server = server_for(Arc::new(store));

    let response = server.get("/api/options/locations").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let message = response.json::<serde_json::Value>()["error"].as_str().unwrap().to_string();
    assert!(message.contains("connection reset"));
}
