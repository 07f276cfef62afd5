use axum::{body::to_bytes, http::StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use slotshare_api::middleware::{
    auth::{PROFESSIONAL_ID_HEADER, ProfessionalId, ensure_owner},
    error_handling::{AppError, map_error},
};
use slotshare_core::{
    errors::{ScheduleError, TokenInUse},
    models::shared_schedule::SharedSchedule,
};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[rstest]
#[case(ScheduleError::NotFound("missing".to_string()), StatusCode::NOT_FOUND)]
#[case(ScheduleError::Validation("bad".to_string()), StatusCode::BAD_REQUEST)]
#[case(ScheduleError::Conflict("taken".to_string()), StatusCode::CONFLICT)]
#[case(ScheduleError::TokenExhausted { attempts: 3 }, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ScheduleError::Authentication("who".to_string()), StatusCode::UNAUTHORIZED)]
#[case(ScheduleError::Authorization("not yours".to_string()), StatusCode::FORBIDDEN)]
#[case(ScheduleError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: ScheduleError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(ScheduleError::Validation("Title is required".to_string()));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert!(body["error"].as_str().unwrap().contains("Title is required"));
}

#[test]
fn test_token_collision_report_becomes_conflict() {
    let report: eyre::Report = TokenInUse("abcdef123456".to_string()).into();

    let error = AppError::from(report);

    assert_eq!(error.status(), StatusCode::CONFLICT);
    assert!(matches!(error.0, ScheduleError::Conflict(_)));
}

#[test]
fn test_other_reports_become_database_errors() {
    let error = AppError::from(eyre::eyre!("connection refused"));

    assert!(matches!(error.0, ScheduleError::Database(_)));
}

#[test]
fn test_ensure_owner() {
    let owner = Uuid::new_v4();
    let now = chrono::Utc::now();
    let schedule = SharedSchedule {
        id: Uuid::new_v4(),
        token: "abcdef123456".to_string(),
        title: "Week 1".to_string(),
        start_date: "2025-01-06".parse().unwrap(),
        end_date: "2025-01-10".parse().unwrap(),
        created_by: owner,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    assert!(ensure_owner(&schedule, ProfessionalId(owner)).is_ok());
    assert!(matches!(
        ensure_owner(&schedule, ProfessionalId(Uuid::new_v4())),
        Err(ScheduleError::Authorization(_))
    ));
}

#[rstest]
#[case("not-a-uuid")]
#[case("")]
#[tokio::test]
async fn test_invalid_professional_header_is_unauthorized(#[case] header: &str) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/shared-schedules")
        .add_header(
            axum::http::HeaderName::from_static(PROFESSIONAL_ID_HEADER),
            axum::http::HeaderValue::from_str(header).unwrap(),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
