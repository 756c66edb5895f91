use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::checklist::domain::AgentStatus;
use crate::workflows::checklist::router::{checklist_handler, update_item_handler};
use crate::workflows::checklist::{checklist_router, ChecklistConfig, ChecklistService};

const CHECKLIST_PATH: &str = "/api/v1/applications/wfa-2024-0815/checklist";

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn checklist_route_returns_generated_items() {
    let (service, _, _) = build_service(with_rent_income(new_build_snapshot()));
    let router = checklist_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::get(CHECKLIST_PATH)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "in_review");
    let items = payload["checklistItems"].as_array().expect("items array");
    let tax = items
        .iter()
        .find(|item| item["id"] == "einkommenssteuerbescheid_main")
        .expect("tax item");
    assert_eq!(tax["systemStatus"], "wrong");
    assert_eq!(tax["agentStatus"], "undefined");
    assert_eq!(tax["linkedForms"], json!(["einkommenserklaerung", "selbstauskunft"]));
}

#[tokio::test]
async fn checklist_handler_returns_not_found_for_unknown_application() {
    let (service, _, _) = build_service(new_build_snapshot());

    let response = checklist_handler::<FixtureSource, FixtureCalculator, MemoryRepository>(
        State(Arc::new(service)),
        Path("unbekannt".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checklist_handler_returns_bad_gateway_when_core_record_is_down() {
    let (service, source, _) = build_service(new_build_snapshot());
    source.take_application_down();

    let response = checklist_handler::<FixtureSource, FixtureCalculator, MemoryRepository>(
        State(Arc::new(service)),
        Path(application_id().0),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("core records offline"));
}

#[tokio::test]
async fn regenerate_route_accepts_purge_request() {
    let (service, source, _) = build_service(with_rent_income(new_build_snapshot()));
    let service = Arc::new(service);
    service.open(&application_id()).await.expect("initial checklist");
    source.replace(&application_id(), new_build_snapshot());

    let retained = checklist_router(service.clone())
        .oneshot(
            axum::http::Request::post(format!("{CHECKLIST_PATH}/regenerate"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(retained.status(), StatusCode::OK);
    let payload = read_json_body(retained).await;
    assert!(payload["checklistItems"]
        .as_array()
        .expect("items")
        .iter()
        .any(|item| item["id"] == "einkommenssteuerbescheid_main"));

    let purged = checklist_router(service)
        .oneshot(json_request(
            "POST",
            &format!("{CHECKLIST_PATH}/regenerate"),
            json!({ "purge_orphans": true }),
        ))
        .await
        .unwrap();
    assert_eq!(purged.status(), StatusCode::OK);
    let payload = read_json_body(purged).await;
    assert!(!payload["checklistItems"]
        .as_array()
        .expect("items")
        .iter()
        .any(|item| item["id"] == "einkommenssteuerbescheid_main"));
}

#[tokio::test]
async fn update_route_stores_reviewer_verdict() {
    let (service, _, repository) = build_service(new_build_snapshot());
    let service = Arc::new(service);
    service.open(&application_id()).await.expect("initial checklist");

    let response = checklist_router(service)
        .oneshot(json_request(
            "PATCH",
            &format!("{CHECKLIST_PATH}/items/meldebescheinigung"),
            json!({
                "reviewer": "pruefer@bewilligungsstelle",
                "agentStatus": "correct",
                "agentNotes": "Meldebescheinigung liegt im Original vor"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["agentStatus"], "correct");
    assert_eq!(payload["statusSetBy"]["reviewer"], "pruefer@bewilligungsstelle");

    let stored = repository.stored(&application_id()).expect("stored");
    assert_eq!(
        stored
            .item("meldebescheinigung")
            .map(|item| item.agent_status),
        Some(AgentStatus::Correct)
    );
}

#[tokio::test]
async fn update_handler_rejects_blank_reviewer() {
    let (service, _, _) = build_service(new_build_snapshot());
    let service = Arc::new(service);
    service.open(&application_id()).await.expect("initial checklist");

    let mut update = reviewer(AgentStatus::Correct);
    update.reviewer = String::new();
    let response = update_item_handler::<FixtureSource, FixtureCalculator, MemoryRepository>(
        State(service),
        Path((application_id().0, "meldebescheinigung".to_string())),
        axum::Json(update),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_handler_returns_not_found_for_unknown_item() {
    let (service, _, _) = build_service(new_build_snapshot());
    let service = Arc::new(service);
    service.open(&application_id()).await.expect("initial checklist");

    let response = update_item_handler::<FixtureSource, FixtureCalculator, MemoryRepository>(
        State(service),
        Path((application_id().0, "gibt_es_nicht".to_string())),
        axum::Json(reviewer(AgentStatus::Wrong)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_handler_returns_service_unavailable_when_storage_is_down() {
    let service = Arc::new(ChecklistService::new(
        Arc::new(FixtureSource::with(&application_id(), new_build_snapshot())),
        Arc::new(FixtureCalculator::passing()),
        Arc::new(ReadOnlyRepository::default()),
        ChecklistConfig::default(),
    ));

    let response = update_item_handler::<FixtureSource, FixtureCalculator, ReadOnlyRepository>(
        State(service),
        Path((application_id().0, "meldebescheinigung".to_string())),
        axum::Json(reviewer(AgentStatus::Correct)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
