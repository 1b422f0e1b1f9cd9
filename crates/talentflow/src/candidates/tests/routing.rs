use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::candidates::candidate_router;

fn stage_request(candidate_id: &str, stage: &str) -> Request<Body> {
    Request::patch(format!("/api/v1/candidates/{candidate_id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({ "stage": stage })).expect("serialize"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn list_route_wraps_candidates() {
    let (service, _) = build_service();
    let router = candidate_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/candidates?search=hopper")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["candidates"][0]["name"], json!("Grace Hopper"));
    assert_eq!(payload["candidates"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn board_route_returns_all_columns() {
    let (service, _) = build_service();
    let router = candidate_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/candidates/board")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    let columns = payload["columns"].as_array().expect("columns");
    assert_eq!(columns.len(), 6);
    assert_eq!(columns[0]["stage"], json!("applied"));
    assert_eq!(columns[5]["stage"], json!("rejected"));
}

#[tokio::test]
async fn stage_route_updates_and_rejects_bogus_stage() {
    let (service, _) = build_service();
    let router = candidate_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(stage_request("c1", "offer"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["stage"], json!("offer"));

    let response = router
        .oneshot(stage_request("c1", "bogus"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn profile_route_returns_not_found_for_missing_candidate() {
    let (service, _) = build_service();
    let router = candidate_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/candidates/ghost")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_route_flattens_candidate_with_job_title() {
    let (service, _) = build_service();
    let router = candidate_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/candidates/c2")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], json!("c2"));
    assert_eq!(payload["job_title"], json!("Compiler Engineer"));
}

#[tokio::test]
async fn timeline_route_lists_events() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    service
        .move_stage(&"c3".into(), "screen")
        .expect("move succeeds");
    let router = candidate_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/candidates/c3/timeline")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload[0]["event"], json!("Moved to stage: Screen"));
}
