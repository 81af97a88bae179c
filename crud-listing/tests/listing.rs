//! Listing pages driven through the router

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::VARY, Request, StatusCode},
    response::Response,
    Router,
};
use crud_listing::{
    config::Config, pagination::PageStrategy, repository::MemoryRepository, routes::router,
    state::AppState,
};
use tower::ServiceExt;

async fn app_with(count: u32) -> (Router, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    repo.seed("acme", count).await.unwrap();
    let state = AppState::with_repository(Config::default(), Arc::clone(&repo));
    (router(state), repo)
}

async fn get(app: Router, uri: &str, htmx_target: Option<&str>) -> Response {
    let mut request = Request::get(uri);
    if let Some(target) = htmx_target {
        request = request.header("HX-Request", "true").header("HX-Target", target);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn vary_values(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(VARY)
        .iter()
        .map(|v| v.to_str().unwrap().to_ascii_lowercase())
        .collect()
}

#[tokio::test]
async fn test_full_page_for_plain_request() {
    let (app, _) = app_with(10).await;
    let response = get(app, "/teams/acme/things/", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(vary_values(&response).contains(&"hx-request, hx-target".to_string()));

    let html = body_text(response).await;
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains(r#"<div id="object-list">"#));
    assert!(html.contains("Thing 001"));
    assert!(html.contains("Showing 1-4 of 10 things"));
}

#[tokio::test]
async fn test_fragment_for_htmx_request_targeting_list() {
    let (app, _) = app_with(10).await;
    let response = get(app, "/teams/acme/things/?page=2", Some("object-list")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(vary_values(&response).contains(&"hx-request, hx-target".to_string()));

    let html = body_text(response).await;
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(!html.contains("<form"));
    assert!(html.trim_start().starts_with(r#"<div id="object-list">"#));
    assert!(html.contains("Thing 005"));
}

#[tokio::test]
async fn test_swaps_replace_the_container() {
    let (app, _) = app_with(10).await;

    // The fragment carries its own container, so every swap aimed at it
    // must replace the element rather than fill it
    let html = body_text(get(app.clone(), "/teams/acme/things/", None).await).await;
    let targets = html.matches(r##"hx-target="#object-list""##).count();
    assert_eq!(targets, 2);
    assert_eq!(html.matches(r#"hx-swap="outerHTML""#).count(), targets);
    assert_eq!(html.matches(r#"id="object-list""#).count(), 1);

    let fragment = body_text(get(app, "/teams/acme/things/?page=2", Some("object-list")).await).await;
    assert_eq!(fragment.matches(r#"id="object-list""#).count(), 1);
    assert_eq!(
        fragment.matches(r##"hx-target="#object-list""##).count(),
        fragment.matches(r#"hx-swap="outerHTML""#).count()
    );
}

#[tokio::test]
async fn test_strict_paging_rejects_page_past_end() {
    let repo = Arc::new(MemoryRepository::new());
    repo.seed("acme", 10).await.unwrap();
    let mut config = Config::default();
    config.listing.strategy = PageStrategy::Strict;
    let app = router(AppState::with_repository(config, repo));

    let response = get(app.clone(), "/teams/acme/things/?page=5", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let html = body_text(get(app, "/teams/acme/things/?page=abc", None).await).await;
    assert!(html.contains("Showing 1-4 of 10 things"));
}

#[tokio::test]
async fn test_htmx_request_for_other_target_gets_full_page() {
    let (app, _) = app_with(3).await;
    let response = get(app, "/teams/acme/things/", Some("sidebar")).await;
    let html = body_text(response).await;
    assert!(html.contains("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_history_restore_gets_full_page() {
    let (app, _) = app_with(3).await;
    let request = Request::get("/teams/acme/things/")
        .header("HX-Request", "true")
        .header("HX-Target", "object-list")
        .header("HX-History-Restore-Request", "true")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(body_text(response).await.contains("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_bad_page_values_are_clamped() {
    let (app, _) = app_with(10).await;

    let html = body_text(get(app.clone(), "/teams/acme/things/?page=abc", None).await).await;
    assert!(html.contains("Showing 1-4 of 10 things"));

    let html = body_text(get(app.clone(), "/teams/acme/things/?page=5", None).await).await;
    assert!(html.contains("Showing 9-10 of 10 things"));

    let html = body_text(get(app.clone(), "/teams/acme/things/?page=2.5", None).await).await;
    assert!(html.contains("Showing 1-4 of 10 things"));

    let html = body_text(get(app, "/teams/acme/things/?page=last", None).await).await;
    assert!(html.contains("Showing 9-10 of 10 things"));
}

#[tokio::test]
async fn test_stale_page_after_filtering_is_clamped() {
    let (app, _) = app_with(20).await;
    let response = get(app, "/teams/acme/things/?page=3&name=thing%2001&number=3", Some("object-list")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Thing 013"));
    assert!(html.contains("Showing 1-1 of 1 thing"));
    assert!(html.contains("(filtered from 20)"));
}

#[tokio::test]
async fn test_page_links_keep_filters() {
    let (app, _) = app_with(20).await;
    let html = body_text(get(app, "/teams/acme/things/?name=thing&sort=-number", Some("object-list")).await).await;
    assert!(html.contains("name=thing&#38;sort=-number&#38;page=2") || html.contains("name=thing&amp;sort=-number&amp;page=2"));
}

#[tokio::test]
async fn test_other_team_sees_nothing() {
    let (app, _) = app_with(5).await;
    let html = body_text(get(app, "/teams/globex/things/", None).await).await;
    assert!(html.contains("No things found."));
    assert!(!html.contains("Thing 001"));
}

#[tokio::test]
async fn test_offline_store_is_503() {
    let (app, repo) = app_with(5).await;
    repo.set_available(false);

    let response = get(app, "/teams/acme/things/", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["code"], "RECORD_STORE_UNAVAILABLE");
}

#[tokio::test]
async fn test_listing_without_trailing_slash() {
    let (app, _) = app_with(2).await;
    let response = get(app, "/teams/acme/things", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with(0).await;
    let response = get(app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
}
