//! End-to-end tests: fixture route trees served through a real axum router.

use autoroutes::{
    register, AutorouteOptions, Method, ModuleExport, Resource, StaticModules,
};
use autoroutes_axum::{handler, AxumHost, RouteHandler};
use axum::body::Body;
use axum::extract::Path;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::util::ServiceExt;

fn write_routes(root: &std::path::Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "").unwrap();
    }
}

fn fixture_modules() -> StaticModules<RouteHandler> {
    StaticModules::new()
        .with_module(
            "index.rs",
            ModuleExport::factory(|_| Resource::new().get(handler(|| async { "root" }))),
        )
        .with_module(
            "users/{userId}/index.rs",
            ModuleExport::factory(|_| {
                Resource::new()
                    .get(handler(|Path(user_id): Path<String>| async move { user_id }))
            }),
        )
        .with_module(
            "a/status.rs",
            ModuleExport::factory(|_| {
                Resource::new()
                    .get(handler(|| async { "ok" }))
                    .post(handler(|| async { "created" }))
            }),
        )
}

async fn build_app(prefix: &str) -> (Router, Vec<(Method, String)>) {
    let dir = tempfile::tempdir().unwrap();
    write_routes(
        dir.path(),
        &["index.rs", "users/{userId}/index.rs", "a/status.rs"],
    );

    let mut host = AxumHost::new();
    let options = AutorouteOptions::new()
        .with_dir(dir.path().to_string_lossy().into_owned())
        .with_prefix(prefix);
    register(&mut host, fixture_modules(), options).await.unwrap();

    let registered = host.registered().to_vec();
    (host.into_router(), registered)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn root_index_serves_the_bare_slash() {
    let (app, _) = build_app("").await;
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "root");
}

#[tokio::test]
async fn parameter_segments_extract_through_axum() {
    let (app, _) = build_app("").await;
    let (status, body) = get(&app, "/users/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "42");
}

#[tokio::test]
async fn prefixed_routes_serve_under_the_prefix() {
    let (app, _) = build_app("/api").await;

    let (status, body) = get(&app, "/api/a/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    // The bare root stays unprefixed.
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "root");

    let (status, _) = get(&app, "/a/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let (app, _) = build_app("").await;
    let (status, _) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn one_file_can_bind_several_methods() {
    let (app, _) = build_app("").await;

    let (status, body) = get(&app, "/a/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/a/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/a/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn the_host_records_every_registration() {
    let (_, registered) = build_app("").await;
    assert_eq!(
        registered,
        vec![
            (Method::Get, "/".to_string()),
            (Method::Get, "/a/status".to_string()),
            (Method::Post, "/a/status".to_string()),
            (Method::Get, "/users/:userId".to_string()),
        ]
    );
}
