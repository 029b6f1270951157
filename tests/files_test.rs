//! Static files under `/files`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use parking_portal::config::PortalConfig;
use tower::ServiceExt;

async fn get(config: PortalConfig, path: &str) -> axum::response::Response {
    common::test_server(config)
        .router()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_files_served_from_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("reports")).unwrap();
    std::fs::write(dir.path().join("reports/occupancy.csv"), "bay,occupied\n1,true\n").unwrap();

    let mut config = PortalConfig::default();
    config.files.dir = Some(dir.path().to_string_lossy().into_owned());

    let response = get(config.clone(), "/files/reports/occupancy.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"bay,occupied\n1,true\n");

    let response = get(config, "/files/reports/missing.csv").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_files_not_mounted_without_dir() {
    // Falls through to navigation, which sends anonymous visitors to login.
    let response = get(PortalConfig::default(), "/files/reports/occupancy.csv").await;
    assert_eq!(response.status(), StatusCode::FOUND);
}
