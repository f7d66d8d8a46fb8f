// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yare::parameterized;

fn config(endpoint: &str) -> HttpUploaderConfig {
    HttpUploaderConfig {
        endpoint: endpoint.to_string(),
        auth_token: None,
        timeout: Duration::from_secs(5),
    }
}

#[parameterized(
    fnol = { OperationKind::UploadFnol, "fnol" },
    photo = { OperationKind::UploadPhoto, "photos" },
    lidar = { OperationKind::UploadLidarScan, "lidar-scans" },
    claim = { OperationKind::SyncClaim, "claims" },
)]
fn route_per_kind(kind: OperationKind, expected: &str) {
    assert_eq!(route(kind), expected);
}

#[parameterized(
    no_slash = { "http://example.test/v1" },
    slash = { "http://example.test/v1/" },
)]
fn url_for_appends_route(endpoint: &str) {
    let uploader = HttpUploader::new(&config(endpoint)).unwrap();
    assert_eq!(
        uploader.url_for(OperationKind::UploadPhoto).unwrap().as_str(),
        "http://example.test/v1/photos"
    );
}

#[parameterized(
    garbage = { "not a url" },
    ftp = { "ftp://example.test/v1" },
)]
fn new_rejects_bad_endpoint(endpoint: &str) {
    let result = HttpUploader::new(&config(endpoint));
    assert!(matches!(result, Err(UploadError::InvalidEndpoint { .. })));
}

#[tokio::test]
async fn upload_posts_bytes_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/photos"))
        .and(header("x-operation-kind", "upload_photo"))
        .and(header("content-type", "application/octet-stream"))
        .and(header("authorization", "Bearer secret"))
        .and(body_bytes(b"jpeg-bytes".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = config(&format!("{}/v1", server.uri()));
    cfg.auth_token = Some("secret".to_string());
    let uploader = HttpUploader::new(&cfg).unwrap();

    let payload = Payload::bytes("jpeg-bytes");
    uploader
        .upload(OperationKind::UploadPhoto, Some(&payload))
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_reads_file_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/lidar-scans"))
        .and(body_bytes(b"point-cloud".to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("scan.usdz");
    std::fs::write(&scan, "point-cloud").unwrap();

    let uploader = HttpUploader::new(&config(&format!("{}/v1", server.uri()))).unwrap();
    let payload = Payload::file(&scan);
    uploader
        .upload(OperationKind::UploadLidarScan, Some(&payload))
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_without_payload_sends_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/claims"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(&config(&format!("{}/v1", server.uri()))).unwrap();
    uploader.upload(OperationKind::SyncClaim, None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn upload_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(&config(&server.uri())).unwrap();
    let err = uploader
        .upload(OperationKind::UploadFnol, None)
        .await
        .unwrap_err();

    match err {
        UploadError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn upload_missing_file_is_payload_error() {
    let uploader = HttpUploader::new(&config("http://127.0.0.1:9/v1")).unwrap();
    let payload = Payload::file("/nonexistent/sidekick/photo.jpg");
    let err = uploader
        .upload(OperationKind::UploadPhoto, Some(&payload))
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Payload(_)));
}

#[tokio::test]
async fn upload_unreachable_host_is_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let uploader = HttpUploader::new(&config(&format!("http://{addr}/v1"))).unwrap();
    let err = uploader
        .upload(OperationKind::SyncClaim, None)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Request(_)));
}
