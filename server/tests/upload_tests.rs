mod support;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use std::fs;
use std::path::PathBuf;
use webmvc::app::{self, AppState};
use webmvc::pipeline::boundary;

const BOUNDARY: &str = "XyZwebmvcBoundary";

fn upload_state() -> (AppState, PathBuf) {
    let dir = std::env::temp_dir().join(format!("webmvc-upload-{}", uuid::Uuid::new_v4()));
    let mut config = support::config();
    config.upload.file_dir = dir.clone();
    (support::state_with(config), dir)
}

fn multipart_body() -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"itemName\"\r\n\
         \r\n\
         itemA\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"attachFile\"; filename=\"hello.txt\"\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         hello upload\r\n\
         --{b}--\r\n",
        b = BOUNDARY
    )
}

#[actix_web::test]
async fn test_upload_saves_file_parts() {
    let (state, dir) = upload_state();
    let app =
        test::init_service(App::new().configure(boundary::configure(app::dispatcher_data(&state))))
            .await;

    let req = test::TestRequest::post()
        .uri("/servlet/v2/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "upload-form");
    assert_eq!(body["model"]["itemName"], "itemA");

    let saved = body["model"]["savedFiles"].as_array().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["name"], "attachFile");
    assert_eq!(saved[0]["fileName"], "hello.txt");
    assert_eq!(saved[0]["size"], 12);

    assert_eq!(fs::read_to_string(dir.join("hello.txt")).unwrap(), "hello upload");
    // the text part has no file name and is only logged
    assert!(!dir.join("itemName").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[actix_web::test]
async fn test_upload_form_is_public() {
    let (state, _dir) = upload_state();
    let app =
        test::init_service(App::new().configure(boundary::configure(app::dispatcher_data(&state))))
            .await;

    let req = test::TestRequest::get().uri("/servlet/v2/upload").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "upload-form");
}

#[actix_web::test]
async fn test_upload_without_boundary_is_400() {
    let (state, dir) = upload_state();
    let app =
        test::init_service(App::new().configure(boundary::configure(app::dispatcher_data(&state))))
            .await;

    let req = test::TestRequest::post()
        .uri("/servlet/v2/upload")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .insert_header((header::ACCEPT, "application/json"))
        .set_payload("just text")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!dir.exists());
}

#[actix_web::test]
async fn test_upload_over_the_size_limit_is_413() {
    let (state, dir) = {
        let dir = std::env::temp_dir().join(format!("webmvc-upload-{}", uuid::Uuid::new_v4()));
        let mut config = support::config();
        config.upload.file_dir = dir.clone();
        config.upload.max_request_size = 64;
        (support::state_with(config), dir)
    };
    let app =
        test::init_service(App::new().configure(boundary::configure(app::dispatcher_data(&state))))
            .await;

    let req = test::TestRequest::post()
        .uri("/servlet/v2/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!dir.exists());
}
