mod support;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use webmvc::app;
use webmvc::pipeline::boundary;

#[actix_web::test]
async fn test_integer_parameter() {
    let state = support::state();
    let app =
        test::init_service(App::new().configure(boundary::configure(app::dispatcher_data(&state))))
            .await;

    let req = test::TestRequest::get().uri("/hello-v2?data=10").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "ok");

    let req = test::TestRequest::get().uri("/hello-v2?data=qqq").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/hello-v2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_ip_port_parameter() {
    let state = support::state();
    let app =
        test::init_service(App::new().configure(boundary::configure(app::dispatcher_data(&state))))
            .await;

    let req = test::TestRequest::get()
        .uri("/ip-port?ipPort=127.0.0.1:8080")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ip"], "127.0.0.1");
    assert_eq!(body["port"], 8080);
    assert_eq!(body["ipPort"], "127.0.0.1:8080");

    let req = test::TestRequest::get()
        .uri("/ip-port?ipPort=127.0.0.1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_grouped_number() {
    let state = support::state();
    let app =
        test::init_service(App::new().configure(boundary::configure(app::dispatcher_data(&state))))
            .await;

    let req = test::TestRequest::get()
        .uri("/number-format?number=10%2C000")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["number"], 10000);
    assert_eq!(body["formatted"], "10,000");

    let req = test::TestRequest::get()
        .uri("/number-format?number=ten")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
