mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn member_v2_create_list_and_rename() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/api/v2/members", Some(json!({"name": "kim"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = response_json(response).await["id"].as_i64().unwrap();

    let (status, body) = app.get_json("/api/v2/members").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"count": 1, "data": [{"name": "kim"}]}));

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v2/members/{id}"),
            Some(json!({"name": "new-kim"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({"id": id, "name": "new-kim"})
    );
}

#[tokio::test]
async fn member_v1_accepts_entity_shaped_body() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/members",
            Some(json!({
                "name": "lee",
                "address": {"city": "Seoul", "street": "1", "zipcode": "1111"}
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = app.get_json("/api/v1/members").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "lee");
    assert_eq!(body[0]["city"], "Seoul");
}

#[tokio::test]
async fn member_errors_map_to_status_codes() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/api/v2/members", Some(json!({"name": ""})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.request(Method::POST, "/api/v2/members", Some(json!({"name": "kim"})))
        .await;
    let response = app
        .request(Method::POST, "/api/v2/members", Some(json!({"name": "kim"})))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Conflict");
    assert!(body["request_id"].is_string());

    let response = app
        .request(
            Method::PUT,
            "/api/v2/members/404",
            Some(json!({"name": "ghost"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn simple_order_versions_share_one_shape() {
    let app = TestApp::seeded().await;

    let (_, v2) = app.get_json("/api/v2/simple-orders").await;
    for uri in ["/api/v3/simple-orders", "/api/v4/simple-orders"] {
        let (status, body) = app.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, v2, "{uri}");
    }
    assert_eq!(v2[0]["name"], "userA");
    assert_eq!(v2[0]["orderStatus"], "ORDER");
    assert_eq!(v2[0]["address"]["zipcode"], "1111");

    let (status, v1) = app.get_json("/api/v1/simple-orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v1[1]["member"]["name"], "userB");
    assert_eq!(v1[1]["delivery"]["status"], "READY");
}

#[tokio::test]
async fn order_versions_share_one_shape() {
    let app = TestApp::seeded().await;

    let (_, v2) = app.get_json("/api/v2/orders").await;
    for uri in [
        "/api/v3/orders",
        "/api/v3.1/orders",
        "/api/v4/orders",
        "/api/v5/orders",
        "/api/v6/orders",
    ] {
        let (status, body) = app.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, v2, "{uri}");
    }
    assert_eq!(v2.as_array().unwrap().len(), 2);
    assert_eq!(v2[1]["orderItems"][0]["itemName"], "SPRING1 BOOK");

    let (status, v1) = app.get_json("/api/v1/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v1[0]["order_items"][1]["item"]["name"], "JPA2 BOOK");
}

#[tokio::test]
async fn paged_orders_honour_query_parameters() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get_json("/api/v3.1/orders?offset=1&limit=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "userB");
}

#[tokio::test]
async fn out_of_range_paging_is_a_bad_request() {
    let app = TestApp::seeded().await;

    let response = app
        .request(
            Method::GET,
            "/api/v3.1/orders?offset=9223372036854775808",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::GET, "/api/v3.1/orders?limit=-1", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_limit_is_capped() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .get_json(&format!("/api/v3.1/orders?offset=0&limit={}", u32::MAX))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_reports_database_and_statement_count() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert!(body["statements_executed"].is_u64());
}

#[tokio::test]
async fn responses_echo_request_id() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/v2/members", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, body) = app.get_json("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v3.1/orders"].is_object());
}
