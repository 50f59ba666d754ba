mod common;

use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use chrono::Utc;
use practice_core::OfferRepository;
use practice_store::InMemoryOfferRepository;
use serde_json::json;
use tower::ServiceExt;

use common::{
    empty_request, empty_router, get_json, json_request, response_json, router_with,
    seeded_router, test_config,
};

fn flu_jab() -> serde_json::Value {
    json!({
        "title": "Flu Jab",
        "description": "Seasonal flu vaccine",
        "cta": "Book now",
        "priority": "high",
        "validUntil": "2026-12-31",
        "estimatedReach": 1200,
        "icon": "syringe",
        "audienceRules": [
            {
                "type": "demographic", "field": "age",
                "operator": "at_least", "value": 65, "label": "65+"
            }
        ]
    })
}

#[tokio::test]
async fn post_without_id_generates_id_and_defaults_to_draft() {
    let (app, _) = empty_router();

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/offers", &flu_jab()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    let offer = &body["offer"];
    assert!(offer["id"].as_str().unwrap().starts_with("offer-"));
    assert_eq!(offer["createdAt"], Utc::now().date_naive().format("%Y-%m-%d").to_string());
    assert_eq!(offer["status"], "draft");
    assert!(!offer["audienceRules"][0]["id"].as_str().unwrap().is_empty());

    let all = get_json(&app, "/api/offers?active=false").await;
    assert_eq!(all["offers"].as_array().unwrap().len(), 1);

    let active = get_json(&app, "/api/offers?active=true").await;
    assert_eq!(active["offers"], json!([]));
}

#[tokio::test]
async fn client_supplied_created_at_is_ignored() {
    let (app, repo) = empty_router();
    let mut body = flu_jab();
    body["createdAt"] = json!("2001-01-01");

    let response = app.oneshot(json_request(Method::POST, "/api/offers", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = repo.list_all().await.unwrap();
    assert_eq!(stored[0].created_at, Utc::now().date_naive());
}

#[tokio::test]
async fn duplicate_id_is_a_conflict() {
    let (app, repo) = seeded_router().await;
    let mut body = flu_jab();
    body["id"] = json!("offer-flu-jab");

    let response = app.oneshot(json_request(Method::POST, "/api/offers", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(response_json(response).await["error"].is_string());
    assert_eq!(repo.list_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let (app, repo) = empty_router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/offers")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response_json(response).await["error"].is_string());
    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_active_returns_only_active_offers_in_order() {
    let (app, _) = seeded_router().await;

    let body = get_json(&app, "/api/offers?active=true").await;
    let ids: Vec<&str> = body["offers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["offer-flu-jab", "offer-health-check", "offer-stop-smoking"]);
}

#[tokio::test]
async fn put_pauses_offer_and_leaves_other_fields() {
    let (app, repo) = seeded_router().await;
    let before = repo.get_by_id("offer-flu-jab").await.unwrap().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/offers",
            &json!({ "id": "offer-flu-jab", "status": "paused" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({ "success": true }));

    let body = get_json(&app, "/api/offers/offer-flu-jab").await;
    assert_eq!(body["offer"]["status"], "paused");
    assert_eq!(body["offer"]["title"], before.title);
    assert_eq!(body["offer"]["estimatedReach"], before.estimated_reach);
}

#[tokio::test]
async fn put_without_id_is_rejected() {
    let (app, repo) = seeded_router().await;
    let before = repo.list_all().await.unwrap();

    let response = app
        .oneshot(json_request(Method::PUT, "/api/offers", &json!({ "status": "paused" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "Offer ID is required");
    assert_eq!(repo.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn put_with_null_field_is_rejected() {
    let (app, repo) = seeded_router().await;
    let before = repo.list_all().await.unwrap();

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/offers",
            &json!({ "id": "offer-flu-jab", "title": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn put_with_duplicate_rule_ids_is_rejected() {
    let (app, repo) = seeded_router().await;
    let before = repo.list_all().await.unwrap();

    let body = json!({
        "id": "offer-flu-jab",
        "status": "paused",
        "audienceRules": [
            {
                "id": "r1", "type": "demographic", "field": "age",
                "operator": "at_least", "value": 65
            },
            {
                "id": "r1", "type": "clinical", "field": "condition",
                "operator": "equals", "value": "copd"
            }
        ]
    });
    let response = app.oneshot(json_request(Method::PUT, "/api/offers", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response_json(response).await["error"].is_string());
    assert_eq!(repo.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn put_with_blank_rule_field_is_rejected() {
    let (app, repo) = seeded_router().await;
    let before = repo.list_all().await.unwrap();

    let body = json!({
        "id": "offer-flu-jab",
        "audienceRules": [
            { "type": "demographic", "field": "", "operator": "equals", "value": "" },
            { "type": "demographic", "field": "age", "operator": "at_least", "value": 65 }
        ]
    });
    let response = app.oneshot(json_request(Method::PUT, "/api/offers", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn post_with_duplicate_rule_ids_is_rejected() {
    let (app, repo) = empty_router();
    let mut body = flu_jab();
    body["audienceRules"] = json!([
        { "id": "r1", "type": "demographic", "field": "age", "operator": "at_least", "value": 65 },
        {
            "id": "r1", "type": "behavioral", "field": "smoker",
            "operator": "equals", "value": "yes"
        }
    ]);

    let response = app.oneshot(json_request(Method::POST, "/api/offers", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn put_rules_without_ids_get_distinct_generated_ids() {
    let (app, repo) = seeded_router().await;

    let body = json!({
        "id": "offer-flu-jab",
        "audienceRules": [
            { "type": "demographic", "field": "age", "operator": "at_least", "value": 70 },
            { "type": "clinical", "field": "condition", "operator": "equals", "value": "copd" }
        ]
    });
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, "/api/offers", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = repo.get_by_id("offer-flu-jab").await.unwrap().unwrap();
    let ids: Vec<&str> = stored.audience_rules.iter().map(|r| r.id.as_str()).collect();
    assert!(ids.iter().all(|id| id.starts_with("rule-")));
    assert_ne!(ids[0], ids[1]);

    let body = get_json(&app, "/api/offers/offer-flu-jab").await;
    assert_eq!(body["offer"]["audienceRules"][0]["value"].to_string(), "70");
}

#[tokio::test]
async fn put_unknown_id_still_succeeds() {
    let (app, repo) = seeded_router().await;
    let before = repo.list_all().await.unwrap();

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/offers",
            &json!({ "id": "nope", "status": "active" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repo.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn delete_removes_offer_and_is_idempotent() {
    let (app, repo) = seeded_router().await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(empty_request(Method::DELETE, "/api/offers?id=offer-stop-smoking"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({ "success": true }));
    }

    assert!(repo.get_by_id("offer-stop-smoking").await.unwrap().is_none());
    let response = app
        .oneshot(empty_request(Method::GET, "/api/offers/offer-stop-smoking"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_without_id_is_rejected() {
    let (app, repo) = seeded_router().await;

    let response = app.oneshot(empty_request(Method::DELETE, "/api/offers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.list_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn writes_require_staff_role_when_enforced() {
    let mut config = test_config();
    config.auth.enforce_roles = true;
    let (app, repo) = router_with(InMemoryOfferRepository::new(), &config);

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/offers", &flu_jab()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let mut request = json_request(Method::POST, "/api/offers", &flu_jab());
    request.headers_mut().insert("x-practice-role", "receptionist".parse().unwrap());
    assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::FORBIDDEN);

    let mut request = json_request(Method::POST, "/api/offers", &flu_jab());
    request.headers_mut().insert("x-practice-role", "practice_manager".parse().unwrap());
    assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::OK);
    assert_eq!(repo.list_all().await.unwrap().len(), 1);

    let reads = app.oneshot(empty_request(Method::GET, "/api/offers")).await.unwrap();
    assert_eq!(reads.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_role_header_is_rejected() {
    let (app, _) = empty_router();
    let mut request = empty_request(Method::GET, "/api/offers");
    request.headers_mut().insert("x-practice-role", "janitor".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_header_only_applies_to_offer_routes() {
    let (app, _) = empty_router();

    let mut request = empty_request(Method::GET, "/healthz");
    request.headers_mut().insert("x-practice-role", "janitor".parse().unwrap());
    assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::OK);

    let mut request = json_request(
        Method::POST,
        "/api/patient/auth",
        &json!({ "dob": "1958-03-14", "postcode": "SW1A 1AA" }),
    );
    request.headers_mut().insert("x-practice-role", "janitor".parse().unwrap());
    assert_eq!(app.oneshot(request).await.unwrap().status(), StatusCode::OK);
}
