#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use practice_api::{app, AppState};
use practice_core::{CoreError, CoreResult, OfferRepository};
use practice_offer::{NewOffer, OfferPatch, TargetedOffer};
use practice_store::{
    app_config::Config, seed, InMemoryOfferRepository, InMemoryPatientDirectory,
};
use serde_json::Value;
use tower::ServiceExt;

pub const BACKEND_DETAIL: &str = "db detail: connection refused";

/// Offer store whose every call fails the way an unreachable backend would
pub struct FailingOfferRepository;

fn backend_down<T>() -> CoreResult<T> {
    Err(CoreError::Internal(BACKEND_DETAIL.to_string()))
}

#[async_trait]
impl OfferRepository for FailingOfferRepository {
    async fn list_active(&self) -> CoreResult<Vec<TargetedOffer>> {
        backend_down()
    }

    async fn list_all(&self) -> CoreResult<Vec<TargetedOffer>> {
        backend_down()
    }

    async fn insert(&self, _offer: NewOffer) -> CoreResult<TargetedOffer> {
        backend_down()
    }

    async fn update(&self, _id: &str, _patch: OfferPatch) -> CoreResult<bool> {
        backend_down()
    }

    async fn delete(&self, _id: &str) -> CoreResult<usize> {
        backend_down()
    }

    async fn get_by_id(&self, _id: &str) -> CoreResult<Option<TargetedOffer>> {
        backend_down()
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.patient_auth.min_delay_ms = 0;
    config.patient_auth.max_delay_ms = 0;
    config.patient_auth.busy_rate = 0.0;
    config
}

pub fn router_with(
    offers: InMemoryOfferRepository,
    config: &Config,
) -> (Router, Arc<InMemoryOfferRepository>) {
    let offers = Arc::new(offers);
    let state = AppState::new(offers.clone(), Arc::new(InMemoryPatientDirectory::demo()), config);
    (app(state), offers)
}

pub fn failing_router() -> Router {
    let state = AppState::new(
        Arc::new(FailingOfferRepository),
        Arc::new(InMemoryPatientDirectory::demo()),
        &test_config(),
    );
    app(state)
}

pub fn empty_router() -> (Router, Arc<InMemoryOfferRepository>) {
    router_with(InMemoryOfferRepository::new(), &test_config())
}

pub async fn seeded_router() -> (Router, Arc<InMemoryOfferRepository>) {
    let repo = InMemoryOfferRepository::with_seed(seed::demo_offers())
        .await
        .expect("seed offers should load");
    router_with(repo, &test_config())
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub async fn response_json(response: Response) -> Value {
    let collected = response.into_body().collect().await.expect("body should collect");
    serde_json::from_slice(&collected.to_bytes()).expect("body should be json")
}

pub async fn get_json(app: &Router, uri: &str) -> Value {
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, uri))
        .await
        .expect("request should complete");
    response_json(response).await
}
