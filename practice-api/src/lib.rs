use axum::{
    http::Method,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod middleware;
pub mod offers;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
            axum::http::HeaderName::from_static(middleware::ROLE_HEADER),
        ]);

    let patient_area = Router::new()
        .route("/api/patient/offers", get(offers::list_patient_offers))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::patient_auth_middleware,
        ));

    let staff_area = offers::routes()
        .route_layer(axum::middleware::from_fn(middleware::role_context_middleware));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(staff_area)
        .merge(auth::routes())
        .merge(patient_area)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
