use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use practice_core::Role;
use practice_offer::{NewOffer, OfferPatch, TargetedOffer};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    middleware::{ensure_can_manage_offers, PatientClaims},
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListOffersQuery {
    pub active: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteOfferQuery {
    pub id: Option<String>,
}

/// PUT body: `{ "id": ..., <any patchable field>... }`
#[derive(Debug, Deserialize)]
pub struct UpdateOfferRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub patch: OfferPatch,
}

#[derive(Debug, Serialize)]
pub struct OffersResponse {
    pub offers: Vec<TargetedOffer>,
}

#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub offer: TargetedOffer,
}

#[derive(Debug, Serialize)]
pub struct OfferCreatedResponse {
    pub success: bool,
    pub offer: TargetedOffer,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn required_id(id: Option<String>) -> Result<String, AppError> {
    id.map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::ValidationError("Offer ID is required".to_string()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/offers",
            get(list_offers).post(create_offer).put(update_offer).delete(delete_offer),
        )
        .route("/api/offers/{id}", get(get_offer))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/offers?active=true
pub async fn list_offers(
    State(state): State<AppState>,
    Query(query): Query<ListOffersQuery>,
) -> Result<Json<OffersResponse>, AppError> {
    let active_only = query.active.as_deref() == Some("true");

    let offers = if active_only {
        state.offers.list_active().await?
    } else {
        state.offers.list_all().await?
    };

    Ok(Json(OffersResponse { offers }))
}

/// GET /api/offers/{id}
pub async fn get_offer(
    State(state): State<AppState>,
    Path(offer_id): Path<String>,
) -> Result<Json<OfferResponse>, AppError> {
    let offer = state
        .offers
        .get_by_id(&offer_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Offer {} not found", offer_id)))?;

    Ok(Json(OfferResponse { offer }))
}

/// POST /api/offers
pub async fn create_offer(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    payload: Result<Json<NewOffer>, JsonRejection>,
) -> Result<Json<OfferCreatedResponse>, AppError> {
    ensure_can_manage_offers(&state, role)?;
    let Json(new_offer) = payload?;

    let offer = state.offers.insert(new_offer).await?;
    tracing::info!(offer_id = %offer.id, %role, "Offer created");

    Ok(Json(OfferCreatedResponse { success: true, offer }))
}

/// PUT /api/offers
///
/// Updating an unknown id still reports success.
pub async fn update_offer(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    payload: Result<Json<UpdateOfferRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    ensure_can_manage_offers(&state, role)?;
    let Json(req) = payload?;
    let offer_id = required_id(req.id)?;

    let matched = state.offers.update(&offer_id, req.patch).await?;
    tracing::info!(%offer_id, matched, %role, "Offer update");

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/offers?id=...
pub async fn delete_offer(
    State(state): State<AppState>,
    Extension(role): Extension<Role>,
    Query(query): Query<DeleteOfferQuery>,
) -> Result<Json<SuccessResponse>, AppError> {
    ensure_can_manage_offers(&state, role)?;
    let offer_id = required_id(query.id)?;

    let removed = state.offers.delete(&offer_id).await?;
    tracing::info!(%offer_id, removed, %role, "Offer delete");

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/patient/offers
/// Active offers whose audience rules match the signed-in patient
pub async fn list_patient_offers(
    State(state): State<AppState>,
    Extension(claims): Extension<PatientClaims>,
) -> Result<Json<OffersResponse>, AppError> {
    let patient = state
        .patients
        .get_patient(&claims.sub)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("Unknown patient".to_string()))?;

    let offers = state
        .offers
        .list_active()
        .await?
        .into_iter()
        .filter(|offer| offer.targets(&patient.profile))
        .collect();

    Ok(Json(OffersResponse { offers }))
}
