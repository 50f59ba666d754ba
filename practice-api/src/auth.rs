use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use practice_core::PatientSummary;
use practice_shared::Masked;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, middleware::auth::issue_patient_token, state::AppState};

#[derive(Debug, Deserialize)]
pub struct PatientAuthRequest {
    #[serde(default)]
    pub dob: Option<Masked<String>>,
    #[serde(default)]
    pub postcode: Option<Masked<String>>,
}

#[derive(Debug, Serialize)]
pub struct PatientAuthResponse {
    pub success: bool,
    pub token: String,
    pub patient: PatientSummary,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/patient/auth", post(login_patient))
}

fn non_blank(value: Option<Masked<String>>) -> Option<String> {
    value
        .map(Masked::into_inner)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/patient/auth
/// Demo sign-in by date of birth and postcode, with simulated latency and load.
async fn login_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientAuthRequest>, JsonRejection>,
) -> Result<Json<PatientAuthResponse>, AppError> {
    let Json(req) = payload?;
    let (Some(dob), Some(postcode)) = (non_blank(req.dob), non_blank(req.postcode)) else {
        return Err(AppError::ValidationError(
            "Date of birth and postcode are required".to_string(),
        ));
    };

    let (delay_ms, busy) = {
        let cfg = &state.patient_auth;
        let mut rng = rand::thread_rng();
        (
            rng.gen_range(cfg.min_delay_ms..=cfg.max_delay_ms),
            rng.gen_bool(cfg.busy_rate),
        )
    };
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    let Some(patient) = state.patients.find_by_credentials(&dob, &postcode).await? else {
        if busy {
            tracing::warn!("Patient sign-in reported busy");
            return Err(AppError::ServiceUnavailable(
                "System busy, please try again".to_string(),
            ));
        }
        tracing::info!("Patient sign-in failed");
        return Err(AppError::AuthenticationError(
            "No patient found with those details".to_string(),
        ));
    };

    let token = issue_patient_token(&state, &patient.id)?;
    tracing::info!(patient_id = %patient.id, "Patient signed in");

    Ok(Json(PatientAuthResponse {
        success: true,
        token,
        patient: PatientSummary::from(&patient),
    }))
}
