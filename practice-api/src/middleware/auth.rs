use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

pub const PATIENT_ROLE: &str = "PATIENT";

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PatientClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

pub fn issue_patient_token(state: &AppState, patient_id: &str) -> Result<String, AppError> {
    let lifetime = i64::try_from(state.auth.jwt_expiration_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AppError::InternalServerError("Token lifetime out of range".to_string()))?;
    let expires_at = Utc::now()
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".to_string()))?;

    let claims = PatientClaims {
        sub: patient_id.to_string(),
        role: PATIENT_ROLE.to_owned(),
        exp: usize::try_from(expires_at.timestamp())
            .map_err(|_| AppError::InternalServerError("Token expiry out of range".to_string()))?,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

// ============================================================================
// Patient Authentication Middleware
// ============================================================================

pub async fn patient_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let token_data = decode::<PatientClaims>(
        token,
        &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Rejected patient token: {}", e);
        AppError::AuthenticationError("Invalid or expired token".to_string())
    })?;

    if token_data.claims.role != PATIENT_ROLE {
        return Err(AppError::AuthorizationError("Patient token required".to_string()));
    }

    req.extensions_mut().insert(token_data.claims);

    Ok(next.run(req).await)
}
