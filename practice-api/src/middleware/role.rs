use axum::{extract::Request, middleware::Next, response::Response};
use practice_core::Role;

use crate::{error::AppError, state::AppState};

pub const ROLE_HEADER: &str = "x-practice-role";

/// Puts the caller's `Role` into request extensions. No header means `Role::Patient`.
pub async fn role_context_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let role = match req.headers().get(ROLE_HEADER) {
        None => Role::default(),
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::ValidationError("Invalid role header".to_string()))?
            .parse::<Role>()?,
    };

    req.extensions_mut().insert(role);

    Ok(next.run(req).await)
}

pub fn ensure_can_manage_offers(state: &AppState, role: Role) -> Result<(), AppError> {
    if state.auth.enforce_roles && !role.can_manage_offers() {
        tracing::warn!(%role, "Offer change refused for role");
        return Err(AppError::AuthorizationError(format!("Role {} cannot manage offers", role)));
    }
    Ok(())
}
