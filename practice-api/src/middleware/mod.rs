pub mod auth;
pub mod role;

pub use auth::{patient_auth_middleware, PatientClaims};
pub use role::{ensure_can_manage_offers, role_context_middleware, ROLE_HEADER};
