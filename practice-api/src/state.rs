use std::sync::Arc;
use practice_core::{OfferRepository, PatientDirectory};
use practice_store::app_config::{AuthConfig, Config, PatientAuthConfig};

#[derive(Clone)]
pub struct AppState {
    pub offers: Arc<dyn OfferRepository>,
    pub patients: Arc<dyn PatientDirectory>,
    pub auth: AuthConfig,
    pub patient_auth: PatientAuthConfig,
}

impl AppState {
    pub fn new(
        offers: Arc<dyn OfferRepository>,
        patients: Arc<dyn PatientDirectory>,
        config: &Config,
    ) -> Self {
        Self {
            offers,
            patients,
            auth: config.auth.clone(),
            patient_auth: config.patient_auth.clone(),
        }
    }
}
