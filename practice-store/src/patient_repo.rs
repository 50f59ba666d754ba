use async_trait::async_trait;
use practice_core::{CoreResult, PatientDirectory, PatientRecord};
use practice_offer::PatientProfile;
use practice_shared::Masked;

/// Fixed list of registered patients used by the portal sign-in demo
pub struct InMemoryPatientDirectory {
    patients: Vec<PatientRecord>,
}

impl InMemoryPatientDirectory {
    pub fn new(patients: Vec<PatientRecord>) -> Self {
        Self { patients }
    }

    pub fn demo() -> Self {
        Self::new(vec![
            PatientRecord {
                id: "pat-001".to_string(),
                name: "Margaret Evans".to_string(),
                dob: Masked("1958-03-14".to_string()),
                postcode: Masked("SW1A 1AA".to_string()),
                profile: PatientProfile {
                    age: 68,
                    gender: "female".to_string(),
                    conditions: vec!["hypertension".to_string()],
                    smoker: false,
                    last_visit_days: 45,
                },
            },
            PatientRecord {
                id: "pat-002".to_string(),
                name: "Daniel Okafor".to_string(),
                dob: Masked("1985-07-22".to_string()),
                postcode: Masked("M1 4BT".to_string()),
                profile: PatientProfile {
                    age: 41,
                    gender: "male".to_string(),
                    conditions: vec!["asthma".to_string()],
                    smoker: true,
                    last_visit_days: 420,
                },
            },
            PatientRecord {
                id: "pat-003".to_string(),
                name: "Priya Shah".to_string(),
                dob: Masked("1999-11-02".to_string()),
                postcode: Masked("LS1 5DL".to_string()),
                profile: PatientProfile {
                    age: 26,
                    gender: "female".to_string(),
                    conditions: Vec::new(),
                    smoker: false,
                    last_visit_days: 10,
                },
            },
        ])
    }
}

#[async_trait]
impl PatientDirectory for InMemoryPatientDirectory {
    async fn find_by_credentials(
        &self,
        dob: &str,
        postcode: &str,
    ) -> CoreResult<Option<PatientRecord>> {
        Ok(self
            .patients
            .iter()
            .find(|p| p.matches_credentials(dob, postcode))
            .cloned())
    }

    async fn get_patient(&self, id: &str) -> CoreResult<Option<PatientRecord>> {
        Ok(self.patients.iter().find(|p| p.id == id).cloned())
    }
}
