use practice_offer::PatientProfile;
use practice_shared::Masked;
use serde::{Deserialize, Serialize};

/// A registered patient. Identifying fields are masked in logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub dob: Masked<String>,
    pub postcode: Masked<String>,
    pub profile: PatientProfile,
}

/// The part of a patient record returned to the portal after sign-in
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub dob: Masked<String>,
    pub postcode: Masked<String>,
}

impl From<&PatientRecord> for PatientSummary {
    fn from(record: &PatientRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            dob: record.dob.clone(),
            postcode: record.postcode.clone(),
        }
    }
}

/// Postcodes compare case-insensitively with whitespace ignored
pub fn normalize_postcode(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl PatientRecord {
    pub fn matches_credentials(&self, dob: &str, postcode: &str) -> bool {
        self.dob.expose().as_str() == dob.trim()
            && normalize_postcode(self.postcode.expose()) == normalize_postcode(postcode)
    }
}
