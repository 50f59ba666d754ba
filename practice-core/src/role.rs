use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// The role a request acts in. Defaults to `Patient` when none is given.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Patient,
    Receptionist,
    Clinician,
    PracticeManager,
}

impl Role {
    pub fn can_manage_offers(&self) -> bool {
        matches!(self, Role::Clinician | Role::PracticeManager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Receptionist => "receptionist",
            Role::Clinician => "clinician",
            Role::PracticeManager => "practice_manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "patient" => Ok(Role::Patient),
            "receptionist" => Ok(Role::Receptionist),
            "clinician" | "gp" | "nurse" => Ok(Role::Clinician),
            "practice_manager" | "manager" | "admin" => Ok(Role::PracticeManager),
            other => Err(CoreError::Validation(format!("Unknown role: {}", other))),
        }
    }
}
