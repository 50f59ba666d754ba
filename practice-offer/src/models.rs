use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How prominently an offer is shown in the patient portal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OfferPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Offer lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Expired,
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OfferStatus::Draft => "draft",
            OfferStatus::Active => "active",
            OfferStatus::Paused => "paused",
            OfferStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

impl FromStr for OfferStatus {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(OfferStatus::Draft),
            "active" => Ok(OfferStatus::Active),
            "paused" => Ok(OfferStatus::Paused),
            "expired" => Ok(OfferStatus::Expired),
            other => Err(OfferError::Validation(format!("Unknown offer status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Demographic,
    Clinical,
    Behavioral,
}

/// Operand of an audience rule: free text, a number, or an inclusive `[min, max]` range.
///
/// Numbers keep their JSON form, so `70` is written back as `70` and not `70.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleValue {
    Number(Number),
    Range(Number, Number),
    Text(String),
}

impl RuleValue {
    pub fn integer(n: i64) -> Self {
        RuleValue::Number(n.into())
    }

    pub fn range(min: i64, max: i64) -> Self {
        RuleValue::Range(min.into(), max.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleValue::Number(n) => n.as_f64(),
            RuleValue::Text(s) => s.trim().parse().ok(),
            RuleValue::Range(..) => None,
        }
    }

    /// Bounds ordered low to high
    pub fn as_range(&self) -> Option<(f64, f64)> {
        match self {
            RuleValue::Range(a, b) => {
                let (a, b) = (a.as_f64()?, b.as_f64()?);
                Some(if a <= b { (a, b) } else { (b, a) })
            }
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            RuleValue::Number(n) if n.as_f64() == Some(0.0) => Some(false),
            RuleValue::Number(n) if n.as_f64() == Some(1.0) => Some(true),
            RuleValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" => Some(true),
                "false" | "no" | "n" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A single targeting criterion, owned by its offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudienceRule {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub field: String,
    pub operator: String,
    pub value: RuleValue,
    #[serde(default)]
    pub label: String,
}

/// An outreach offer shown to patients matching its audience rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetedOffer {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cta: String,
    pub priority: OfferPriority,
    pub valid_until: NaiveDate,
    pub status: OfferStatus,
    pub created_at: NaiveDate,
    pub estimated_reach: u32,
    pub icon: String,
    pub audience_rules: Vec<AudienceRule>,
}

/// Rejects rules with a blank field or with an id used twice in the same offer.
/// Blank ids are allowed here; `normalize_rules` fills them in.
pub fn validate_rules(rules: &[AudienceRule]) -> Result<(), OfferError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if rule.field.trim().is_empty() {
            return Err(OfferError::Validation(
                "Audience rule field is required".to_string(),
            ));
        }
        let id = rule.id.trim();
        if !id.is_empty() && !seen.insert(id) {
            return Err(OfferError::Validation(format!(
                "Duplicate audience rule id: {}",
                id
            )));
        }
    }
    Ok(())
}

/// Trims rule ids and gives rules without one a generated `rule-<uuid>` id
pub fn normalize_rules(rules: Vec<AudienceRule>) -> Vec<AudienceRule> {
    rules
        .into_iter()
        .map(|mut rule| {
            let id = rule.id.trim();
            rule.id = if id.is_empty() {
                format!("rule-{}", Uuid::new_v4())
            } else {
                id.to_string()
            };
            rule
        })
        .collect()
}

impl TargetedOffer {
    pub fn is_active(&self) -> bool {
        self.status == OfferStatus::Active
    }
}

/// Insert payload. `createdAt` is never read from clients; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cta: String,
    #[serde(default)]
    pub priority: OfferPriority,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub status: OfferStatus,
    #[serde(default)]
    pub estimated_reach: u32,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub audience_rules: Vec<AudienceRule>,
}

impl NewOffer {
    pub fn new(title: impl Into<String>, valid_until: NaiveDate) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            cta: String::new(),
            priority: OfferPriority::default(),
            valid_until,
            status: OfferStatus::default(),
            estimated_reach: 0,
            icon: String::new(),
            audience_rules: Vec::new(),
        }
    }

    /// The client-supplied id, if it is non-blank
    pub fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    pub fn validate(&self) -> Result<(), OfferError> {
        if self.title.trim().is_empty() {
            return Err(OfferError::Validation("Offer title is required".to_string()));
        }
        validate_rules(&self.audience_rules)
    }

    /// Build the stored offer. Rules without an id get a generated one.
    pub fn into_offer(self, id: String, created_at: NaiveDate) -> TargetedOffer {
        let audience_rules = normalize_rules(self.audience_rules);

        TargetedOffer {
            id,
            title: self.title,
            description: self.description,
            cta: self.cta,
            priority: self.priority,
            valid_until: self.valid_until,
            status: self.status,
            created_at,
            estimated_reach: self.estimated_reach,
            icon: self.icon,
            audience_rules,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OfferError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Field '{0}' cannot be null")]
    NullField(&'static str),
}
