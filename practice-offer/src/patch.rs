use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::models::{
    normalize_rules, validate_rules, AudienceRule, OfferError, OfferPriority, OfferStatus,
    TargetedOffer,
};

/// A patch slot that keeps "absent" and "explicitly null" apart.
///
/// Use with `#[serde(default)]` so a missing key deserializes to `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    fn apply(self, name: &'static str, target: &mut T) -> Result<(), OfferError> {
        match self {
            Field::Absent => Ok(()),
            Field::Null => Err(OfferError::NullField(name)),
            Field::Value(v) => {
                *target = v;
                Ok(())
            }
        }
    }

    fn check(&self, name: &'static str) -> Result<(), OfferError> {
        match self {
            Field::Null => Err(OfferError::NullField(name)),
            _ => Ok(()),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// Partial update of an offer. `id` and `createdAt` are not patchable.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferPatch {
    #[serde(default)]
    pub title: Field<String>,
    #[serde(default)]
    pub description: Field<String>,
    #[serde(default)]
    pub cta: Field<String>,
    #[serde(default)]
    pub priority: Field<OfferPriority>,
    #[serde(default)]
    pub valid_until: Field<NaiveDate>,
    #[serde(default)]
    pub status: Field<OfferStatus>,
    #[serde(default)]
    pub estimated_reach: Field<u32>,
    #[serde(default)]
    pub icon: Field<String>,
    #[serde(default)]
    pub audience_rules: Field<Vec<AudienceRule>>,
}

impl OfferPatch {
    pub fn status(status: OfferStatus) -> Self {
        Self {
            status: Field::Value(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_absent()
            && self.description.is_absent()
            && self.cta.is_absent()
            && self.priority.is_absent()
            && self.valid_until.is_absent()
            && self.status.is_absent()
            && self.estimated_reach.is_absent()
            && self.icon.is_absent()
            && self.audience_rules.is_absent()
    }

    /// Reject the patch before touching any offer
    pub fn validate(&self) -> Result<(), OfferError> {
        self.title.check("title")?;
        self.description.check("description")?;
        self.cta.check("cta")?;
        self.priority.check("priority")?;
        self.valid_until.check("validUntil")?;
        self.status.check("status")?;
        self.estimated_reach.check("estimatedReach")?;
        self.icon.check("icon")?;
        self.audience_rules.check("audienceRules")?;

        if let Field::Value(title) = &self.title {
            if title.trim().is_empty() {
                return Err(OfferError::Validation("Offer title is required".to_string()));
            }
        }
        if let Field::Value(rules) = &self.audience_rules {
            validate_rules(rules)?;
        }
        Ok(())
    }

    /// Call `validate` first; a failed field here leaves earlier fields applied.
    pub fn apply_to(self, offer: &mut TargetedOffer) -> Result<(), OfferError> {
        self.title.apply("title", &mut offer.title)?;
        self.description.apply("description", &mut offer.description)?;
        self.cta.apply("cta", &mut offer.cta)?;
        self.priority.apply("priority", &mut offer.priority)?;
        self.valid_until.apply("validUntil", &mut offer.valid_until)?;
        self.status.apply("status", &mut offer.status)?;
        self.estimated_reach.apply("estimatedReach", &mut offer.estimated_reach)?;
        self.icon.apply("icon", &mut offer.icon)?;
        let audience_rules = match self.audience_rules {
            Field::Value(rules) => Field::Value(normalize_rules(rules)),
            other => other,
        };
        audience_rules.apply("audienceRules", &mut offer.audience_rules)?;
        Ok(())
    }
}
