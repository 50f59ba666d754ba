use serde::{Deserialize, Serialize};

use crate::models::{AudienceRule, RuleValue, TargetedOffer};

/// The patient attributes audience rules are evaluated against
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub age: u32,
    pub gender: String,
    pub conditions: Vec<String>,
    pub smoker: bool,
    pub last_visit_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    AtLeast,
    AtMost,
    Between,
    Contains,
}

impl Operator {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let op = match normalized.as_str() {
            "equals" | "eq" | "is" => Operator::Equals,
            "not_equals" | "ne" | "is_not" => Operator::NotEquals,
            "greater_than" | "gt" => Operator::GreaterThan,
            "less_than" | "lt" => Operator::LessThan,
            "at_least" | "gte" | "greater_than_or_equal" => Operator::AtLeast,
            "at_most" | "lte" | "less_than_or_equal" => Operator::AtMost,
            "between" | "in_range" => Operator::Between,
            "contains" | "includes" | "has" => Operator::Contains,
            _ => return None,
        };
        Some(op)
    }
}

enum Attribute<'a> {
    Number(f64),
    Text(&'a str),
    Flag(bool),
    Set(&'a [String]),
}

impl PatientProfile {
    fn attribute(&self, field: &str) -> Option<Attribute<'_>> {
        let key: String = field
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "age" => Some(Attribute::Number(self.age as f64)),
            "gender" | "sex" => Some(Attribute::Text(&self.gender)),
            "condition" | "conditions" => Some(Attribute::Set(&self.conditions)),
            "smoker" | "smoking" => Some(Attribute::Flag(self.smoker)),
            "lastvisitdays" | "dayssincelastvisit" => {
                Some(Attribute::Number(self.last_visit_days as f64))
            }
            _ => None,
        }
    }
}

fn compare_number(actual: f64, op: Operator, value: &RuleValue) -> bool {
    if op == Operator::Between {
        return match value.as_range() {
            Some((lo, hi)) => actual >= lo && actual <= hi,
            None => false,
        };
    }

    let Some(expected) = value.as_number() else {
        return false;
    };
    match op {
        Operator::Equals => (actual - expected).abs() < f64::EPSILON,
        Operator::NotEquals => (actual - expected).abs() >= f64::EPSILON,
        Operator::GreaterThan => actual > expected,
        Operator::LessThan => actual < expected,
        Operator::AtLeast => actual >= expected,
        Operator::AtMost => actual <= expected,
        Operator::Between | Operator::Contains => false,
    }
}

fn compare_text(actual: &str, op: Operator, value: &RuleValue) -> bool {
    let RuleValue::Text(expected) = value else {
        return false;
    };
    let expected = expected.trim();
    match op {
        Operator::Equals => actual.eq_ignore_ascii_case(expected),
        Operator::NotEquals => !actual.eq_ignore_ascii_case(expected),
        Operator::Contains => actual.to_ascii_lowercase().contains(&expected.to_ascii_lowercase()),
        _ => false,
    }
}

fn compare_set(actual: &[String], op: Operator, value: &RuleValue) -> bool {
    let RuleValue::Text(expected) = value else {
        return false;
    };
    let present = actual.iter().any(|c| c.trim().eq_ignore_ascii_case(expected.trim()));
    match op {
        Operator::Equals | Operator::Contains => present,
        Operator::NotEquals => !present,
        _ => false,
    }
}

impl AudienceRule {
    /// Unknown fields, unknown operators and mismatched value shapes never match.
    pub fn matches(&self, profile: &PatientProfile) -> bool {
        let Some(op) = Operator::parse(&self.operator) else {
            return false;
        };
        let Some(attribute) = profile.attribute(&self.field) else {
            return false;
        };

        match attribute {
            Attribute::Number(n) => compare_number(n, op, &self.value),
            Attribute::Text(s) => compare_text(s, op, &self.value),
            Attribute::Set(items) => compare_set(items, op, &self.value),
            Attribute::Flag(flag) => match (op, self.value.as_flag()) {
                (Operator::Equals, Some(expected)) => flag == expected,
                (Operator::NotEquals, Some(expected)) => flag != expected,
                _ => false,
            },
        }
    }
}

impl TargetedOffer {
    /// True when every audience rule matches. An offer without rules targets everyone.
    pub fn targets(&self, profile: &PatientProfile) -> bool {
        self.audience_rules.iter().all(|rule| rule.matches(profile))
    }
}
