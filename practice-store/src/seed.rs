use chrono::{Datelike, NaiveDate, Utc};
use practice_offer::{AudienceRule, NewOffer, OfferPriority, OfferStatus, RuleType, RuleValue};

fn rule(
    id: &str,
    rule_type: RuleType,
    field: &str,
    operator: &str,
    value: RuleValue,
    label: &str,
) -> AudienceRule {
    AudienceRule {
        id: id.to_string(),
        rule_type,
        field: field.to_string(),
        operator: operator.to_string(),
        value,
        label: label.to_string(),
    }
}

fn end_of_year() -> NaiveDate {
    let year = Utc::now().year();
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_else(|| Utc::now().date_naive())
}

/// Demo campaigns loaded when `store.seed_demo_data` is set
pub fn demo_offers() -> Vec<NewOffer> {
    let valid_until = end_of_year();

    vec![
        NewOffer {
            id: Some("offer-flu-jab".to_string()),
            title: "Flu Jab".to_string(),
            description: "Free seasonal flu vaccination for eligible patients.".to_string(),
            cta: "Book your flu jab".to_string(),
            priority: OfferPriority::High,
            valid_until,
            status: OfferStatus::Active,
            estimated_reach: 1240,
            icon: "syringe".to_string(),
            audience_rules: vec![rule(
                "rule-flu-age",
                RuleType::Demographic,
                "age",
                "at_least",
                RuleValue::integer(65),
                "Aged 65 and over",
            )],
        },
        NewOffer {
            id: Some("offer-health-check".to_string()),
            title: "NHS Health Check".to_string(),
            description: "A check-up for adults aged 40 to 74 to spot early signs of stroke, \
                          kidney disease, heart disease and diabetes."
                .to_string(),
            cta: "Book a health check".to_string(),
            priority: OfferPriority::Medium,
            valid_until,
            status: OfferStatus::Active,
            estimated_reach: 860,
            icon: "heart-pulse".to_string(),
            audience_rules: vec![
                rule(
                    "rule-hc-age",
                    RuleType::Demographic,
                    "age",
                    "between",
                    RuleValue::range(40, 74),
                    "Aged 40 to 74",
                ),
                rule(
                    "rule-hc-lapsed",
                    RuleType::Behavioral,
                    "last_visit_days",
                    "greater_than",
                    RuleValue::integer(365),
                    "Not seen in the last year",
                ),
            ],
        },
        NewOffer {
            id: Some("offer-stop-smoking".to_string()),
            title: "Stop Smoking Support".to_string(),
            description: "One-to-one support and nicotine replacement therapy.".to_string(),
            cta: "Get support".to_string(),
            priority: OfferPriority::Medium,
            valid_until,
            status: OfferStatus::Active,
            estimated_reach: 310,
            icon: "ban".to_string(),
            audience_rules: vec![rule(
                "rule-smoker",
                RuleType::Behavioral,
                "smoker",
                "equals",
                RuleValue::Text("yes".to_string()),
                "Current smokers",
            )],
        },
        NewOffer {
            id: Some("offer-asthma-review".to_string()),
            title: "Asthma Review".to_string(),
            description: "Annual review of your asthma plan and inhaler technique.".to_string(),
            cta: "Book a review".to_string(),
            priority: OfferPriority::Low,
            valid_until,
            status: OfferStatus::Paused,
            estimated_reach: 190,
            icon: "wind".to_string(),
            audience_rules: vec![rule(
                "rule-asthma",
                RuleType::Clinical,
                "condition",
                "equals",
                RuleValue::Text("asthma".to_string()),
                "Diagnosed with asthma",
            )],
        },
    ]
}
