pub mod models;
pub mod patch;
pub mod audience;

pub use models::{
    normalize_rules, validate_rules, AudienceRule, NewOffer, OfferError, OfferPriority, OfferStatus,
    RuleType, RuleValue, TargetedOffer,
};
pub use patch::{Field, OfferPatch};
pub use audience::{Operator, PatientProfile};
