use async_trait::async_trait;
use practice_offer::{NewOffer, OfferPatch, TargetedOffer};

use crate::patient::PatientRecord;
use crate::CoreResult;

/// Repository trait for targeted offer storage
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Offers with status `active`, in insertion order
    async fn list_active(&self) -> CoreResult<Vec<TargetedOffer>>;

    /// Every offer, in insertion order. The returned vector is an owned copy.
    async fn list_all(&self) -> CoreResult<Vec<TargetedOffer>>;

    /// Append an offer, generating its id when the payload has none and
    /// stamping today's date as `created_at`. Fails with `Conflict` if the
    /// requested id is taken.
    async fn insert(&self, offer: NewOffer) -> CoreResult<TargetedOffer>;

    /// Patch the first offer with `id`. Returns `false` when nothing matched.
    async fn update(&self, id: &str, patch: OfferPatch) -> CoreResult<bool>;

    /// Remove every offer with `id`. Returns how many were removed.
    async fn delete(&self, id: &str) -> CoreResult<usize>;

    async fn get_by_id(&self, id: &str) -> CoreResult<Option<TargetedOffer>>;
}

/// Lookup of registered patients for portal sign-in
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    async fn find_by_credentials(
        &self,
        dob: &str,
        postcode: &str,
    ) -> CoreResult<Option<PatientRecord>>;

    async fn get_patient(&self, id: &str) -> CoreResult<Option<PatientRecord>>;
}
