use async_trait::async_trait;
use chrono::Utc;
use practice_core::{CoreError, CoreResult, OfferRepository};
use practice_offer::{NewOffer, OfferPatch, TargetedOffer};
use tokio::sync::RwLock;

struct OfferTable {
    offers: Vec<TargetedOffer>,
    last_id_millis: i64,
}

impl OfferTable {
    fn contains(&self, id: &str) -> bool {
        self.offers.iter().any(|o| o.id == id)
    }

    /// `offer-<unix millis>`, strictly increasing within the process
    fn next_id(&mut self) -> CoreResult<String> {
        loop {
            let now = Utc::now().timestamp_millis();
            let next = self
                .last_id_millis
                .checked_add(1)
                .ok_or_else(|| CoreError::Internal("Offer id sequence exhausted".to_string()))?;
            self.last_id_millis = now.max(next);
            let id = format!("offer-{}", self.last_id_millis);
            if !self.contains(&id) {
                return Ok(id);
            }
        }
    }
}

/// Offers held in memory, in insertion order. Resets on restart.
pub struct InMemoryOfferRepository {
    table: RwLock<OfferTable>,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(OfferTable {
                offers: Vec::new(),
                last_id_millis: 0,
            }),
        }
    }

    pub async fn with_seed(offers: Vec<NewOffer>) -> CoreResult<Self> {
        let repo = Self::new();
        for offer in offers {
            repo.insert(offer).await?;
        }
        Ok(repo)
    }
}

impl Default for InMemoryOfferRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn list_active(&self) -> CoreResult<Vec<TargetedOffer>> {
        let table = self.table.read().await;
        Ok(table.offers.iter().filter(|o| o.is_active()).cloned().collect())
    }

    async fn list_all(&self) -> CoreResult<Vec<TargetedOffer>> {
        let table = self.table.read().await;
        Ok(table.offers.clone())
    }

    async fn insert(&self, offer: NewOffer) -> CoreResult<TargetedOffer> {
        offer.validate()?;
        let requested = offer.requested_id().map(str::to_string);

        let mut table = self.table.write().await;
        let id = match requested {
            Some(id) if table.contains(&id) => {
                return Err(CoreError::Conflict(format!("Offer {} already exists", id)));
            }
            Some(id) => id,
            None => table.next_id()?,
        };

        let stored = offer.into_offer(id, Utc::now().date_naive());
        table.offers.push(stored.clone());
        tracing::debug!(offer_id = %stored.id, status = %stored.status, "Offer inserted");
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: OfferPatch) -> CoreResult<bool> {
        patch.validate()?;

        let mut table = self.table.write().await;
        let Some(offer) = table.offers.iter_mut().find(|o| o.id == id) else {
            tracing::debug!(offer_id = %id, "Update matched no offer");
            return Ok(false);
        };
        patch.apply_to(offer)?;
        tracing::debug!(offer_id = %id, "Offer updated");
        Ok(true)
    }

    async fn delete(&self, id: &str) -> CoreResult<usize> {
        let mut table = self.table.write().await;
        let before = table.offers.len();
        table.offers.retain(|o| o.id != id);
        let removed = before - table.offers.len();
        tracing::debug!(offer_id = %id, removed, "Offer delete");
        Ok(removed)
    }

    async fn get_by_id(&self, id: &str) -> CoreResult<Option<TargetedOffer>> {
        let table = self.table.read().await;
        Ok(table.offers.iter().find(|o| o.id == id).cloned())
    }
}
