//! The pack dispenser: random draws against a finite shared inventory.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tankforge_protocol::{PlayerId, Tank};
use tokio::sync::RwLock;

use crate::{Catalog, CardError, PackConfig};

/// Hands out packs of distinct cards until the inventory runs out.
///
/// The inventory counter sits behind its own write lock and the
/// check-then-decrement happens under one acquisition, so when a single
/// pack remains exactly one of any number of concurrent callers gets it.
pub struct PackDispenser {
    catalog: Arc<Catalog>,
    pack_size: usize,
    remaining: RwLock<u32>,
}

impl PackDispenser {
    /// Creates a dispenser over `catalog`.
    ///
    /// # Errors
    /// Returns a [`CardError`] if `config` cannot be satisfied by the
    /// catalog (empty packs, or packs larger than the catalog).
    pub fn new(
        catalog: Arc<Catalog>,
        config: &PackConfig,
    ) -> Result<Self, CardError> {
        config.validate(catalog.len())?;
        Ok(Self {
            catalog,
            pack_size: config.pack_size,
            remaining: RwLock::new(config.inventory),
        })
    }

    /// Draws one pack for `owner`.
    ///
    /// Each call seeds its own generator, independent of every other draw.
    pub async fn draw(&self, owner: &PlayerId) -> Result<Vec<Tank>, CardError> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.draw_with(owner, &mut rng).await
    }

    /// Draws one pack for `owner` using the given generator.
    ///
    /// Cards are chosen by sampling catalog indices without replacement,
    /// copied, and stamped with `owner`. The inventory is decremented only
    /// when the draw succeeds.
    pub async fn draw_with<R: Rng + ?Sized>(
        &self,
        owner: &PlayerId,
        rng: &mut R,
    ) -> Result<Vec<Tank>, CardError> {
        let cards: Vec<Tank> =
            rand::seq::index::sample(rng, self.catalog.len(), self.pack_size)
                .into_iter()
                .filter_map(|i| self.catalog.get(i))
                .map(|template| template.card.copied_for(owner))
                .collect();

        let left = {
            let mut remaining = self.remaining.write().await;
            if *remaining == 0 {
                tracing::debug!(%owner, "pack draw refused: inventory empty");
                return Err(CardError::NoPacksRemaining);
            }
            *remaining -= 1;
            *remaining
        };

        tracing::info!(%owner, packs_left = left, "pack opened");
        Ok(cards)
    }

    /// Packs still available.
    pub async fn remaining(&self) -> u32 {
        *self.remaining.read().await
    }

    /// Cards per pack.
    pub fn pack_size(&self) -> usize {
        self.pack_size
    }

    /// The catalog packs are drawn from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
