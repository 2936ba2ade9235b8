//! Pricing Engine
//!
//! Combines the Catalog Store and the Market State into quotes. Prices are
//! raw `f64`; rounding and display formatting belong to the interfaces.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::catalog::CatalogStore;
use crate::demand::{DemandSnapshot, MarketState};
use crate::error::PricingError;
use crate::types::{ItemId, Quote, Strategy};

pub struct PricingEngine {
    catalog: Arc<CatalogStore>,
    market: MarketState,
}

impl PricingEngine {
    /// Builds an engine whose market state mirrors `catalog`.
    pub fn new(catalog: CatalogStore, seed: Option<u64>) -> Self {
        let market = MarketState::for_catalog(&catalog, seed);
        Self {
            catalog: Arc::new(catalog),
            market,
        }
    }

    /// Static quote: the catalog price, with no side effects.
    pub fn quote_static(&self, item: &str) -> Result<f64, PricingError> {
        self.catalog
            .base_price(item)
            .ok_or_else(|| PricingError::NotFound(item.to_string()))
    }

    /// Dynamic quote: `base * factor`, using the factor as it was before this
    /// call, after which the item's factor takes one random-walk step.
    #[instrument(skip(self), level = "debug")]
    pub fn quote_dynamic(&self, item: &str) -> Result<f64, PricingError> {
        let base = self.quote_static(item)?;

        let factor = self
            .market
            .read_and_perturb(item)
            .ok_or_else(|| PricingError::NotFound(item.to_string()))?;

        let price = base * factor;
        debug!(base, factor, price, "dynamic price computed");
        Ok(price)
    }

    pub fn quote(&self, strategy: Strategy, item: &str) -> Result<Quote, PricingError> {
        let price = match strategy {
            Strategy::Static => self.quote_static(item)?,
            Strategy::Dynamic => self.quote_dynamic(item)?,
        };

        Ok(Quote {
            item: ItemId::new(item),
            strategy,
            price,
        })
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn demand_factor(&self, item: &str) -> Option<f64> {
        self.market.factor(item)
    }

    pub fn demand_updates(&self, item: &str) -> Option<u64> {
        self.market.updates(item)
    }

    pub fn demand_snapshot(&self) -> Vec<DemandSnapshot> {
        self.market.snapshot()
    }
}
