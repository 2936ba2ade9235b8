//! Request Dispatcher
//!
//! Shared validation and routing for both external interfaces. It never
//! touches a socket or a mailbox; adapters decode into a [`PriceRequest`],
//! call [`Dispatcher::dispatch`] and encode the outcome their own way.

use std::sync::Arc;

use market::{PricingEngine, PricingError, Quote};
use tracing::debug;

use crate::error::DispatchError;
use crate::request::{PRICE_QUERY, PriceRequest, parse_strategy};

#[derive(Clone)]
pub struct Dispatcher {
    engine: Arc<PricingEngine>,
}

impl Dispatcher {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Validates `request` and resolves its quote.
    ///
    /// Checks run in wire order: strategy, query type, item.
    pub fn dispatch(&self, request: &PriceRequest) -> Result<Quote, DispatchError> {
        let strategy = parse_strategy(&request.strategy)
            .ok_or_else(|| DispatchError::UnknownStrategy(request.strategy.clone()))?;

        if request.query_type != PRICE_QUERY {
            return Err(DispatchError::UnknownQueryType(request.query_type.clone()));
        }

        if request.item.is_empty() {
            return Err(DispatchError::MalformedRequest("empty item".into()));
        }

        let quote = self
            .engine
            .quote(strategy, &request.item)
            .map_err(|e| match e {
                PricingError::NotFound(item) => DispatchError::ItemNotFound(item),
                PricingError::InvalidCatalog(msg) => DispatchError::MalformedRequest(msg),
            })?;

        debug!(
            item = %quote.item,
            strategy = %quote.strategy,
            price = quote.price,
            "request dispatched"
        );

        Ok(quote)
    }
}
