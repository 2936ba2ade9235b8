pub mod catalog;
pub mod demand;
pub mod engine;
pub mod error;
pub mod types;

pub use catalog::CatalogStore;
pub use demand::MarketState;
pub use engine::PricingEngine;
pub use error::PricingError;
pub use types::{ItemId, Quote, Strategy};
