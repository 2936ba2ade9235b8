use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("item not found: {0}")]
    NotFound(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}
