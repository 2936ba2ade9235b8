use thiserror::Error;

/// Wire text for unsupported strategy/query fields.
pub const INVALID_PROTOCOL: &str = "Invalid protocol or query";
/// Wire text for lines that do not split into three fields.
pub const INVALID_FORMAT: &str = "Invalid message format";
/// Wire text for a well-formed request naming an unknown item.
pub const ITEM_NOT_FOUND: &str = "Item not found";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown strategy: {0:?}")]
    UnknownStrategy(String),

    #[error("unknown query type: {0:?}")]
    UnknownQueryType(String),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),
}

impl DispatchError {
    /// Client-facing text. Protocol and validation failures collapse into
    /// one generic message; only a missing item is reported as such.
    pub fn wire_message(&self) -> &'static str {
        match self {
            DispatchError::UnknownStrategy(_)
            | DispatchError::UnknownQueryType(_)
            | DispatchError::MalformedRequest(_) => INVALID_PROTOCOL,
            DispatchError::ItemNotFound(_) => ITEM_NOT_FOUND,
        }
    }
}
