use std::borrow::Borrow;
use std::fmt;

/// Case-sensitive catalog key ("laptop", "smartphone", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for ItemId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pricing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Fixed catalog price.
    Static,

    /// Catalog price scaled by the item's current demand factor.
    Dynamic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Static => f.write_str("static"),
            Strategy::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Result of one pricing computation. Produced per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub item: ItemId,
    pub strategy: Strategy,
    pub price: f64,
}
