//! Immutable item -> base price table.
//!
//! Built once at startup and only read afterwards, so it is shared behind an
//! `Arc` without any lock.

use std::collections::HashMap;

use crate::error::PricingError;
use crate::types::ItemId;

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    prices: HashMap<ItemId, f64>,
}

impl CatalogStore {
    /// Builds the catalog, rejecting empty names, duplicate names and
    /// prices that are not positive finite numbers.
    pub fn new<I, K>(entries: I) -> Result<Self, PricingError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<ItemId>,
    {
        let mut prices = HashMap::new();

        for (item, price) in entries {
            let item = item.into();
            if item.as_str().is_empty() {
                return Err(PricingError::InvalidCatalog("empty item name".into()));
            }
            if !price.is_finite() || price <= 0.0 {
                return Err(PricingError::InvalidCatalog(format!(
                    "base price for {item} must be positive, got {price}"
                )));
            }
            if prices.insert(item.clone(), price).is_some() {
                return Err(PricingError::InvalidCatalog(format!("duplicate item {item}")));
            }
        }

        Ok(Self { prices })
    }

    pub fn base_price(&self, item: &str) -> Option<f64> {
        self.prices.get(item).copied()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.prices.contains_key(item)
    }

    /// Item ids in lexical order.
    pub fn items(&self) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = self.prices.keys().cloned().collect();
        items.sort();
        items
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_sensitive() {
        let c = CatalogStore::new([("laptop", 15_000_000.0)]).unwrap();

        assert_eq!(c.base_price("laptop"), Some(15_000_000.0));
        assert_eq!(c.base_price("Laptop"), None);
        assert!(!c.contains("LAPTOP"));
    }

    #[test]
    fn rejects_non_positive_and_non_finite_prices() {
        assert!(CatalogStore::new([("a", 0.0)]).is_err());
        assert!(CatalogStore::new([("a", -1.0)]).is_err());
        assert!(CatalogStore::new([("a", f64::NAN)]).is_err());
        assert!(CatalogStore::new([("a", f64::INFINITY)]).is_err());
    }

    #[test]
    fn rejects_duplicates_and_empty_names() {
        let dup = CatalogStore::new([("a", 1.0), ("a", 2.0)]);
        assert!(matches!(dup, Err(PricingError::InvalidCatalog(_))));

        let empty = CatalogStore::new([("", 1.0)]);
        assert!(matches!(empty, Err(PricingError::InvalidCatalog(_))));
    }

    #[test]
    fn items_are_sorted() {
        let c = CatalogStore::new([("smartphone", 2.0), ("headphones", 3.0), ("laptop", 1.0)])
            .unwrap();

        let names: Vec<String> = c.items().iter().map(|i| i.to_string()).collect();
        assert_eq!(names, ["headphones", "laptop", "smartphone"]);
        assert_eq!(c.len(), 3);
    }
}
