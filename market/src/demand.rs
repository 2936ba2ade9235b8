//! Market State
//!
//! Mutable item -> demand factor table. This is the only state written by
//! more than one concurrent actor, so every item owns its own lock:
//!   • the read-perturb-store sequence on one item is atomic
//!   • dynamic quotes for different items never contend
//!
//! The key set is fixed at construction from the catalog and never changes,
//! so the outer map needs no lock at all.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::types::ItemId;

/// Lower clamp of the random walk.
pub const DEMAND_FLOOR: f64 = 0.7;
/// Upper clamp of the random walk.
pub const DEMAND_CEILING: f64 = 1.3;
/// Range the initial factor is drawn from.
pub const INITIAL_DEMAND: RangeInclusive<f64> = 0.8..=1.2;
/// Range of the multiplicative step applied after every dynamic quote.
pub const JITTER: RangeInclusive<f64> = 0.95..=1.05;

/// Demand-update policy: one bounded random-walk step.
pub fn perturb(current: f64, jitter: f64) -> f64 {
    (current * jitter).clamp(DEMAND_FLOOR, DEMAND_CEILING)
}

struct DemandCell {
    factor: f64,
    /// Number of completed updates; lets callers detect lost writes.
    updates: u64,
    rng: StdRng,
}

/// Point-in-time view of one item's demand.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSnapshot {
    pub item: ItemId,
    pub factor: f64,
    pub updates: u64,
}

pub struct MarketState {
    cells: HashMap<ItemId, Mutex<DemandCell>>,
}

impl MarketState {
    /// Creates one demand entry per catalog item.
    ///
    /// With a `seed`, both the initial factors and every later jitter draw
    /// are reproducible; items are seeded in lexical order.
    pub fn for_catalog(catalog: &CatalogStore, seed: Option<u64>) -> Self {
        let cells = catalog
            .items()
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(s.wrapping_add(i as u64)),
                    None => StdRng::from_os_rng(),
                };
                let factor = rng.random_range(INITIAL_DEMAND);

                debug!(%item, factor, "demand initialised");

                let cell = DemandCell {
                    factor,
                    updates: 0,
                    rng,
                };
                (item, Mutex::new(cell))
            })
            .collect();

        Self { cells }
    }

    pub fn factor(&self, item: &str) -> Option<f64> {
        self.cells.get(item).map(|c| c.lock().factor)
    }

    pub fn updates(&self, item: &str) -> Option<u64> {
        self.cells.get(item).map(|c| c.lock().updates)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.cells.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the current factor and, under the same lock, replaces it with
    /// one random-walk step.
    pub fn read_and_perturb(&self, item: &str) -> Option<f64> {
        let cell = self.cells.get(item)?;
        let mut g = cell.lock();

        let before = g.factor;
        let jitter = g.rng.random_range(JITTER);
        g.factor = perturb(before, jitter);
        g.updates += 1;

        debug!(
            item,
            before,
            after = g.factor,
            updates = g.updates,
            "market demand updated"
        );

        Some(before)
    }

    /// Consistent per-item snapshots, sorted by item.
    pub fn snapshot(&self) -> Vec<DemandSnapshot> {
        let mut out: Vec<DemandSnapshot> = self
            .cells
            .iter()
            .map(|(item, cell)| {
                let g = cell.lock();
                DemandSnapshot {
                    item: item.clone(),
                    factor: g.factor,
                    updates: g.updates,
                }
            })
            .collect();
        out.sort_by(|a, b| a.item.cmp(&b.item));
        out
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]
        #[test]
        fn walk_never_escapes_the_clamp(
            start in DEMAND_FLOOR..=DEMAND_CEILING,
            steps in prop::collection::vec(0.95..=1.05f64, 0..500)
        ) {
            let mut f = start;
            for j in steps {
                f = perturb(f, j);
                prop_assert!((DEMAND_FLOOR..=DEMAND_CEILING).contains(&f), "escaped: {}", f);
            }
        }
    }
}
