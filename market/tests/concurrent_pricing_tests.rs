use std::sync::Arc;

use market::demand::{DEMAND_CEILING, DEMAND_FLOOR, JITTER};
use market::{CatalogStore, PricingEngine};

const N: usize = 256;

fn engine() -> Arc<PricingEngine> {
    let catalog = CatalogStore::new([
        ("laptop", 15_000_000.0),
        ("smartphone", 7_500_000.0),
        ("headphones", 1_500_000.0),
    ])
    .unwrap();
    Arc::new(PricingEngine::new(catalog, None))
}

/// Each parallel quote must land exactly one update.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_dynamic_quotes_lose_no_updates() {
    let e = engine();
    let initial = e.demand_factor("smartphone").unwrap();

    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let e = Arc::clone(&e);
            tokio::task::spawn_blocking(move || e.quote_dynamic("smartphone"))
        })
        .collect();

    for r in futures::future::join_all(tasks).await {
        let price = r.unwrap().unwrap();
        assert!(price >= 7_500_000.0 * DEMAND_FLOOR && price <= 7_500_000.0 * DEMAND_CEILING);
    }

    assert_eq!(e.demand_updates("smartphone"), Some(N as u64));

    // Drift is bounded by N compounded jitter steps (or the clamp).
    let last = e.demand_factor("smartphone").unwrap();
    let lo = (initial * JITTER.start().powi(N as i32)).max(DEMAND_FLOOR);
    let hi = (initial * JITTER.end().powi(N as i32)).min(DEMAND_CEILING);
    assert!(last >= lo - 1e-12 && last <= hi + 1e-12, "{last} not in [{lo}, {hi}]");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn items_are_updated_independently_under_load() {
    let e = engine();

    let tasks: Vec<_> = (0..N)
        .map(|i| {
            let e = Arc::clone(&e);
            let item = if i % 2 == 0 { "laptop" } else { "headphones" };
            tokio::task::spawn_blocking(move || e.quote_dynamic(item))
        })
        .collect();

    for r in futures::future::join_all(tasks).await {
        r.unwrap().unwrap();
    }

    assert_eq!(e.demand_updates("laptop"), Some((N / 2) as u64));
    assert_eq!(e.demand_updates("headphones"), Some((N / 2) as u64));
    assert_eq!(e.demand_updates("smartphone"), Some(0));
}
