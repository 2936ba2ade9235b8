use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use market::CatalogStore;

use crate::error::ServerError;

pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_CATALOG: &str = "laptop=15000000,smartphone=7500000,headphones=1500000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Interface the line protocol listens on.
    pub bind_addr: IpAddr,

    /// Fixed listening port of the line protocol.
    pub port: u16,

    /// Item -> base price, in declaration order.
    pub catalog: Vec<(String, f64)>,

    /// Upper bound on concurrently served connections.
    ///
    /// Sockets accepted past the bound wait for a free slot instead of
    /// spawning another handler.
    pub max_connections: usize,

    /// Makes demand initialisation and jitter reproducible when set.
    pub demand_seed: Option<u64>,

    /// Name the seller registers under on the agent bus.
    pub agent_name: String,

    /// Emit JSON log lines instead of pretty output.
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            catalog: vec![
                ("laptop".into(), 15_000_000.0),
                ("smartphone".into(), 7_500_000.0),
                ("headphones".into(), 1_500_000.0),
            ],
            max_connections: 1_024,
            demand_seed: None,
            agent_name: "seller".into(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(get: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = get("SELLER_BIND_ADDR") {
            cfg.bind_addr = parse_value("SELLER_BIND_ADDR", &v)?;
        }
        if let Some(v) = get("SELLER_PORT") {
            cfg.port = parse_value("SELLER_PORT", &v)?;
        }
        if let Some(v) = get("SELLER_CATALOG") {
            cfg.catalog = parse_catalog(&v)?;
        }
        if let Some(v) = get("SELLER_MAX_CONNECTIONS") {
            cfg.max_connections = parse_value("SELLER_MAX_CONNECTIONS", &v)?;
            if cfg.max_connections == 0 {
                return Err(ServerError::Config(
                    "SELLER_MAX_CONNECTIONS must be at least 1".into(),
                ));
            }
        }
        if let Some(v) = get("SELLER_DEMAND_SEED") {
            cfg.demand_seed = Some(parse_value("SELLER_DEMAND_SEED", &v)?);
        }
        if let Some(v) = get("SELLER_AGENT_NAME") {
            if v.trim().is_empty() {
                return Err(ServerError::Config("SELLER_AGENT_NAME is empty".into()));
            }
            cfg.agent_name = v;
        }
        cfg.json_logs = get("APP_ENV").is_some_and(|v| v == "production");

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn build_catalog(&self) -> Result<CatalogStore, ServerError> {
        CatalogStore::new(self.catalog.iter().map(|(k, v)| (k.as_str(), *v)))
            .map_err(|e| ServerError::Config(e.to_string()))
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ServerError> {
    raw.trim()
        .parse()
        .map_err(|_| ServerError::Config(format!("{key}: cannot parse {raw:?}")))
}

/// Parses `item=price,item=price`. Blank entries are skipped.
pub fn parse_catalog(raw: &str) -> Result<Vec<(String, f64)>, ServerError> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|entry| {
            let (item, price) = entry
                .split_once('=')
                .ok_or_else(|| ServerError::Config(format!("catalog entry {entry:?} lacks '='")))?;
            let price: f64 = parse_value("SELLER_CATALOG", price)?;
            Ok((item.trim().to_string(), price))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_the_reference_shop() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(cfg.port, 5555);
        assert_eq!(cfg.catalog, parse_catalog(DEFAULT_CATALOG).unwrap());
        assert!(!cfg.json_logs);
        assert_eq!(cfg.build_catalog().unwrap().base_price("laptop"), Some(15_000_000.0));
    }

    #[test]
    fn env_overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("SELLER_PORT", "7000"),
            ("SELLER_BIND_ADDR", "127.0.0.1"),
            ("SELLER_CATALOG", "drone=2500000.5, tablet=4000000"),
            ("SELLER_DEMAND_SEED", "99"),
            ("SELLER_MAX_CONNECTIONS", "4"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(cfg.listen_addr(), "127.0.0.1:7000".parse().unwrap());
        assert_eq!(
            cfg.catalog,
            vec![("drone".to_string(), 2_500_000.5), ("tablet".to_string(), 4_000_000.0)]
        );
        assert_eq!(cfg.demand_seed, Some(99));
        assert_eq!(cfg.max_connections, 4);
        assert!(cfg.json_logs);
    }

    #[test]
    fn bad_values_are_config_errors() {
        for pairs in [
            [("SELLER_PORT", "http")],
            [("SELLER_PORT", "70000")],
            [("SELLER_CATALOG", "laptop:100")],
            [("SELLER_MAX_CONNECTIONS", "0")],
            [("SELLER_AGENT_NAME", " ")],
        ] {
            let res = AppConfig::from_lookup(lookup(&pairs));
            assert!(matches!(res, Err(ServerError::Config(_))), "{pairs:?}");
        }
    }

    #[test]
    fn invalid_prices_surface_when_building_the_catalog() {
        let cfg = AppConfig::from_lookup(lookup(&[("SELLER_CATALOG", "free=0")])).unwrap();
        assert!(matches!(cfg.build_catalog(), Err(ServerError::Config(_))));
    }
}
