use std::{env, net::SocketAddr, time::Duration};

use model::geocode::RegionBias;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebConfig {
    pub bind_address: SocketAddr,
    pub provider_timeout_secs: u64,
    /// Applied to geocode requests that bring no bias of their own.
    pub region_bias: RegionBias,
}

impl WebConfig {
    /// Reads `WEB_BIND_ADDRESS`, `PROVIDER_TIMEOUT_SECS` and the geocoding
    /// bias `GEOCODE_REGION`, `GEOCODE_COUNTRY`, `GEOCODE_LANGUAGE`. Absent
    /// variables fall back to defaults, unparsable ones (or a zero timeout)
    /// yield `None`.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Option<Self> {
        let bind_address = lookup("WEB_BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned())
            .parse()
            .ok()?;
        let provider_timeout_secs = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(secs) => secs.parse().ok().filter(|secs| *secs > 0)?,
            None => DEFAULT_PROVIDER_TIMEOUT_SECS,
        };
        let region_bias = RegionBias {
            region: lookup("GEOCODE_REGION"),
            country: lookup("GEOCODE_COUNTRY"),
            language: lookup("GEOCODE_LANGUAGE"),
        };
        Some(Self {
            bind_address,
            provider_timeout_secs,
            region_bias,
        })
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = WebConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.provider_timeout(), Duration::from_secs(10));
        assert_eq!(config.region_bias, RegionBias::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = WebConfig::from_lookup(lookup(&[
            ("WEB_BIND_ADDRESS", "127.0.0.1:3000"),
            ("PROVIDER_TIMEOUT_SECS", "3"),
            ("GEOCODE_REGION", "in"),
            ("GEOCODE_COUNTRY", "IN"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.provider_timeout_secs, 3);
        assert_eq!(config.region_bias, RegionBias::region("in").with_country("IN"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(WebConfig::from_lookup(lookup(&[("WEB_BIND_ADDRESS", "localhost")])).is_none());
        assert!(WebConfig::from_lookup(lookup(&[("PROVIDER_TIMEOUT_SECS", "soon")])).is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(WebConfig::from_lookup(lookup(&[("PROVIDER_TIMEOUT_SECS", "0")])).is_none());
        let config = WebConfig::from_lookup(lookup(&[("PROVIDER_TIMEOUT_SECS", "1")])).unwrap();
        assert_eq!(config.provider_timeout(), Duration::from_secs(1));
    }
}
