//! Configuration loading.
//!
//! Values come from environment variables with defaults; the CLI may override
//! them afterwards.

use std::path::PathBuf;

use anyhow::Context;

use feedstock_infra::{CorruptDataPolicy, JsonFileStore, default_data_dir};

pub const ENV_DATA_DIR: &str = "FEEDSTOCK_DATA_DIR";
pub const ENV_STORAGE_KEY: &str = "FEEDSTOCK_STORAGE_KEY";
pub const ENV_LOW_STOCK_KG: &str = "FEEDSTOCK_LOW_STOCK_KG";
pub const ENV_ON_CORRUPT: &str = "FEEDSTOCK_ON_CORRUPT";

pub const DEFAULT_STORAGE_KEY: &str = "foodRecords";
pub const DEFAULT_LOW_STOCK_KG: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the record slot file.
    pub data_dir: PathBuf,
    /// Storage key; the slot file is `<data_dir>/<storage_key>.json`.
    pub storage_key: String,
    /// Balances under this many kilograms raise a low-stock alert.
    pub low_stock_kg: f64,
    pub on_corrupt: CorruptDataPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_dir = match lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let storage_key = lookup(ENV_STORAGE_KEY)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        let low_stock_kg = match lookup(ENV_LOW_STOCK_KG) {
            None => DEFAULT_LOW_STOCK_KG,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => v,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = DEFAULT_LOW_STOCK_KG,
                        "{ENV_LOW_STOCK_KG} is not a non-negative number; using default"
                    );
                    DEFAULT_LOW_STOCK_KG
                }
            },
        };

        let on_corrupt = match lookup(ENV_ON_CORRUPT) {
            None => CorruptDataPolicy::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "{ENV_ON_CORRUPT} not understood; failing on corrupt data");
                CorruptDataPolicy::default()
            }),
        };

        Ok(Self {
            data_dir,
            storage_key,
            low_stock_kg,
            on_corrupt,
        })
    }

    /// The record store this configuration points at.
    pub fn open_store(&self) -> anyhow::Result<JsonFileStore> {
        let store = JsonFileStore::new(&self.data_dir, &self.storage_key)
            .with_context(|| format!("cannot use storage key {:?}", self.storage_key))?;
        Ok(store.with_corrupt_policy(self.on_corrupt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/srv/feedstock"),
            (ENV_STORAGE_KEY, "schoolA"),
            (ENV_LOW_STOCK_KG, "25.5"),
            (ENV_ON_CORRUPT, "reset"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/feedstock"));
        assert_eq!(config.storage_key, "schoolA");
        assert_eq!(config.low_stock_kg, 25.5);
        assert_eq!(config.on_corrupt, CorruptDataPolicy::Reset);
        assert_eq!(
            config.open_store().unwrap().path(),
            PathBuf::from("/srv/feedstock/schoolA.json")
        );
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/tmp/fs"),
            (ENV_LOW_STOCK_KG, "-3"),
            (ENV_ON_CORRUPT, "shrug"),
        ]))
        .unwrap();

        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.low_stock_kg, DEFAULT_LOW_STOCK_KG);
        assert_eq!(config.on_corrupt, CorruptDataPolicy::Fail);
    }

    #[test]
    fn unsafe_storage_key_is_reported_on_open() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/tmp/fs"),
            (ENV_STORAGE_KEY, "../../etc/passwd"),
        ]))
        .unwrap();
        assert!(config.open_store().is_err());
    }
}
