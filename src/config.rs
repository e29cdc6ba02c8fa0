//! Environment-driven configuration: centralized dotenv loading and the few
//! knobs the catalog exposes.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Load `.env` exactly once; safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Optional env var (None if unset or blank).
fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Parsed env var with default fallback.
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match env_opt(key) {
        Some(raw) => raw.parse().unwrap_or(default),
        None => default,
    }
}

pub const DEFAULT_SNAPSHOT_PATH: &str = "catalog.json";

/// Keys credited per uploaded key-file attachment. The attachment's content
/// is never parsed; each submission is worth one fixed batch.
pub const DEFAULT_KEYS_PER_BATCH: u64 = 10;

/// Runtime settings for a catalog instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the collection snapshot is persisted.
    pub snapshot_path: PathBuf,
    /// Batch size credited per key-file submission.
    pub keys_per_batch: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: DEFAULT_SNAPSHOT_PATH.into(),
            keys_per_batch: DEFAULT_KEYS_PER_BATCH,
        }
    }
}

impl Config {
    /// Read `CATALOG_SNAPSHOT` and `CATALOG_KEYS_PER_BATCH`, with defaults.
    pub fn from_env() -> Self {
        Self {
            snapshot_path: env_opt("CATALOG_SNAPSHOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.into()),
            keys_per_batch: env_parse("CATALOG_KEYS_PER_BATCH", DEFAULT_KEYS_PER_BATCH),
        }
    }

    /// Default settings persisting to `path`. Handy for tests and tools.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { snapshot_path: path.into(), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_policy_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.snapshot_path, PathBuf::from("catalog.json"));
        assert_eq!(cfg.keys_per_batch, 10);
    }

    #[test]
    fn at_overrides_only_the_path() {
        let cfg = Config::at("/tmp/other.json");
        assert_eq!(cfg.snapshot_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(cfg.keys_per_batch, DEFAULT_KEYS_PER_BATCH);
    }
}
