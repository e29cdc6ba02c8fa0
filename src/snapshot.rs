//! Snapshot persistence: the serialized form of the whole collection.
//!
//! The snapshot is a JSON array of canonical records. Reads are forgiving
//! (anything unusable falls back to the bundled seed dataset); writes are
//! best-effort and the store treats their failure as a warning.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::product::Product;

/// Bundled starter catalog used when no snapshot can be restored.
const SEED_JSON: &str = include_str!("data/products.json");

/// Read a previously persisted snapshot.
///
/// `None` means nothing usable was found: no file, unreadable bytes, a top
/// level that is not a JSON array, or an empty one. Corruption is logged
/// here; the caller picks the fallback.
pub fn load(path: &Path) -> Option<Vec<Value>> {
    if !path.exists() {
        return None;
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(target: "snapshot", error = %err, path = %path.display(), "snapshot unreadable");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(records)) if !records.is_empty() => Some(records),
        Ok(_) => {
            warn!(target: "snapshot", path = %path.display(), "snapshot is not a non-empty JSON array");
            None
        }
        Err(err) => {
            warn!(target: "snapshot", error = %err, path = %path.display(), "snapshot is not valid JSON");
            None
        }
    }
}

/// The bundled seed dataset, parsed.
pub fn seed() -> Vec<Value> {
    match serde_json::from_str(SEED_JSON) {
        Ok(records) => records,
        Err(err) => {
            warn!(target: "snapshot", error = %err, "bundled seed dataset failed to parse");
            Vec::new()
        }
    }
}

/// Serialize the collection to disk, creating parent directories as needed.
pub fn save(path: &Path, games: &[Product]) -> Result<()> {
    let body = serde_json::to_string_pretty(games).context("serialize snapshot")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create snapshot directory {}", parent.display()))?;
        }
    }
    fs::write(path, body).with_context(|| format!("write snapshot {}", path.display()))
}

/// Copy the current snapshot aside before a migration overwrites it.
/// Returns the backup path.
pub fn back_up(path: &Path) -> Result<PathBuf> {
    let mut backup = path.as_os_str().to_os_string();
    backup.push(".bak");
    let backup = PathBuf::from(backup);
    fs::copy(path, &backup)
        .with_context(|| format!("back up snapshot to {}", backup.display()))?;
    Ok(backup)
}

/// Offline snapshot migration: run every persisted record through
/// normalization and rewrite the file in place, backing up the old one
/// first. Records keep all their fields, including ones the catalog itself
/// would drop, so a migration never loses data it does not understand.
/// Returns the number of migrated records and the backup path.
pub fn migrate(path: &Path) -> Result<(usize, PathBuf)> {
    let records =
        load(path).with_context(|| format!("no readable snapshot at {}", path.display()))?;

    let migrated: Vec<Value> = records
        .iter()
        .map(|record| Value::Object(crate::normalize::normalize(record)))
        .collect();

    let backup = back_up(path)?;
    let body = serde_json::to_string_pretty(&migrated).context("serialize migrated snapshot")?;
    fs::write(path, body).with_context(|| format!("write migrated snapshot {}", path.display()))?;
    Ok((migrated.len(), backup))
}
