//! JSON file slot: `<data_dir>/<key>.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;

use feedstock_stock::MovementRecord;

use super::payload;
use super::r#trait::{RecordStore, RecordStoreError};

/// What `load` does with a slot whose content cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptDataPolicy {
    /// Surface the decode error.
    #[default]
    Fail,
    /// Move the damaged file aside to `<key>.json.corrupt` (or `.corrupt.N`
    /// when earlier ones exist) and start empty.
    Reset,
}

#[derive(Debug, Error)]
#[error("unknown corrupt-data policy {0:?} (expected `fail` or `reset`)")]
pub struct ParsePolicyError(String);

impl core::str::FromStr for CorruptDataPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(CorruptDataPolicy::Fail),
            "reset" => Ok(CorruptDataPolicy::Reset),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Record store backed by one JSON file per storage key.
///
/// Writes go to a sibling temp file that is then renamed over the slot, so a
/// crash mid-write leaves the previous content intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    key: String,
    on_corrupt: CorruptDataPolicy,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Result<Self, RecordStoreError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            dir: dir.into(),
            key,
            on_corrupt: CorruptDataPolicy::default(),
        })
    }

    pub fn with_corrupt_policy(mut self, policy: CorruptDataPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path of the slot file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}.json.{suffix}", self.key))
    }

    /// First `corrupt` sibling name not taken by an earlier quarantine.
    fn free_aside(&self) -> Result<PathBuf, RecordStoreError> {
        for n in 0u32.. {
            let aside = match n {
                0 => self.sibling("corrupt"),
                n => self.sibling(&format!("corrupt.{n}")),
            };
            match fs::symlink_metadata(&aside) {
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(aside),
                Err(e) => return Err(RecordStoreError::io(&aside, e)),
                Ok(_) => continue,
            }
        }
        Err(RecordStoreError::io(
            self.sibling("corrupt"),
            std::io::Error::other("no free quarantine name"),
        ))
    }

    fn quarantine(&self, path: &Path) -> Result<PathBuf, RecordStoreError> {
        let aside = self.free_aside()?;
        fs::rename(path, &aside).map_err(|e| RecordStoreError::io(&aside, e))?;
        Ok(aside)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<Vec<MovementRecord>, RecordStoreError> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "record slot not found; starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(RecordStoreError::io(&path, e)),
        };

        match payload::decode(&text) {
            Ok(records) => {
                tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
                Ok(records)
            }
            Err(err) if err.is_corrupt_payload() && self.on_corrupt == CorruptDataPolicy::Reset => {
                let aside = self.quarantine(&path)?;
                tracing::warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %err,
                    "stored records are unreadable; starting with an empty list"
                );
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, records: &[MovementRecord]) -> Result<(), RecordStoreError> {
        let text = payload::encode(records)?;

        fs::create_dir_all(&self.dir).map_err(|e| RecordStoreError::io(&self.dir, e))?;

        let tmp = self.sibling("tmp");
        let path = self.path();
        fs::write(&tmp, text).map_err(|e| RecordStoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| RecordStoreError::io(&path, e))?;

        tracing::debug!(path = %path.display(), count = records.len(), "saved records");
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), RecordStoreError> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(RecordStoreError::InvalidKey(key.to_string()))
    }
}

/// Resolve the default data directory: `{app_data_dir}/feedstock`.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join("feedstock"))
}
