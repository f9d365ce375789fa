//! Key-value media backing the persistence store.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::StorageError;
use crate::traits::KeyValueMedium;

/// `ENOSPC` on Unix-like systems.
const NO_SPACE_OS_ERROR: i32 = 28;

/// In-memory medium with optional byte quota and an availability switch.
#[derive(Debug, Default, Clone)]
pub struct MemoryMedium {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of keys plus values.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Simulate a medium that rejects every access.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_enabled(&self) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable("storage is disabled".into()));
        }
        Ok(())
    }
}

impl KeyValueMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_enabled()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_enabled()?;
        if let Some(quota) = self.quota_bytes {
            let current = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let used = self.used_bytes() - current;
            let needed = key.len() + value.len();
            if used + needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available: quota.saturating_sub(used),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_enabled()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed medium: one `<key>.json` file per key.
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so a failed write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileMedium {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileMedium {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota_bytes: None,
        }
    }

    pub fn with_quota(mut self, bytes: Option<u64>) -> Self {
        self.quota_bytes = bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key: {key:?}"),
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Bytes used by stored values other than `except`.
    fn used_bytes_except(&self, except: &Path) -> Result<u64, StorageError> {
        let mut total = 0;
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path == except || !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            total += entry.metadata()?.len();
        }
        Ok(total)
    }
}

fn map_write_error(key: &str, needed: usize, err: io::Error) -> StorageError {
    if err.raw_os_error() == Some(NO_SPACE_OS_ERROR) {
        StorageError::QuotaExceeded {
            key: key.to_string(),
            needed,
            available: 0,
        }
    } else if err.kind() == io::ErrorKind::PermissionDenied {
        StorageError::Unavailable(err.to_string())
    } else {
        StorageError::Io(err)
    }
}

impl KeyValueMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(StorageError::Unavailable(e.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let needed = value.len();
        std::fs::create_dir_all(&self.root).map_err(|e| {
            StorageError::Unavailable(format!("cannot create {}: {e}", self.root.display()))
        })?;

        if let Some(quota) = self.quota_bytes {
            let used = self.used_bytes_except(&path)?;
            if used + needed as u64 > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available: quota.saturating_sub(used) as usize,
                });
            }
        }

        let mut tmp =
            NamedTempFile::new_in(&self.root).map_err(|e| map_write_error(key, needed, e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| map_write_error(key, needed, e))?;
        tmp.persist(&path)
            .map_err(|e| map_write_error(key, needed, e.error))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let mut medium = MemoryMedium::new();
        assert_eq!(medium.get("k").unwrap(), None);
        medium.set("k", "v").unwrap();
        assert_eq!(medium.get("k").unwrap().as_deref(), Some("v"));
        medium.remove("k").unwrap();
        medium.remove("k").unwrap();
        assert_eq!(medium.get("k").unwrap(), None);
    }

    #[test]
    fn memory_quota_rejects_without_applying() {
        let mut medium = MemoryMedium::new().with_quota(10);
        medium.set("a", "1234").unwrap();
        let err = medium.set("b", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(medium.get("b").unwrap(), None);
        // Replacing an existing value only counts the new size.
        medium.set("a", "123456789").unwrap();
    }

    #[test]
    fn memory_disabled_is_unavailable() {
        let mut medium = MemoryMedium::new();
        medium.set_disabled(true);
        assert!(matches!(
            medium.set("k", "v"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(medium.get("k"), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut medium = FileMedium::new(dir.path().join("data"));
        assert_eq!(medium.get("interviewScores").unwrap(), None);
        medium.set("interviewScores", "[]").unwrap();
        assert_eq!(
            medium.get("interviewScores").unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.path().join("data/interviewScores.json").exists());
        medium.remove("interviewScores").unwrap();
        assert_eq!(medium.get("interviewScores").unwrap(), None);
    }

    #[test]
    fn file_quota_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut medium = FileMedium::new(dir.path()).with_quota(Some(16));
        medium.set("a", "0123456789").unwrap();
        let err = medium.set("b", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(medium.get("b").unwrap(), None);
        assert_eq!(medium.get("a").unwrap().as_deref(), Some("0123456789"));
    }

    #[test]
    fn file_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut medium = FileMedium::new(dir.path());
        assert!(medium.set("../escape", "x").is_err());
        assert!(medium.get("").is_err());
    }
}
