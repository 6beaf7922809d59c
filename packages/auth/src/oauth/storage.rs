// ABOUTME: File-backed persistence for the single token record
// ABOUTME: Missing or corrupt files read as absent, never as a load failure

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AuthResult;
use crate::oauth::types::TokenRecord;

/// JSON-file store holding the one active token record.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record. Absence and corruption both yield `None`;
    /// corruption is only reported as a diagnostic.
    pub fn load(&self) -> Option<TokenRecord> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No token file at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(record) => {
                debug!("Loaded token record from {}", self.path.display());
                Some(record)
            }
            Err(e) => {
                warn!(
                    "Token file {} is corrupt, treating as absent: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Overwrite the persisted record entirely.
    pub fn save(&self, record: &TokenRecord) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, &data)?;

        // Bearer credentials on disk are owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!("Saved token record to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TokenRecord {
        TokenRecord {
            access_token: "abc".to_string(),
            refresh_token: Some("r1".to_string()),
            expires_in: 43_200,
            expires_at: 1_700_043_200,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_load_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("tokens.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("tokens.json"));

        store.save(&sample_record()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token, "abc");
        assert_eq!(loaded.refresh_token.as_deref(), Some("r1"));
        assert_eq!(loaded.expires_at, 1_700_043_200);
    }

    #[test]
    fn test_corrupt_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = CredentialStore::new(&path);
        assert!(store.load().is_none());

        // A fresh save overwrites the corrupt contents cleanly.
        store.save(&sample_record()).unwrap();
        assert!(store.load().is_some());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested/dir/tokens.json"));
        store.save(&sample_record()).unwrap();
        assert!(store.load().is_some());
    }

    #[test]
    fn test_persisted_shape_has_expected_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("tokens.json"));
        store.save(&sample_record()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        for key in [
            "access_token",
            "refresh_token",
            "expires_in",
            "expires_at",
            "created_at",
            "updated_at",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("tokens.json"));
        store.save(&sample_record()).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
