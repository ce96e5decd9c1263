//! Durable session storage.
//!
//! Stores the single persisted session in `<home>/session.json` with
//! restricted permissions (0600). Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cookbook_types::{PersistedSession, Session};

use crate::config::paths;

/// File-backed persistence adapter for the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default location (`<home>/session.json`).
    pub fn open_default() -> Self {
        Self::at(paths::session_path())
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted session.
    /// Returns `None` if nothing has been stored.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<PersistedSession>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read session from {}", self.path.display())
                });
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    /// Saves the session, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&PersistedSession::from(session))
            .context("Failed to serialize session")?;

        let tmp_path = self.path.with_extension("json.tmp");
        write_private(&tmp_path, contents.as_bytes())?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Removes the persisted session. Returns whether one existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    Ok(())
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    let head: String = token.chars().take(12).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::*;

    fn session() -> Session {
        Session {
            email: "cook@example.com".to_string(),
            user_id: "uid-1".to_string(),
            token: "token-abc".to_string(),
            expires_at: Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_load_absent_returns_none() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("nested").join("session.json"));

        store.save(&session()).unwrap();

        let loaded = store.load().unwrap().expect("session stored");
        assert_eq!(Session::from(loaded), session());
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    }

    #[test]
    fn test_save_replaces_previous_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));

        store.save(&session()).unwrap();
        let mut second = session();
        second.email = "other@example.com".to_string();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().unwrap().email, "other@example.com");
    }

    #[test]
    fn test_saved_file_uses_wire_field_names() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"tokenExpirationDate\": \"2026-10-18T10:00:00.000Z\""));
        assert!(raw.contains("\"id\": \"uid-1\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_clear_reports_whether_removed() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));

        assert!(!store.clear().unwrap());
        store.save(&session()).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        fs::write(store.path(), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse session"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token("abcdefghijklmnopqrstuvwxyz"), "abcdefghijkl...");
    }
}
