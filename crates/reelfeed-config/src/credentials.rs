use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// On-disk layout of `credentials.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tmdb_api_key: Option<String>,
    /// Keys written by other versions are carried through untouched
    #[serde(flatten)]
    other: BTreeMap<String, String>,
}

/// Secrets kept out of `config.toml` so the config can be shared safely.
pub struct CredentialStore {
    path: PathBuf,
    stored: StoredCredentials,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            stored: StoredCredentials::default(),
        }
    }

    /// Read the file. A missing file is an empty store.
    pub fn load(&mut self) -> Result<()> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", self.path.display())),
        };
        self.stored =
            toml::from_str(&content).with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(&self.stored)?)
            .with_context(|| format!("writing {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    pub fn get_tmdb_api_key(&self) -> Option<&String> {
        self.stored.tmdb_api_key.as_ref()
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.stored.tmdb_api_key = Some(key);
    }

    /// Delete the credentials file altogether
    pub fn clear(&mut self) -> Result<()> {
        self.stored = StoredCredentials::default();
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_credentials_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.toml");

        let mut store = CredentialStore::new(path.clone());
        store.load().unwrap();
        assert!(store.get_tmdb_api_key().is_none());

        store.set_tmdb_api_key("abc123".to_string());
        store.save().unwrap();

        let mut reloaded = CredentialStore::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_tmdb_api_key().map(String::as_str), Some("abc123"));
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "other_token = \"keep-me\"\n").unwrap();

        let mut store = CredentialStore::new(path.clone());
        store.load().unwrap();
        store.set_tmdb_api_key("abc123".to_string());
        store.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("other_token = \"keep-me\""));
        assert!(content.contains("tmdb_api_key = \"abc123\""));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "tmdb_api_key = [").unwrap();

        let mut store = CredentialStore::new(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.toml");

        let mut store = CredentialStore::new(path.clone());
        store.set_tmdb_api_key("abc123".to_string());
        store.save().unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.get_tmdb_api_key().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }
}
