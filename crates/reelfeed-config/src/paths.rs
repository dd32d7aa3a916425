use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable that relocates every reelfeed file
pub const CONFIG_DIR_ENV: &str = "REELFEED_CONFIG_DIR";

pub struct PathManager {
    config_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Self::with_base_dir(PathBuf::from(dir)));
            }
        }

        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("reelfeed");

        Ok(Self::with_base_dir(base_dir))
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            log_dir: base_dir.join("logs"),
            config_dir: base_dir,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.log_dir.join("reelfeed.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Fall back to the working directory when no platform config dir exists
        Self::new().unwrap_or_else(|_| Self::with_base_dir(PathBuf::from(".reelfeed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_from_base_dir() {
        let paths = PathManager::with_base_dir(PathBuf::from("/tmp/reelfeed-test"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/reelfeed-test/config.toml"));
        assert_eq!(paths.credentials_file(), PathBuf::from("/tmp/reelfeed-test/credentials.toml"));
        assert_eq!(paths.default_log_file(), PathBuf::from("/tmp/reelfeed-test/logs/reelfeed.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base_dir(dir.path().join("nested"));
        paths.ensure_directories().unwrap();
        assert!(paths.config_dir().exists());
        assert!(paths.log_dir().exists());
    }
}
