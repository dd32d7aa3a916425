use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Value shipped in sample configs; treated the same as a missing key
pub const TMDB_API_KEY_PLACEHOLDER: &str = "YOUR_TMDB_API_KEY";

pub const USERNAME_ENV: &str = "LETTERBOXD_USERNAME";
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub letterboxd: LetterboxdConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LetterboxdConfig {
    #[serde(default = "default_username")]
    pub username: String,
    /// Overrides the feed URL derived from `username`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(default = "default_max_reviews")]
    pub max_reviews: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Width tier inserted into image URLs, e.g. "w500"
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_strategy_delay_ms")]
    pub strategy_delay_ms: u64,
    /// Extra title -> alternate query entries, merged over the built-in table
    #[serde(default)]
    pub alternate_titles: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
}

fn default_username() -> String {
    "dafandikri".to_string()
}

fn default_max_reviews() -> usize {
    5
}

fn default_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_image_size() -> String {
    "w500".to_string()
}

fn default_strategy_delay_ms() -> u64 {
    200
}

fn default_output_path() -> PathBuf {
    PathBuf::from("public/data/letterboxd_reviews.json")
}

fn default_item_delay_ms() -> u64 {
    250
}

impl Default for LetterboxdConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            feed_url: None,
            max_reviews: default_max_reviews(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            image_size: default_image_size(),
            strategy_delay_ms: default_strategy_delay_ms(),
            alternate_titles: BTreeMap::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            item_delay_ms: default_item_delay_ms(),
        }
    }
}

impl LetterboxdConfig {
    /// The RSS URL for the configured member
    pub fn feed_url(&self) -> String {
        match &self.feed_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!(
                "https://letterboxd.com/{}/rss/",
                urlencoding::encode(self.username.trim())
            ),
        }
    }
}

/// Empty keys and the sample placeholder both mean "no key"
pub fn is_placeholder_api_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key == TMDB_API_KEY_PLACEHOLDER
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `LETTERBOXD_USERNAME` if it is set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(username) = std::env::var(USERNAME_ENV) {
            if !username.trim().is_empty() {
                self.letterboxd.username = username;
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.letterboxd.feed_url.is_none() && self.letterboxd.username.trim().is_empty() {
            return Err(anyhow::anyhow!("letterboxd.username is required"));
        }
        if self.letterboxd.max_reviews == 0 {
            return Err(anyhow::anyhow!("letterboxd.max_reviews must be at least 1"));
        }
        if self.tmdb.image_size.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.image_size cannot be empty"));
        }
        if self.tmdb.api_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.api_base_url cannot be empty"));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("output.path cannot be empty"));
        }
        Ok(())
    }

    /// Pick the TMDb key: environment first, then the credential store.
    /// Placeholders are filtered out at each step.
    pub fn resolve_tmdb_api_key(env_key: Option<String>, stored_key: Option<&String>) -> Option<String> {
        env_key
            .filter(|k| !is_placeholder_api_key(k))
            .or_else(|| stored_key.filter(|k| !is_placeholder_api_key(k)).cloned())
            .map(|k| k.trim().to_string())
    }
}
