pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{
    is_placeholder_api_key, Config, LetterboxdConfig, OutputConfig, TmdbConfig, TMDB_API_KEY_ENV,
    TMDB_API_KEY_PLACEHOLDER, USERNAME_ENV,
};
pub use credentials::CredentialStore;
pub use paths::PathManager;
