use super::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelfeed_config::{is_placeholder_api_key, Config, CredentialStore, PathManager, TMDB_API_KEY_ENV};
use serde_json::json;
use std::path::{Path, PathBuf};

pub async fn run_config(cmd: ConfigCommands, config_path: Option<&Path>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, config_path, output).await,
        ConfigCommands::Init { force } => init_config(force, config_path, output).await,
        ConfigCommands::Tmdb { api_key } => configure_tmdb(api_key, output).await,
    }
}

/// `--config` when given, otherwise `config.toml` in the config directory
pub fn config_file_path(config_path: Option<&Path>, path_manager: &PathManager) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path_manager.config_file())
}

/// Load the effective configuration. A missing default file means defaults;
/// a missing file named with `--config` is an error.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path_manager = PathManager::default();
    let config_file = config_file_path(config_path, &path_manager);

    let config = match config_path {
        Some(path) if !path.exists() => {
            return Err(eyre!("Config file not found: {}", path.display()));
        }
        Some(_) => Config::load_from_file(&config_file),
        None => Config::load_or_default(&config_file),
    }
    .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    tracing::debug!("Loaded configuration from {}", config_file.display());
    Ok(config)
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(cred_store)
}

/// The TMDb key to use and where it came from
pub fn resolve_api_key(path_manager: &PathManager) -> Result<Option<(String, &'static str)>> {
    let env_key = std::env::var(TMDB_API_KEY_ENV).ok();
    let from_env = env_key.as_deref().is_some_and(|k| !is_placeholder_api_key(k));
    let cred_store = load_credentials(path_manager)?;

    Ok(
        Config::resolve_tmdb_api_key(env_key, cred_store.get_tmdb_api_key()).map(|key| {
            let source = if from_env { TMDB_API_KEY_ENV } else { "credentials file" };
            (key, source)
        }),
    )
}

async fn show_config(full: bool, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = config_file_path(config_path, &path_manager);
    let mut config = load_config(config_path)?;
    config.apply_env_overrides();

    let api_key = resolve_api_key(&path_manager)?;
    let key_display = match &api_key {
        Some((key, _)) if full => key.clone(),
        Some((key, _)) => mask_string(key),
        None => "<not set>".to_string(),
    };
    let key_source = api_key.as_ref().map(|(_, source)| *source);

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "letterboxd": {
                "username": config.letterboxd.username,
                "feed_url": config.letterboxd.feed_url(),
                "max_reviews": config.letterboxd.max_reviews,
            },
            "tmdb": {
                "api_key": key_display,
                "api_key_source": key_source,
                "api_base_url": config.tmdb.api_base_url,
                "image_base_url": config.tmdb.image_base_url,
                "image_size": config.tmdb.image_size,
                "strategy_delay_ms": config.tmdb.strategy_delay_ms,
                "alternate_titles": config.tmdb.alternate_titles,
            },
            "output": {
                "path": config.output.path.display().to_string(),
                "item_delay_ms": config.output.item_delay_ms,
            },
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "╔════════════════════════════════════════════════════════════╗".bright_white());
    println!("{} {}", "║".bright_white(), "ReelFeed Configuration".bright_cyan().bold());
    println!("{}", "╚════════════════════════════════════════════════════════════╝".bright_white());
    println!();

    let file_state = if config_file.exists() { "" } else { " (not created, using defaults)" };
    let mut info_table = styled_table();
    info_table.set_header(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(format!("{}{}", config_file.display(), file_state)),
    ]);
    println!("{}\n", info_table);

    let mut letterboxd_table = section_table("Letterboxd");
    letterboxd_table.add_row(vec!["Username", config.letterboxd.username.as_str()]);
    letterboxd_table.add_row(vec!["Feed URL".to_string(), config.letterboxd.feed_url()]);
    letterboxd_table.add_row(vec!["Max Reviews".to_string(), config.letterboxd.max_reviews.to_string()]);
    println!("{}\n", letterboxd_table);

    let mut tmdb_table = section_table("TMDb");
    let key_cell = match key_source {
        Some(source) => format!("{} (from {})", key_display, source),
        None => format!("{} (posters disabled)", key_display),
    };
    tmdb_table.add_row(vec!["API Key".to_string(), key_cell]);
    tmdb_table.add_row(vec!["API Base URL", config.tmdb.api_base_url.as_str()]);
    tmdb_table.add_row(vec![
        "Image URL".to_string(),
        format!("{}/{}", config.tmdb.image_base_url.trim_end_matches('/'), config.tmdb.image_size),
    ]);
    tmdb_table.add_row(vec!["Strategy Delay".to_string(), format!("{} ms", config.tmdb.strategy_delay_ms)]);
    tmdb_table.add_row(vec![
        "Alternate Titles".to_string(),
        format!("{} configured (plus built-in)", config.tmdb.alternate_titles.len()),
    ]);
    println!("{}\n", tmdb_table);

    let mut output_table = section_table("Output");
    output_table.add_row(vec!["Path".to_string(), config.output.path.display().to_string()]);
    output_table.add_row(vec!["Item Delay".to_string(), format!("{} ms", config.output.item_delay_ms)]);
    println!("{}", output_table);

    Ok(())
}

async fn init_config(force: bool, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    let config_file = config_file_path(config_path, &path_manager);

    if config_file.exists() && !force {
        output.warn(format!("Config file already exists at {}", config_file.display()));
        output.println("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

async fn configure_tmdb(api_key_arg: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    let mut cred_store = load_credentials(&path_manager)?;

    let api_key = match api_key_arg {
        Some(key) => key,
        None => {
            print_section_header("TMDb API Key Setup", output);
            output.println("  Create a key at https://www.themoviedb.org/settings/api (API Key v3 auth).");
            output.println("");

            let has_stored = cred_store
                .get_tmdb_api_key()
                .is_some_and(|k| !is_placeholder_api_key(k));
            if has_stored && !prompts::prompt_yes_no("A TMDb API key is already stored. Replace it?", false)? {
                output.info("Keeping the stored key.");
                return Ok(());
            }
            prompts::prompt_password("TMDb API key")?
        }
    };

    let api_key = api_key.trim().to_string();
    if is_placeholder_api_key(&api_key) {
        return Err(eyre!("API key is required"));
    }

    cred_store.set_tmdb_api_key(api_key.clone());
    let credentials_file = path_manager.credentials_file();
    cred_store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    output.success(format!("TMDb API key saved to {}", credentials_file.display()));
    output.println(format!("  Key: {}", mask_string(&api_key)));
    if std::env::var(TMDB_API_KEY_ENV).is_ok_and(|k| !is_placeholder_api_key(&k)) {
        output.warn(format!("{} is set and takes precedence over the stored key", TMDB_API_KEY_ENV));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    if is_placeholder_api_key(s) {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn section_table(title: &str) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new(format!("{} Configuration", title))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table
}

fn print_section_header(title: &str, output: &Output) {
    output.println("");
    output.println(format!("{}", title.bold().bright_cyan()));
    output.println(format!("{}", "─".repeat(title.chars().count()).bright_cyan()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("YOUR_TMDB_API_KEY"), "<not set>");
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("0123456789abcdef"), "01***ef");
    }

    #[test]
    fn test_config_file_path_prefers_explicit_path() {
        let path_manager = PathManager::with_base_dir(PathBuf::from("/tmp/reelfeed-test"));
        assert_eq!(
            config_file_path(Some(Path::new("custom.toml")), &path_manager),
            PathBuf::from("custom.toml")
        );
        assert_eq!(config_file_path(None, &path_manager), path_manager.config_file());
    }
}
