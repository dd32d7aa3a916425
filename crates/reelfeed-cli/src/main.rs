use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, fetch};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelfeed")]
#[command(about = "ReelFeed - Letterboxd reviews, enriched with TMDb artwork, as JSON")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily rotated file instead of stderr.
    /// Without a value the file goes to the config directory's logs/ folder
    #[arg(long, value_name = "PATH", global = true, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch recent reviews and write the JSON document
    #[command(long_about = "Fetch the Letterboxd RSS feed, normalize the most recent reviews, look each film up on TMDb for a poster (when an API key is configured) and write the result as a JSON array.")]
    Fetch {
        /// Letterboxd username (overrides config and LETTERBOXD_USERNAME)
        #[arg(long)]
        username: Option<String>,

        /// Where to write the JSON document
        #[arg(long, value_name = "PATH")]
        output_path: Option<PathBuf>,

        /// How many feed items to process
        #[arg(long, value_name = "N")]
        max_reviews: Option<usize>,

        /// Skip the TMDb lookup even when an API key is configured
        #[arg(long, action = ArgAction::SetTrue)]
        no_enrich: bool,

        /// Print the JSON document instead of writing it
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Show or change configuration
    #[command(long_about = "Manage configuration and the stored TMDb API key. Running without a subcommand shows the effective configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Remove stored credentials
    Clear {
        /// Remove the stored TMDb API key
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Store the TMDb API key
    #[command(long_about = "Store the TMDb v3 API key in the credentials file. Get one at https://www.themoviedb.org/settings/api. The TMDB_API_KEY environment variable takes precedence over the stored key.")]
    Tmdb {
        /// TMDb API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| reelfeed_config::PathManager::default().default_log_file()));
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to initialize logging: {}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Fetch {
            username,
            output_path,
            max_reviews,
            no_enrich,
            dry_run,
        } => {
            let args = fetch::FetchArgs {
                username,
                output_path,
                max_reviews,
                no_enrich,
                dry_run,
            };
            fetch::run_fetch(args, config_path, &output).await
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, config_path, &output).await
        }
        Commands::Clear { credentials } => clear::run_clear(credentials, &output).await,
    };

    if let Err(e) = result {
        let message = e.chain().map(|cause| cause.to_string()).collect::<Vec<_>>().join(": ");
        output.error(message);
        std::process::exit(1);
    }
    Ok(())
}
