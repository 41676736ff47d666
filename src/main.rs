//! # powerbar
//!
//! Reads a JSON status snapshot from stdin and prints the primary status row,
//! followed by the secondary row when anything overflowed.
//!
//! ```bash
//! echo '{"model":{"name":"Claude Sonnet 4","context_window":200000}}' | powerbar --width 100
//! ```

use clap::{Parser, Subcommand};
use log::warn;
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use powerbar::config::Config;
use powerbar::presets::BuiltinPreset;
use powerbar::segments::SegmentId;
use powerbar::theme::ThemeManager;
use powerbar::{render_from_json, version_string, Result, StatusBar};

/// powerbar - a powerline-style status line
#[derive(Parser)]
#[command(name = "powerbar")]
#[command(version = env!("POWERBAR_VERSION"))]
#[command(about = "A powerline-style status line for terminal UIs", long_about = None)]
#[command(
    after_help = "Input: Reads a JSON status snapshot from stdin\n\nExample:\n  echo '{\"cwd\":\"/path\"}' | powerbar --preset minimal"
)]
struct Cli {
    /// Available columns (defaults to $COLUMNS, then the configured default)
    #[arg(short, long)]
    width: Option<usize>,

    /// Preset to render (overrides the config file and POWERBAR_PRESET)
    #[arg(short, long)]
    preset: Option<String>,

    /// Config file to use instead of the standard locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Show detailed version information
    #[arg(long = "version-full")]
    version_full: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate example config file
    GenerateConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List available presets
    Presets,

    /// List available segments
    Segments,

    /// List available themes
    Themes,
}

fn main() -> Result<()> {
    // Initialize logging with WARN level by default (can be overridden with RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.version_full {
        print!("{}", version_string());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref());
    if let Some(preset) = &cli.preset {
        config.preset = Some(preset.clone());
    }
    if cli.no_color {
        config.color = false;
    }

    if let Some(command) = cli.command {
        return run_command(command, &config);
    }

    let width = cli
        .width
        .or_else(|| env::var("COLUMNS").ok().and_then(|c| c.trim().parse().ok()))
        .unwrap_or(config.display.default_width);

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let mut bar = StatusBar::from_config(&config);
    let layout = render_from_json(&mut bar, &buffer, width);

    println!("{}", layout.top_content);
    if !layout.secondary_content.is_empty() {
        println!("{}", layout.secondary_content);
    }

    Ok(())
}

/// Loads the config, logging and falling back to defaults on errors so a
/// broken file never suppresses the status line.
fn load_config(path: Option<&std::path::Path>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from_file(path).map(|mut config| {
            config.apply_env_overrides();
            config
        }),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    })
}

fn run_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::GenerateConfig { force } => {
            let config_path = Config::default_config_path()?;
            if config_path.exists() && !force {
                println!("Config file already exists at {}", config_path.display());
                println!("Use --force to overwrite it");
                return Ok(());
            }
            println!("Generating example config file at: {:?}", config_path);

            // Create parent directories
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&config_path, Config::example_toml())?;
            println!("Config file generated successfully!");
            println!("Edit {} to customize settings", config_path.display());
        }
        Commands::Presets => {
            let active = config.preset_or_default();
            for name in config.preset_catalog().names() {
                let marker = if name == active { "*" } else { " " };
                let description = name
                    .parse::<BuiltinPreset>()
                    .map(|preset| preset.description())
                    .unwrap_or("user-defined");
                println!("{} {:<10} {}", marker, name, description);
            }
        }
        Commands::Segments => {
            for id in SegmentId::ALL {
                println!("{:<20} {}", id.as_str(), id.description());
            }
        }
        Commands::Themes => {
            for name in ThemeManager::new().list_themes() {
                let marker = if name == config.theme { "*" } else { " " };
                println!("{} {}", marker, name);
            }
        }
    }
    Ok(())
}
