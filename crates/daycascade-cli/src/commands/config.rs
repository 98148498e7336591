//! Configuration commands for CLI.

use clap::Subcommand;
use daycascade_core::time::format_duration;
use daycascade_core::{Config, ConfigError, PlacementCoordinator};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timeline.view_start_hour", "placement.overflow")
        key: String,
    },
    /// Set a config value and save it
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List every setting as `key = value`
    List {
        /// Print the config as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Validate the saved config and show the placement settings it yields
    Check,
    /// Print the config file location
    Path,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let saved = config.get(&key).unwrap_or(value);
            println!("{key} = {saved}");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for (key, value) in config.entries() {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Check => {
            let config = Config::load()?;
            config.validate()?;
            let view = PlacementCoordinator::from_config(&config)?.view();
            println!(
                "view: {:02}:00-{:02}:00, padding {}px",
                view.start_hour, view.end_hour, config.timeline.top_padding_px
            );
            println!(
                "default duration: {}",
                format_duration(config.placement.default_duration_minutes)
            );
            println!(
                "overflow: {}",
                config.get("placement.overflow").unwrap_or_default()
            );
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
