use std::path::PathBuf;

use clap::Parser;
use rgb_floodlight_daemon::app;
use rgb_floodlight_daemon::config::{DEFAULT_CONFIG_FILE, Settings};

/// RGB floodlight daemon
///
/// Renders color wheel effects on a PCA9685 driven floodlight and exposes it
/// to Home Assistant over MQTT
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// INI configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// State file, overrides `State_File` of the configuration
    #[arg(short, long, value_name = "FILE")]
    state: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("LOGLEVEL", "warn"))
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)?;
    if let Some(state) = cli.state {
        settings.floodlight.state_file = state;
    }
    log::debug!("Loaded configuration from '{}'", cli.config.display());

    app::run(&settings)
}
