use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use keepsake::app::KeepsakeApp;
use keepsake::config::AppConfig;

#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Walk through the keepsake room on the desktop")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the layout's image, model and sound paths are relative to
    #[arg(long)]
    asset_root: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(asset_root) = cli.asset_root {
        config.viewer.asset_root = asset_root;
    }

    KeepsakeApp::new(config).run().context("Viewer exited with an error")
}
