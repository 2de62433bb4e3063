use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use keepsake::config::AppConfig;

#[derive(Parser)]
#[command(name = "keepsake-server")]
#[command(about = "Serve the built keepsake page")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory served for every path other than / and /bonus
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        config.server.static_dir = static_dir;
    }

    keepsake::server::run(&config.server)
        .await
        .with_context(|| format!("Server on port {} failed", config.server.port))
}
