use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// AgroSphere inference gateway
#[derive(Debug, Parser)]
#[command(
    name = "agrosphere",
    about = "Routes agricultural queries to a crop predictor or an advisor model, with offline fallback"
)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "agrosphere.toml", env = "AGROSPHERE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "AGROSPHERE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter, in `tracing` env-filter syntax
    #[arg(long, default_value = "info", env = "AGROSPHERE_LOG")]
    pub log: String,
}
