use std::path::PathBuf;

use clap::Parser;

/// Network simulation for Docker containers using Toxiproxy.
///
/// Exactly one action runs per invocation. `--list` wins over everything,
/// then `--clear`, `--disable` and `--enable` in that order; otherwise the
/// requested conditions are applied to `--proxy`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "netsim", version)]
pub struct Args {
    /// List available proxies
    #[arg(long)]
    pub list: bool,

    /// Proxy name to modify
    #[arg(long, value_name = "NAME")]
    pub proxy: Option<String>,

    /// Duration in seconds for the toxic condition
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<u64>,

    /// Clear all toxics from the proxy
    #[arg(long)]
    pub clear: bool,

    /// Add latency in milliseconds
    #[arg(long, value_name = "MS")]
    pub latency: Option<u64>,

    /// Add jitter in milliseconds
    #[arg(long, value_name = "MS", requires = "latency")]
    pub jitter: Option<u64>,

    /// Add packet loss percentage (0-100)
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    pub loss: Option<f64>,

    /// Limit bandwidth in kbps
    #[arg(long, value_name = "KBPS")]
    pub bandwidth: Option<u64>,

    /// Disable the proxy (complete outage)
    #[arg(long)]
    pub disable: bool,

    /// Enable a disabled proxy
    #[arg(long)]
    pub enable: bool,

    /// Base address of the Toxiproxy admin API [default: http://localhost:8474]
    #[arg(long, env = "NETSIM_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Configuration file (defaults to <config dir>/netsim/config.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
