//! Command-line flags.
//!
//! Every request flag can also come from a `WEATHER_*` environment variable.
//! Credentials are never flags: they only come from `METEOMATICS_USERNAME`
//! and `METEOMATICS_PASSWORD`.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "weather",
    version,
    about = "Fetch a Meteomatics weather dataset and print it as redacted JSON"
)]
pub struct Cli {
    /// Datetime segment, e.g. 2024-10-23T00:00:00Z
    #[arg(long, env = "WEATHER_DATETIME")]
    pub datetime: Option<String>,

    /// Comma-separated parameters, e.g. t_2m:C,precip_1h:mm
    #[arg(long, env = "WEATHER_PARAMETERS")]
    pub parameters: Option<String>,

    /// Location as latitude,longitude
    #[arg(long, env = "WEATHER_LOCATION", allow_hyphen_values = true)]
    pub location: Option<String>,

    /// Output format segment
    #[arg(long, env = "WEATHER_FORMAT")]
    pub format: Option<String>,

    /// API base URL (https, or http for loopback hosts)
    #[arg(long, env = "WEATHER_BASE_URL")]
    pub base_url: Option<String>,

    /// TOML settings file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write logs to <DIR>/weather.log
    #[arg(long, env = "WEATHER_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log to stderr (-v info, -vv debug, -vvv trace); silent by default
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Off,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
