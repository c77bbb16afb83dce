use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::{DEFAULT_IDENTITY_HEADER, DEFAULT_REQUEST_LOG};
use super::parsers::{
    parse_duration_arg, parse_positive_u64, parse_positive_usize, parse_think_seconds,
};
use super::types::{HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP load generator - virtual users with randomized think time, race-free aggregation, and a per-request log."
)]
pub struct LoadArgs {
    /// Target URL (prompted for when missing and stdin is a terminal)
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method to use for every request of the run
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Duration of the run in seconds
    #[arg(long = "duration", short = 't', value_parser = parse_positive_u64)]
    pub target_duration: Option<PositiveU64>,

    /// Number of concurrent virtual users
    #[arg(long, short = 'c', value_parser = parse_positive_usize)]
    pub concurrency: Option<PositiveUsize>,

    /// Minimum think time between requests of one virtual user (seconds, fractional allowed)
    #[arg(long = "min-think", default_value = "0.5", value_parser = parse_think_seconds)]
    pub min_think: f64,

    /// Maximum think time between requests of one virtual user (seconds, fractional allowed)
    #[arg(long = "max-think", default_value = "1.5", value_parser = parse_think_seconds)]
    pub max_think: f64,

    /// Identity string attached to requests (repeatable; replaces the built-in catalog)
    #[arg(long = "identity")]
    pub identities: Vec<String>,

    /// File with one identity string per line (blank lines and '#' comments ignored)
    #[arg(long = "identity-file")]
    pub identity_file: Option<PathBuf>,

    /// Header that carries the identity string
    #[arg(long = "identity-header", default_value = DEFAULT_IDENTITY_HEADER)]
    pub identity_header: String,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "5s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Stop after N total requests across all virtual users
    #[arg(long = "requests", value_parser = parse_positive_u64)]
    pub requests: Option<PositiveU64>,

    /// Per-request log file, truncated at the start of every run
    #[arg(long = "log-file", default_value = DEFAULT_REQUEST_LOG)]
    pub log_file: PathBuf,

    /// Do not write the per-request log
    #[arg(long = "no-request-log")]
    pub no_request_log: bool,

    /// Summary format printed at the end of the run
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Path to config file (TOML/JSON). Defaults to ./loadpulse.toml or ./loadpulse.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Never prompt for missing values; fail instead
    #[arg(long = "no-prompt")]
    pub no_prompt: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by LOADPULSE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
