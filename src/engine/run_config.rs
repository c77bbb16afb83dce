use std::path::Path;
use std::time::Duration;

use url::Url;
use reqwest::header::HeaderName;

use crate::args::parsers::parse_header_name;
use crate::args::{DEFAULT_IDENTITY_CATALOG, HttpMethod, LoadArgs};
use crate::error::ValidationError;

use super::{IdentityCatalog, ThinkTime};

/// Validated parameters of one run. Read-only once the run starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: Url,
    pub method: HttpMethod,
    pub duration: Duration,
    pub concurrency: usize,
    pub think: ThinkTime,
    pub identities: IdentityCatalog,
    pub identity_header: HeaderName,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_requests: Option<u64>,
}

impl RunConfig {
    /// Validates CLI/config input into a run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL, duration, or concurrency is missing or
    /// invalid, when the think-time bounds are inverted, or when the identity
    /// catalog is empty or unreadable.
    pub fn from_args(args: &LoadArgs) -> Result<Self, ValidationError> {
        let url = args.url.as_deref().ok_or(ValidationError::MissingUrl)?;
        let target = parse_target(url)?;
        let duration = args
            .target_duration
            .ok_or(ValidationError::MissingField { field: "duration" })?;
        let concurrency = args.concurrency.ok_or(ValidationError::MissingField {
            field: "concurrency",
        })?;
        let think = ThinkTime::from_secs_f64(args.min_think, args.max_think)?;
        let identities = resolve_identities(&args.identities, args.identity_file.as_deref())?;
        let identity_header = parse_header_name(&args.identity_header)?;

        Ok(Self {
            target,
            method: args.method,
            duration: Duration::from_secs(duration.get()),
            concurrency: concurrency.get(),
            think,
            identities,
            identity_header,
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
            max_requests: args.requests.map(u64::from),
        })
    }
}

fn parse_target(value: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(value.trim()).map_err(|err| ValidationError::InvalidUrl {
        value: value.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}

fn resolve_identities(
    inline: &[String],
    file: Option<&Path>,
) -> Result<IdentityCatalog, ValidationError> {
    let mut entries: Vec<String> = inline.to_vec();
    if let Some(path) = file {
        let content =
            std::fs::read_to_string(path).map_err(|err| ValidationError::ReadIdentityFile {
                path: path.display().to_string(),
                source: err,
            })?;
        entries.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_owned),
        );
    } else if entries.is_empty() {
        return IdentityCatalog::new(DEFAULT_IDENTITY_CATALOG);
    }
    IdentityCatalog::new(entries)
}
