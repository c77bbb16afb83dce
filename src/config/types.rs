use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_arg;
use crate::args::{HttpMethod, OutputFormat};
use crate::error::ValidationError;

/// On-disk run configuration. Every field is optional; CLI flags win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub duration: Option<u64>,
    pub concurrency: Option<usize>,
    pub min_think: Option<f64>,
    pub max_think: Option<f64>,
    pub identities: Option<Vec<String>>,
    pub identity_file: Option<String>,
    pub identity_header: Option<String>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub requests: Option<u64>,
    pub log_file: Option<String>,
    pub request_log: Option<bool>,
    pub output_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
