use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::{ensure_think_seconds, parse_header_name};
use crate::args::{LoadArgs, PositiveU64, PositiveUsize};
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line are never overridden.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "target_duration")
        && let Some(duration) = config.duration
    {
        args.target_duration = Some(
            PositiveU64::try_from(duration)
                .map_err(|_err| ConfigError::FieldMustBePositive { field: "duration" })?,
        );
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = Some(PositiveUsize::try_from(concurrency).map_err(|_err| {
            ConfigError::FieldMustBePositive {
                field: "concurrency",
            }
        })?);
    }

    if !is_cli(matches, "min_think")
        && let Some(min_think) = config.min_think
    {
        args.min_think = ensure_think_seconds(min_think).map_err(|err| {
            ConfigError::InvalidField {
                field: "min_think",
                source: err,
            }
        })?;
    }

    if !is_cli(matches, "max_think")
        && let Some(max_think) = config.max_think
    {
        args.max_think = ensure_think_seconds(max_think).map_err(|err| {
            ConfigError::InvalidField {
                field: "max_think",
                source: err,
            }
        })?;
    }

    if !is_cli(matches, "identities")
        && let Some(identities) = config.identities.as_ref()
    {
        args.identities = identities.clone();
    }

    if !is_cli(matches, "identity_file")
        && let Some(path) = config.identity_file.as_ref()
    {
        args.identity_file = Some(PathBuf::from(path));
    }

    if !is_cli(matches, "identity_header")
        && let Some(header) = config.identity_header.as_ref()
    {
        parse_header_name(header).map_err(|err| ConfigError::InvalidField {
            field: "identity_header",
            source: err,
        })?;
        args.identity_header = header.clone();
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration().map_err(|err| ConfigError::InvalidField {
            field: "timeout",
            source: err,
        })?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_duration().map_err(|err| ConfigError::InvalidField {
            field: "connect_timeout",
            source: err,
        })?;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = Some(
            PositiveU64::try_from(requests)
                .map_err(|_err| ConfigError::FieldMustBePositive { field: "requests" })?,
        );
    }

    if !is_cli(matches, "log_file")
        && let Some(path) = config.log_file.as_ref()
    {
        args.log_file = PathBuf::from(path);
    }

    if !is_cli(matches, "no_request_log")
        && let Some(enabled) = config.request_log
    {
        args.no_request_log = !enabled;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    Ok(())
}

pub(crate) fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
