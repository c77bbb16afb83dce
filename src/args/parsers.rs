use std::time::Duration;

use reqwest::header::HeaderName;

use super::types::{PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_header_name(s: &str) -> Result<HeaderName, ValidationError> {
    HeaderName::from_bytes(s.trim().as_bytes()).map_err(|_err| {
        ValidationError::InvalidHeaderName {
            value: s.to_owned(),
        }
    })
}

/// Parses a think-time bound given in (possibly fractional) seconds.
pub(crate) fn parse_think_seconds(s: &str) -> Result<f64, ValidationError> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|err| ValidationError::InvalidThinkTimeNumber {
            value: s.to_owned(),
            source: err,
        })?;
    ensure_think_seconds(value)
}

pub(crate) fn ensure_think_seconds(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value.is_sign_negative() {
        return Err(ValidationError::ThinkTimeOutOfRange { value });
    }
    Ok(value)
}

pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let mut digits_len = 0usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits_len = digits_len.saturating_add(1);
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    if duration.as_millis() == 0 {
        return Err(ValidationError::DurationZero);
    }

    Ok(duration)
}
