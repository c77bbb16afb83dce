use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header name '{value}'.")]
    InvalidHeaderName { value: String },
    #[error("Identity '{value}' is not a valid header value.")]
    InvalidIdentity { value: String },
    #[error("Identity catalog must contain at least one entry.")]
    EmptyIdentityCatalog,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid think time '{value}': {source}")]
    InvalidThinkTimeNumber {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Think time must be a finite number of seconds >= 0, got {value}.")]
    ThinkTimeOutOfRange { value: f64 },
    #[error("Minimum think time ({min}s) must not exceed maximum think time ({max}s).")]
    ThinkTimeInverted { min: f64, max: f64 },
    #[error("Missing URL (set --url or provide in config).")]
    MissingUrl,
    #[error("Missing {field} (set --{field} or provide in config).")]
    MissingField { field: &'static str },
    #[error("Invalid URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("Failed to read identity file '{path}': {source}")]
    ReadIdentityFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
