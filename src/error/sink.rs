use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create request log '{path}': {source}")]
    CreateRequestLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write request log: {source}")]
    WriteRequestLog {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to format request log line: {source}")]
    FormatLine {
        #[source]
        source: std::fmt::Error,
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
