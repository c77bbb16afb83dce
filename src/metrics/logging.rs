use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
    sync::mpsc,
    task::JoinHandle,
};

use super::RequestOutcome;
use crate::error::SinkError;

const FLUSH_THRESHOLD: usize = 64 * 1024;

#[derive(Debug)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub worker: usize,
    pub outcome: RequestOutcome,
}

impl LogEntry {
    #[must_use]
    pub fn now(worker: usize, outcome: RequestOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            worker,
            outcome,
        }
    }

    fn write_line(&self, buffer: &mut String) -> std::fmt::Result {
        write!(
            buffer,
            "{} worker={} outcome={}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.worker,
            self.outcome.outcome.as_str()
        )?;
        match self.outcome.status {
            Some(status) => write!(buffer, " status={}", status)?,
            None => buffer.push_str(" status=-"),
        }
        match self.outcome.elapsed {
            Some(elapsed) => write!(buffer, " elapsed={:.4}s", elapsed.as_secs_f64())?,
            None => buffer.push_str(" elapsed=-"),
        }
        write!(buffer, " identity={:?}", self.outcome.identity)?;
        if let Some(error) = self.outcome.error.as_deref() {
            write!(buffer, " error={:?}", error)?;
        }
        buffer.push('\n');
        Ok(())
    }
}

/// Cloneable handle workers use to append to the request log.
///
/// The file is flushed and closed once every handle is dropped.
#[derive(Debug, Clone)]
pub struct RequestLog {
    tx: mpsc::UnboundedSender<LogEntry>,
}

impl RequestLog {
    /// Queues one line. Returns `false` once the writer has stopped.
    #[must_use]
    pub fn send(&self, entry: LogEntry) -> bool {
        self.tx.send(entry).is_ok()
    }
}

/// Creates (or truncates) the request log and spawns its writer task.
///
/// The writer resolves to the number of lines written after the last
/// [`RequestLog`] handle is dropped.
///
/// # Errors
///
/// Returns an error when the file cannot be created.
pub async fn open_request_log(
    path: &Path,
) -> Result<(RequestLog, JoinHandle<Result<u64, SinkError>>), SinkError> {
    let file = File::create(path)
        .await
        .map_err(|err| SinkError::CreateRequestLog {
            path: path.to_path_buf(),
            source: err,
        })?;
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(write_request_log(file, rx));
    Ok((RequestLog { tx }, handle))
}

async fn write_request_log(
    file: File,
    mut rx: mpsc::UnboundedReceiver<LogEntry>,
) -> Result<u64, SinkError> {
    let mut writer = BufWriter::new(file);
    let mut buffer = String::with_capacity(FLUSH_THRESHOLD);
    let mut lines: u64 = 0;

    while let Some(entry) = rx.recv().await {
        entry
            .write_line(&mut buffer)
            .map_err(|err| SinkError::FormatLine { source: err })?;
        lines = lines.saturating_add(1);

        if buffer.len() >= FLUSH_THRESHOLD {
            writer
                .write_all(buffer.as_bytes())
                .await
                .map_err(|err| SinkError::WriteRequestLog { source: err })?;
            buffer.clear();
        }
    }

    if !buffer.is_empty() {
        writer
            .write_all(buffer.as_bytes())
            .await
            .map_err(|err| SinkError::WriteRequestLog { source: err })?;
    }
    writer
        .flush()
        .await
        .map_err(|err| SinkError::WriteRequestLog { source: err })?;
    Ok(lines)
}

#[cfg(test)]
pub(super) fn format_entry(entry: &LogEntry) -> Result<String, SinkError> {
    let mut line = String::new();
    entry
        .write_line(&mut line)
        .map_err(|err| SinkError::FormatLine { source: err })?;
    Ok(line)
}
