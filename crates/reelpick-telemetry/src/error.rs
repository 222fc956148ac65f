//! Failures surfaced while configuring logging.

use thiserror::Error;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("tracing subscriber already installed")]
    SubscriberInstall {
        /// Error reported by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
    /// `REELPICK_LOG_FORMAT` named neither `json` nor `pretty`.
    #[error("unknown log format")]
    UnknownLogFormat {
        /// Rejected input.
        value: String,
    },
}

impl TelemetryError {
    /// Message including the offending input, for operator-facing output.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::SubscriberInstall { source } => format!("{self}: {source}"),
            Self::UnknownLogFormat { value } => format!("{self} '{value}'"),
        }
    }
}
