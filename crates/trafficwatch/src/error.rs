//! Error types for trafficwatch.
//!
//! Fetch failures never show up here: the API client recovers them by
//! substituting a fallback dataset. These variants cover configuration,
//! user input at the CLI boundary, and JSON output.

use thiserror::Error;

/// The main error type for trafficwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === HTTP Errors ===
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    // === Input Errors ===
    /// A speed range name was not one of the known bands.
    #[error("unknown speed range '{value}' (expected all, 20-25, 25-30 or 30+)")]
    InvalidSpeedRange {
        /// The rejected value.
        value: String,
    },

    /// A report time frame name was not recognized.
    #[error("unknown time frame '{value}' (expected daily, weekly or monthly)")]
    InvalidTimeFrame {
        /// The rejected value.
        value: String,
    },

    /// A speed limit fell outside the accepted range.
    #[error("speed limit '{value}' for {lane} is outside {min}-{max} km/h")]
    InvalidSpeedLimit {
        /// Lane the limit was set for.
        lane: String,
        /// The rejected value as it was given.
        value: String,
        /// Smallest accepted limit.
        min: u32,
        /// Largest accepted limit.
        max: u32,
    },

    /// A lane name did not match any configured lane.
    #[error("unknown lane: {lane}")]
    UnknownLane {
        /// The lane that was looked up.
        lane: String,
    },

    // === Serialization Errors ===
    /// A view could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for trafficwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad user input rather than the
    /// environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSpeedRange { .. }
                | Self::InvalidTimeFrame { .. }
                | Self::InvalidSpeedLimit { .. }
                | Self::UnknownLane { .. }
        )
    }

    /// Process exit code for this error: 2 for bad input, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_input_error() {
            2
        } else {
            1
        }
    }
}
