use thiserror::Error;

/// Errors that can occur while loading configuration or transmitting metrics.
///
/// The send operations on [`Client`](crate::Client) never return these; they
/// are logged at the transport boundary. They surface from configuration
/// loading and from [`Transport`](crate::Transport) implementations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A custom error with a free-form message.
    #[error("Custom error: {0}")]
    Custom(String),

    /// An I/O error from the standard library.
    #[error("Std Io error: {0}")]
    StdIo(#[from] std::io::Error),

    /// The aggregator host did not resolve to any socket address.
    #[error("No socket addresses yielded for {0}")]
    NoAddress(String),

    /// A configuration source could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// One-based line number of the offending input.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A configuration value is present but unusable.
    #[error("Invalid setting {key}: {value:?}")]
    InvalidSetting {
        /// Dotted `section.key` name of the setting.
        key: String,
        /// The raw value found in the configuration.
        value: String,
    },
}

impl From<String> for MetricsError {
    fn from(value: String) -> Self {
        Self::Custom(value)
    }
}

impl From<&str> for MetricsError {
    fn from(value: &str) -> Self {
        Self::Custom(value.to_string())
    }
}
