use std::fmt::Debug;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::warn;

use crate::{MetricResult, MetricsError};

/// Section whose presence enables sending.
pub const STATSD_SECTION: &str = "statsd";

/// Port used when `statsd.port` is absent.
pub const DEFAULT_PORT: u16 = 8125;

/// Largest datagram the UDP transport builds unless configured otherwise.
/// Recommended safe size for a UDP payload on a 1500 byte MTU.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 1432;

/// Read-only view of a sectioned key-value configuration source.
///
/// Providers are built once and shared read-only between clients, usually as
/// an `Arc<dyn ConfigProvider>`.
pub trait ConfigProvider: Debug + Send + Sync {
    /// True when `section` exists in the configuration.
    fn is_enabled(&self, section: &str) -> bool;

    /// Value of `key` in `section`, if both exist.
    fn get(&self, section: &str, key: &str) -> Option<&str>;

    /// Looks up a dotted `section.key` name. Names without a dot yield `None`.
    fn lookup(&self, name: &str) -> Option<&str> {
        let (section, key) = name.split_once('.')?;
        self.get(section, key)
    }
}

/// Configuration parsed from INI text, or assembled in code.
///
/// ```ini
/// ; statsd.ini
/// [statsd]
/// host = 127.0.0.1
/// port = 8125
/// send_mode = deferred
/// ```
///
/// Keys that appear before the first section header are stored under the
/// empty section name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IniConfig {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl IniConfig {
    /// An empty configuration: every section is disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses an INI file.
    ///
    /// # Errors
    /// Returns `MetricsError::StdIo` when the file cannot be read and
    /// `MetricsError::ConfigParse` on malformed lines.
    pub fn from_path(path: impl AsRef<Path>) -> MetricResult<Self> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Adds an empty section, enabling it.
    #[must_use]
    pub fn with_section(mut self, section: &str) -> Self {
        self.sections.entry(section.to_string()).or_default();
        self
    }

    /// Sets `section.key`, creating the section when needed.
    #[must_use]
    pub fn with_value(mut self, section: &str, key: &str, value: impl Into<String>) -> Self {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        self
    }

    /// Names of the sections present, in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

impl ConfigProvider for IniConfig {
    fn is_enabled(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }
}

impl FromStr for IniConfig {
    type Err = MetricsError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut config = Self::new();
        let mut current = String::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let Some(name) = rest.strip_suffix(']') else {
                    return Err(parse_error(line_no, "unterminated section header"));
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(parse_error(line_no, "empty section name"));
                }
                current = name.to_string();
                config.sections.entry(current.clone()).or_default();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(parse_error(line_no, "expected 'key = value'"));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "empty key"));
            }
            config
                .sections
                .entry(current.clone())
                .or_default()
                .insert(key.to_string(), parse_value(value.trim()));
        }

        Ok(config)
    }
}

fn parse_value(value: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.split_once(quote))
            .map(|(inner, _)| inner)
        {
            return inner.to_string();
        }
    }
    // unquoted values end at an inline comment
    value
        .split_once(" ;")
        .map_or(value, |(before, _)| before)
        .trim_end()
        .to_string()
}

fn parse_error(line: usize, message: &str) -> MetricsError {
    MetricsError::ConfigParse {
        line,
        message: message.to_string(),
    }
}

/// Which dispatch path [`Client::send`](crate::Client::send) follows.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SendMode {
    /// Transmit right away, like `send_immediate`.
    Immediate,
    /// Buffer until the next flush, like `send_deferred`.
    #[default]
    Deferred,
}

impl SendMode {
    /// Reads `statsd.send_mode`. Absent or unknown values mean deferred.
    #[must_use]
    pub fn from_config(config: &dyn ConfigProvider) -> Self {
        match config.get(STATSD_SECTION, "send_mode") {
            None => Self::Deferred,
            Some(mode) if mode.eq_ignore_ascii_case("immediate") => Self::Immediate,
            Some(mode) if mode.eq_ignore_ascii_case("deferred") => Self::Deferred,
            Some(mode) => {
                warn!("Unknown statsd.send_mode {mode:?}, using deferred");
                Self::Deferred
            }
        }
    }
}

/// Where and how metrics are transmitted, resolved from the `statsd` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsdSettings {
    /// Aggregator host name or address.
    pub host: String,
    /// Aggregator UDP port.
    pub port: u16,
    /// Prepended verbatim to every metric name. Include a trailing dot if
    /// desired.
    pub prefix: String,
}

impl StatsdSettings {
    /// Resolves settings, returning `Ok(None)` when the `statsd` section or
    /// `statsd.host` is absent.
    ///
    /// # Errors
    /// Returns `MetricsError::InvalidSetting` when `statsd.port` is not a
    /// valid port number.
    pub fn from_config(config: &dyn ConfigProvider) -> MetricResult<Option<Self>> {
        if !config.is_enabled(STATSD_SECTION) {
            return Ok(None);
        }
        let Some(host) = config.get(STATSD_SECTION, "host").map(str::trim) else {
            return Ok(None);
        };
        if host.is_empty() {
            return Ok(None);
        }

        let port = match config.get(STATSD_SECTION, "port") {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse().map_err(|_| MetricsError::InvalidSetting {
                key: format!("{STATSD_SECTION}.port"),
                value: raw.to_string(),
            })?,
        };

        Ok(Some(Self {
            host: host.to_string(),
            port,
            prefix: config
                .get(STATSD_SECTION, "prefix")
                .unwrap_or_default()
                .to_string(),
        }))
    }
}

/// Reads `statsd.max_packet_size`, falling back to
/// [`DEFAULT_MAX_PACKET_SIZE`] when absent or unusable.
#[must_use]
pub fn max_packet_size(config: &dyn ConfigProvider) -> usize {
    match config.get(STATSD_SECTION, "max_packet_size") {
        None => DEFAULT_MAX_PACKET_SIZE,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => size,
            _ => {
                warn!("Invalid statsd.max_packet_size {raw:?}, using {DEFAULT_MAX_PACKET_SIZE}");
                DEFAULT_MAX_PACKET_SIZE
            }
        },
    }
}
