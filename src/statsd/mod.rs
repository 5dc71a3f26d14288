use std::fmt;
use std::time::Duration;

pub mod client;
pub mod config;
pub mod lifecycle;
pub mod macros;
pub mod queue;
pub mod sampler;
pub mod serializer;
pub mod spy;
pub mod transport;

/// The StatsD metric kinds understood by the aggregator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MetricType {
    /// Signed delta added to a counter (`c`).
    Count,
    /// Elapsed time in milliseconds (`ms`).
    Timing,
    /// Absolute point-in-time value (`g`).
    Gauge,
    /// Unique-event token counted per flush interval (`s`).
    Set,
}

impl MetricType {
    /// Returns the wire tag for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "c",
            Self::Timing => "ms",
            Self::Gauge => "g",
            Self::Set => "s",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single measurement: the value together with its StatsD type.
///
/// Fusing both into one enum keeps a timing from ever carrying a set token
/// and lets the serializer pick the right tag without extra lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    /// Counter delta. Negative values decrement.
    Count(i64),
    /// Elapsed milliseconds.
    Timing(u64),
    /// Absolute gauge value.
    ///
    /// StatsD reads a signed gauge as a delta, so a negative value is sent as
    /// a reset to zero followed by the value. NaN and infinities are never
    /// sent.
    Gauge(f64),
    /// Set member token.
    Set(String),
}

impl Metric {
    /// Builds a gauge from anything losslessly convertible to `f64`.
    #[must_use]
    pub fn gauge(value: impl Into<f64>) -> Self {
        Self::Gauge(value.into())
    }

    /// False for gauges that have no numeric wire form (NaN or infinite).
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        match self {
            Self::Gauge(value) => value.is_finite(),
            _ => true,
        }
    }

    /// Builds a timing from a [`Duration`], truncated to whole milliseconds.
    #[must_use]
    pub fn from_duration(elapsed: Duration) -> Self {
        Self::Timing(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    /// Builds a set member from any displayable token.
    #[must_use]
    pub fn set(token: impl fmt::Display) -> Self {
        Self::Set(token.to_string())
    }

    /// The StatsD type of this measurement.
    #[must_use]
    pub const fn metric_type(&self) -> MetricType {
        match self {
            Self::Count(_) => MetricType::Count,
            Self::Timing(_) => MetricType::Timing,
            Self::Gauge(_) => MetricType::Gauge,
            Self::Set(_) => MetricType::Set,
        }
    }
}

/// Probability in `[0, 1]` that a measurement is transmitted.
///
/// Construction never fails: NaN, negative, infinite and `> 1` rates become
/// `1.0`. A rate of exactly `0.0` is kept and means "never transmit".
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct SampleRate(f64);

impl SampleRate {
    /// Always transmit; no `|@rate` suffix on the wire.
    pub const ALWAYS: Self = Self(1.0);

    /// Creates a sample rate, clamping invalid input to `1.0`.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        if rate.is_nan() || !(0.0..=1.0).contains(&rate) {
            tracing::trace!("sample rate {rate} outside [0, 1], using 1.0");
            Self::ALWAYS
        } else {
            Self(rate)
        }
    }

    /// The raw probability.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// True when every measurement is kept and no suffix is written.
    #[must_use]
    pub fn is_unsampled(self) -> bool {
        self.0 >= 1.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::ALWAYS
    }
}

impl From<f64> for SampleRate {
    fn from(rate: f64) -> Self {
        Self::new(rate)
    }
}

impl From<f32> for SampleRate {
    fn from(rate: f32) -> Self {
        Self::new(f64::from(rate))
    }
}

/// A named measurement tagged with the rate it was sampled at.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedMetric {
    /// Metric name, also the merge key in the pending queue.
    pub name: String,
    /// The measurement.
    pub metric: Metric,
    /// Rate the measurement is sampled at.
    pub rate: SampleRate,
}

impl QueuedMetric {
    /// Creates a queued metric.
    #[must_use]
    pub fn new(name: impl Into<String>, metric: Metric, rate: SampleRate) -> Self {
        Self {
            name: name.into(),
            metric,
            rate,
        }
    }
}
