//! # statsd-queue
//!
//! A `StatsD` client for Rust that lets each call choose between sending now and
//! buffering until a later flush.
//!
//! ## Features
//!
//! - **Send modes**: immediate, deferred (merged by name, last write wins) and
//!   flush, plus a default mode picked by configuration
//! - **Sampling**: per-metric sample rates with the `|@rate` wire suffix
//! - **Fire-and-forget UDP**: lines packed into datagrams, failures logged and
//!   never raised to the caller
//! - **Metric Types**: Counters, Timings, Gauges and Sets
//!
//! ## Quick Start
//!
//! ```no_run
//! use statsd_queue::{Client, IniConfig, Metric, ShutdownHooks};
//! use statsd_queue::{increment, timing};
//! use std::sync::Arc;
//!
//! let config = IniConfig::from_path("statsd.ini").unwrap();
//! let client = Arc::new(Client::new(Arc::new(config)));
//!
//! let hooks = ShutdownHooks::new();
//! client.enable_auto_flush_on_shutdown(&hooks);
//!
//! // Direct API
//! client.send_immediate([("pageviews", Metric::Count(1))], 1.0);
//! client.send_deferred([("render_time", Metric::Timing(320))], 1.0);
//!
//! // Convenience macros go through the configured default mode
//! increment!(client, "requests");
//! timing!(client, "db.query" => 12);
//!
//! // Pending metrics are flushed once when the hooks run
//! hooks.run();
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::cast_precision_loss))]

// https://github.com/statsd/statsd/blob/master/docs/metric_types.md
mod error;
mod statsd;

pub use error::MetricsError;
pub use statsd::client::Client;
pub use statsd::config::{
    max_packet_size, ConfigProvider, IniConfig, SendMode, StatsdSettings, DEFAULT_MAX_PACKET_SIZE,
    DEFAULT_PORT, STATSD_SECTION,
};
pub use statsd::lifecycle::ShutdownHooks;
pub use statsd::queue::PendingQueue;
pub use statsd::sampler::{RngSampler, Sampler, ThreadRngSampler};
pub use statsd::serializer::{serialize, write_line};
pub use statsd::spy::{SpyFlush, SpyTransport};
pub use statsd::transport::{PacketWriter, Transport, UdpTransport, Writer};
pub use statsd::{Metric, MetricType, QueuedMetric, SampleRate};

/// Result type for metric operations.
///
/// Wraps errors that can occur while loading configuration and transmitting
/// metrics.
pub type MetricResult<T> = Result<T, MetricsError>;
