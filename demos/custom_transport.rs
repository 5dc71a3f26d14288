//! Sending metrics through a custom transport instead of UDP.
//!
//! Run with: `cargo run --example custom_transport`

use statsd_queue::{Client, IniConfig, Metric, MetricResult, Transport};
use std::sync::Arc;

/// Prints every line instead of sending it.
struct StdoutTransport;

impl Transport for StdoutTransport {
    fn send(&self, lines: &[String], host: &str, port: u16) -> MetricResult<usize> {
        let mut written = 0;
        for line in lines {
            println!("[{host}:{port}] {line}");
            written += line.len();
        }
        Ok(written)
    }
}

fn main() {
    let config = IniConfig::new().with_value("statsd", "host", "stdout");
    let client = Client::with_transport(Arc::new(config), StdoutTransport);

    client.send_deferred([("jobs.queued", Metric::Count(3))], 1.0);
    client.send_deferred([("jobs.queued", Metric::Count(5))], 1.0);
    client.send_flush([("jobs.runtime", Metric::Timing(1200))], 1.0);
}
