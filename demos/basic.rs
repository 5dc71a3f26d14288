//! Basic usage of all four metric types using the direct API.
//!
//! Run with: `cargo run --example basic`

use statsd_queue::{Client, IniConfig, Metric};
use std::sync::Arc;
use std::time::Instant;

fn main() {
    let config = IniConfig::new()
        .with_value("statsd", "host", "127.0.0.1")
        .with_value("statsd", "port", "8125")
        .with_value("statsd", "prefix", "myapp.");
    let client = Client::new(Arc::new(config));

    let started = Instant::now();

    // Counter — sent right away, the pending queue is untouched
    client.send_immediate([("request.count", Metric::Count(1))], 1.0);

    // Gauge — sampled at 10%, so the wire line carries |@0.1 when it is sent
    client.send_immediate([("connections.active", Metric::gauge(100))], 0.1);

    // Set — counts unique tokens per aggregator flush interval
    client.send_deferred([("users.unique", Metric::set("user-42"))], 1.0);

    // Timing — merged with the queued set and transmitted together
    client.send_flush(
        [("request.latency", Metric::from_duration(started.elapsed()))],
        1.0,
    );

    println!("All metric types sent.");
}
