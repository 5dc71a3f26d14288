//! Convenience macros for the common metric shapes.
//!
//! Run with: `cargo run --example macros`

use statsd_queue::{decrement, gauge, increment, set, timing, update_stats, Client, IniConfig, Metric};
use std::sync::Arc;

fn main() {
    let config = IniConfig::new()
        .with_value("statsd", "host", "127.0.0.1")
        .with_value("statsd", "send_mode", "immediate");
    let client = Client::new(Arc::new(config));

    increment!(client, "pageviews", "home.views");
    increment!(client, "clicks"; 0.25);
    decrement!(client, "workers.idle");
    timing!(client, "render_time" => 320);
    gauge!(client, "active_users" => 42);
    set!(client, "uniques" => "user-1234");
    update_stats!(client, "bytes.out" => Metric::Count(2048); 0.5);
}
