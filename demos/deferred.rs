//! Deferred sends merged by name and flushed once by host-owned shutdown hooks.
//!
//! Run with: `cargo run --example deferred`

use statsd_queue::{Client, IniConfig, Metric, ShutdownHooks};
use std::sync::Arc;

fn handle_request(client: &Client, id: u64) {
    // every request overwrites the same pending name, only the last one is sent
    client.send_deferred([("last_request.id", Metric::gauge(id as f64))], 1.0);
    client.send_deferred([("requests.seen", Metric::set(id))], 1.0);
}

fn main() {
    let config: IniConfig = "[statsd]\nhost = 127.0.0.1\nport = 8125\n"
        .parse()
        .expect("valid configuration");
    let client = Arc::new(Client::new(Arc::new(config)));

    let hooks = ShutdownHooks::new();
    client.enable_auto_flush_on_shutdown(&hooks);
    // registering twice is a no-op
    assert!(!client.enable_auto_flush_on_shutdown(&hooks));

    for id in 0..10 {
        handle_request(&client, id);
    }
    println!("{} metrics pending", client.pending_len());

    hooks.run();
    println!("{} metrics pending after shutdown", client.pending_len());
}
