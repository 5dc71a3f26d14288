//! Sharing a client across threads with `Arc`.
//!
//! Run with: `cargo run --example multithreaded`

use statsd_queue::{Client, IniConfig, Metric};
use std::sync::Arc;
use std::thread;

fn main() {
    let config = IniConfig::new().with_value("statsd", "host", "127.0.0.1");
    let client = Arc::new(Client::new(Arc::new(config)));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for i in 0..1000 {
                    client.send_deferred(
                        [
                            (format!("worker.{worker}.processed"), Metric::Count(i)),
                            ("workers.shared".to_string(), Metric::Count(1)),
                        ],
                        1.0,
                    );
                }
                // sampled immediate sends do not touch the shared queue
                client.send_immediate([("worker.done", Metric::Count(1))], 0.5);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    println!("{} distinct metrics pending", client.pending_len());
    client.flush();
}
