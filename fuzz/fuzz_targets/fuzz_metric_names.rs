#![no_main]

use libfuzzer_sys::fuzz_target;
use statsd_queue::{Client, IniConfig, Metric, SpyTransport};
use std::sync::Arc;

// Fuzz target focusing on edge cases in metric names and sample rates
fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let (rate_bytes, name_bytes) = data.split_at(8);
    let mut raw_rate = [0u8; 8];
    raw_rate.copy_from_slice(rate_bytes);
    // NaN, infinities and out of range rates are all possible here
    let rate = f64::from_le_bytes(raw_rate);

    let (rx, spy) = SpyTransport::new();
    let config = IniConfig::new().with_value("statsd", "host", "127.0.0.1");
    let client = Client::with_transport(Arc::new(config), spy);

    // Convert bytes to string (testing various encodings)
    let metric_name = String::from_utf8_lossy(name_bytes).into_owned();

    client.send_deferred([(metric_name.clone(), Metric::Count(-1))], rate);
    client.send_deferred([(metric_name.clone(), Metric::gauge(rate))], rate);
    client.send_immediate([(metric_name.clone(), Metric::set(&metric_name))], rate);
    client.send_flush([(metric_name, Metric::Timing(u64::MAX))], rate);

    assert_eq!(0, client.pending_len());
    for flush in rx.try_iter() {
        assert!(flush.lines.len() <= 1);
    }
});
