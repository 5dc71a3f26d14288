use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use statsd_queue::{
    serialize, Client, IniConfig, Metric, RngSampler, SampleRate, SpyFlush, SpyTransport,
};
use std::sync::Arc;

fn spy_client() -> (crossbeam::channel::Receiver<SpyFlush>, Client<SpyTransport>) {
    let (rx, spy) = SpyTransport::new();
    let config = IniConfig::new()
        .with_value("statsd", "host", "aggregator.local")
        .with_value("statsd", "port", "8125");
    (rx, Client::with_transport(Arc::new(config), spy))
}

#[test]
fn test_merge_keeps_last_value_and_rate() {
    let (rx, client) = spy_client();
    for value in 0..50 {
        client.send_deferred([("queue.depth", Metric::gauge(value))], 0.5);
    }
    client.send_deferred([("queue.depth", Metric::gauge(99))], 1.0);

    let pending = client.pending();
    assert_eq!(1, pending.len());
    assert_eq!(Metric::Gauge(99.0), pending[0].metric);
    assert_eq!(SampleRate::ALWAYS, pending[0].rate);

    client.flush();
    let flush = rx.try_recv().unwrap();
    assert_eq!(vec!["queue.depth:99|g".to_string()], flush.lines);
    assert_eq!("aggregator.local", flush.host);
}

#[test]
fn test_immediate_isolation() {
    let (rx, client) = spy_client();
    client.send_deferred([("a", Metric::Count(1)), ("b", Metric::Count(2))], 1.0);
    let before = client.pending();

    for i in 0..10 {
        client.send_immediate([("a", Metric::Count(i))], 1.0);
    }
    assert_eq!(before, client.pending());
    assert_eq!(10, rx.try_iter().count());

    client.flush();
    assert_eq!(
        vec!["a:1|c".to_string(), "b:2|c".to_string()],
        rx.try_recv().unwrap().lines
    );
}

#[test]
fn test_flush_only_on_empty_queue_sends_nothing() {
    let (rx, client) = spy_client();
    client.flush();
    client.send_flush(Vec::<(String, Metric)>::new(), 1.0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_flush_samples_whole_queue() {
    let (rx, spy) = SpyTransport::new();
    let config = IniConfig::new().with_value("statsd", "host", "127.0.0.1");
    let sampler = RngSampler::new(ChaCha8Rng::seed_from_u64(42));
    let client = Client::with_parts(Arc::new(config), spy, sampler);

    let data: Vec<_> = (0..10_000)
        .map(|i| (format!("m.{i}"), Metric::Count(1)))
        .collect();
    client.send_deferred(data, 0.3);
    client.send_flush([("always", Metric::Count(1))], 1.0);

    let lines = rx.try_recv().unwrap().lines;
    assert!(lines.contains(&"always:1|c".to_string()));
    let sampled = lines.iter().filter(|line| line.ends_with("|c|@0.3")).count();
    let fraction = sampled as f64 / 10_000.0;
    assert!((fraction - 0.3).abs() < 0.05, "kept fraction was {fraction}");
    assert_eq!(0, client.pending_len());
}

#[test]
fn test_serialize_examples() {
    assert_eq!("hits:1|c", serialize("hits", &Metric::Count(1), SampleRate::new(1.0)));
    assert_eq!(
        "latency:42|ms|@0.5",
        serialize("latency", &Metric::Timing(42), SampleRate::new(0.5))
    );
    assert_eq!(
        "active_users:1|g|@0.1",
        serialize("active_users", &Metric::gauge(1), SampleRate::new(0.1))
    );
}
