use statsd_queue::{Client, IniConfig, Metric, MetricResult, MetricsError, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A custom transport that keeps everything it is handed, joined the way the
/// UDP transport joins lines into one datagram
#[derive(Clone, Default)]
pub struct TestTransport {
    datagrams: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
}

impl TestTransport {
    pub fn get_all_metrics_as_text(&self) -> String {
        self.datagrams.lock().unwrap().join("\n")
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for TestTransport {
    fn send(&self, lines: &[String], _host: &str, _port: u16) -> MetricResult<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let datagram = lines.join("\n");
        let size = datagram.len();
        self.datagrams.lock().unwrap().push(datagram);
        Ok(size)
    }
}

/// Fails every call, like a socket that cannot be opened
#[derive(Default)]
pub struct BrokenTransport {
    calls: AtomicUsize,
}

impl Transport for BrokenTransport {
    fn send(&self, _lines: &[String], host: &str, port: u16) -> MetricResult<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MetricsError::NoAddress(format!("{host}:{port}")))
    }
}

fn enabled() -> Arc<IniConfig> {
    Arc::new(IniConfig::new().with_value("statsd", "host", "127.0.0.1"))
}

#[test]
fn test_custom_transport_basic() {
    let transport = TestTransport::default();
    let client = Client::with_transport(enabled(), transport.clone());

    client.send_immediate([("custom.counter", Metric::Count(1))], 1.0);
    client.send_deferred([("custom.gauge", Metric::gauge(100))], 1.0);
    client.send_deferred([("custom.set", Metric::set("user-1"))], 1.0);
    client.send_flush([("custom.timing", Metric::Timing(250))], 1.0);

    let metrics = transport.get_all_metrics_as_text();
    assert_eq!(
        "custom.counter:1|c\ncustom.gauge:100|g\ncustom.set:user-1|s\ncustom.timing:250|ms",
        metrics
    );
    assert_eq!(2, transport.calls());
}

#[test]
fn test_boxed_transport() {
    let transport = TestTransport::default();
    let boxed: Box<dyn Transport> = Box::new(transport.clone());
    let client = Client::with_transport(enabled(), boxed);
    client.send_immediate([("boxed", Metric::Count(3))], 1.0);
    assert_eq!("boxed:3|c", transport.get_all_metrics_as_text());
}

#[test]
fn test_broken_transport_never_reaches_caller() {
    let transport = Arc::new(BrokenTransport::default());
    let client = Client::with_transport(enabled(), transport.clone());

    client.send_deferred([("a", Metric::Count(1)), ("b", Metric::Count(1))], 1.0);
    client.flush();
    assert_eq!(0, client.pending_len());

    client.send_immediate([("c", Metric::Count(1))], 1.0);
    client.send_flush([("d", Metric::Count(1))], 1.0);
    assert_eq!(0, client.pending_len());
    assert_eq!(3, transport.calls.load(Ordering::SeqCst));
}

#[test]
fn test_disabled_config_never_calls_custom_transport() {
    let transport = TestTransport::default();
    let client = Client::with_transport(Arc::new(IniConfig::new()), transport.clone());

    client.send([("a", Metric::Count(1))], 1.0);
    client.send_immediate([("b", Metric::Count(1))], 1.0);
    client.send_flush([("c", Metric::Count(1))], 1.0);
    assert_eq!(0, transport.calls());
    assert_eq!(0, client.pending_len());
}
