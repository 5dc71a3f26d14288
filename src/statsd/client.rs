use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::config::{max_packet_size, ConfigProvider, SendMode, StatsdSettings, STATSD_SECTION};
use super::lifecycle::ShutdownHooks;
use super::queue::PendingQueue;
use super::sampler::{Sampler, ThreadRngSampler};
use super::serializer::write_line;
use super::transport::{Transport, UdpTransport};
use super::{Metric, QueuedMetric, SampleRate};
use crate::MetricResult;

/// StatsD client with a deferred send queue.
///
/// Measurements are either transmitted right away ([`Client::send_immediate`])
/// or merged by name into a pending queue ([`Client::send_deferred`]) that is
/// transmitted and cleared by [`Client::send_flush`]. [`Client::send`] follows
/// whichever of the two `statsd.send_mode` designates.
///
/// No method returns an error or panics on transport problems: failures are
/// logged through `tracing` and the metrics are dropped. When the
/// configuration has no `statsd` section every send is a silent no-op.
///
/// The type is `Send + Sync`; share it as `Arc<Client>`.
///
/// # Example
///
/// ```no_run
/// use statsd_queue::{Client, IniConfig, Metric};
/// use std::sync::Arc;
///
/// let config = IniConfig::new()
///     .with_value("statsd", "host", "127.0.0.1")
///     .with_value("statsd", "port", "8125");
/// let client = Client::new(Arc::new(config));
///
/// client.send_immediate([("pageviews", Metric::Count(1))], 1.0);
/// client.send_deferred([("render_time", Metric::Timing(320))], 1.0);
/// client.send_deferred([("active_users", Metric::gauge(42))], 0.1);
///
/// // transmits render_time and (sampled) active_users, then clears the queue
/// client.flush();
/// ```
pub struct Client<T = UdpTransport, S = ThreadRngSampler> {
    config: Arc<dyn ConfigProvider>,
    queue: Mutex<PendingQueue>,
    transport: T,
    sampler: S,
    shutdown_registered: AtomicBool,
}

impl<T, S> std::fmt::Debug for Client<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("pending", &self.queue.lock().len())
            .field(
                "shutdown_registered",
                &self.shutdown_registered.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client sending over UDP, with datagram size taken from
    /// `statsd.max_packet_size`.
    #[must_use]
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        let transport = UdpTransport::with_max_packet_size(max_packet_size(config.as_ref()));
        Self::with_parts(config, transport, ThreadRngSampler)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client delivering through `transport`.
    #[must_use]
    pub fn with_transport(config: Arc<dyn ConfigProvider>, transport: T) -> Self {
        Self::with_parts(config, transport, ThreadRngSampler)
    }
}

impl<T, S> Client<T, S>
where
    T: Transport,
    S: Sampler,
{
    /// Creates a client from all of its collaborators.
    #[must_use]
    pub fn with_parts(config: Arc<dyn ConfigProvider>, transport: T, sampler: S) -> Self {
        Self {
            config,
            queue: Mutex::new(PendingQueue::new()),
            transport,
            sampler,
            shutdown_registered: AtomicBool::new(false),
        }
    }

    /// Sends `data` using the configured default mode (`statsd.send_mode`,
    /// deferred unless set to `immediate`).
    pub fn send<I, K>(&self, data: I, sample_rate: f64)
    where
        I: IntoIterator<Item = (K, Metric)>,
        K: Into<String>,
    {
        match SendMode::from_config(self.config.as_ref()) {
            SendMode::Immediate => self.send_immediate(data, sample_rate),
            SendMode::Deferred => self.send_deferred(data, sample_rate),
        }
    }

    /// Samples and transmits `data` now. The pending queue is not touched.
    pub fn send_immediate<I, K>(&self, data: I, sample_rate: f64)
    where
        I: IntoIterator<Item = (K, Metric)>,
        K: Into<String>,
    {
        let transient = PendingQueue::from_data(data, SampleRate::new(sample_rate));
        self.dispatch(transient);
    }

    /// Merges `data` into the pending queue; a name already pending gets the
    /// new value and rate. No I/O happens.
    pub fn send_deferred<I, K>(&self, data: I, sample_rate: f64)
    where
        I: IntoIterator<Item = (K, Metric)>,
        K: Into<String>,
    {
        self.queue
            .lock()
            .upsert_all(data, SampleRate::new(sample_rate));
    }

    /// Merges `data` like [`Client::send_deferred`], then transmits the whole
    /// pending queue and clears it. Each entry is sampled at the rate it was
    /// queued with.
    ///
    /// The queue is cleared even when the transport fails or sending is
    /// disabled.
    pub fn send_flush<I, K>(&self, data: I, sample_rate: f64)
    where
        I: IntoIterator<Item = (K, Metric)>,
        K: Into<String>,
    {
        let pending = {
            let mut queue = self.queue.lock();
            queue.upsert_all(data, SampleRate::new(sample_rate));
            queue.take()
        };
        self.dispatch(pending);
    }

    /// Transmits and clears whatever is pending. No-op on an empty queue.
    pub fn flush(&self) {
        self.send_flush(std::iter::empty::<(String, Metric)>(), 1.0);
    }

    /// The configuration this client reads.
    #[must_use]
    pub fn config(&self) -> &Arc<dyn ConfigProvider> {
        &self.config
    }

    /// The transport this client delivers through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Number of distinct names waiting for the next flush.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Snapshot of the pending queue, in insertion order.
    #[must_use]
    pub fn pending(&self) -> Vec<QueuedMetric> {
        self.queue.lock().clone().into_entries()
    }

    fn dispatch(&self, queue: PendingQueue) {
        if queue.is_empty() {
            return;
        }
        if let Err(err) = self.try_dispatch(queue) {
            warn!("Error sending metrics: {err}");
        }
    }

    fn try_dispatch(&self, queue: PendingQueue) -> MetricResult<usize> {
        let config = self.config.as_ref();
        if !config.is_enabled(STATSD_SECTION) {
            trace!("statsd disabled, dropping {} metrics", queue.len());
            return Ok(0);
        }

        let mut sampled = self.sampler.sample(queue.into_entries());
        sampled.retain(|entry| {
            let finite = entry.metric.is_finite();
            if !finite {
                debug!("dropping non-finite gauge {}: {:?}", entry.name, entry.metric);
            }
            finite
        });
        if sampled.is_empty() {
            return Ok(0);
        }

        let Some(settings) = StatsdSettings::from_config(config)? else {
            debug!("statsd.host not configured, dropping {} metrics", sampled.len());
            return Ok(0);
        };

        let lines: Vec<String> = sampled
            .iter()
            .map(|entry| {
                let mut line = String::new();
                write_line(&mut line, &settings.prefix, &entry.name, &entry.metric, entry.rate);
                line
            })
            .collect();

        self.transport.send(&lines, &settings.host, settings.port)
    }
}

impl<T, S> Client<T, S>
where
    T: Transport + 'static,
    S: Sampler + 'static,
{
    /// Registers a hook on `hooks` that flushes this client's pending queue
    /// when the host runs its shutdown hooks.
    ///
    /// Only the first call per client registers anything; it returns `true`.
    /// Later calls return `false`, even when made with another registry.
    pub fn enable_auto_flush_on_shutdown(self: &Arc<Self>, hooks: &ShutdownHooks) -> bool {
        if self
            .shutdown_registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        let client = Arc::clone(self);
        hooks.register(move || client.flush());
        true
    }

    /// True once a shutdown flush has been registered.
    #[must_use]
    pub fn is_auto_flush_enabled(&self) -> bool {
        self.shutdown_registered.load(Ordering::Acquire)
    }
}
