use parking_lot::Mutex;
use rand::Rng;

use super::{Metric, QueuedMetric, SampleRate};

/// Decides which measurements survive sampling.
///
/// Implementations only provide [`Sampler::keep`]; the batch helpers draw once
/// per entry.
pub trait Sampler: Send + Sync {
    /// Returns whether a single measurement sampled at `rate` is transmitted.
    fn keep(&self, rate: SampleRate) -> bool;

    /// Filters a batch where each entry carries its own rate.
    fn sample(&self, entries: Vec<QueuedMetric>) -> Vec<QueuedMetric> {
        entries.into_iter().filter(|entry| self.keep(entry.rate)).collect()
    }

    /// Filters a batch at a single `rate`, tagging survivors with it.
    fn sample_at<I, K>(&self, entries: I, rate: SampleRate) -> Vec<QueuedMetric>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, Metric)>,
        K: Into<String>,
    {
        entries
            .into_iter()
            .filter(|_| self.keep(rate))
            .map(|(name, metric)| QueuedMetric::new(name, metric, rate))
            .collect()
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, rate: SampleRate) -> bool {
    if rate.is_unsampled() {
        return true;
    }
    // SampleRate guarantees [0, 1), so gen_bool cannot panic here.
    rng.gen_bool(rate.value())
}

/// Samples with the calling thread's `rand::thread_rng()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSampler;

impl Sampler for ThreadRngSampler {
    fn keep(&self, rate: SampleRate) -> bool {
        draw(&mut rand::thread_rng(), rate)
    }
}

/// Samples with an owned generator, typically a seeded one for reproducible
/// runs.
#[derive(Debug)]
pub struct RngSampler<R> {
    rng: Mutex<R>,
}

impl<R: Rng> RngSampler<R> {
    /// Wraps `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R: Rng + Send> Sampler for RngSampler<R> {
    fn keep(&self, rate: SampleRate) -> bool {
        draw(&mut *self.rng.lock(), rate)
    }
}
