use indexmap::IndexMap;

use super::{Metric, QueuedMetric, SampleRate};

/// Pending metrics keyed by name, at most one entry per name.
///
/// A later upsert for a name overwrites value and rate but keeps the slot the
/// name was first inserted at, so flush output follows first-seen order.
#[derive(Debug, Default, Clone)]
pub struct PendingQueue {
    entries: IndexMap<String, (Metric, SampleRate)>,
}

impl PendingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a queue from `data`, all entries at `rate`.
    pub fn from_data<I, K>(data: I, rate: SampleRate) -> Self
    where
        I: IntoIterator<Item = (K, Metric)>,
        K: Into<String>,
    {
        let mut queue = Self::new();
        queue.upsert_all(data, rate);
        queue
    }

    /// Inserts or overwrites the pending value for `name`.
    pub fn upsert(&mut self, name: impl Into<String>, metric: Metric, rate: SampleRate) {
        self.entries.insert(name.into(), (metric, rate));
    }

    /// Upserts every `(name, metric)` pair at `rate`.
    pub fn upsert_all<I, K>(&mut self, data: I, rate: SampleRate)
    where
        I: IntoIterator<Item = (K, Metric)>,
        K: Into<String>,
    {
        for (name, metric) in data {
            self.upsert(name, metric, rate);
        }
    }

    /// The pending value and rate for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<(&Metric, SampleRate)> {
        self.entries.get(name).map(|(metric, rate)| (metric, *rate))
    }

    /// Number of distinct pending names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes everything, leaving an empty queue behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Iterates over pending entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Metric, SampleRate)> {
        self.entries
            .iter()
            .map(|(name, (metric, rate))| (name.as_str(), metric, *rate))
    }

    /// Consumes the queue into named entries in insertion order.
    #[must_use]
    pub fn into_entries(self) -> Vec<QueuedMetric> {
        self.entries
            .into_iter()
            .map(|(name, (metric, rate))| QueuedMetric { name, metric, rate })
            .collect()
    }
}
