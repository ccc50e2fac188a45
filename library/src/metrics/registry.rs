use super::{Metric, MetricType, MetricValue, MetricsEntry};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Upper bounds of the duration histogram buckets, in seconds
const BUCKET_BOUNDS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Default)]
struct Histogram {
    buckets: [u64; BUCKET_BOUNDS.len()],
    count: u64,
    sum: f64,
}

impl Histogram {
    fn observe(&mut self, value: f64) {
        for (index, bound) in BUCKET_BOUNDS.iter().enumerate() {
            if value <= *bound {
                self.buckets[index] += 1;
            }
        }

        self.count += 1;
        self.sum += value;
    }

    fn values(&self, label: &str, key: &str) -> Vec<MetricValue> {
        let mut values = Vec::with_capacity(BUCKET_BOUNDS.len() + 3);

        for (index, bound) in BUCKET_BOUNDS.iter().enumerate() {
            values.push(
                MetricValue::from_value(self.buckets[index] as f64)
                    .with_name_postfix("_bucket")
                    .with_label("le", &bound.to_string())
                    .with_label(label, key),
            );
        }

        values.push(
            MetricValue::from_value(self.count as f64)
                .with_name_postfix("_bucket")
                .with_label("le", "+Inf")
                .with_label(label, key),
        );
        values.push(
            MetricValue::from_value(self.sum)
                .with_name_postfix("_sum")
                .with_label(label, key),
        );
        values.push(
            MetricValue::from_value(self.count as f64)
                .with_name_postfix("_count")
                .with_label(label, key),
        );

        values
    }
}

#[derive(Default)]
struct RegistryState {
    received: BTreeMap<String, u64>,
    processed: BTreeMap<String, u64>,
    failed: BTreeMap<String, u64>,
    published: BTreeMap<String, u64>,
    publish_failures: BTreeMap<String, u64>,
    process_duration: BTreeMap<String, Histogram>,
    publish_duration: BTreeMap<String, Histogram>,
}

/// Aggregates [`MetricsEntries`](MetricsEntry) into counters and histograms
#[derive(Default)]
pub struct MetricsRegistry {
    state: Mutex<RegistryState>,
}

impl MetricsRegistry {
    /// Creates a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a single observation
    pub fn submit(&self, entry: MetricsEntry) {
        let mut state = self.lock();

        match entry {
            MetricsEntry::NotificationReceived { queue } => {
                *state.received.entry(queue).or_default() += 1;
            }
            MetricsEntry::NotificationProcessed { queue, duration } => {
                *state.processed.entry(queue.clone()).or_default() += 1;
                state
                    .process_duration
                    .entry(queue)
                    .or_default()
                    .observe(duration.as_secs_f64());
            }
            MetricsEntry::NotificationFailed { queue } => {
                *state.failed.entry(queue).or_default() += 1;
            }
            MetricsEntry::NotificationPublished { topic, duration } => {
                *state.published.entry(topic.clone()).or_default() += 1;
                state
                    .publish_duration
                    .entry(topic)
                    .or_default()
                    .observe(duration.as_secs_f64());
            }
            MetricsEntry::PublishFailed { topic } => {
                *state.publish_failures.entry(topic).or_default() += 1;
            }
        }
    }

    /// Total number of entries received across all queues
    pub fn received_total(&self) -> u64 {
        self.lock().received.values().sum()
    }

    /// Total number of successfully processed notifications across all queues
    pub fn processed_total(&self) -> u64 {
        self.lock().processed.values().sum()
    }

    /// Total number of failed notifications across all queues
    pub fn failed_total(&self) -> u64 {
        self.lock().failed.values().sum()
    }

    /// Total number of published notifications across all topics
    pub fn published_total(&self) -> u64 {
        self.lock().published.values().sum()
    }

    /// Total number of failed publishes across all topics
    pub fn publish_failures_total(&self) -> u64 {
        self.lock().publish_failures.values().sum()
    }

    /// Renders the current state in the Prometheus text exposition format
    pub fn render(&self) -> String {
        let state = self.lock();

        let metrics = vec![
            counter(
                "orderflow_messages_received_total",
                "Number of queue entries received by consumers",
                "queue",
                &state.received,
            ),
            counter(
                "orderflow_messages_processed_total",
                "Number of notifications processed and acknowledged",
                "queue",
                &state.processed,
            ),
            counter(
                "orderflow_messages_failed_total",
                "Number of notifications that failed to decode or process",
                "queue",
                &state.failed,
            ),
            counter(
                "orderflow_messages_published_total",
                "Number of notifications published to topics",
                "topic",
                &state.published,
            ),
            counter(
                "orderflow_publish_failures_total",
                "Number of notifications that could not be published",
                "topic",
                &state.publish_failures,
            ),
            histogram(
                "orderflow_process_duration_seconds",
                "Time spent processing a notification",
                "queue",
                &state.process_duration,
            ),
            histogram(
                "orderflow_publish_duration_seconds",
                "Time spent publishing a notification",
                "topic",
                &state.publish_duration,
            ),
        ];

        metrics.iter().fold(String::new(), |mut rendered, metric| {
            rendered.push_str(&metric.to_string());
            rendered.push('\n');
            rendered
        })
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // A poisoned lock only leaves behind slightly stale numbers
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn histogram(
    name: &str,
    description: &str,
    label: &str,
    values: &BTreeMap<String, Histogram>,
) -> Metric {
    Metric {
        description: description.to_string(),
        metric_type: MetricType::Histogram,
        name: name.to_string(),
        values: values
            .iter()
            .flat_map(|(key, histogram)| histogram.values(label, key))
            .collect(),
    }
}

fn counter(name: &str, description: &str, label: &str, values: &BTreeMap<String, u64>) -> Metric {
    Metric {
        description: description.to_string(),
        metric_type: MetricType::Counter,
        name: name.to_string(),
        values: values
            .iter()
            .map(|(key, count)| {
                MetricValue::from_value(*count as f64).with_label(label, key)
            })
            .collect(),
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use std::time::Duration;

    #[test]
    fn aggregate_submitted_entries() {
        let registry = MetricsRegistry::new();

        registry.submit(MetricsEntry::NotificationReceived {
            queue: "orders.processing".into(),
        });
        registry.submit(MetricsEntry::NotificationProcessed {
            queue: "orders.processing".into(),
            duration: Duration::from_millis(20),
        });
        registry.submit(MetricsEntry::NotificationFailed {
            queue: "orders.notification".into(),
        });

        assert_eq!(registry.received_total(), 1);
        assert_eq!(registry.processed_total(), 1);
        assert_eq!(registry.failed_total(), 1);
    }

    #[test]
    fn render_labelled_counters() {
        let registry = MetricsRegistry::new();

        registry.submit(MetricsEntry::NotificationPublished {
            topic: "orders".into(),
            duration: Duration::from_millis(5),
        });
        registry.submit(MetricsEntry::NotificationPublished {
            topic: "orders".into(),
            duration: Duration::from_millis(5),
        });

        let rendered = registry.render();

        assert!(rendered.contains("# TYPE orderflow_messages_published_total counter"));
        assert!(rendered.contains("orderflow_messages_published_total{topic=\"orders\"} 2"));
    }

    #[test]
    fn render_cumulative_histogram_buckets() {
        let registry = MetricsRegistry::new();

        registry.submit(MetricsEntry::NotificationProcessed {
            queue: "orders.processing".into(),
            duration: Duration::from_millis(20),
        });

        let rendered = registry.render();

        // A 20ms observation lands in every bucket from 25ms upwards
        assert!(rendered.contains(
            "orderflow_process_duration_seconds_bucket{le=\"0.01\",queue=\"orders.processing\"} 0"
        ));
        assert!(rendered.contains(
            "orderflow_process_duration_seconds_bucket{le=\"0.025\",queue=\"orders.processing\"} 1"
        ));
        assert!(rendered.contains(
            "orderflow_process_duration_seconds_bucket{le=\"+Inf\",queue=\"orders.processing\"} 1"
        ));
        assert!(rendered
            .contains("orderflow_process_duration_seconds_count{queue=\"orders.processing\"} 1"));
    }

    #[test]
    fn key_duration_histograms_by_queue() {
        let registry = MetricsRegistry::new();

        registry.submit(MetricsEntry::NotificationProcessed {
            queue: "orders.processing".into(),
            duration: Duration::from_millis(20),
        });
        registry.submit(MetricsEntry::NotificationProcessed {
            queue: "orders.notification".into(),
            duration: Duration::from_millis(20),
        });

        let rendered = registry.render();

        // Each queue gets its own sample series
        assert!(rendered.contains(
            "orderflow_process_duration_seconds_count{queue=\"orders.processing\"} 1"
        ));
        assert!(rendered.contains(
            "orderflow_process_duration_seconds_count{queue=\"orders.notification\"} 1"
        ));
    }

    #[test]
    fn label_publish_latency_by_topic() {
        let registry = MetricsRegistry::new();

        registry.submit(MetricsEntry::NotificationPublished {
            topic: "orders".into(),
            duration: Duration::from_millis(5),
        });

        let rendered = registry.render();

        assert!(rendered
            .contains("orderflow_publish_duration_seconds_bucket{le=\"0.005\",topic=\"orders\"} 1"));
        assert!(rendered.contains("orderflow_publish_duration_seconds_count{topic=\"orders\"} 1"));
    }
}
