use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Entry that has been handed to a consumer but not yet acknowledged
pub struct InflightEntry {
    /// Key of the queue the entry originated from
    pub queue: String,
    /// Raw payload of the entry
    pub payload: Vec<u8>,
    /// Flag set once the consumer acknowledges the entry
    pub acknowledged: Arc<AtomicBool>,
}

#[derive(Default)]
struct BrokerState {
    queues: HashMap<String, VecDeque<Vec<u8>>>,
    subscriptions: HashMap<String, HashSet<String>>,
    inflight: Vec<InflightEntry>,
}

/// In-memory message broker shared by the mock transport implementations
#[derive(Clone, Default)]
pub struct MockBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl MockBroker {
    /// Creates a new, empty broker
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a payload to the end of a queue
    pub fn push(&self, queue: &str, payload: Vec<u8>) {
        self.lock()
            .queues
            .entry(queue.to_owned())
            .or_default()
            .push_back(payload);
    }

    /// Copies a payload into every queue subscribed to the topic
    pub fn fan_out(&self, topic: &str, payload: &[u8]) {
        let mut state = self.lock();

        let subscribers: Vec<String> = state
            .subscriptions
            .get(topic)
            .map(|queues| queues.iter().cloned().collect())
            .unwrap_or_default();

        for queue in subscribers {
            state
                .queues
                .entry(queue)
                .or_default()
                .push_back(payload.to_vec());
        }
    }

    /// Subscribes a queue to a topic
    pub fn subscribe(&self, topic: &str, queue: &str) {
        self.lock()
            .subscriptions
            .entry(topic.to_owned())
            .or_default()
            .insert(queue.to_owned());
    }

    /// Removes all currently queued payloads, marking them as in-flight
    ///
    /// Returns each payload together with its acknowledgement flag.
    pub fn take(&self, queue: &str) -> Vec<(Vec<u8>, Arc<AtomicBool>)> {
        let mut state = self.lock();

        let payloads: Vec<Vec<u8>> = state
            .queues
            .get_mut(queue)
            .map(|entries| entries.drain(..).collect())
            .unwrap_or_default();

        payloads
            .into_iter()
            .map(|payload| {
                let acknowledged = Arc::new(AtomicBool::new(false));

                state.inflight.push(InflightEntry {
                    queue: queue.to_owned(),
                    payload: payload.clone(),
                    acknowledged: acknowledged.clone(),
                });

                (payload, acknowledged)
            })
            .collect()
    }

    /// Moves every unacknowledged in-flight entry back into its queue,
    /// emulating a visibility timeout expiry
    pub fn requeue_unacknowledged(&self) {
        let mut state = self.lock();
        let inflight = std::mem::take(&mut state.inflight);

        for entry in inflight {
            if !entry.acknowledged.load(Ordering::SeqCst) {
                state
                    .queues
                    .entry(entry.queue)
                    .or_default()
                    .push_back(entry.payload);
            }
        }
    }

    /// Number of payloads currently waiting in a queue
    pub fn queue_len(&self, queue: &str) -> usize {
        self.lock()
            .queues
            .get(queue)
            .map(|entries| entries.len())
            .unwrap_or_default()
    }

    /// Number of in-flight entries that have not been acknowledged
    pub fn unacknowledged(&self) -> usize {
        self.lock()
            .inflight
            .iter()
            .filter(|entry| !entry.acknowledged.load(Ordering::SeqCst))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BrokerState> {
        self.state.lock().expect("mock broker lock poisoned")
    }
}
