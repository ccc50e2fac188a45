use std::time::Duration;

/// Single observation submitted by the messaging plumbing
#[derive(Debug)]
pub enum MetricsEntry {
    /// A queue entry has been received by a consumer
    NotificationReceived {
        /// Key of the queue the entry was read from
        queue: String,
    },
    /// A notification has been processed and acknowledged successfully
    NotificationProcessed {
        /// Key of the queue the entry was read from
        queue: String,
        /// Wall-clock time spent processing the notification
        duration: Duration,
    },
    /// Processing or decoding of a notification failed
    NotificationFailed {
        /// Key of the queue the entry was read from
        queue: String,
    },
    /// A notification has been published to a topic
    NotificationPublished {
        /// Key of the topic the notification was published to
        topic: String,
        /// Wall-clock time spent publishing
        duration: Duration,
    },
    /// Publishing a notification failed
    PublishFailed {
        /// Key of the topic the notification was destined for
        topic: String,
    },
}
