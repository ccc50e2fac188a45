//! Trait implementations using [`redis`](::redis)
//!
//! Queues are backed by [Redis Streams](https://redis.io/topics/streams-intro)
//! consumed through consumer groups. Topic fan-out keeps the set of subscribed
//! queue keys in a redis set and copies each published envelope into every
//! subscribed stream.

const STREAM_PAYLOAD_KEY: &str = "payload";
const STREAM_ID_NEW: &str = "*";
const STREAM_ID_HEAD: &str = "0";
const STREAM_ID_TAIL: &str = "$";
const STREAM_ID_ADDITIONS: &str = ">";

/// Retention limit applied to queues that receive topic fan-out copies
const FANOUT_QUEUE_LIMIT: usize = 10_000;

use thiserror::Error;

mod factory;
mod publisher;
mod queue_entry;
mod queue_provider;
mod subscription;

pub use factory::*;
pub use publisher::*;
pub use queue_entry::*;
pub use queue_provider::*;
pub use subscription::*;

#[derive(Debug, Error)]
enum RedisQueueError {
    #[error("payload field missing from queue entry")]
    MissingPayload,
}
