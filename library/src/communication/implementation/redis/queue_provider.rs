use super::{
    RedisConnectionVariant, RedisFactory, RedisQueueEntry, STREAM_ID_ADDITIONS, STREAM_ID_HEAD,
    STREAM_ID_TAIL,
};
use crate::communication::event::{
    ConsumerGroupDescriptor, QueueDescriptor, QueueLocation, QueueProvider,
};
use crate::BoxedError;
use async_trait::async_trait;
use futures::{
    stream::{self, BoxStream},
    StreamExt,
};
use redis::aio::MultiplexedConnection;
use redis::streams::{
    StreamClaimReply, StreamId, StreamPendingCountReply, StreamReadOptions, StreamReadReply,
};
use redis::{AsyncCommands, RedisResult};
use std::time::Duration;
use tracing::error;

/// Position of a consumer within the entry stream
enum Cursor {
    /// Replaying entries this consumer received but never acknowledged
    Backlog(String),
    /// Reclaiming expired entries from other consumers and reading new additions
    Latest,
    /// A redis error occurred, terminate the stream
    Failed,
}

/// Queue provider implementation using [Redis Streams](https://redis.io/topics/streams-intro)
pub struct RedisQueueProvider<F: RedisFactory + Send + Sync> {
    factory: F,
    visibility_timeout: Duration,
}

impl<F: RedisFactory + Send + Sync> RedisQueueProvider<F> {
    /// Creates a new instance with a given [`RedisFactory`]
    ///
    /// Entries that remain unacknowledged for longer than the `visibility_timeout`
    /// are claimed away from their original consumer and redelivered.
    pub fn new(factory: F, visibility_timeout: Duration) -> Self {
        Self {
            factory,
            visibility_timeout,
        }
    }
}

#[async_trait]
impl<F> QueueProvider for RedisQueueProvider<F>
where
    F: RedisFactory + Send + Sync,
{
    type Entry = RedisQueueEntry<MultiplexedConnection>;

    /// Consumes a redis stream data structure using the following steps:
    ///
    /// 1. Create the stream and/or consumer group if it does not exist
    /// 2. Stream entries from this consumer's pending entry list until it is exhausted
    /// 3. Claim entries whose visibility timeout expired at another consumer
    /// 4. Wait for and stream new entries in a blocking manner, yielding
    ///    an empty batch (and thus staying alive) when a poll comes up empty
    async fn consume(
        &self,
        queue: QueueDescriptor,
        group: &ConsumerGroupDescriptor,
        consumer: &str,
        batch_size: usize,
        poll_timeout: Duration,
    ) -> Result<BoxStream<'static, Result<Self::Entry, BoxedError>>, BoxedError> {
        let key = queue.key().to_owned();
        let group_name = group.identifier().to_string();

        // Create a dedicated redis connection for the blocking XREADGROUP command
        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Owned)
            .await?;

        // Create the group if it does not exist
        create_consumer_group(&mut con, &key, group).await;

        let read_options = StreamReadOptions::default()
            .group(&group_name, consumer)
            .count(batch_size)
            .block(poll_timeout.as_millis() as usize);

        let entry_stream = xread_stream(
            con,
            read_options,
            key.clone(),
            group_name.clone(),
            consumer.to_owned(),
            batch_size,
            self.visibility_timeout,
        );

        // Shared connection used to acknowledge entries independently of the
        // blocked reader connection
        let ack_con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        let stream = entry_stream
            .map(move |entry| {
                let entry = entry?;
                let entry =
                    RedisQueueEntry::new(ack_con.clone(), entry, key.clone(), group_name.clone())?;

                Ok(entry)
            })
            .boxed();

        Ok(stream)
    }
}

async fn create_consumer_group(
    con: &mut MultiplexedConnection,
    key: &str,
    group: &ConsumerGroupDescriptor,
) {
    let start_id = match group.start() {
        QueueLocation::Head => STREAM_ID_HEAD,
        QueueLocation::Tail => STREAM_ID_TAIL,
    };

    con.xgroup_create_mkstream::<_, _, _, ()>(key, group.identifier().to_string(), start_id)
        .await
        .ok();
}

/// Claims entries whose visibility timeout has expired at another consumer
async fn claim_expired(
    con: &mut MultiplexedConnection,
    key: &str,
    group: &str,
    consumer: &str,
    batch_size: usize,
    visibility_timeout: Duration,
) -> RedisResult<Vec<StreamId>> {
    let min_idle_ms = visibility_timeout.as_millis() as usize;

    let pending: StreamPendingCountReply = con
        .xpending_count(key, group, "-", "+", batch_size)
        .await?;

    let expired: Vec<String> = pending
        .ids
        .into_iter()
        .filter(|entry| entry.last_delivered_ms >= min_idle_ms)
        .map(|entry| entry.id)
        .collect();

    if expired.is_empty() {
        return Ok(Vec::new());
    }

    let claimed: StreamClaimReply = con
        .xclaim(key, group, consumer, min_idle_ms, &expired)
        .await?;

    Ok(claimed.ids)
}

fn xread_stream(
    con: MultiplexedConnection,
    options: StreamReadOptions,
    key: String,
    group: String,
    consumer: String,
    batch_size: usize,
    visibility_timeout: Duration,
) -> BoxStream<'static, RedisResult<StreamId>> {
    let initial = Cursor::Backlog(STREAM_ID_HEAD.to_string());

    let stream = stream::unfold((con, options, initial), move |(mut con, options, cursor)| {
        let key = key.clone();
        let group = group.clone();
        let consumer = consumer.clone();

        async move {
            match cursor {
                Cursor::Failed => None,

                // Work through our own pending entry list after a restart
                Cursor::Backlog(id) => {
                    let result = con
                        .xread_options::<_, _, StreamReadReply>(&[&key], &[&id], &options)
                        .await;

                    match result {
                        Ok(mut reply) => {
                            let ids = reply.keys.pop().map(|stream| stream.ids).unwrap_or_default();

                            // An empty batch means the backlog is exhausted and
                            // we may move on to new additions
                            let next = match ids.last() {
                                Some(entry) => Cursor::Backlog(entry.id.clone()),
                                None => Cursor::Latest,
                            };

                            Some((Ok(ids), (con, options, next)))
                        }
                        Err(e) => {
                            error!("Encountered error reading from redis stream {:?}", e);
                            Some((Err(e), (con, options, Cursor::Failed)))
                        }
                    }
                }

                Cursor::Latest => {
                    let claimed = claim_expired(
                        &mut con,
                        &key,
                        &group,
                        &consumer,
                        batch_size,
                        visibility_timeout,
                    )
                    .await;

                    match claimed {
                        Ok(ids) if !ids.is_empty() => Some((Ok(ids), (con, options, Cursor::Latest))),
                        Ok(_) => {
                            let result = con
                                .xread_options::<_, _, StreamReadReply>(
                                    &[&key],
                                    &[STREAM_ID_ADDITIONS],
                                    &options,
                                )
                                .await;

                            match result {
                                Ok(mut reply) => {
                                    let ids = reply
                                        .keys
                                        .pop()
                                        .map(|stream| stream.ids)
                                        .unwrap_or_default();

                                    Some((Ok(ids), (con, options, Cursor::Latest)))
                                }
                                Err(e) => {
                                    error!("Encountered error reading from redis stream {:?}", e);
                                    Some((Err(e), (con, options, Cursor::Failed)))
                                }
                            }
                        }
                        Err(e) => {
                            error!("Encountered error claiming expired entries {:?}", e);
                            Some((Err(e), (con, options, Cursor::Failed)))
                        }
                    }
                }
            }
        }
    });

    // It is possible to stream in batches (receiving multiple entries from the redis)
    // by setting the options.count value >1. The resulting stream will still yield
    // one at a time to make it easier to use.
    stream
        .flat_map(|result| match result {
            Ok(batch) => stream::iter(batch).map(Ok).boxed(),
            Err(e) => stream::once(async { Err(e) }).boxed(),
        })
        .boxed()
}
