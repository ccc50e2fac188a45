use crate::BoxedError;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

/// Variant for redis connections
pub enum RedisConnectionVariant {
    /// Individual connection that may allow for blocking commands without disturbing other users.
    /// Consumers requesting this variant intend to run long-running, blocking operations
    /// (e.g. `XREADGROUP BLOCK`) and must not share the connection with anybody else.
    Owned,
    /// Connection that can be shared between multiple users and generally does not permit blocking commands
    Multiplexed,
}

/// Factory for redis connections of different [types](RedisConnectionVariant)
#[async_trait]
pub trait RedisFactory {
    /// Establishes a new connection or clones a shared one, depending on the variant
    async fn connection(
        &self,
        variant: RedisConnectionVariant,
    ) -> Result<MultiplexedConnection, BoxedError>;
}
