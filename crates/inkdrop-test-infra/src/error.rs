use thiserror::Error;

/// Failures while bringing up a disposable Redis for the store tests.
#[derive(Debug, Error)]
pub enum TestInfraError {
    /// The Redis container failed to start or its mapped port is unknown.
    #[error("redis container failed: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    /// The container started but never accepted a connection.
    #[error("redis connection failed: {0}")]
    Redis(#[from] redis::RedisError),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;

