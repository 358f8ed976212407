//! Disposable backing services for integration tests.

pub mod error;
pub mod redis;

pub use crate::redis::{RedisConfig, RedisServer};
pub use error::{Result, TestInfraError};
