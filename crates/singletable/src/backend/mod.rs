//! Backend capability interface and its implementations.
//!
//! The store and the lifecycle manager only ever see the [`ItemBackend`] and
//! [`TableAdmin`] traits. [`DynamoDbBackend`] talks to DynamoDB (or DynamoDB
//! Local); [`InMemoryBackend`] is a fake for unit tests.

mod dynamodb;
mod error;
mod inmemory;
mod traits;

pub use dynamodb::DynamoDbBackend;
pub use error::BackendError;
pub use inmemory::{Activation, InMemoryBackend, Operation};
pub use traits::{Item, ItemBackend, Result, TableAdmin};
