//! Entity store: point writes and point reads over a single table.

mod conversions;
mod error;
mod repository;

pub use conversions::{item_to_record, key_to_item, record_to_item};
pub use error::{Result, StoreError};
pub use repository::EntityStore;
