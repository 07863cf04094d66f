mod error;
mod types;
mod user;

pub use error::DecodeError;
pub use types::{Entity, Fields};
pub use user::{parse_tier, Tier, User, USER_TIER_FIELD, USER_TYPE_NAME};
