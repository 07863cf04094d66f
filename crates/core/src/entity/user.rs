use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DecodeError, Entity, Fields};
use crate::keys::USER_PREFIX;

/// Discriminator value for user items.
pub const USER_TYPE_NAME: &str = "userModel";

/// Stored field holding the user's tier.
pub const USER_TIER_FIELD: &str = "userTier";

/// Subscription tier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Free,
    Premium,
}

impl Tier {
    /// Returns the stored representation of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "FREE",
            Tier::Premium => "PREMIUM",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tier(s)
    }
}

/// Parse a Tier from its stored string. Names must match exactly.
pub fn parse_tier(s: &str) -> Result<Tier, DecodeError> {
    match s {
        "FREE" => Ok(Tier::Free),
        "PREMIUM" => Ok(Tier::Premium),
        _ => Err(DecodeError::UnknownValue {
            field: USER_TIER_FIELD,
            value: s.to_string(),
        }),
    }
}

/// A user of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub tier: Tier,
}

impl User {
    /// Creates a new user with the given ID and tier.
    pub fn new(id: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: id.into(),
            tier,
        }
    }
}

impl Entity for User {
    const KIND: &'static str = USER_PREFIX;
    const TYPE_NAME: &'static str = USER_TYPE_NAME;
    const ATTRIBUTE_FIELDS: &'static [&'static str] = &[USER_TIER_FIELD];

    type Attributes = Tier;

    fn from_parts(id: String, tier: Tier) -> Self {
        Self { id, tier }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(USER_TIER_FIELD.to_string(), self.tier.as_str().to_string());
        fields
    }

    fn from_fields(id: String, fields: &Fields) -> Result<Self, DecodeError> {
        let tier = fields
            .get(USER_TIER_FIELD)
            .ok_or_else(|| DecodeError::MissingField(USER_TIER_FIELD.to_string()))?;

        Ok(Self {
            id,
            tier: parse_tier(tier)?,
        })
    }
}
