use std::collections::BTreeMap;

use super::DecodeError;

/// Kind-specific scalar attributes of a stored item, keyed by field name.
pub type Fields = BTreeMap<String, String>;

/// A logical entity kind that can live in the single table.
///
/// Each kind owns a key prefix and a discriminator value. Attributes beyond
/// the keys are stored as flat string fields.
pub trait Entity: Sized {
    /// Key prefix, e.g. `USER` in `USER#<id>`.
    const KIND: &'static str;

    /// Value written to the `typeName` discriminator field.
    const TYPE_NAME: &'static str;

    /// Names of the kind-specific fields stored with each item.
    const ATTRIBUTE_FIELDS: &'static [&'static str];

    /// Attributes supplied by the caller on create.
    type Attributes;

    /// Builds the entity from its ID and creation attributes.
    fn from_parts(id: String, attributes: Self::Attributes) -> Self;

    /// Returns the entity ID.
    fn id(&self) -> &str;

    /// Returns the kind-specific fields as scalar strings.
    fn to_fields(&self) -> Fields;

    /// Rebuilds the entity from a decoded ID and its stored fields.
    fn from_fields(id: String, fields: &Fields) -> Result<Self, DecodeError>;
}
