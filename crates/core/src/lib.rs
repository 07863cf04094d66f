//! Functional core for the singletable data-access layer.
//!
//! Everything in this crate is pure: key encoding, the entity model, the
//! stored record shape, the fixed table schema and the provisioning policy.
//! The I/O side lives in the `singletable` crate.

pub mod entity;
pub mod keys;
pub mod record;
pub mod table;
