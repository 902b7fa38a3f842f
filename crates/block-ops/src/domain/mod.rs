//! # Domain Layer
//!
//! Pure domain logic for the Block Operations subsystem.
//! This layer performs no I/O - only types, invariants and configuration.
//!
//! ## Modules
//!
//! - `entities` - Block envelope types (EncryptedBlock, ReadyBlockData)
//! - `value_objects` - Configuration (BlockOpsConfig)
//! - `invariants` - Size and addressing checks enforced by the service
//! - `errors` - Domain and port error types

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;
