//! # Shared Types Crate
//!
//! Folder, block and key types shared by the block operations layer and
//! every layer built on top of it.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers and key types are defined here.
//! - **Keys stay client-side**: `BlockCryptKey` cannot be serialized; only
//!   the server half ever leaves the process.
//! - **Explicit context**: every remote call carries an `OpContext`.

pub mod context;
pub mod entities;
pub mod errors;
pub mod keys;

pub use context::{ContextState, OpContext};
pub use entities::*;
pub use errors::*;
pub use keys::*;
