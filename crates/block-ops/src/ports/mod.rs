//! # Ports Layer
//!
//! Defines the port traits for the Block Operations subsystem.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving port (API exposed to the filesystem layer)
//! - `outbound.rs` - Driven ports (key resolver, crypto engine, codec, block server)

pub mod inbound;
pub mod outbound;
