//! # Integration Tests
//!
//! End-to-end flows through `BlockOpsService` wired to the reference
//! adapters.

pub mod flows;
