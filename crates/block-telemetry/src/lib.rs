//! # Block Telemetry
//!
//! Process-wide logging for binaries and test suites built on the block
//! operations layer. Library crates only emit `tracing` events; this crate
//! installs the subscriber that renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use block_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!     // Block operations now log through the configured subscriber
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `blockops` | Service name attached to the startup event |
//! | `BLOCKOPS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `BLOCKOPS_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `BLOCKOPS_CONSOLE_OUTPUT` | `true` | Write events to stdout at all |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// Log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Span around one block operation.
///
/// # Example
///
/// ```rust,ignore
/// use block_telemetry::block_span;
///
/// let _span = block_span!("put", block_id = %id, tlf_id = %md.id).entered();
/// ```
#[macro_export]
macro_rules! block_span {
    ($op:expr) => {
        tracing::info_span!("block_op", op = $op)
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info_span!("block_op", op = $op, $($field)*)
    };
}

/// Log a block event with the standard `block_id` and `tlf_id` fields.
#[macro_export]
macro_rules! log_block_event {
    ($level:ident, $msg:expr, $block_id:expr, $tlf_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            block_id = %$block_id,
            tlf_id = %$tlf_id,
            $($($field)*,)?
            $msg
        )
    };
}
