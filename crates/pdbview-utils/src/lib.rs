//! # pdbview Utilities
//!
//! Shared helpers for the pdbview workspace, mainly subscriber setup for the
//! `tracing` events `pdbview-core` emits.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, init_test_logging, LogFormat, LogLevel, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};
