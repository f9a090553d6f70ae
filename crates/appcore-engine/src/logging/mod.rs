//! Logging setup.
//!
//! Everything in the crate logs through the `log` facade. Diagnostics from
//! failed initialization steps are emitted at error level and end up on
//! stderr through `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
