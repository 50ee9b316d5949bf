//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (<config dir>/error-explain/config.toml)
//! 3. Project config (.error-explain/config.toml)
//! 4. Environment variables (ERROR_EXPLAIN_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
