//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Source context mining constants
pub mod context {
    /// Lines of source shown on each side of the error line
    pub const WINDOW_RADIUS: usize = 5;

    /// Marker prefix for the error line
    pub const TARGET_MARKER: &str = "-> ";

    /// Marker prefix for surrounding lines
    pub const CONTEXT_MARKER: &str = "   ";

    /// Longest source line read before giving up on the file (64 KiB)
    pub const MAX_LINE_BYTES: usize = 64 * 1024;
}

/// Failover chain constants
pub mod chain {
    /// Shared deadline for the whole backend traversal (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Connection establishment timeout per request (seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Provider wire constants
pub mod provider {
    /// Chat-completions default endpoint base
    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

    /// Messages API endpoint base
    pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";

    /// Messages API version header value
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";

    /// Messages API requires an explicit output bound
    pub const ANTHROPIC_MAX_TOKENS: u32 = 1024;

    /// Generative Language API endpoint base
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Configuration file locations
pub mod config {
    /// Application directory name under the user config dir
    pub const APP_DIR: &str = "error-explain";

    /// Config file name
    pub const FILE_NAME: &str = "config.toml";

    /// Project-local config directory
    pub const PROJECT_DIR: &str = ".error-explain";

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "ERROR_EXPLAIN_";
}
