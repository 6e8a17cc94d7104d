// Fbswap Config
// TOML configuration for the listener and the framebuffer target

#[cfg(feature = "runtime")]
pub mod parser;

#[cfg(feature = "runtime")]
pub use parser::{Config, ConfigError, DEFAULT_POLL_TIMEOUT_MS};
