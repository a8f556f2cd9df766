//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file named by MARKET_CONFIG (loader.rs)
//!     → environment overrides (APTOS_NODE_URL, ...)
//!     → validation.rs (semantic checks, all errors at once)
//!     → AppConfig (validated, immutable)
//!
//! secrets.rs supplies wallet credentials separately; they never live in AppConfig.
//! ```

pub mod loader;
pub mod schema;
pub mod secrets;
pub mod validation;

pub use loader::{load_from_env, load_with, ConfigError};
pub use schema::{AppConfig, FailurePolicy, NodeConfig};
pub use secrets::{EnvSecretProvider, SecretProvider, StaticSecretProvider};
