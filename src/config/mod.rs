//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → Router::from_config builds the route table
//!
//! On file change or SIGHUP:
//!     watcher.rs reloads the file
//!     → loader.rs + validation.rs
//!     → new RouterConfig sent to the server
//!     → fresh Router swapped into the SharedRouter
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{LimitsConfig, ListenerConfig, ObservabilityConfig, RouteConfig, RouterConfig, TimeoutConfig};
pub use validation::ValidationError;
