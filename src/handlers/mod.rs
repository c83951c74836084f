//! Application handlers registered from configuration.
//!
//! The routing core never defines handlers; these are the ones the
//! `segment-router` binary installs for `[[routes]]` entries.

pub mod template;

pub use template::{Template, TemplateResponder};
