//! Persisted config file management
//!
//! - [`document`] - Line-preserving parser and renderer
//! - [`store`] - Locked, atomic, write-on-change access by [`ConfigKey`](crate::domain::ConfigKey)

pub mod document;
#[allow(clippy::module_inception)]
pub mod store;

pub use document::IniDocument;
pub use store::{Change, ConfigStore};
