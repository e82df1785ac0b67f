//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod converge;
pub mod init;
pub mod validate;
