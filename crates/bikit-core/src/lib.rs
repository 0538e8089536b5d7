//! Core types and utilities for the bikit dataset adapters.
//!
//! This crate provides the error type, the fixed CODEBRIM class vocabulary,
//! split names and the serde-backed dataset options shared by the adapter
//! crate and the workspace tools.

pub mod cli;
pub mod config;
pub mod error;
pub mod types;

pub use cli::*;
pub use config::*;
pub use error::{Error, Result};
pub use types::*;
