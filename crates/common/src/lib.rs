//! Common utilities for the quiz evaluation toolkit
//!
//! Shared code used across all workspace crates.

pub mod error;

pub use error::{Error, Result};
