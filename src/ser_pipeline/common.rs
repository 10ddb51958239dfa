//! Common utilities module
//!
//! This module contains shared utilities used across the SER pipeline.

pub mod error;

pub use error::{SerError, Result};
