//! Core module containing shared infrastructure components.
//!
//! Provides configuration loading and the unified error type used by the
//! binary entry points.

pub mod config;
pub mod error;

pub use config::{Config, RunMode};
pub use error::{Error, Result};
