//! Browser utilities.
//!
//! Provides:
//! - [`dom`] - window and localStorage access
//! - [`race_with_timeout`], [`post_json`] - network calls with timeouts
//! - [`logger`] - console backend for the `log` facade

pub mod dom;
mod fetch;
pub mod logger;

pub use fetch::{RaceResult, post_json, race_with_timeout};
