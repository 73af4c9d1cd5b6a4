//! UI components built with Leptos.
//!
//! - [`Shell`] - page layout and startup effects
//! - [`icons`] - centralized icon definitions (change theme here)
//! - [`lookup`] - address / ENS input
//! - [`portfolio`] - query status and token table
//! - [`wallet`] - connect / disconnect bar

pub mod icons;
pub mod lookup;
pub mod portfolio;
mod shell;
pub mod wallet;

pub use shell::Shell;
