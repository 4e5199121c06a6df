//! # freeipa-core
//!
//! Configuration resolution, validation, and error types for FreeIPA clients.
//!
//! This crate covers everything that has to happen before a connection is
//! attempted: merging caller-supplied configuration with environment
//! variables and injected defaults, and checking that the selected
//! authentication mode has every field it needs.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy shared across the workspace
//! - [`diagnostics`] - Aggregated field-scoped validation violations
//! - [`config`] - Raw/resolved configuration and the resolution precedence
//! - [`validate`] - Mode-dependent required-field validation

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod validate;

// Re-export commonly used types
pub use error::{Error, Result};
