//! # Trustbus Config
//!
//! This crate provides the configuration of a trustbus client.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod client;
mod error;
mod traits;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod default;

pub use client::*;
pub use error::*;
pub use traits::*;
