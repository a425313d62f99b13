//! Objects exchanged on a trustbus network.
//!
//! This crate defines the delegation certificates ([`Dot`]s) that grant access to topics or
//! arbitrary permissions, the chains ([`DChain`]s) that prove a path of authority from a master
//! verifying key down to a principal, and the routing and payload objects messages carry.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod builder;
mod chain;
mod dot;
mod error;
mod expiry;
mod hash;
mod identity;
mod payload;
mod permissions;
mod routing;
mod signature;
mod vk;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use builder::*;
pub use chain::*;
pub use dot::*;
pub use error::*;
pub use expiry::*;
pub use hash::*;
pub use identity::*;
pub use payload::*;
pub use permissions::*;
pub use routing::*;
pub use signature::*;
pub use vk::*;
