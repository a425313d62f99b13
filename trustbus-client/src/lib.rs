//! The authorization core of a trustbus client.
//!
//! A [`Client`] assembles outbound messages, attaches the delegation chain proving that the
//! sender may act on the target topic, and hands the signed message to a [`Transport`]. How much
//! of that chain travels with the message is chosen per call with an [`ElaborationLevel`].
//!
//! The client also issues new DOTs and delegation chains on behalf of its identity.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod client;
mod dedup;
mod error;
mod message;
mod params;
mod resolver;
mod status;
mod traits;
mod verifier;

pub mod memory;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use client::*;
pub use dedup::*;
pub use error::*;
pub use message::*;
pub use params::*;
pub use resolver::*;
pub use status::*;
pub use traits::*;
pub use verifier::*;
