//! Signing and verifying keys used to issue delegation certificates and seal messages.
//!
//! Only `ed25519` keys are supported, since principals on the network are identified by their
//! 32-byte `ed25519` verifying keys.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod ed25519;
mod error;
mod key;
mod traits;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use ed25519::*;
pub use error::*;
pub use key::*;
pub use traits::*;
