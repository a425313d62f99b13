//! Topic suffixes: the part of a topic that follows its master verifying key.
//!
//! A suffix is a `/`-separated list of segments. Subscriptions may use `+` to match exactly one
//! segment and `*` to match zero or more segments; publications must name a concrete topic.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod error;
mod segment;
mod suffix;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use error::*;
pub use segment::*;
pub use suffix::*;
