//! In-memory collaborators, useful for tests and single-process deployments.

mod store;
mod transport;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use store::*;
pub use transport::*;
