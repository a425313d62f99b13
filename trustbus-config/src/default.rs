//! Default configuration values.

use crate::RoutingDedup;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The default name of a client.
pub const DEFAULT_NAME: &str = "trustbus";

/// The default routing object de-duplication policy.
pub const DEFAULT_ROUTING_DEDUP: RoutingDedup = RoutingDedup::Keep;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

pub(crate) fn default_name() -> String {
    DEFAULT_NAME.to_owned()
}

pub(crate) const fn default_routing_dedup() -> RoutingDedup {
    DEFAULT_ROUTING_DEDUP
}
