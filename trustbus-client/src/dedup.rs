use std::collections::{hash_map::Entry, HashMap, HashSet};

use trustbus_config::RoutingDedup;
use trustbus_objects::{RoNum, RoutingObject};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Removes duplicate routing objects according to `policy`, preserving first-occurrence order.
///
/// - [`RoutingDedup::Keep`] leaves the objects untouched.
/// - [`RoutingDedup::Exact`] drops objects whose discriminator and encoding equal an earlier
///   object's.
/// - [`RoutingDedup::PreferElaborated`] treats copies of the same chain or DOT as duplicates
///   regardless of elaboration. The first position survives and holds the most elaborated copy.
pub fn dedup_routing_objects(
    objects: Vec<RoutingObject>,
    policy: RoutingDedup,
) -> Vec<RoutingObject> {
    let before = objects.len();
    let deduped = match policy {
        RoutingDedup::Keep => return objects,
        RoutingDedup::Exact => dedup_exact(objects),
        RoutingDedup::PreferElaborated => dedup_prefer_elaborated(objects),
    };

    tracing::debug!(?policy, before, after = deduped.len(), "deduplicated routing objects");
    deduped
}

fn dedup_exact(objects: Vec<RoutingObject>) -> Vec<RoutingObject> {
    let mut seen: HashSet<(RoNum, Vec<u8>)> = HashSet::new();
    objects
        .into_iter()
        .filter(|object| match object.encode() {
            Ok(encoded) => seen.insert((object.ro_num(), encoded)),
            Err(_) => true,
        })
        .collect()
}

fn dedup_prefer_elaborated(objects: Vec<RoutingObject>) -> Vec<RoutingObject> {
    let mut positions = HashMap::new();
    let mut deduped: Vec<RoutingObject> = Vec::with_capacity(objects.len());

    for object in objects {
        match positions.entry(object.key()) {
            Entry::Vacant(entry) => {
                entry.insert(deduped.len());
                deduped.push(object);
            }
            Entry::Occupied(entry) => {
                let kept = &mut deduped[*entry.get()];
                if object.elaboration_rank() > kept.elaboration_rank() {
                    *kept = object;
                }
            }
        }
    }

    deduped
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
