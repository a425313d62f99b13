use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use trustbus_objects::{DChain, Dot, ObjectHash, RoutingObject};

use crate::{ChainElaborator, DotResolver};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An in-memory store of DOTs and delegation chains, keyed by hash.
///
/// It elaborates chains it has seen in elaborated form and resolves DOTs it holds. Clones share
/// the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    dots: Arc<RwLock<HashMap<ObjectHash, Dot>>>,
    chains: Arc<RwLock<HashMap<ObjectHash, DChain>>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a DOT and returns its hash.
    pub fn put_dot(&self, dot: Dot) -> ObjectHash {
        let hash = dot.hash();
        self.dots.write().insert(hash, dot);
        hash
    }

    /// Records the DOT hashes of an elaborated chain and returns the chain hash.
    ///
    /// Only the hashes are kept. Resolved DOTs of the chain must be stored separately with
    /// [`MemoryStore::put_dot`]. Hash-only chains carry nothing to record.
    pub fn put_chain(&self, chain: &DChain) -> ObjectHash {
        let hash = chain.chain_hash();
        if let Some(hashes) = chain.dot_hashes() {
            if let Ok(elaborated) = DChain::from_dot_hashes(chain.kind(), hashes.to_vec()) {
                self.chains.write().insert(hash, elaborated);
            }
        }

        hash
    }

    /// Returns a stored DOT.
    pub fn get_dot(&self, hash: &ObjectHash) -> Option<Dot> {
        self.dots.read().get(hash).cloned()
    }

    /// Returns a stored chain in elaborated, unresolved form.
    pub fn get_chain(&self, hash: &ObjectHash) -> Option<DChain> {
        self.chains.read().get(hash).cloned()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl ChainElaborator for MemoryStore {
    fn elaborate(&self, chain: &DChain) -> Option<DChain> {
        if chain.is_elaborated() {
            return Some(chain.clone());
        }

        self.get_chain(&chain.chain_hash())
            .filter(|elaborated| elaborated.kind() == chain.kind())
    }
}

impl DotResolver for MemoryStore {
    fn resolve_dots_in_chain(&self, chain: &mut DChain, available: &[RoutingObject]) -> bool {
        let Some(hashes) = chain.dot_hashes().map(<[ObjectHash]>::to_vec) else {
            return false;
        };

        let dots = self.dots.read();
        for (index, hash) in hashes.iter().enumerate() {
            if chain.dot_at(index).is_some() {
                continue;
            }

            let found = available
                .iter()
                .find_map(|object| match object {
                    RoutingObject::Dot(dot) if dot.hash() == *hash => Some(dot),
                    RoutingObject::Chain(other) => {
                        other.resolved_dots().find(|dot| dot.hash() == *hash)
                    }
                    _ => None,
                })
                .or_else(|| dots.get(hash));

            match found {
                Some(dot) if chain.resolve_dot(dot) => {}
                _ => {
                    tracing::debug!(dot = %hash, index, "unable to resolve DOT");
                    return false;
                }
            }
        }

        true
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use trustbus_key::{Ed25519KeyPair, KeyPairGenerate};
    use trustbus_objects::{DotKind, Identity, Vk};

    use super::*;

    fn chain() -> anyhow::Result<(DChain, Vec<Dot>)> {
        let [a, b] = std::array::from_fn(|_| Ed25519KeyPair::generate(&mut rand::thread_rng()));
        let ab = Dot::builder(DotKind::Permission, a.vk(), b.vk())
            .permission("role", "reader")
            .sign(&a)?;
        let bx = Dot::builder(DotKind::Permission, b.vk(), Vk::from([8; 32]))
            .permission("role", "reader")
            .sign(&b)?;
        let chain = DChain::from_dots(DotKind::Permission, [ab.clone(), bx.clone()])?;

        Ok((chain, vec![ab, bx]))
    }

    #[test]
    fn test_store_elaborates_known_chains() -> anyhow::Result<()> {
        let (chain, _) = chain()?;
        let store = MemoryStore::new();
        let hashed = chain.to_unelaborated();

        assert_eq!(store.elaborate(&hashed), None);

        store.put_chain(&chain);
        let elaborated = store.elaborate(&hashed);
        assert_eq!(elaborated.as_ref(), Some(&chain));
        assert_eq!(elaborated.as_ref().map(DChain::is_resolved), Some(false));

        let mislabeled = DChain::from_chain_hash(DotKind::Access, chain.chain_hash());
        assert_eq!(store.elaborate(&mislabeled), None);

        Ok(())
    }

    #[test_log::test]
    fn test_store_resolves_from_routing_objects_then_store() -> anyhow::Result<()> {
        let (chain, dots) = chain()?;
        let store = MemoryStore::new();
        store.put_chain(&chain);
        store.put_dot(dots[1].clone());

        let mut elaborated = store
            .get_chain(&chain.chain_hash())
            .ok_or(anyhow::anyhow!("chain not stored"))?;
        assert!(!store.resolve_dots_in_chain(&mut elaborated, &[]));

        let available = [RoutingObject::Dot(dots[0].clone())];
        assert!(store.resolve_dots_in_chain(&mut elaborated, &available));
        assert!(elaborated.is_resolved());
        assert_eq!(elaborated.dot_at(0), Some(&dots[0]));
        assert_eq!(elaborated.dot_at(1), Some(&dots[1]));

        let mut hashed = chain.to_unelaborated();
        assert!(!store.resolve_dots_in_chain(&mut hashed, &available));

        Ok(())
    }
}
