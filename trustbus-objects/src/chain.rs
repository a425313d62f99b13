use serde::{Deserialize, Serialize};

use crate::{Dot, DotKind, ObjectError, ObjectHash, ObjectResult, RoNum, Vk};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A delegation chain: an ordered sequence of DOTs proving a path of authority from a master
/// verifying key down to the receiver of the last DOT.
///
/// A chain is either
/// - *un-elaborated*: only the chain hash is known, or
/// - *elaborated*: the hashes of its DOTs are known, in order. Each DOT may additionally be
///   *resolved*, i.e. present in full.
///
/// The chain hash is the SHA-256 digest of the concatenated DOT hashes, so both forms of the
/// same chain share it.
#[derive(Debug, Clone)]
pub struct DChain {
    kind: DotKind,
    chain_hash: ObjectHash,
    dot_hashes: Option<Vec<ObjectHash>>,
    dots: Vec<Option<Dot>>,
}

//--------------------------------------------------------------------------------------------------
// Types: Serde
//--------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct DChainSerde {
    kind: DotKind,
    hash: ObjectHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dots: Option<Vec<ObjectHash>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DChain {
    /// Builds a resolved chain from DOTs.
    ///
    /// # Errors
    ///
    /// Fails on an empty sequence, on a DOT whose kind differs from `kind`, and when a DOT is not
    /// issued by the receiver of the DOT before it.
    pub fn from_dots(kind: DotKind, dots: impl IntoIterator<Item = Dot>) -> ObjectResult<Self> {
        let dots: Vec<Dot> = dots.into_iter().collect();
        if dots.is_empty() {
            return Err(ObjectError::EmptyChain);
        }

        for (index, dot) in dots.iter().enumerate() {
            if dot.kind() != kind {
                return Err(ObjectError::ChainKindMismatch {
                    index,
                    expected: kind,
                    actual: dot.kind(),
                });
            }

            if index > 0 && dots[index - 1].receiver() != dot.issuer() {
                return Err(ObjectError::BrokenChainLinkage(index));
            }
        }

        let hashes = dots.iter().map(Dot::hash).collect::<Vec<_>>();
        Ok(Self {
            kind,
            chain_hash: Self::hash_of(&hashes),
            dot_hashes: Some(hashes),
            dots: dots.into_iter().map(Some).collect(),
        })
    }

    /// Builds an elaborated chain whose DOTs are known only by hash.
    pub fn from_dot_hashes(kind: DotKind, hashes: Vec<ObjectHash>) -> ObjectResult<Self> {
        if hashes.is_empty() {
            return Err(ObjectError::EmptyChain);
        }

        Ok(Self {
            kind,
            chain_hash: Self::hash_of(&hashes),
            dots: vec![None; hashes.len()],
            dot_hashes: Some(hashes),
        })
    }

    /// Builds an un-elaborated chain known only by its hash.
    pub fn from_chain_hash(kind: DotKind, chain_hash: ObjectHash) -> Self {
        Self {
            kind,
            chain_hash,
            dot_hashes: None,
            dots: Vec::new(),
        }
    }

    fn hash_of(hashes: &[ObjectHash]) -> ObjectHash {
        ObjectHash::digest(hashes.iter().map(|h| &h.as_bytes()[..]))
    }

    /// Returns the kind of the chain.
    pub fn kind(&self) -> DotKind {
        self.kind
    }

    /// Returns the chain hash.
    pub fn chain_hash(&self) -> ObjectHash {
        self.chain_hash
    }

    /// Returns whether the DOT hashes are known.
    pub fn is_elaborated(&self) -> bool {
        self.dot_hashes.is_some()
    }

    /// Returns whether every DOT is present in full.
    pub fn is_resolved(&self) -> bool {
        self.is_elaborated() && self.dots.iter().all(Option::is_some)
    }

    /// Collapses the chain to its hash-only form.
    pub fn unelaborate(&mut self) {
        self.dot_hashes = None;
        self.dots.clear();
    }

    /// Returns the hash-only form of the chain.
    pub fn to_unelaborated(&self) -> Self {
        Self::from_chain_hash(self.kind, self.chain_hash)
    }

    /// Returns the DOT hashes, if elaborated.
    pub fn dot_hashes(&self) -> Option<&[ObjectHash]> {
        self.dot_hashes.as_deref()
    }

    /// Returns the number of DOT hashes; zero when un-elaborated.
    pub fn num_hashes(&self) -> usize {
        self.dot_hashes.as_ref().map_or(0, Vec::len)
    }

    /// Returns the DOT at `index` if it has been resolved.
    pub fn dot_at(&self, index: usize) -> Option<&Dot> {
        self.dots.get(index).and_then(Option::as_ref)
    }

    /// Returns the resolved DOTs in chain order, skipping unresolved ones.
    pub fn resolved_dots(&self) -> impl Iterator<Item = &Dot> {
        self.dots.iter().flatten()
    }

    /// Places `dot` at every position whose hash matches it.
    ///
    /// Returns whether the DOT belongs to the chain.
    pub fn resolve_dot(&mut self, dot: &Dot) -> bool {
        let Some(hashes) = &self.dot_hashes else {
            return false;
        };

        let mut found = false;
        for (hash, slot) in hashes.iter().zip(self.dots.iter_mut()) {
            if *hash == dot.hash() && dot.kind() == self.kind {
                *slot = Some(dot.clone());
                found = true;
            }
        }

        found
    }

    /// Returns the receiver of the chain: the receiver of its last DOT, once that DOT is
    /// resolved.
    pub fn receiver_vk(&self) -> Option<Vk> {
        self.dots.last().and_then(Option::as_ref).map(Dot::receiver)
    }

    /// Returns the issuer of the first DOT, once that DOT is resolved.
    pub fn root_vk(&self) -> Option<Vk> {
        self.dots.first().and_then(Option::as_ref).map(Dot::issuer)
    }

    /// Returns the routing object number of the chain in its current form.
    pub fn ro_num(&self) -> RoNum {
        match (self.kind, self.is_elaborated()) {
            (DotKind::Access, true) => RoNum::AccessDChain,
            (DotKind::Access, false) => RoNum::AccessDChainHash,
            (DotKind::Permission, true) => RoNum::PermissionDChain,
            (DotKind::Permission, false) => RoNum::PermissionDChainHash,
        }
    }

    /// A measure of how much of the chain is known, used to pick between copies.
    pub fn elaboration_rank(&self) -> usize {
        if self.is_elaborated() {
            1 + self.dots.iter().flatten().count()
        } else {
            0
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for DChain {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.chain_hash == other.chain_hash
            && self.dot_hashes == other.dot_hashes
    }
}

impl Eq for DChain {}

impl Serialize for DChain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let parts = DChainSerde {
            kind: self.kind,
            hash: self.chain_hash,
            dots: self.dot_hashes.clone(),
        };

        parts.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DChain {
    fn deserialize<D>(deserializer: D) -> Result<DChain, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parts = DChainSerde::deserialize(deserializer)?;
        match parts.dots {
            None => Ok(DChain::from_chain_hash(parts.kind, parts.hash)),
            Some(hashes) => {
                let chain =
                    DChain::from_dot_hashes(parts.kind, hashes).map_err(serde::de::Error::custom)?;
                if chain.chain_hash != parts.hash {
                    return Err(serde::de::Error::custom(ObjectError::ChainHashMismatch(
                        parts.hash,
                    )));
                }

                Ok(chain)
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
