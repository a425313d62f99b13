use serde::{Deserialize, Serialize};

use crate::{DChain, Dot, DotKind, Expiry, ObjectHash, ObjectResult, Vk};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The discriminator of a routing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum RoNum {
    /// An access chain known only by its hash.
    AccessDChainHash = 0x01,

    /// An elaborated access chain.
    AccessDChain = 0x02,

    /// A permission chain known only by its hash.
    PermissionDChainHash = 0x11,

    /// An elaborated permission chain.
    PermissionDChain = 0x12,

    /// An access DOT.
    AccessDot = 0x20,

    /// A permission DOT.
    PermissionDot = 0x21,

    /// A message expiry.
    Expiry = 0x40,

    /// The verifying key of the message's sender.
    OriginVk = 0x50,
}

/// Metadata a message carries for routers and verifiers: the chains and DOTs proving its
/// authorization, its expiry, and who sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RoutingObject {
    /// A delegation chain, elaborated or hash-only.
    Chain(DChain),

    /// A single DOT.
    Dot(Dot),

    /// The time after which the message must be dropped.
    Expiry(Expiry),

    /// The verifying key of the sender.
    OriginVk(Vk),
}

/// The identity of a routing object, regardless of how elaborated it is.
///
/// Two copies of the same chain share a key whether they are hash-only or elaborated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingKey {
    /// A chain, by kind and chain hash.
    Chain(DotKind, ObjectHash),

    /// A DOT, by hash.
    Dot(ObjectHash),

    /// An expiry, by time.
    Expiry(Expiry),

    /// An origin header, by key.
    OriginVk(Vk),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RoutingObject {
    /// Returns the discriminator of the object.
    pub fn ro_num(&self) -> RoNum {
        match self {
            RoutingObject::Chain(chain) => chain.ro_num(),
            RoutingObject::Dot(dot) => dot.ro_num(),
            RoutingObject::Expiry(_) => RoNum::Expiry,
            RoutingObject::OriginVk(_) => RoNum::OriginVk,
        }
    }

    /// Returns whether the object is an access chain, elaborated or not.
    pub fn is_access_chain(&self) -> bool {
        matches!(
            self.ro_num(),
            RoNum::AccessDChain | RoNum::AccessDChainHash
        )
    }

    /// Returns the chain, if the object is one.
    pub fn as_chain(&self) -> Option<&DChain> {
        match self {
            RoutingObject::Chain(chain) => Some(chain),
            _ => None,
        }
    }

    /// Returns the chain mutably, if the object is one.
    pub fn as_chain_mut(&mut self) -> Option<&mut DChain> {
        match self {
            RoutingObject::Chain(chain) => Some(chain),
            _ => None,
        }
    }

    /// Returns the DOT, if the object is one.
    pub fn as_dot(&self) -> Option<&Dot> {
        match self {
            RoutingObject::Dot(dot) => Some(dot),
            _ => None,
        }
    }

    /// Returns the origin verifying key, if the object is an origin header.
    pub fn as_origin_vk(&self) -> Option<Vk> {
        match self {
            RoutingObject::OriginVk(vk) => Some(*vk),
            _ => None,
        }
    }

    /// Returns the expiry, if the object is one.
    pub fn as_expiry(&self) -> Option<Expiry> {
        match self {
            RoutingObject::Expiry(expiry) => Some(*expiry),
            _ => None,
        }
    }

    /// Returns the identity of the object.
    pub fn key(&self) -> RoutingKey {
        match self {
            RoutingObject::Chain(chain) => RoutingKey::Chain(chain.kind(), chain.chain_hash()),
            RoutingObject::Dot(dot) => RoutingKey::Dot(dot.hash()),
            RoutingObject::Expiry(expiry) => RoutingKey::Expiry(*expiry),
            RoutingObject::OriginVk(vk) => RoutingKey::OriginVk(*vk),
        }
    }

    /// How much of the object is known. Only chains have more than one level.
    pub fn elaboration_rank(&self) -> usize {
        match self {
            RoutingObject::Chain(chain) => chain.elaboration_rank(),
            _ => 0,
        }
    }

    /// Encodes the object.
    pub fn encode(&self) -> ObjectResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<DChain> for RoutingObject {
    fn from(chain: DChain) -> Self {
        RoutingObject::Chain(chain)
    }
}

impl From<Dot> for RoutingObject {
    fn from(dot: Dot) -> Self {
        RoutingObject::Dot(dot)
    }
}

impl From<Expiry> for RoutingObject {
    fn from(expiry: Expiry) -> Self {
        RoutingObject::Expiry(expiry)
    }
}

impl From<RoNum> for u8 {
    fn from(num: RoNum) -> Self {
        num as u8
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
