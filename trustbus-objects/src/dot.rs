use std::{
    collections::BTreeMap,
    hash::{Hash, Hasher},
    time::SystemTime,
};

use serde::{Deserialize, Serialize};

use crate::{AccessPermissions, Expiry, ObjectHash, ObjectResult, RoNum, Signature, Vk};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Whether a DOT (and a chain of DOTs) grants access to a topic or a set of permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotKind {
    /// Grants access to a topic.
    Access,

    /// Grants arbitrary key/value permissions.
    Permission,
}

/// What a DOT grants. The variant always matches the DOT's [`DotKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DotGrant {
    /// Access to the topic `mvk/suffix`.
    Access {
        /// The master verifying key of the topic namespace.
        mvk: Vk,

        /// The topic suffix, which may contain wildcards.
        suffix: String,

        /// What the receiver may do on the topic.
        permissions: AccessPermissions,
    },

    /// Application-defined permissions.
    Permission {
        /// The permission map, copied verbatim.
        permissions: BTreeMap<String, String>,
    },
}

/// The signed fields of a DOT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotContent {
    /// The principal granting.
    pub issuer: Vk,

    /// The principal receiving the grant.
    pub receiver: Vk,

    /// How many more times the grant may be re-delegated.
    pub ttl: u8,

    /// When the DOT was created.
    #[serde(default)]
    pub created: Option<SystemTime>,

    /// When the DOT stops being valid.
    #[serde(default)]
    pub expiry: Option<Expiry>,

    /// Contact information of the issuer.
    #[serde(default)]
    pub contact: String,

    /// Free-form comment.
    #[serde(default)]
    pub comment: String,

    /// Principals, other than the issuer, allowed to revoke the DOT.
    #[serde(default)]
    pub revokers: Vec<Vk>,

    /// What is granted.
    pub grant: DotGrant,
}

/// A signed Declaration of Trust: a grant from an issuer to a receiver.
///
/// A `Dot` can only be obtained by signing a [`DotBuilder`][crate::DotBuilder] or by decoding a
/// signed one, and has no mutators. Its hash covers both the encoded content and the signature.
#[derive(Debug, Clone)]
pub struct Dot {
    content: DotContent,
    encoded: Vec<u8>,
    signature: Signature,
    hash: ObjectHash,
}

//--------------------------------------------------------------------------------------------------
// Types: Serde
//--------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct DotSerde {
    content: DotContent,
    signature: Signature,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DotContent {
    /// Returns the kind matching the grant.
    pub fn kind(&self) -> DotKind {
        match self.grant {
            DotGrant::Access { .. } => DotKind::Access,
            DotGrant::Permission { .. } => DotKind::Permission,
        }
    }

    /// Returns the bytes the issuer signs.
    pub fn encode(&self) -> ObjectResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl Dot {
    /// Assembles a DOT from content and a signature over its encoding.
    ///
    /// The signature is not checked here; see [`Dot::verify_signature`].
    pub fn from_parts(content: DotContent, signature: impl Into<Signature>) -> ObjectResult<Self> {
        let encoded = content.encode()?;
        let signature = signature.into();
        let hash = ObjectHash::digest([encoded.as_slice(), signature.as_bytes()]);

        Ok(Self {
            content,
            encoded,
            signature,
            hash,
        })
    }

    /// Returns the signed content.
    pub fn content(&self) -> &DotContent {
        &self.content
    }

    /// Returns the kind of the DOT.
    pub fn kind(&self) -> DotKind {
        self.content.kind()
    }

    /// Returns the issuer.
    pub fn issuer(&self) -> Vk {
        self.content.issuer
    }

    /// Returns the receiver.
    pub fn receiver(&self) -> Vk {
        self.content.receiver
    }

    /// Returns the remaining re-delegation count.
    pub fn ttl(&self) -> u8 {
        self.content.ttl
    }

    /// Returns the creation time, unless it was omitted.
    pub fn created(&self) -> Option<SystemTime> {
        self.content.created
    }

    /// Returns the expiry, if any.
    pub fn expiry(&self) -> Option<Expiry> {
        self.content.expiry
    }

    /// Returns the delegated revokers.
    pub fn revokers(&self) -> &[Vk] {
        &self.content.revokers
    }

    /// Returns the topic of an access DOT.
    pub fn access_uri(&self) -> Option<(Vk, &str)> {
        match &self.content.grant {
            DotGrant::Access { mvk, suffix, .. } => Some((*mvk, suffix.as_str())),
            DotGrant::Permission { .. } => None,
        }
    }

    /// Returns the access permissions of an access DOT.
    pub fn access_permissions(&self) -> Option<AccessPermissions> {
        match &self.content.grant {
            DotGrant::Access { permissions, .. } => Some(*permissions),
            DotGrant::Permission { .. } => None,
        }
    }

    /// Returns the permission map of a permission DOT.
    pub fn permissions(&self) -> Option<&BTreeMap<String, String>> {
        match &self.content.grant {
            DotGrant::Permission { permissions } => Some(permissions),
            DotGrant::Access { .. } => None,
        }
    }

    /// Returns the signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the bytes the signature covers.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Returns the hash identifying this DOT.
    pub fn hash(&self) -> ObjectHash {
        self.hash
    }

    /// Returns the routing object number of this DOT.
    pub fn ro_num(&self) -> RoNum {
        match self.kind() {
            DotKind::Access => RoNum::AccessDot,
            DotKind::Permission => RoNum::PermissionDot,
        }
    }

    /// Checks the signature against the issuer's verifying key.
    pub fn verify_signature(&self) -> ObjectResult<()> {
        self.content
            .issuer
            .verify(&self.encoded, self.signature.as_bytes())
    }

    /// Returns whether the DOT has an expiry in the past.
    pub fn is_expired(&self) -> bool {
        self.content.expiry.is_some_and(|e| e.has_passed())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for Dot {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Dot {}

impl Hash for Dot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl Serialize for Dot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let parts = DotSerde {
            content: self.content.clone(),
            signature: self.signature.clone(),
        };

        parts.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Dot {
    fn deserialize<D>(deserializer: D) -> Result<Dot, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parts = DotSerde::deserialize(deserializer)?;
        Dot::from_parts(parts.content, parts.signature).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
