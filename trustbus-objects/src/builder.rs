use std::{collections::BTreeMap, time::SystemTime};

use trustbus_path::TopicSuffix;

use crate::{
    AccessPermissions, Dot, DotContent, DotGrant, DotKind, Expiry, Identity, ObjectError,
    ObjectResult, Vk,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A builder for DOTs.
///
/// Every field is set on the builder and the DOT is produced by [`DotBuilder::sign`], so a
/// signed DOT can never be modified afterwards.
#[derive(Debug, Clone)]
pub struct DotBuilder {
    kind: DotKind,
    issuer: Vk,
    receiver: Vk,
    ttl: u8,
    created: Option<SystemTime>,
    expiry: Option<Expiry>,
    contact: String,
    comment: String,
    revokers: Vec<Vk>,
    access_uri: Option<(Vk, String)>,
    access_permissions: Option<AccessPermissions>,
    permissions: BTreeMap<String, String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Dot {
    /// Creates a builder for a DOT of `kind` from `issuer` to `receiver`.
    pub fn builder(kind: DotKind, issuer: Vk, receiver: Vk) -> DotBuilder {
        DotBuilder {
            kind,
            issuer,
            receiver,
            ttl: 0,
            created: None,
            expiry: None,
            contact: String::new(),
            comment: String::new(),
            revokers: Vec::new(),
            access_uri: None,
            access_permissions: None,
            permissions: BTreeMap::new(),
        }
    }
}

impl DotBuilder {
    /// Sets how many more times the grant may be re-delegated.
    pub fn ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the contact information.
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    /// Sets the comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets the expiry.
    pub fn expiry(mut self, expiry: Option<Expiry>) -> Self {
        self.expiry = expiry;
        self
    }

    /// Sets the creation time.
    pub fn created(mut self, created: SystemTime) -> Self {
        self.created = Some(created);
        self
    }

    /// Sets the creation time to now.
    pub fn created_now(self) -> Self {
        self.created(SystemTime::now())
    }

    /// Adds a delegated revoker.
    pub fn revoker(mut self, revoker: Vk) -> Self {
        self.revokers.push(revoker);
        self
    }

    /// Sets the topic of an access DOT.
    pub fn access_uri(mut self, mvk: Vk, suffix: impl Into<String>) -> Self {
        self.access_uri = Some((mvk, suffix.into()));
        self
    }

    /// Parses and sets the permissions of an access DOT.
    pub fn access_permissions(mut self, permissions: &str) -> ObjectResult<Self> {
        self.access_permissions = Some(permissions.parse()?);
        Ok(self)
    }

    /// Sets one entry of the permission map of a permission DOT.
    pub fn permission(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.permissions.insert(key.into(), value.into());
        self
    }

    /// Signs the DOT. This is the last step: the issuer signs the final encoding.
    ///
    /// # Errors
    ///
    /// Fails when `identity` is not the issuer, or when the grant fields do not match the kind.
    pub fn sign<I>(self, identity: &I) -> ObjectResult<Dot>
    where
        I: Identity + ?Sized,
    {
        let signer = identity.vk();
        if signer != self.issuer {
            return Err(ObjectError::IssuerMismatch {
                expected: self.issuer,
                actual: signer,
            });
        }

        let grant = match self.kind {
            DotKind::Access => {
                let (Some((mvk, suffix)), Some(permissions)) =
                    (self.access_uri, self.access_permissions)
                else {
                    return Err(ObjectError::GrantKindMismatch(self.kind));
                };
                if !self.permissions.is_empty() {
                    return Err(ObjectError::GrantKindMismatch(self.kind));
                }

                suffix.parse::<TopicSuffix>()?;
                DotGrant::Access {
                    mvk,
                    suffix,
                    permissions,
                }
            }
            DotKind::Permission => {
                if self.access_uri.is_some() || self.access_permissions.is_some() {
                    return Err(ObjectError::GrantKindMismatch(self.kind));
                }

                DotGrant::Permission {
                    permissions: self.permissions,
                }
            }
        };

        let content = DotContent {
            issuer: self.issuer,
            receiver: self.receiver,
            ttl: self.ttl,
            created: self.created,
            expiry: self.expiry,
            contact: self.contact,
            comment: self.comment,
            revokers: self.revokers,
            grant,
        };

        let encoded = content.encode()?;
        let signature = identity.sign(&encoded);

        Dot::from_parts(content, signature)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
