use serde::{Deserialize, Serialize};
use trustbus_objects::{DChain, Expiry, Identity, PayloadObject, RoutingObject, Signature, Vk};
use trustbus_path::TopicSuffix;

use crate::ClientResult;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// What a message asks of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MessageKind {
    /// Deliver to current subscribers.
    Publish = 0x01,

    /// Deliver to current subscribers and keep for later ones.
    Persist = 0x02,

    /// Receive messages published on a topic pattern.
    Subscribe = 0x03,

    /// Observe messages on a topic pattern without consuming them.
    Tap = 0x04,

    /// Fetch persisted messages.
    Query = 0x05,

    /// Fetch persisted messages without consuming them.
    TapQuery = 0x06,

    /// List topics with persisted messages.
    List = 0x07,
}

/// Identifies a signed message network-wide: the sender-local message id paired with bits of the
/// signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniqueMessageId {
    /// The message id assigned by the sender.
    pub mid: u64,

    /// The first eight signature bytes as a little-endian integer.
    pub sig: u64,
}

/// The fields fixed when a message is signed.
#[derive(Debug, Clone)]
pub struct Seal {
    signature: Signature,
    encoded: Vec<u8>,
    topic: String,
    umid: UniqueMessageId,
}

/// An outbound message.
///
/// The type parameter tracks whether the message has been signed. An [`UnsignedMessage`] is
/// freely mutable while it is being assembled; a [`SignedMessage`] exposes no mutators.
#[derive(Debug, Clone)]
pub struct Message<S = ()> {
    kind: MessageKind,
    mvk: Vk,
    suffix: TopicSuffix,
    mid: u64,
    routing_objects: Vec<RoutingObject>,
    payload_objects: Vec<PayloadObject>,
    pac: Option<DChain>,
    seal: S,
}

/// A message being assembled.
pub type UnsignedMessage = Message<()>;

/// A message that has been signed and can no longer change.
pub type SignedMessage = Message<Seal>;

//--------------------------------------------------------------------------------------------------
// Types: Serde
//--------------------------------------------------------------------------------------------------

#[derive(Serialize)]
struct SignedView<'a> {
    kind: MessageKind,
    mvk: Vk,
    suffix: &'a TopicSuffix,
    mid: u64,
    routing_objects: &'a [RoutingObject],
    payload_objects: &'a [PayloadObject],
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MessageKind {
    /// Returns whether the message carries content to subscribers. These kinds may not target
    /// wildcard suffixes.
    pub fn is_publish(&self) -> bool {
        matches!(self, MessageKind::Publish | MessageKind::Persist)
    }
}

impl<S> Message<S> {
    /// Returns the kind of the message.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the master verifying key of the topic.
    pub fn mvk(&self) -> Vk {
        self.mvk
    }

    /// Returns the topic suffix.
    pub fn suffix(&self) -> &TopicSuffix {
        &self.suffix
    }

    /// Returns the sender-local message id.
    pub fn mid(&self) -> u64 {
        self.mid
    }

    /// Returns the routing objects in order.
    pub fn routing_objects(&self) -> &[RoutingObject] {
        &self.routing_objects
    }

    /// Returns the payload objects in order.
    pub fn payload_objects(&self) -> &[PayloadObject] {
        &self.payload_objects
    }

    /// Returns the primary access chain.
    pub fn pac(&self) -> Option<&DChain> {
        self.pac.as_ref()
    }

    /// Returns the first expiry among the routing objects.
    pub fn expiry(&self) -> Option<Expiry> {
        self.routing_objects.iter().find_map(RoutingObject::as_expiry)
    }

    /// Returns the verifying key of the sender: the origin header when present, else the
    /// receiver of the primary access chain.
    pub fn sender_vk(&self) -> Option<Vk> {
        self.routing_objects
            .iter()
            .find_map(RoutingObject::as_origin_vk)
            .or_else(|| self.pac.as_ref().and_then(DChain::receiver_vk))
    }

    fn signed_bytes(&self) -> ClientResult<Vec<u8>> {
        let view = SignedView {
            kind: self.kind,
            mvk: self.mvk,
            suffix: &self.suffix,
            mid: self.mid,
            routing_objects: &self.routing_objects,
            payload_objects: &self.payload_objects,
        };

        Ok(serde_json::to_vec(&view)?)
    }
}

impl UnsignedMessage {
    pub(crate) fn new(kind: MessageKind, mvk: Vk, suffix: TopicSuffix, mid: u64) -> Self {
        Self {
            kind,
            mvk,
            suffix,
            mid,
            routing_objects: Vec::new(),
            payload_objects: Vec::new(),
            pac: None,
            seal: (),
        }
    }

    /// Returns the routing objects for in-place editing.
    pub fn routing_objects_mut(&mut self) -> &mut Vec<RoutingObject> {
        &mut self.routing_objects
    }

    /// Appends a routing object.
    pub fn push_routing_object(&mut self, object: impl Into<RoutingObject>) {
        self.routing_objects.push(object.into());
    }

    /// Appends a payload object.
    pub fn push_payload_object(&mut self, object: PayloadObject) {
        self.payload_objects.push(object);
    }

    /// Sets or clears the primary access chain.
    pub fn set_pac(&mut self, pac: Option<DChain>) {
        self.pac = pac;
    }

    /// Returns the primary access chain for in-place editing.
    pub fn pac_mut(&mut self) -> Option<&mut DChain> {
        self.pac.as_mut()
    }

    /// Signs the message, fixing its topic string and unique id.
    ///
    /// The topic string is the URL-safe base64 of the MVK, a `/`, then the suffix.
    pub fn sign<I>(self, identity: &I) -> ClientResult<SignedMessage>
    where
        I: Identity + ?Sized,
    {
        let encoded = self.signed_bytes()?;
        let signature = Signature::from(identity.sign(&encoded));
        let topic = format!("{}/{}", self.mvk, self.suffix);
        let umid = UniqueMessageId {
            mid: self.mid,
            sig: signature.leading_u64(),
        };

        Ok(Message {
            kind: self.kind,
            mvk: self.mvk,
            suffix: self.suffix,
            mid: self.mid,
            routing_objects: self.routing_objects,
            payload_objects: self.payload_objects,
            pac: self.pac,
            seal: Seal {
                signature,
                encoded,
                topic,
                umid,
            },
        })
    }
}

impl SignedMessage {
    /// Returns the signature.
    pub fn signature(&self) -> &Signature {
        &self.seal.signature
    }

    /// Returns the topic string, `base64url(mvk)/suffix`.
    pub fn topic(&self) -> &str {
        &self.seal.topic
    }

    /// Returns the unique message id.
    pub fn umid(&self) -> UniqueMessageId {
        self.seal.umid
    }

    /// Checks the signature against `vk`.
    pub fn verify_signature(&self, vk: Vk) -> ClientResult<()> {
        vk.verify(&self.seal.encoded, self.seal.signature.as_bytes())?;
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
