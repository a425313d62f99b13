use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use trustbus_config::{ClientConfig, RoutingDedup};
use trustbus_objects::{DChain, Dot, DotKind, Identity, ObjectResult, RoutingObject, Vk};
use trustbus_path::{analyze_suffix, TopicSuffix};
use typed_builder::TypedBuilder;

use crate::{
    dedup_routing_objects, ChainElaborator, ClientError, ClientResult, CreateDotChainParams,
    CreateDotParams, DeliveryCallback, DotResolver, MessageKind, MessageVerifier, PacResolver,
    PublishParams, SignatureVerifier, SignedMessage, StatusCode, SubscribeParams, Transport,
    UniqueMessageId, UnsignedMessage,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A trustbus client acting for a single identity.
///
/// The client composes message assembly, access chain resolution and signing into
/// [`Client::publish`] and [`Client::subscribe`], and issues DOTs and delegation chains signed by
/// its identity. Calls are independent of each other; the only shared state is the message id
/// counter.
#[derive(TypedBuilder)]
pub struct Client {
    /// The identity messages and DOTs are signed with.
    identity: Arc<dyn Identity>,

    /// Expands hash-only access chains.
    elaborator: Arc<dyn ChainElaborator>,

    /// Resolves the DOTs of access chains.
    dot_resolver: Arc<dyn DotResolver>,

    /// Checks messages when verification is requested.
    #[builder(default = Arc::new(SignatureVerifier) as Arc<dyn MessageVerifier>)]
    verifier: Arc<dyn MessageVerifier>,

    /// Delivers messages and keeps subscriptions.
    transport: Arc<dyn Transport>,

    /// How duplicate routing objects are handled before signing.
    #[builder(default)]
    routing_dedup: RoutingDedup,

    #[builder(default, setter(skip))]
    next_mid: AtomicU64,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Client {
    /// Creates a client from its configuration, using `backend` to elaborate chains and resolve
    /// DOTs.
    pub fn from_config<B>(
        config: &ClientConfig,
        backend: Arc<B>,
        transport: Arc<dyn Transport>,
    ) -> ClientResult<Self>
    where
        B: ChainElaborator + DotResolver + 'static,
    {
        let identity = config.key_pair()?;
        tracing::info!(name = %config.name, vk = %identity.vk(), "creating client");

        Ok(Client::builder()
            .identity(Arc::new(identity))
            .elaborator(backend.clone())
            .dot_resolver(backend)
            .transport(transport)
            .routing_dedup(config.routing_dedup)
            .build())
    }

    /// Returns the verifying key of the client's identity.
    pub fn vk(&self) -> Vk {
        self.identity.vk()
    }

    /// Allocates a message with a fresh id.
    ///
    /// # Errors
    ///
    /// Fails when the suffix is malformed or the MVK is not 32 bytes, which map to
    /// [`StatusCode::BadUri`], and when a publish or persist message targets a wildcard suffix,
    /// which maps to [`StatusCode::BadOperation`].
    pub fn allocate(
        &self,
        kind: MessageKind,
        mvk: &[u8],
        suffix: &str,
    ) -> ClientResult<UnsignedMessage> {
        let mid = self.next_mid.fetch_add(1, Ordering::Relaxed) + 1;

        let analysis = analyze_suffix(suffix);
        if let Some(problem) = analysis.problem {
            return Err(problem.into());
        }

        let mvk = Vk::from_slice(mvk).map_err(|_| ClientError::InvalidMvkLength(mvk.len()))?;

        if kind.is_publish() && (analysis.has_single_wildcard || analysis.has_multi_wildcard) {
            return Err(ClientError::WildcardNotPermitted {
                kind,
                suffix: suffix.to_owned(),
            });
        }

        let suffix: TopicSuffix = suffix.parse()?;
        Ok(UnsignedMessage::new(kind, mvk, suffix, mid))
    }

    /// Removes duplicate routing objects per the configured policy and signs the message.
    pub fn finalize(&self, mut message: UnsignedMessage) -> ClientResult<SignedMessage> {
        let objects = std::mem::take(message.routing_objects_mut());
        *message.routing_objects_mut() = dedup_routing_objects(objects, self.routing_dedup);

        message.sign(&*self.identity)
    }

    /// Publishes a message. `on_done` is called exactly once, before this returns.
    pub fn publish(&self, params: PublishParams, on_done: impl FnOnce(StatusCode)) {
        match self.try_publish(params) {
            Ok(()) => on_done(StatusCode::Okay),
            Err(e) => {
                tracing::debug!(error = %e, "publish failed");
                on_done(e.status())
            }
        }
    }

    /// Subscribes to a topic pattern.
    ///
    /// `on_result` is called exactly once, before this returns, with the status, whether a new
    /// subscription was created, and the subscription id. `on_message` is then called for every
    /// message delivered on the subscription until it is torn down with [`Client::unsubscribe`].
    pub fn subscribe<F>(
        &self,
        params: SubscribeParams,
        on_result: impl FnOnce(StatusCode, bool, UniqueMessageId),
        on_message: F,
    ) where
        F: Fn(Arc<SignedMessage>) + Send + Sync + 'static,
    {
        match self.try_subscribe(params, Box::new(on_message)) {
            Ok((is_new, id)) => on_result(StatusCode::Okay, is_new, id),
            Err(e) => {
                tracing::debug!(error = %e, "subscribe failed");
                on_result(e.status(), false, UniqueMessageId::default())
            }
        }
    }

    /// Tears down a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: UniqueMessageId) -> bool {
        self.transport.unsubscribe(id)
    }

    /// Creates a DOT issued and signed by the client's identity.
    ///
    /// # Errors
    ///
    /// Fails when the receiver, a revoker or the MVK of an access DOT is not 32 bytes, when the
    /// access permission string is malformed, and when the relative expiry is out of range.
    pub fn create_dot(&self, params: CreateDotParams) -> ObjectResult<Dot> {
        let result = self.try_create_dot(params);
        if let Err(e) = &result {
            tracing::info!(error = %e, "unable to create DOT");
        }

        result
    }

    /// Assembles a delegation chain from DOTs, optionally collapsed to its hash.
    pub fn create_dot_chain(&self, params: CreateDotChainParams) -> ObjectResult<DChain> {
        let mut chain = DChain::from_dots(params.kind, params.dots).inspect_err(|e| {
            tracing::info!(error = %e, "unable to create delegation chain");
        })?;

        if params.unelaborate {
            chain.unelaborate();
        }

        Ok(chain)
    }

    fn resolver(&self) -> PacResolver<'_> {
        PacResolver::new(&*self.elaborator, &*self.dot_resolver)
    }

    fn try_publish(&self, params: PublishParams) -> ClientResult<()> {
        let kind = if params.persist {
            MessageKind::Persist
        } else {
            MessageKind::Publish
        };
        let expiry = params.expiry_spec();

        let mut message = self.allocate(kind, &params.mvk, &params.suffix)?;
        message.set_pac(params.primary_access_chain);
        message.routing_objects_mut().extend(params.routing_objects);
        for object in params.payload_objects {
            message.push_payload_object(object);
        }

        self.resolver().resolve(&mut message, params.elaborate_pac)?;

        if let Some(expiry) = expiry.resolve()? {
            message.push_routing_object(expiry);
        }
        self.add_origin_header(&mut message);

        let message = self.finalize(message)?;
        self.verify(&message, params.verify)?;
        self.transport.publish(message);

        Ok(())
    }

    fn try_subscribe(
        &self,
        params: SubscribeParams,
        on_message: DeliveryCallback,
    ) -> ClientResult<(bool, UniqueMessageId)> {
        let kind = if params.tap {
            MessageKind::Tap
        } else {
            MessageKind::Subscribe
        };

        let mut message = self.allocate(kind, &params.mvk, &params.suffix)?;
        message.set_pac(params.primary_access_chain);
        message.routing_objects_mut().extend(params.routing_objects);

        self.resolver().resolve(&mut message, params.elaborate_pac)?;
        self.add_origin_header(&mut message);

        let message = self.finalize(message)?;
        self.verify(&message, params.verify)?;

        let umid = message.umid();
        let id = self.transport.subscribe(message, on_message);

        Ok((id == umid, id))
    }

    /// Names the sender explicitly unless the access chain ends at a concrete receiver.
    fn add_origin_header(&self, message: &mut UnsignedMessage) {
        let receiver = message.pac().and_then(DChain::receiver_vk);
        if receiver.map_or(true, |vk| vk.is_everyone()) {
            tracing::debug!(mid = message.mid(), "adding origin header");
            message.push_routing_object(RoutingObject::OriginVk(self.identity.vk()));
        }
    }

    fn verify(&self, message: &SignedMessage, requested: bool) -> ClientResult<()> {
        if !requested {
            return Ok(());
        }

        match self.verifier.verify(message) {
            StatusCode::Okay => Ok(()),
            status => Err(ClientError::VerificationFailed(status)),
        }
    }

    fn try_create_dot(&self, params: CreateDotParams) -> ObjectResult<Dot> {
        let receiver = Vk::from_slice(&params.to)?;
        let expiry = params.expiry_spec().resolve()?;

        let mut builder = Dot::builder(params.kind, self.identity.vk(), receiver)
            .ttl(params.ttl)
            .contact(params.contact)
            .comment(params.comment)
            .expiry(expiry);

        if !params.omit_creation_date {
            builder = builder.created_now();
        }

        for revoker in &params.revokers {
            builder = builder.revoker(Vk::from_slice(revoker)?);
        }

        builder = match params.kind {
            DotKind::Permission => params
                .permissions
                .into_iter()
                .fold(builder, |builder, (key, value)| builder.permission(key, value)),
            DotKind::Access => builder
                .access_uri(Vk::from_slice(&params.mvk)?, params.suffix)
                .access_permissions(&params.access_permissions)?,
        };

        builder.sign(&*self.identity)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{
        collections::{BTreeMap, HashSet},
        time::{Duration, SystemTime},
    };

    use base64::prelude::{Engine, BASE64_URL_SAFE};
    use parking_lot::Mutex;
    use tokio::{runtime::Handle, sync::mpsc, time::timeout};
    use trustbus_key::{Ed25519KeyPair, KeyPairBytes, KeyPairGenerate};
    use trustbus_objects::{ObjectError, PayloadObject, RoNum};

    use crate::{
        memory::{MemoryStore, MemoryTransport},
        ElaborationLevel,
    };

    use super::*;

    #[derive(Default)]
    struct RecordingTransport {
        published: Mutex<Vec<SignedMessage>>,
    }

    impl RecordingTransport {
        fn take(&self) -> Vec<SignedMessage> {
            std::mem::take(&mut *self.published.lock())
        }
    }

    impl Transport for RecordingTransport {
        fn publish(&self, message: SignedMessage) {
            self.published.lock().push(message);
        }

        fn subscribe(&self, message: SignedMessage, _: DeliveryCallback) -> UniqueMessageId {
            message.umid()
        }

        fn unsubscribe(&self, _: UniqueMessageId) -> bool {
            false
        }
    }

    /// An authority, a delegate and the client at the end of an access chain.
    struct Setup {
        authority: Ed25519KeyPair,
        client_key: Ed25519KeyPair,
        store: MemoryStore,
        dots: Vec<Dot>,
        chain: DChain,
    }

    impl Setup {
        fn new() -> anyhow::Result<Self> {
            let [authority, delegate, client_key] =
                std::array::from_fn(|_| Ed25519KeyPair::generate(&mut rand::thread_rng()));

            let first = Dot::builder(DotKind::Access, authority.vk(), delegate.vk())
                .ttl(1)
                .access_uri(authority.vk(), "home/*")
                .access_permissions("C*P")?
                .sign(&authority)?;
            let second = Dot::builder(DotKind::Access, delegate.vk(), client_key.vk())
                .access_uri(authority.vk(), "home/lights")
                .access_permissions("CP")?
                .sign(&delegate)?;
            let chain = DChain::from_dots(DotKind::Access, [first.clone(), second.clone()])?;

            let store = MemoryStore::new();
            store.put_chain(&chain);

            Ok(Self {
                authority,
                client_key,
                store,
                dots: vec![first, second],
                chain,
            })
        }

        fn client(&self, transport: Arc<dyn Transport>) -> anyhow::Result<Client> {
            let key = Ed25519KeyPair::from_private_key(&self.client_key.private_key_bytes())?;
            Ok(Client::builder()
                .identity(Arc::new(key))
                .elaborator(Arc::new(self.store.clone()))
                .dot_resolver(Arc::new(self.store.clone()))
                .transport(transport)
                .build())
        }

        fn mvk(&self) -> Vec<u8> {
            self.authority.vk().as_bytes().to_vec()
        }
    }

    fn standalone(transport: Arc<dyn Transport>) -> Client {
        let store = Arc::new(MemoryStore::new());
        Client::builder()
            .identity(Arc::new(Ed25519KeyPair::generate(&mut rand::thread_rng())))
            .elaborator(store.clone())
            .dot_resolver(store)
            .transport(transport)
            .build()
    }

    fn publish(client: &Client, params: PublishParams) -> Vec<StatusCode> {
        let mut statuses = Vec::new();
        client.publish(params, |status| statuses.push(status));
        statuses
    }

    #[test]
    fn test_allocate_validates_target() {
        let client = standalone(Arc::new(RecordingTransport::default()));
        let mvk = [7u8; 32];

        for kind in [MessageKind::Publish, MessageKind::Persist] {
            assert!(client.allocate(kind, &mvk, "a/b/c").is_ok());
            for suffix in ["a/+", "a/*", "+/b", "*"] {
                let result = client.allocate(kind, &mvk, suffix);
                assert_eq!(
                    result.err().map(|e| e.status()),
                    Some(StatusCode::BadOperation)
                );
            }
        }

        for kind in [MessageKind::Subscribe, MessageKind::Tap] {
            assert!(client.allocate(kind, &mvk, "a/*").is_ok());
        }

        for kind in [MessageKind::Publish, MessageKind::Subscribe, MessageKind::Query] {
            for len in [0, 31, 33] {
                let result = client.allocate(kind, &vec![7; len], "a/*");
                assert_eq!(result.err().map(|e| e.status()), Some(StatusCode::BadUri));
            }

            for suffix in ["", "a//b", "/a", "a b", "a/**", "a/*/b/*"] {
                let result = client.allocate(kind, &mvk, suffix);
                assert_eq!(result.err().map(|e| e.status()), Some(StatusCode::BadUri));
            }
        }
    }

    #[test]
    fn test_message_ids_are_unique_across_threads() -> anyhow::Result<()> {
        let client = &standalone(Arc::new(RecordingTransport::default()));

        let mids = std::thread::scope(|scope| {
            let handles = (0..4)
                .map(|_| {
                    scope.spawn(move || {
                        (0..250)
                            .map(|_| client.allocate(MessageKind::Publish, &[1; 32], "a"))
                            .map(|message| message.map(|m| m.mid()))
                            .collect::<ClientResult<Vec<_>>>()
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|_| Ok(Vec::new())))
                .collect::<ClientResult<Vec<_>>>()
        })?;

        for per_thread in &mids {
            assert!(per_thread.windows(2).all(|pair| pair[0] < pair[1]));
        }

        let unique = mids.iter().flatten().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 1000);

        Ok(())
    }

    #[test_log::test]
    fn test_publish_full_elaboration_end_to_end() -> anyhow::Result<()> {
        let setup = Setup::new()?;
        let transport = Arc::new(RecordingTransport::default());
        let client = setup.client(transport.clone())?;

        let routing_objects: Vec<RoutingObject> = vec![
            setup.chain.to_unelaborated().into(),
            setup.dots[0].clone().into(),
            setup.dots[1].clone().into(),
        ];
        let params = PublishParams::builder()
            .mvk(setup.mvk())
            .suffix("home/lights")
            .routing_objects(routing_objects.clone())
            .payload_objects(vec![PayloadObject::text("on")])
            .elaborate_pac(ElaborationLevel::Full)
            .verify(true)
            .build();

        assert_eq!(publish(&client, params), [StatusCode::Okay]);

        let published = transport.take();
        assert_eq!(published.len(), 1);
        let message = &published[0];
        tracing::debug!(topic = message.topic(), umid = ?message.umid());

        let expected_topic = format!(
            "{}/home/lights",
            BASE64_URL_SAFE.encode(setup.authority.vk().as_bytes())
        );
        assert_eq!(message.topic(), expected_topic);
        assert_eq!(message.sender_vk(), Some(client.vk()));

        let objects = message.routing_objects();
        assert_eq!(objects.len(), routing_objects.len() + 4);
        assert_eq!(&objects[..3], &routing_objects[..]);

        let added = objects[3..]
            .iter()
            .map(RoutingObject::ro_num)
            .collect::<Vec<_>>();
        assert_eq!(
            added,
            [
                RoNum::AccessDChain,
                RoNum::AccessDot,
                RoNum::AccessDot,
                RoNum::AccessDChain
            ]
        );
        assert_eq!(objects[4].as_dot(), Some(&setup.dots[0]));
        assert_eq!(objects[5].as_dot(), Some(&setup.dots[1]));
        assert_eq!(objects[6], RoutingObject::Chain(setup.chain.clone()));

        Ok(())
    }

    #[test]
    fn test_prefer_elaborated_dedup_shrinks_routing_objects() -> anyhow::Result<()> {
        let setup = Setup::new()?;
        let transport = Arc::new(RecordingTransport::default());
        let client = Client::builder()
            .identity(Arc::new(Ed25519KeyPair::from_private_key(
                &setup.client_key.private_key_bytes(),
            )?))
            .elaborator(Arc::new(setup.store.clone()))
            .dot_resolver(Arc::new(setup.store.clone()))
            .transport(transport.clone())
            .routing_dedup(RoutingDedup::PreferElaborated)
            .build();

        let params = PublishParams::builder()
            .mvk(setup.mvk())
            .suffix("home/lights")
            .routing_objects(vec![
                setup.chain.to_unelaborated().into(),
                setup.dots[0].clone().into(),
                setup.dots[1].clone().into(),
            ])
            .elaborate_pac(ElaborationLevel::Full)
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Okay]);

        let published = transport.take();
        let objects = published[0].routing_objects();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0], RoutingObject::Chain(setup.chain.clone()));

        Ok(())
    }

    #[test]
    fn test_publish_without_chain_adds_origin_header() -> anyhow::Result<()> {
        let transport = Arc::new(RecordingTransport::default());
        let client = standalone(transport.clone());

        let params = PublishParams::builder()
            .mvk([9u8; 32])
            .suffix("status")
            .expiry(SystemTime::UNIX_EPOCH + Duration::from_secs(1))
            .expiry_delta(Duration::from_secs(600))
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Okay]);

        let published = transport.take();
        let objects = published[0].routing_objects();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1], RoutingObject::OriginVk(client.vk()));

        let expiry = published[0]
            .expiry()
            .ok_or(anyhow::anyhow!("expiry missing"))?;
        assert!(!expiry.has_passed());

        Ok(())
    }

    #[test]
    fn test_publish_to_everyone_adds_origin_header() -> anyhow::Result<()> {
        let authority = Ed25519KeyPair::generate(&mut rand::thread_rng());
        let grant = Dot::builder(DotKind::Access, authority.vk(), Vk::EVERYONE)
            .access_uri(authority.vk(), "public")
            .access_permissions("P")?
            .sign(&authority)?;
        let chain = DChain::from_dots(DotKind::Access, [grant.clone()])?;

        let transport = Arc::new(RecordingTransport::default());
        let client = standalone(transport.clone());

        let params = PublishParams::builder()
            .mvk(authority.vk().as_bytes().to_vec())
            .suffix("public")
            .primary_access_chain(chain)
            .routing_objects(vec![grant.into()])
            .elaborate_pac(ElaborationLevel::Full)
            .verify(true)
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Okay]);

        let published = transport.take();
        let objects = published[0].routing_objects();
        assert_eq!(objects.last(), Some(&RoutingObject::OriginVk(client.vk())));
        assert_eq!(published[0].sender_vk(), Some(client.vk()));

        Ok(())
    }

    #[test]
    fn test_publish_reports_failures_once() -> anyhow::Result<()> {
        let setup = Setup::new()?;
        let transport = Arc::new(RecordingTransport::default());
        let client = setup.client(transport.clone())?;

        let params = PublishParams::builder()
            .mvk(setup.mvk())
            .suffix("home/lights")
            .elaborate_pac(ElaborationLevel::Partial)
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Unresolvable]);

        let params = PublishParams::builder()
            .mvk(setup.mvk())
            .suffix("home/lights")
            .primary_access_chain(setup.chain.to_unelaborated())
            .elaborate_pac(ElaborationLevel::Full)
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Unresolvable]);

        let params = PublishParams::builder()
            .mvk(setup.mvk())
            .suffix("home/+")
            .build();
        assert_eq!(publish(&client, params), [StatusCode::BadOperation]);

        let params = PublishParams::builder()
            .mvk(vec![1; 16])
            .suffix("home/lights")
            .build();
        assert_eq!(publish(&client, params), [StatusCode::BadUri]);

        let params = PublishParams::builder()
            .mvk(setup.mvk())
            .suffix("home/lights")
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Okay]);

        assert_eq!(transport.take().len(), 1);

        Ok(())
    }

    #[test]
    fn test_publish_rejects_out_of_range_expiry() {
        let transport = Arc::new(RecordingTransport::default());
        let client = standalone(transport.clone());

        let params = PublishParams::builder()
            .mvk([9u8; 32])
            .suffix("status")
            .expiry_delta(Duration::MAX)
            .build();

        assert_eq!(publish(&client, params), [StatusCode::BadOperation]);
        assert!(transport.take().is_empty());
    }

    #[test]
    fn test_verify_rejects_expired_message() {
        let transport = Arc::new(RecordingTransport::default());
        let client = standalone(transport.clone());

        let params = PublishParams::builder()
            .mvk([9u8; 32])
            .suffix("status")
            .expiry(SystemTime::UNIX_EPOCH + Duration::from_secs(1))
            .verify(true)
            .build();

        assert_eq!(publish(&client, params), [StatusCode::Expired]);
        assert!(transport.take().is_empty());
    }

    #[test]
    fn test_subscribe_reports_new_subscription() {
        let client = standalone(Arc::new(RecordingTransport::default()));

        let mut results = Vec::new();
        client.subscribe(
            SubscribeParams::builder()
                .mvk([9u8; 32])
                .suffix("a/*")
                .build(),
            |status, is_new, id| results.push((status, is_new, id)),
            |_| {},
        );

        assert_eq!(results.len(), 1);
        let (status, is_new, id) = results[0];
        assert_eq!(status, StatusCode::Okay);
        assert!(is_new);
        assert_eq!(id.mid, 1);

        let mut results = Vec::new();
        client.subscribe(
            SubscribeParams::builder()
                .mvk([9u8; 33])
                .suffix("a/*")
                .build(),
            |status, is_new, id| results.push((status, is_new, id)),
            |_| {},
        );
        assert_eq!(
            results,
            [(StatusCode::BadUri, false, UniqueMessageId::default())]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_subscribe_twice_matches_existing() -> anyhow::Result<()> {
        let transport = Arc::new(MemoryTransport::new(Handle::current()));
        let client = standalone(transport.clone());

        let subscribe = || {
            let mut results = Vec::new();
            client.subscribe(
                SubscribeParams::builder()
                    .mvk([4u8; 32])
                    .suffix("sensors/+")
                    .build(),
                |status, is_new, id| results.push((status, is_new, id)),
                |_| {},
            );
            results
        };

        let first = subscribe();
        let second = subscribe();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert!(first[0].1);
        assert!(!second[0].1);
        assert_eq!(first[0].2, second[0].2);
        assert_eq!(transport.subscription_count(), 1);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_tap_and_subscribe_are_separate_subscriptions() -> anyhow::Result<()> {
        let transport = Arc::new(MemoryTransport::new(Handle::current()));
        let client = standalone(transport.clone());

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut results = Vec::new();
        for tap in [false, true] {
            let sender = sender.clone();
            client.subscribe(
                SubscribeParams::builder()
                    .mvk([4u8; 32])
                    .suffix("sensors/+")
                    .tap(tap)
                    .build(),
                |status, is_new, id| results.push((status, is_new, id)),
                move |message: Arc<SignedMessage>| {
                    let _ = sender.send((tap, message.mid()));
                },
            );
        }
        drop(sender);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(status, is_new, _)| status.is_okay() && *is_new));
        assert_ne!(results[0].2, results[1].2);
        assert_eq!(transport.subscription_count(), 2);

        let params = PublishParams::builder()
            .mvk([4u8; 32])
            .suffix("sensors/door")
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Okay]);

        let mut taps = Vec::new();
        for _ in 0..2 {
            let (tap, _) = timeout(Duration::from_secs(1), receiver.recv())
                .await?
                .ok_or(anyhow::anyhow!("subscription closed"))?;
            taps.push(tap);
        }
        taps.sort();
        assert_eq!(taps, [false, true]);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_delivery_is_fifo_until_unsubscribed() -> anyhow::Result<()> {
        let transport = Arc::new(MemoryTransport::new(Handle::current()));
        let subscriber = standalone(transport.clone());
        let publisher = standalone(transport.clone());

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut ids = Vec::new();
        subscriber.subscribe(
            SubscribeParams::builder()
                .mvk([4u8; 32])
                .suffix("sensors/*")
                .build(),
            |_, _, id| ids.push(id),
            move |message| {
                let _ = sender.send(message);
            },
        );

        for i in 0..10 {
            let params = PublishParams::builder()
                .mvk([4u8; 32])
                .suffix(format!("sensors/room{}/temp", i % 3))
                .payload_objects(vec![PayloadObject::text(i.to_string())])
                .build();
            assert_eq!(publish(&publisher, params), [StatusCode::Okay]);
        }

        let elsewhere = PublishParams::builder()
            .mvk([5u8; 32])
            .suffix("sensors/room1/temp")
            .build();
        assert_eq!(publish(&publisher, elsewhere), [StatusCode::Okay]);

        for i in 0..10 {
            let message = timeout(Duration::from_secs(1), receiver.recv())
                .await?
                .ok_or(anyhow::anyhow!("subscription closed"))?;
            assert_eq!(message.mvk(), Vk::from([4; 32]));
            assert_eq!(message.payload_objects(), [PayloadObject::text(i.to_string())]);
            assert_eq!(message.sender_vk(), Some(publisher.vk()));
        }

        assert!(subscriber.unsubscribe(ids[0]));
        assert!(!subscriber.unsubscribe(ids[0]));

        let params = PublishParams::builder()
            .mvk([4u8; 32])
            .suffix("sensors/late")
            .build();
        assert_eq!(publish(&publisher, params), [StatusCode::Okay]);
        assert!(timeout(Duration::from_secs(1), receiver.recv())
            .await?
            .is_none());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_persisted_messages_are_replayed() -> anyhow::Result<()> {
        let transport = Arc::new(MemoryTransport::new(Handle::current()));
        let client = standalone(transport.clone());

        let params = PublishParams::builder()
            .mvk([6u8; 32])
            .suffix("config/mode")
            .payload_objects(vec![PayloadObject::text("eco")])
            .persist(true)
            .build();
        assert_eq!(publish(&client, params), [StatusCode::Okay]);

        let topic = format!("{}/config/mode", Vk::from([6; 32]));
        let persisted = transport
            .persisted(&topic)
            .ok_or(anyhow::anyhow!("message not persisted"))?;
        assert_eq!(persisted.kind(), MessageKind::Persist);

        let (sender, mut receiver) = mpsc::unbounded_channel();
        client.subscribe(
            SubscribeParams::builder()
                .mvk([6u8; 32])
                .suffix("config/+")
                .tap(true)
                .build(),
            |status, _, _| assert_eq!(status, StatusCode::Okay),
            move |message| {
                let _ = sender.send(message);
            },
        );

        let message = timeout(Duration::from_secs(1), receiver.recv())
            .await?
            .ok_or(anyhow::anyhow!("subscription closed"))?;
        assert_eq!(message.payload_objects(), [PayloadObject::text("eco")]);

        Ok(())
    }

    #[test]
    fn test_create_dot_validates_identities() -> anyhow::Result<()> {
        let client = standalone(Arc::new(RecordingTransport::default()));

        let result = client.create_dot(
            CreateDotParams::builder()
                .kind(DotKind::Permission)
                .to(vec![1; 31])
                .build(),
        );
        assert!(matches!(result, Err(ObjectError::InvalidVkLength(31))));

        let result = client.create_dot(
            CreateDotParams::builder()
                .kind(DotKind::Permission)
                .to(vec![1; 32])
                .revokers(vec![vec![2; 32], vec![3; 12]])
                .build(),
        );
        assert!(matches!(result, Err(ObjectError::InvalidVkLength(12))));

        let result = client.create_dot(
            CreateDotParams::builder()
                .kind(DotKind::Access)
                .to(vec![1; 32])
                .mvk(vec![2; 32])
                .suffix("a/b")
                .access_permissions("CX")
                .build(),
        );
        assert!(matches!(result, Err(ObjectError::InvalidPermissions(_))));

        Ok(())
    }

    #[test]
    fn test_create_dot_rejects_out_of_range_expiry() {
        let client = standalone(Arc::new(RecordingTransport::default()));

        let result = client.create_dot(
            CreateDotParams::builder()
                .kind(DotKind::Permission)
                .to(vec![1; 32])
                .expiry_delta(Duration::MAX)
                .build(),
        );
        assert!(matches!(result, Err(ObjectError::ExpiryOverflow(_))));
    }

    #[test]
    fn test_create_dot_relative_expiry_wins() -> anyhow::Result<()> {
        let client = standalone(Arc::new(RecordingTransport::default()));
        let before = SystemTime::now();

        let dot = client.create_dot(
            CreateDotParams::builder()
                .kind(DotKind::Access)
                .to(vec![1; 32])
                .ttl(4)
                .expiry(SystemTime::UNIX_EPOCH + Duration::from_secs(1))
                .expiry_delta(Duration::from_secs(3600))
                .revokers(vec![vec![2; 32]])
                .mvk(vec![3; 32])
                .suffix("doors/*")
                .access_permissions("C*")
                .build(),
        )?;

        let expiry = dot.expiry().ok_or(anyhow::anyhow!("expiry missing"))?;
        assert!(expiry.time() >= before + Duration::from_secs(3600));
        assert!(!dot.is_expired());
        assert!(dot.created().is_some());
        assert_eq!(dot.issuer(), client.vk());
        assert_eq!(dot.receiver(), Vk::from([1; 32]));
        assert_eq!(dot.ttl(), 4);
        assert_eq!(dot.revokers(), [Vk::from([2; 32])]);
        assert_eq!(dot.access_uri(), Some((Vk::from([3; 32]), "doors/*")));
        dot.verify_signature()?;

        Ok(())
    }

    #[test]
    fn test_create_permission_dot() -> anyhow::Result<()> {
        let client = standalone(Arc::new(RecordingTransport::default()));
        let permissions = BTreeMap::from([
            ("role".to_owned(), "admin".to_owned()),
            ("site".to_owned(), "north".to_owned()),
        ]);

        let dot = client.create_dot(
            CreateDotParams::builder()
                .kind(DotKind::Permission)
                .to(vec![1; 32])
                .contact("ops")
                .comment("on call")
                .omit_creation_date(true)
                .permissions(permissions.clone())
                .build(),
        )?;

        assert_eq!(dot.permissions(), Some(&permissions));
        assert_eq!(dot.created(), None);
        assert_eq!(dot.expiry(), None);
        assert_eq!(dot.content().comment, "on call");

        Ok(())
    }

    #[test]
    fn test_create_dot_chain() -> anyhow::Result<()> {
        let setup = Setup::new()?;
        let client = setup.client(Arc::new(RecordingTransport::default()))?;

        let chain = client.create_dot_chain(
            CreateDotChainParams::builder()
                .dots(setup.dots.clone())
                .kind(DotKind::Access)
                .build(),
        )?;
        assert_eq!(chain, setup.chain);
        assert!(chain.is_resolved());

        let hashed = client.create_dot_chain(
            CreateDotChainParams::builder()
                .dots(setup.dots.clone())
                .kind(DotKind::Access)
                .unelaborate(true)
                .build(),
        )?;
        assert!(!hashed.is_elaborated());
        assert_eq!(hashed.chain_hash(), setup.chain.chain_hash());

        let reversed = setup.dots.iter().rev().cloned().collect::<Vec<_>>();
        let result = client.create_dot_chain(
            CreateDotChainParams::builder()
                .dots(reversed)
                .kind(DotKind::Access)
                .build(),
        );
        assert!(matches!(result, Err(ObjectError::BrokenChainLinkage(1))));

        let result = client.create_dot_chain(
            CreateDotChainParams::builder()
                .dots(setup.dots.clone())
                .kind(DotKind::Permission)
                .build(),
        );
        assert!(matches!(result, Err(ObjectError::ChainKindMismatch { .. })));

        Ok(())
    }

    #[test]
    fn test_client_from_config() -> anyhow::Result<()> {
        let key = Ed25519KeyPair::generate(&mut rand::thread_rng());
        let config = ClientConfig::builder()
            .name("kitchen")
            .signing_key(hex::encode(key.private_key_bytes()))
            .build();

        let client = Client::from_config(
            &config,
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingTransport::default()),
        )?;
        assert_eq!(client.vk(), key.vk());

        Ok(())
    }
}
