use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::mpsc};
use trustbus_objects::Vk;
use trustbus_path::TopicSuffix;

use crate::{DeliveryCallback, MessageKind, SignedMessage, Transport, UniqueMessageId};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A transport delivering messages between clients of the same process.
///
/// Each subscription owns a task on the given runtime fed by an unbounded channel, so messages
/// on one subscription are delivered in publish order. Persisted messages are kept per topic and
/// replayed to matching subscriptions when they are created.
///
/// Subscribing twice with the same kind to the same topic string as the same sender matches the
/// existing subscription. The existing subscription keeps delivering to its original callback.
/// A tap and a subscribe on one topic are separate subscriptions.
#[derive(Clone)]
pub struct MemoryTransport {
    runtime: Handle,
    registry: Arc<Mutex<Registry>>,
}

#[derive(Default)]
struct Registry {
    subscriptions: HashMap<UniqueMessageId, Subscription>,
    by_origin: HashMap<Origin, UniqueMessageId>,
    persisted: HashMap<String, Arc<SignedMessage>>,
}

struct Subscription {
    mvk: Vk,
    pattern: TopicSuffix,
    origin: Origin,
    sender: mpsc::UnboundedSender<Arc<SignedMessage>>,
}

/// Kind, topic and sender of a subscription request.
type Origin = (MessageKind, String, Vk);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MemoryTransport {
    /// Creates a transport spawning delivery tasks on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Returns the number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.registry.lock().subscriptions.len()
    }

    /// Returns the message persisted on `topic`, if any.
    pub fn persisted(&self, topic: &str) -> Option<Arc<SignedMessage>> {
        self.registry.lock().persisted.get(topic).cloned()
    }
}

impl Subscription {
    fn matches(&self, message: &SignedMessage) -> bool {
        self.mvk == message.mvk() && self.pattern.matches(message.suffix())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Transport for MemoryTransport {
    fn publish(&self, message: SignedMessage) {
        let message = Arc::new(message);
        let mut registry = self.registry.lock();

        if message.kind() == MessageKind::Persist {
            registry
                .persisted
                .insert(message.topic().to_owned(), Arc::clone(&message));
        }

        let mut delivered = 0;
        for subscription in registry.subscriptions.values() {
            if subscription.matches(&message)
                && subscription.sender.send(Arc::clone(&message)).is_ok()
            {
                delivered += 1;
            }
        }

        tracing::debug!(topic = message.topic(), delivered, "published message");
    }

    fn subscribe(&self, message: SignedMessage, on_message: DeliveryCallback) -> UniqueMessageId {
        // Messages without a known sender share the `EVERYONE` slot of their topic.
        let origin = (
            message.kind(),
            message.topic().to_owned(),
            message.sender_vk().unwrap_or(Vk::EVERYONE),
        );

        let mut registry = self.registry.lock();
        if let Some(id) = registry.by_origin.get(&origin) {
            tracing::debug!(topic = %origin.1, ?id, "matched existing subscription");
            return *id;
        }

        let (sender, mut receiver) = mpsc::unbounded_channel::<Arc<SignedMessage>>();
        self.runtime.spawn(async move {
            while let Some(message) = receiver.recv().await {
                on_message(message);
            }
        });

        let id = message.umid();
        let subscription = Subscription {
            mvk: message.mvk(),
            pattern: message.suffix().clone(),
            origin: origin.clone(),
            sender,
        };

        for persisted in registry.persisted.values() {
            if subscription.matches(persisted) {
                let _ = subscription.sender.send(Arc::clone(persisted));
            }
        }

        tracing::debug!(topic = %origin.1, ?id, "created subscription");
        registry.by_origin.insert(origin, id);
        registry.subscriptions.insert(id, subscription);

        id
    }

    fn unsubscribe(&self, id: UniqueMessageId) -> bool {
        let mut registry = self.registry.lock();
        match registry.subscriptions.remove(&id) {
            Some(subscription) => {
                registry.by_origin.remove(&subscription.origin);
                tracing::debug!(?id, "removed subscription");
                true
            }
            None => false,
        }
    }
}
