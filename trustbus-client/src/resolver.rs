use trustbus_objects::RoutingObject;

use crate::{ChainElaborator, ClientError, ClientResult, DotResolver, UnsignedMessage};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How much of the primary access chain travels with a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElaborationLevel {
    /// Only the chain hash.
    #[default]
    None,

    /// The ordered DOT hashes.
    Partial,

    /// The DOT hashes and every DOT.
    Full,
}

/// Picks the primary access chain (PAC) of a message and brings it to the requested
/// elaboration level.
pub struct PacResolver<'a> {
    elaborator: &'a dyn ChainElaborator,
    dots: &'a dyn DotResolver,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<'a> PacResolver<'a> {
    /// Creates a resolver over the given collaborators.
    pub fn new(elaborator: &'a dyn ChainElaborator, dots: &'a dyn DotResolver) -> Self {
        Self { elaborator, dots }
    }

    /// Resolves the PAC of `message` to `level`.
    ///
    /// Without an explicit PAC the first access chain among the routing objects is adopted.
    /// Above [`ElaborationLevel::None`] the elaborated chain is appended to the routing objects,
    /// then at [`ElaborationLevel::Full`] each of its DOTs in chain order. Whenever there is a
    /// PAC it is appended once more at the end.
    ///
    /// # Errors
    ///
    /// Fails when elaboration is requested and there is no PAC, when the chain cannot be
    /// elaborated, or when one of its DOTs cannot be resolved.
    pub fn resolve(
        &self,
        message: &mut UnsignedMessage,
        level: ElaborationLevel,
    ) -> ClientResult<()> {
        let source = if message.pac().is_none() {
            adopt_first_access_chain(message)
        } else {
            None
        };

        if level == ElaborationLevel::None {
            if let Some(pac) = message.pac_mut() {
                pac.unelaborate();
            }

            if let Some(index) = source {
                if let Some(chain) = message
                    .routing_objects_mut()
                    .get_mut(index)
                    .and_then(RoutingObject::as_chain_mut)
                {
                    chain.unelaborate();
                }
            }
        } else {
            let pac = message.pac().ok_or(ClientError::MissingAccessChain)?;
            let mut pac = if pac.is_elaborated() {
                pac.clone()
            } else {
                self.elaborator.elaborate(pac).ok_or_else(|| {
                    tracing::debug!(chain = %pac.chain_hash(), "unable to elaborate access chain");
                    ClientError::UnresolvableChain(pac.chain_hash())
                })?
            };

            if level == ElaborationLevel::Full
                && !self
                    .dots
                    .resolve_dots_in_chain(&mut pac, message.routing_objects())
            {
                return Err(ClientError::UnresolvableDots(pac.chain_hash()));
            }

            message.push_routing_object(pac.clone());
            if level == ElaborationLevel::Full {
                for index in 0..pac.num_hashes() {
                    if let Some(dot) = pac.dot_at(index) {
                        message.push_routing_object(dot.clone());
                    }
                }
            }

            message.set_pac(Some(pac));
        }

        if let Some(pac) = message.pac().cloned() {
            message.push_routing_object(pac);
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Adopts the first access chain among the routing objects as the PAC, returning its position.
fn adopt_first_access_chain(message: &mut UnsignedMessage) -> Option<usize> {
    let (index, chain) = message
        .routing_objects()
        .iter()
        .enumerate()
        .find(|(_, object)| object.is_access_chain())
        .and_then(|(index, object)| Some((index, object.as_chain()?.clone())))?;

    tracing::debug!(index, chain = %chain.chain_hash(), "adopting access chain");
    message.set_pac(Some(chain));

    Some(index)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
