//! Subscriber bookkeeping
//!
//! A registry maps each message kind to the handlers subscribed to it, in
//! subscription order. Subscriptions are only accepted while the registry is
//! open; once locked it can dispatch but never grow again.

use std::collections::HashMap;

use super::{Message, MessagingError};

/// Callback invoked for every delivered message of the subscribed kind.
///
/// Handlers receive the shared state the owning carrier was handed for this
/// pass, plus an [`Outbox`] for follow-up publications. Follow-ups are never
/// seen by the pass that produced them.
pub type Handler<M, S> = Box<dyn FnMut(&M, &mut S, &mut Outbox<M>)>;

/// Lifecycle of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Accepting subscriptions, not yet delivering
    Open,
    /// Delivering, subscriptions rejected
    Locked,
}

/// Follow-up commands published by handlers during a dispatch pass
#[derive(Debug)]
pub struct Outbox<M> {
    commands: Vec<M>,
}

impl<M> Outbox<M> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Queue a follow-up for the carrier's next pass
    pub fn publish(&mut self, command: M) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Take the queued follow-ups in publish order
    pub fn into_commands(self) -> Vec<M> {
        self.commands
    }
}

impl<M> Default for Outbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered handler lists keyed by message kind
pub struct CommandRegistry<M: Message, S> {
    handlers: HashMap<M::Kind, Vec<Handler<M, S>>>,
    state: RegistryState,
}

impl<M: Message, S> CommandRegistry<M, S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            state: RegistryState::Open,
        }
    }

    /// Register `handler` for every future delivery of `kind`.
    ///
    /// Fails with [`MessagingError::RegistrationAfterLock`] once locked.
    pub fn subscribe<F>(&mut self, kind: M::Kind, handler: F) -> Result<(), MessagingError>
    where
        F: FnMut(&M, &mut S, &mut Outbox<M>) + 'static,
    {
        if self.state == RegistryState::Locked {
            return Err(MessagingError::RegistrationAfterLock {
                topic: format!("{kind:?}"),
            });
        }
        self.handlers.entry(kind).or_default().push(Box::new(handler));
        Ok(())
    }

    /// Close the registry to new subscriptions. Locking twice is a no-op.
    pub fn lock(&mut self) {
        if self.state == RegistryState::Open {
            log::trace!("Registry locked with {} handlers", self.handler_count());
        }
        self.state = RegistryState::Locked;
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == RegistryState::Locked
    }

    /// Total handlers across all kinds
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Number of handlers subscribed to `kind`
    pub fn subscribers(&self, kind: M::Kind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Invoke every handler subscribed to the command's kind, in subscription order
    pub fn dispatch(&mut self, command: &M, state: &mut S, outbox: &mut Outbox<M>) {
        if let Some(handlers) = self.handlers.get_mut(&command.kind()) {
            for handler in handlers.iter_mut() {
                handler(command, state, outbox);
            }
        }
    }
}

impl<M: Message, S> Default for CommandRegistry<M, S> {
    fn default() -> Self {
        Self::new()
    }
}
