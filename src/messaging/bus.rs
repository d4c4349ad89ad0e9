//! Same-tick command bus
//!
//! `publish` only appends. `deliver` swaps the pending queue out and
//! dispatches exactly that batch; anything handlers publish meanwhile waits
//! for the next `deliver`.

use std::mem;

use super::{CommandRegistry, Message, MessagingError, Outbox, RegistryState};

/// Deferred-delivery queue over a [`CommandRegistry`]
pub struct CommandBus<M: Message, S> {
    registry: CommandRegistry<M, S>,
    pending: Vec<M>,
}

impl<M: Message, S> CommandBus<M, S> {
    pub fn new() -> Self {
        Self {
            registry: CommandRegistry::new(),
            pending: Vec::new(),
        }
    }

    /// See [`CommandRegistry::subscribe`]
    pub fn subscribe<F>(&mut self, kind: M::Kind, handler: F) -> Result<(), MessagingError>
    where
        F: FnMut(&M, &mut S, &mut Outbox<M>) + 'static,
    {
        self.registry.subscribe(kind, handler)
    }

    pub fn lock(&mut self) {
        self.registry.lock();
    }

    pub fn state(&self) -> RegistryState {
        self.registry.state()
    }

    /// Queue a command for the next delivery. Valid in any registry state.
    pub fn publish(&mut self, command: M) {
        self.pending.push(command);
    }

    /// Commands waiting for the next delivery, in publish order
    pub fn pending(&self) -> &[M] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Dispatch everything published before this call, in publish order.
    ///
    /// Returns how many commands were dispatched. On an open registry the
    /// queue is left untouched and nothing is dispatched.
    pub fn deliver(&mut self, state: &mut S) -> usize {
        if !self.registry.is_locked() {
            if !self.pending.is_empty() {
                log::warn!(
                    "Holding {} commands: bus registry is still open",
                    self.pending.len()
                );
            }
            return 0;
        }

        let batch = mem::take(&mut self.pending);
        let mut outbox = Outbox::new();
        for command in &batch {
            self.registry.dispatch(command, state, &mut outbox);
        }

        if !outbox.is_empty() {
            log::trace!("{} follow-up commands deferred to next delivery", outbox.len());
            self.pending.extend(outbox.into_commands());
        }
        batch.len()
    }
}

impl<M: Message, S> Default for CommandBus<M, S> {
    fn default() -> Self {
        Self::new()
    }
}
