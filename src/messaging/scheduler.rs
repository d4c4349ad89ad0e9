//! Delay-scheduled command delivery
//!
//! Commands are published with a delay in simulated seconds and fire once
//! the scheduler clock, moved forward only by `advance`, reaches their
//! deadline. Items fire in `(deadline, publish sequence)` order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::{CommandRegistry, Message, MessagingError, Outbox, RegistryState};

/// What publishing does to items of the same kind that are still in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulePolicy {
    /// Every publication fires independently; nothing is cancelled
    #[default]
    Layered,
    /// A new publication drops pending items of the same kind
    Supersede,
}

/// A command waiting for its deadline
#[derive(Debug, Clone)]
pub struct ScheduledItem<M> {
    pub command: M,
    /// Absolute simulated time at which the command fires
    pub deadline: f32,
    /// Publish order, breaks ties between equal deadlines
    pub sequence: u64,
}

impl<M> PartialEq for ScheduledItem<M> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<M> Eq for ScheduledItem<M> {}

impl<M> PartialOrd for ScheduledItem<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for ScheduledItem<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .total_cmp(&other.deadline)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Time-keyed priority queue over a [`CommandRegistry`]
pub struct DelayScheduler<M: Message, S> {
    registry: CommandRegistry<M, S>,
    queue: BinaryHeap<Reverse<ScheduledItem<M>>>,
    clock: f32,
    next_sequence: u64,
    policy: SchedulePolicy,
}

impl<M: Message, S> DelayScheduler<M, S> {
    pub fn new() -> Self {
        Self::with_policy(SchedulePolicy::default())
    }

    pub fn with_policy(policy: SchedulePolicy) -> Self {
        Self {
            registry: CommandRegistry::new(),
            queue: BinaryHeap::new(),
            clock: 0.0,
            next_sequence: 0,
            policy,
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

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    /// Current simulated time
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Items still waiting for their deadline
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deadline of the next item to fire
    pub fn next_deadline(&self) -> Option<f32> {
        self.queue.peek().map(|Reverse(item)| item.deadline)
    }

    /// Schedule `command` to fire `delay` seconds from now.
    ///
    /// Rejects negative or NaN delays without touching the queue.
    pub fn publish(&mut self, command: M, delay: f32) -> Result<(), MessagingError> {
        if !(delay >= 0.0) {
            log::warn!("Rejected {command:?}: negative delay {delay}");
            return Err(MessagingError::NegativeDelay { delay });
        }

        if self.policy == SchedulePolicy::Supersede {
            let kind = command.kind();
            let before = self.queue.len();
            self.queue.retain(|Reverse(item)| item.command.kind() != kind);
            let dropped = before - self.queue.len();
            if dropped > 0 {
                log::trace!("Superseded {dropped} pending {kind:?} items");
            }
        }

        self.schedule(command, self.clock + delay);
        Ok(())
    }

    fn schedule(&mut self, command: M, deadline: f32) {
        log::trace!("Scheduled {command:?} at t={deadline:.3}");
        let item = ScheduledItem {
            command,
            deadline,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.queue.push(Reverse(item));
    }

    /// Move the clock forward by `dt` and fire every item now due.
    ///
    /// Returns how many items fired. Rejects negative or NaN steps without
    /// touching the clock or queue. An open registry leaves both untouched.
    /// Follow-ups published by handlers are scheduled at the new clock and
    /// fire on the next call.
    pub fn advance(&mut self, dt: f32, state: &mut S) -> Result<usize, MessagingError> {
        if !(dt >= 0.0) {
            log::warn!("Rejected scheduler step of {dt}");
            return Err(MessagingError::NegativeDuration { dt });
        }
        if !self.registry.is_locked() {
            log::warn!("Scheduler registry is still open, holding {} items", self.len());
            return Ok(0);
        }

        self.clock += dt;

        let mut outbox = Outbox::new();
        let mut fired = 0;
        while self
            .queue
            .peek()
            .is_some_and(|Reverse(item)| item.deadline <= self.clock)
        {
            let Some(Reverse(item)) = self.queue.pop() else {
                break;
            };
            self.registry.dispatch(&item.command, state, &mut outbox);
            fired += 1;
        }

        let now = self.clock;
        for command in outbox.into_commands() {
            self.schedule(command, now);
        }
        Ok(fired)
    }
}

impl<M: Message, S> Default for DelayScheduler<M, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{Command, CommandKind, PaddleId};
    use proptest::prelude::*;

    /// Fired commands tagged by their deflect payload
    type Fired = Vec<f32>;

    fn tagged(tag: f32) -> Command {
        Command::Deflect {
            source_velocity: tag,
        }
    }

    fn recording_scheduler(policy: SchedulePolicy) -> DelayScheduler<Command, Fired> {
        let mut scheduler = DelayScheduler::with_policy(policy);
        scheduler
            .subscribe(CommandKind::Deflect, |command, fired: &mut Fired, _| {
                if let Command::Deflect { source_velocity } = command {
                    fired.push(*source_velocity);
                }
            })
            .unwrap();
        scheduler.lock();
        scheduler
    }

    #[test]
    fn test_fires_by_deadline_then_publish_order() {
        let mut scheduler = recording_scheduler(SchedulePolicy::Layered);
        // Tag = insertion index, deadlines [5, 2, 5, 1]
        for (tag, delay) in [(0.0, 5.0), (1.0, 2.0), (2.0, 5.0), (3.0, 1.0)] {
            scheduler.publish(tagged(tag), delay).unwrap();
        }

        let mut fired = Vec::new();
        assert_eq!(scheduler.advance(6.0, &mut fired).unwrap(), 4);
        assert_eq!(fired, vec![3.0, 1.0, 0.0, 2.0]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_never_fires_early() {
        let mut scheduler = recording_scheduler(SchedulePolicy::Layered);
        scheduler.publish(tagged(1.0), 0.5).unwrap();

        let mut fired = Vec::new();
        assert_eq!(scheduler.advance(0.25, &mut fired).unwrap(), 0);
        assert!(fired.is_empty());
        assert_eq!(scheduler.next_deadline(), Some(0.5));

        assert_eq!(scheduler.advance(0.25, &mut fired).unwrap(), 1);
        assert_eq!(fired, vec![1.0]);
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut scheduler = recording_scheduler(SchedulePolicy::Layered);
        scheduler.publish(tagged(7.0), 0.0).unwrap();

        let mut fired = Vec::new();
        assert_eq!(scheduler.advance(0.0, &mut fired).unwrap(), 1);
        assert_eq!(fired, vec![7.0]);
    }

    #[test]
    fn test_rejects_negative_delay_without_mutation() {
        let mut scheduler = recording_scheduler(SchedulePolicy::Layered);
        scheduler.publish(tagged(1.0), 1.0).unwrap();

        let err = scheduler.publish(tagged(2.0), -0.1).unwrap_err();
        assert_eq!(err, MessagingError::NegativeDelay { delay: -0.1 });
        assert!(matches!(
            scheduler.publish(tagged(3.0), f32::NAN),
            Err(MessagingError::NegativeDelay { .. })
        ));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.clock(), 0.0);
    }

    #[test]
    fn test_rejects_negative_duration_without_mutation() {
        let mut scheduler = recording_scheduler(SchedulePolicy::Layered);
        scheduler.publish(tagged(1.0), 0.0).unwrap();

        let mut fired = Vec::new();
        let err = scheduler.advance(-1.0, &mut fired).unwrap_err();
        assert_eq!(err, MessagingError::NegativeDuration { dt: -1.0 });
        assert!(fired.is_empty());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.clock(), 0.0);
    }

    #[test]
    fn test_open_registry_holds_clock_and_queue() {
        let mut scheduler: DelayScheduler<Command, Fired> = DelayScheduler::new();
        scheduler.publish(tagged(1.0), 0.0).unwrap();

        let mut fired = Vec::new();
        assert_eq!(scheduler.advance(1.0, &mut fired).unwrap(), 0);
        assert_eq!(scheduler.clock(), 0.0);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_layered_policy_keeps_every_reaction() {
        let mut scheduler = recording_scheduler(SchedulePolicy::Layered);
        scheduler.publish(tagged(1.0), 0.3).unwrap();
        scheduler.publish(tagged(2.0), 0.7).unwrap();
        scheduler.publish(tagged(3.0), 0.1).unwrap();

        let mut fired = Vec::new();
        scheduler.advance(1.0, &mut fired).unwrap();
        assert_eq!(fired, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_supersede_policy_cancels_same_kind() {
        let mut scheduler = recording_scheduler(SchedulePolicy::Supersede);
        scheduler.publish(tagged(1.0), 0.3).unwrap();
        scheduler.publish(tagged(2.0), 0.7).unwrap();
        scheduler.publish(tagged(3.0), 0.1).unwrap();
        assert_eq!(scheduler.len(), 1);

        let mut fired = Vec::new();
        scheduler.advance(1.0, &mut fired).unwrap();
        assert_eq!(fired, vec![3.0]);
    }

    #[test]
    fn test_follow_ups_wait_for_next_advance() {
        let mut scheduler: DelayScheduler<Command, Vec<PaddleId>> = DelayScheduler::new();
        scheduler
            .subscribe(CommandKind::ScoreChanged, |command, scored, outbox| {
                if let Command::ScoreChanged { entity_id } = command {
                    scored.push(*entity_id);
                    outbox.publish(Command::ScoreChanged {
                        entity_id: entity_id.rival(),
                    });
                }
            })
            .unwrap();
        scheduler.lock();
        scheduler
            .publish(
                Command::ScoreChanged {
                    entity_id: PaddleId::Home,
                },
                0.0,
            )
            .unwrap();

        let mut scored = Vec::new();
        assert_eq!(scheduler.advance(1.0, &mut scored).unwrap(), 1);
        assert_eq!(scored, vec![PaddleId::Home]);
        assert_eq!(scheduler.next_deadline(), Some(1.0));

        assert_eq!(scheduler.advance(0.0, &mut scored).unwrap(), 1);
        assert_eq!(scored, vec![PaddleId::Home, PaddleId::Away]);
    }

    proptest! {
        #[test]
        fn prop_fires_in_deadline_then_sequence_order(
            delays in proptest::collection::vec(0u8..20, 1..48)
        ) {
            let mut scheduler = recording_scheduler(SchedulePolicy::Layered);
            for (index, delay) in delays.iter().enumerate() {
                scheduler.publish(tagged(index as f32), f32::from(*delay)).unwrap();
            }

            let mut fired = Vec::new();
            scheduler.advance(20.0, &mut fired).unwrap();

            let mut expected: Vec<(u8, usize)> =
                delays.iter().copied().zip(0..delays.len()).collect();
            expected.sort();
            let expected: Vec<f32> = expected.into_iter().map(|(_, index)| index as f32).collect();
            prop_assert_eq!(fired, expected);
        }
    }
}
