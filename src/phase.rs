//! Phase state machine
//!
//! A match is a chain of phases. Exactly one is active; when it reports
//! completion the controller tears it down and asks it to build its
//! successor, which receives any long-lived entities by value. Per tick the
//! controller runs three stages in a fixed order:
//!
//! 1. `update` - tasks read state and publish commands
//! 2. `deliver` - the phase drains its bus and advances its schedulers
//! 3. `integrate` - direct state integration (motion)

use crate::error::GameError;

/// What the active phase wants the controller to do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Running,
    /// Hand over to the successor
    Complete,
    /// Stop the whole controller without building a successor
    Abort,
}

pub trait Phase {
    fn name(&self) -> &'static str;

    /// Called once before the first tick. Handlers are registered here.
    fn setup(&mut self) -> Result<(), GameError>;

    fn update(&mut self, dt: f32) -> Result<(), GameError>;

    fn deliver(&mut self, dt: f32) -> Result<(), GameError>;

    fn integrate(&mut self, _dt: f32) {}

    fn status(&self) -> PhaseStatus;

    /// Called exactly once, after the last tick and before the successor's setup
    fn teardown(&mut self) {}

    /// Consume the finished phase and construct the next one, if any
    fn build_successor(self: Box<Self>) -> Option<Box<dyn Phase>>;
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Running,
    /// The final phase completed
    Finished,
    Aborted,
    /// A phase hook returned an error
    Failed,
}

/// Drives the active phase and performs transitions
pub struct PhaseController {
    active: Option<Box<dyn Phase>>,
    needs_setup: bool,
    state: ControllerState,
    ticks: u64,
    transitions: u32,
}

impl PhaseController {
    pub fn new(initial: Box<dyn Phase>) -> Self {
        log::info!("Starting in phase '{}'", initial.name());
        Self {
            active: Some(initial),
            needs_setup: true,
            state: ControllerState::Running,
            ticks: 0,
            transitions: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Name of the active phase, `None` once the controller has stopped
    pub fn active_phase(&self) -> Option<&'static str> {
        self.active.as_ref().map(|phase| phase.name())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Run one tick of the active phase, transitioning if it finished.
    ///
    /// A hook error tears the active phase down and leaves the controller
    /// `Failed`; the error is returned once and later steps are inert.
    pub fn step(&mut self, dt: f32) -> Result<ControllerState, GameError> {
        let Some(phase) = self.active.as_mut() else {
            return Ok(self.state);
        };

        let setup = std::mem::take(&mut self.needs_setup);
        if let Err(err) = run_hooks(&mut **phase, setup, dt) {
            self.fail(&err);
            return Err(err);
        }
        self.ticks += 1;

        match phase.status() {
            PhaseStatus::Running => {}
            PhaseStatus::Abort => {
                phase.teardown();
                log::info!("Phase '{}' aborted after {} ticks", phase.name(), self.ticks);
                self.active = None;
                self.state = ControllerState::Aborted;
            }
            PhaseStatus::Complete => self.advance_phase(),
        }
        Ok(self.state)
    }

    /// Step once per `dt` until the controller stops or the input runs out
    pub fn run<I>(&mut self, steps: I) -> Result<ControllerState, GameError>
    where
        I: IntoIterator<Item = f32>,
    {
        for dt in steps {
            if self.step(dt)? != ControllerState::Running {
                break;
            }
        }
        Ok(self.state)
    }

    fn fail(&mut self, err: &GameError) {
        if let Some(mut failed) = self.active.take() {
            failed.teardown();
            log::warn!("Phase '{}' failed after {} ticks: {err}", failed.name(), self.ticks);
        }
        self.state = ControllerState::Failed;
    }

    fn advance_phase(&mut self) {
        let Some(mut finished) = self.active.take() else {
            return;
        };
        finished.teardown();
        let name = finished.name();

        match finished.build_successor() {
            Some(next) => {
                log::info!("Phase '{}' -> '{}'", name, next.name());
                self.active = Some(next);
                self.needs_setup = true;
                self.transitions += 1;
            }
            None => {
                log::info!(
                    "Phase '{}' was the last, finished after {} ticks",
                    name, self.ticks
                );
                self.state = ControllerState::Finished;
            }
        }
    }
}

fn run_hooks(phase: &mut dyn Phase, setup: bool, dt: f32) -> Result<(), GameError> {
    if setup {
        phase.setup()?;
    }
    phase.update(dt)?;
    phase.deliver(dt)?;
    phase.integrate(dt);
    Ok(())
}
