//! Whole-match runs through the phase controller, no window or keyboard

use std::cell::RefCell;
use std::rc::Rc;

use forum_pong::frontend::{InputEvent, Key, Scene, Screen, ScriptedControls};
use forum_pong::{ControllerState, PhaseController, Settings, game};

const MAX_TICKS: usize = 120 * 60 * 20;

/// Screen that remembers what it was asked to show
#[derive(Clone, Default)]
struct Recorder {
    frames: Rc<RefCell<Vec<String>>>,
}

impl Screen for Recorder {
    fn present(&mut self, scene: &Scene<'_>) {
        let frame = match scene {
            Scene::Countdown { seconds, .. } => format!("countdown:{seconds}"),
            Scene::Contest { world } => {
                let (home, away) = world.score();
                format!("contest:{home}-{away}")
            }
            Scene::Outcome { headline, .. } => format!("outcome:{headline}"),
        };
        self.frames.borrow_mut().push(frame);
    }
}

impl Recorder {
    fn count(&self, prefix: &str) -> usize {
        self.frames
            .borrow()
            .iter()
            .filter(|f| f.starts_with(prefix))
            .count()
    }

    fn last(&self) -> Option<String> {
        self.frames.borrow().last().cloned()
    }
}

fn start(settings: Settings, controls: ScriptedControls) -> (PhaseController, Recorder) {
    let recorder = Recorder::default();
    let controller =
        game::new_match(settings, Box::new(controls), Box::new(recorder.clone())).unwrap();
    (controller, recorder)
}

/// Home paddle pinned against the top edge for the whole match
fn hugging_top() -> ScriptedControls {
    ScriptedControls::idle().at(0, InputEvent::Press(Key::Up))
}

#[test]
fn test_match_runs_through_every_phase() {
    let mut settings = Settings::default();
    settings.winning_score = 2;
    settings.countdown = 1.0;
    settings.outcome_linger = 0.5;
    let dt = settings.timestep;

    let (mut controller, recorder) = start(settings, hugging_top());
    let state = controller.run(std::iter::repeat_n(dt, MAX_TICKS)).unwrap();

    assert_eq!(state, ControllerState::Finished);
    assert_eq!(controller.transitions(), 2);
    assert_eq!(controller.active_phase(), None);

    assert!(recorder.count("countdown:") > 0);
    assert!(recorder.count("contest:") > 0);
    // 0.5 s of outcome at 120 Hz
    assert!(recorder.count("outcome:") >= 60);

    let last = recorder.last().unwrap();
    assert!(last == "outcome:You Win!" || last == "outcome:You Lose!");
}

#[test]
fn test_same_seed_same_match() {
    let mut settings = Settings::default();
    settings.winning_score = 1;
    settings.countdown = 0.5;
    settings.outcome_linger = 0.1;
    let dt = settings.timestep;

    let (mut first, first_screen) = start(settings.clone(), hugging_top());
    let (mut second, second_screen) = start(settings, hugging_top());
    first.run(std::iter::repeat_n(dt, MAX_TICKS)).unwrap();
    second.run(std::iter::repeat_n(dt, MAX_TICKS)).unwrap();

    assert_eq!(first.ticks(), second.ticks());
    assert_eq!(*first_screen.frames.borrow(), *second_screen.frames.borrow());
}

#[test]
fn test_quit_during_contest_aborts_without_outcome() {
    let settings = Settings::default();
    let dt = settings.timestep;
    // Countdown takes a little over 360 ticks
    let controls = ScriptedControls::idle().at(400, InputEvent::Quit);

    let (mut controller, recorder) = start(settings, controls);
    let state = controller.run(std::iter::repeat_n(dt, MAX_TICKS)).unwrap();

    assert_eq!(state, ControllerState::Aborted);
    assert_eq!(controller.ticks(), 401);
    assert_eq!(controller.transitions(), 1);
    assert!(recorder.count("contest:") > 0);
    assert_eq!(recorder.count("outcome:"), 0);
}

#[test]
fn test_tick_limit_can_run_out() {
    let settings = Settings::default();
    let dt = settings.timestep;
    let (mut controller, _recorder) = start(settings, ScriptedControls::idle());

    let state = controller.run(std::iter::repeat_n(dt, 10)).unwrap();
    assert_eq!(state, ControllerState::Running);
    assert_eq!(controller.active_phase(), Some("countdown"));
}
