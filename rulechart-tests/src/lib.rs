//! Integration and property tests for rulechart
//!
//! This crate contains tests that need std and heavier dependencies than the
//! core `no_std` build allows.

#![cfg(test)]

pub mod integration;
pub mod property_tests;

/// Common test utilities and fixtures
pub mod common {
    use rulechart_core::prelude::*;
    use rulechart_core::Names;

    /// Setup tracing for tests. Also bridges `log` records into tracing.
    pub fn setup_tracing() {
        use std::sync::Once;
        use tracing_subscriber::{EnvFilter, fmt};

        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .try_init();
        });
    }

    /// Common test events for statechart testing
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum TestEvent {
        Start,
        Stop,
        Pause,
        Resume,
        Reset,
        Tick,
        Fail,
    }

    pub const ALL_EVENTS: [TestEvent; 7] = [
        TestEvent::Start,
        TestEvent::Stop,
        TestEvent::Pause,
        TestEvent::Resume,
        TestEvent::Reset,
        TestEvent::Tick,
        TestEvent::Fail,
    ];

    /// Common test states for statechart testing. `Active` is the superstate
    /// of `Running` and `Paused`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum TestState {
        Idle,
        Active,
        Running,
        Paused,
        Stopped,
        Error,
    }

    pub const ALL_STATES: [TestState; 6] = [
        TestState::Idle,
        TestState::Active,
        TestState::Running,
        TestState::Paused,
        TestState::Stopped,
        TestState::Error,
    ];

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Trace {
        pub log: Vec<&'static str>,
        pub ticks: u32,
        pub active_enters: u32,
        pub active_exits: u32,
        pub allow_start: bool,
    }

    pub struct Player;

    impl Model for Player {
        type State = TestState;
        type Event = TestEvent;
        type Context = Trace;
    }

    pub type Machine = Engine<Player, 32>;

    pub const NAMES: Names<Player> = Names::new(
        &[
            (TestState::Idle, "IDLE"),
            (TestState::Running, "RUNNING"),
            (TestState::Paused, "PAUSED"),
        ],
        &[(TestEvent::Start, "START"), (TestEvent::Tick, "TICK")],
    );

    fn try_start(machine: &mut Machine) -> bool {
        machine.context_mut().log.push("try_start");
        machine.context().allow_start
    }

    fn tick(machine: &mut Machine) -> bool {
        machine.context_mut().ticks += 1;
        true
    }

    fn enter_active(machine: &mut Machine) {
        let trace = machine.context_mut();
        trace.active_enters += 1;
        trace.log.push("enter Active");
    }

    fn exit_active(machine: &mut Machine) {
        let trace = machine.context_mut();
        trace.active_exits += 1;
        trace.log.push("exit Active");
    }

    fn enter_paused(machine: &mut Machine) {
        machine.context_mut().log.push("enter Paused");
    }

    fn exit_paused(machine: &mut Machine) {
        machine.context_mut().log.push("exit Paused");
    }

    /// The player machine used across scenario and property tests, finalized.
    pub fn player(allow_start: bool) -> Machine {
        use TestEvent as E;
        use TestState as S;

        let mut m = Machine::new(
            S::Idle,
            Trace {
                allow_start,
                ..Trace::default()
            },
        );
        m.on_event(S::Idle, E::Start, S::Running, Some(action!(try_start)))
            .unwrap();

        m.on_enter(S::Active, action!(enter_active)).unwrap();
        m.on_exit(S::Active, action!(exit_active)).unwrap();
        m.on_event(S::Active, E::Stop, S::Stopped, None).unwrap();
        m.on_event(S::Active, E::Fail, S::Error, None).unwrap();

        m.inherit(S::Running, S::Active).unwrap();
        m.on_event(S::Running, E::Pause, S::Paused, None).unwrap();
        m.on_event(S::Running, E::Tick, S::Running, Some(action!(tick)))
            .unwrap();

        m.inherit(S::Paused, S::Active).unwrap();
        m.on_enter(S::Paused, action!(enter_paused)).unwrap();
        m.on_exit(S::Paused, action!(exit_paused)).unwrap();
        m.on_event(S::Paused, E::Resume, S::Running, None).unwrap();
        m.block(S::Paused, E::Tick).unwrap();

        m.on_event(S::Stopped, E::Reset, S::Idle, None).unwrap();
        m.on_event(S::Error, E::Reset, S::Idle, None).unwrap();

        m.finalize().unwrap();
        m
    }

    /// Hand-written transition function the engine is checked against.
    /// `None` means the event leaves the state unchanged.
    pub fn reference(state: TestState, event: TestEvent, allow_start: bool) -> Option<TestState> {
        use TestEvent as E;
        use TestState as S;

        match (state, event) {
            (S::Idle, E::Start) if allow_start => Some(S::Running),
            (S::Running | S::Paused, E::Stop) => Some(S::Stopped),
            (S::Running | S::Paused, E::Fail) => Some(S::Error),
            (S::Running, E::Pause) => Some(S::Paused),
            (S::Running, E::Tick) => Some(S::Running),
            (S::Paused, E::Resume) => Some(S::Running),
            (S::Stopped | S::Error, E::Reset) => Some(S::Idle),
            _ => None,
        }
    }

    pub fn ancestors(state: TestState) -> &'static [TestState] {
        match state {
            TestState::Running => &[TestState::Running, TestState::Active],
            TestState::Paused => &[TestState::Paused, TestState::Active],
            TestState::Idle => &[TestState::Idle],
            TestState::Active => &[TestState::Active],
            TestState::Stopped => &[TestState::Stopped],
            TestState::Error => &[TestState::Error],
        }
    }
}
