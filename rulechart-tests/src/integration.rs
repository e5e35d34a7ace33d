//! Scenario tests for the engine running under std

use std::io;
use std::sync::{Arc, Mutex};

use crate::common::*;
use rulechart_core::prelude::*;
use rulechart_core::{ConfigError, EdgeKind};

#[test]
fn start_pause_resume_stop() {
    setup_tracing();
    let mut machine = player(true);

    assert!(machine.send(TestEvent::Start));
    assert!(machine.send(TestEvent::Tick));
    assert!(machine.send(TestEvent::Pause));
    assert!(machine.send(TestEvent::Resume));
    assert!(machine.send(TestEvent::Stop));

    assert_eq!(machine.state(), TestState::Stopped);
    assert_eq!(machine.previous_state(), TestState::Running);
    assert_eq!(machine.context().ticks, 1);
    assert_eq!(
        machine.context().log,
        [
            "enter Active",
            "try_start",
            "enter Paused",
            "exit Paused",
            "exit Active",
        ]
    );
}

#[test]
fn refused_start_rolls_back_through_the_superstate() {
    setup_tracing();
    let mut machine = player(false);

    assert_eq!(machine.handle(TestEvent::Start), SendResult::ActionFailed);
    assert_eq!(machine.current_state(), TestState::Idle);
    assert_eq!(
        machine.context().log,
        ["enter Active", "try_start", "exit Active"]
    );
}

#[test]
fn tick_is_blocked_while_paused() {
    setup_tracing();
    let mut machine = player(true);
    let _ = machine.handle(TestEvent::Start);
    let _ = machine.handle(TestEvent::Pause);

    assert_eq!(machine.handle(TestEvent::Tick), SendResult::NoMatch);
    assert_eq!(machine.current_state(), TestState::Paused);
    assert_eq!(machine.context().ticks, 0);
}

#[test]
fn superstate_rules_apply_to_both_children() {
    setup_tracing();
    for detour in [None, Some(TestEvent::Pause)] {
        let mut machine = player(true);
        let _ = machine.handle(TestEvent::Start);
        if let Some(event) = detour {
            let _ = machine.handle(event);
        }
        assert!(machine.send(TestEvent::Fail));
        assert_eq!(machine.state(), TestState::Error);
        assert!(!machine.in_state(TestState::Active));
    }
}

#[test]
fn decoding_with_names_does_not_change_behavior() {
    setup_tracing();
    let mut machine = player(true).with_names(NAMES);
    machine.enable_decode("PLAYER");
    assert!(machine.is_decoding());

    assert!(machine.send(TestEvent::Start));
    assert!(!machine.send(TestEvent::Resume));
    machine.disable_decode();
    assert!(!machine.is_decoding());
    assert_eq!(machine.state(), TestState::Running);
    assert_eq!(machine.names().state(TestState::Running).to_string(), "RUNNING");
    assert_eq!(machine.names().state(TestState::Stopped).to_string(), "Stopped");
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn decoding_emits_named_lines_until_disabled() {
    setup_tracing();
    log::set_max_level(log::LevelFilter::Info);

    let out = Captured::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut machine = player(true).with_names(NAMES);
        machine.enable_decode("PLAYER");
        let _ = machine.handle(TestEvent::Start);
        let _ = machine.handle(TestEvent::Resume);

        let decoded = out.text();
        assert!(decoded.contains("PLAYER: On START, state goes from IDLE to RUNNING"));
        assert!(decoded.contains("PLAYER: On START, calling try_start()"));
        assert!(decoded.contains("PLAYER: Resume unexpected during RUNNING, rejecting"));

        machine.disable_decode();
        let _ = machine.handle(TestEvent::Pause);
        assert_eq!(out.text(), decoded);
    });
}

#[test]
fn config_errors_render_with_std() {
    let mut machine = Machine::new(TestState::Idle, Trace::default());
    machine
        .on_event(TestState::Idle, TestEvent::Start, TestState::Running, None)
        .unwrap();
    let err = machine
        .on_event(TestState::Idle, TestEvent::Start, TestState::Stopped, None)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::DuplicateEvent {
            state: TestState::Idle,
            event: TestEvent::Start
        }
    );
    assert_eq!(err.to_string(), "state Idle already handles event Start");

    let boxed: anyhow::Error = err.into();
    assert!(boxed.to_string().contains("already handles"));
}

#[test]
fn diagram_lists_blocks_separately() {
    let machine = player(true);
    let blocks: Vec<_> = machine
        .diagram()
        .filter(|edge| matches!(edge.kind, EdgeKind::Block { .. }))
        .map(|edge| edge.state)
        .collect();
    assert_eq!(blocks, [TestState::Paused]);
    assert_eq!(machine.diagram().count(), machine.rule_count());
}
