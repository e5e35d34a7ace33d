//! Property-based tests for engine behavior

use crate::common::*;
use proptest::prelude::*;
use rulechart_core::prelude::*;

// Property test strategies
prop_compose! {
    fn arb_test_event()(index in 0..ALL_EVENTS.len()) -> TestEvent {
        ALL_EVENTS[index]
    }
}

prop_compose! {
    fn arb_event_sequence()(events in prop::collection::vec(arb_test_event(), 0..100)) -> Vec<TestEvent> {
        events
    }
}

proptest! {
    #[test]
    fn engine_matches_reference_model(
        events in arb_event_sequence(),
        allow_start in any::<bool>()
    ) {
        let mut machine = player(allow_start);
        for event in events {
            let before = machine.current_state();
            let result = machine.handle(event);
            match reference(before, event, allow_start) {
                Some(next) => {
                    prop_assert_eq!(result, SendResult::Handled);
                    prop_assert_eq!(machine.current_state(), next);
                }
                None => {
                    prop_assert!(!result.is_handled());
                    prop_assert_eq!(machine.current_state(), before);
                }
            }
        }
    }

    #[test]
    fn same_sequence_same_outcome(
        events in arb_event_sequence(),
        allow_start in any::<bool>()
    ) {
        let template = player(allow_start);
        let mut first = Machine::from_template(&template, template.context().clone()).unwrap();
        let mut second = Machine::from_template(&template, template.context().clone()).unwrap();
        for &event in &events {
            prop_assert_eq!(first.handle(event), second.handle(event));
        }
        prop_assert_eq!(first.current_state(), second.current_state());
        prop_assert_eq!(first.context(), second.context());
    }

    #[test]
    fn rejected_events_leave_state_alone(events in arb_event_sequence()) {
        let mut machine = player(false);
        for event in events {
            let before = machine.current_state();
            if machine.handle(event) != SendResult::Handled {
                prop_assert_eq!(machine.current_state(), before);
            }
        }
    }

    #[test]
    fn in_state_matches_ancestry(
        events in arb_event_sequence(),
        allow_start in any::<bool>()
    ) {
        let mut machine = player(allow_start);
        for event in events {
            let _ = machine.handle(event);
            let current = machine.current_state();
            for state in ALL_STATES {
                prop_assert_eq!(
                    machine.in_state(state),
                    ancestors(current).contains(&state),
                    "in_state({:?}) while in {:?}", state, current
                );
            }
        }
    }

    #[test]
    fn superstate_enters_and_exits_balance(
        events in arb_event_sequence(),
        allow_start in any::<bool>()
    ) {
        let mut machine = player(allow_start);
        for event in events {
            let _ = machine.handle(event);
            let trace = machine.context();
            let open = trace.active_enters - trace.active_exits;
            prop_assert_eq!(open == 1, machine.in_state(TestState::Active));
            prop_assert!(open <= 1);
        }
    }
}
