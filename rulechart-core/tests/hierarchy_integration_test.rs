// rulechart-core/tests/hierarchy_integration_test.rs

#[cfg(test)]
pub mod hierarchy_integration_test {
    use rulechart_core::prelude::*;
    use rulechart_core::{ConfigError, Names};

    // Link
    // ├── Central
    // │   ├── Scanning
    // │   └── Connecting
    // └── Peripheral
    //     └── Advertising
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum S {
        Link,
        Central,
        Scanning,
        Connecting,
        Peripheral,
        Advertising,
        Off,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum E {
        Found,
        Advertise,
        Reset,
        Cancel,
        Disable,
    }

    pub struct Tree;

    impl Model for Tree {
        type State = S;
        type Event = E;
        type Context = Vec<String>;
    }

    type Machine = Engine<Tree, 32>;

    const NAMES: Names<Tree> = Names::new(&[(S::Scanning, "SCANNING")], &[(E::Found, "FOUND")]);

    macro_rules! log_action {
        ($name:ident, $text:literal) => {
            fn $name(machine: &mut Machine) {
                machine.context_mut().push($text.to_string());
            }
        };
    }

    log_action!(enter_link, "enter Link");
    log_action!(exit_link, "exit Link");
    log_action!(enter_central, "enter Central");
    log_action!(exit_central, "exit Central");
    log_action!(enter_scanning, "enter Scanning");
    log_action!(exit_scanning, "exit Scanning");
    log_action!(enter_connecting, "enter Connecting");
    log_action!(exit_connecting, "exit Connecting");
    log_action!(enter_peripheral, "enter Peripheral");
    log_action!(enter_advertising, "enter Advertising");

    fn noted(machine: &mut Machine) -> bool {
        let from = machine.previous_state();
        machine.context_mut().push(format!("action from {from:?}"));
        true
    }

    fn bail_out(machine: &mut Machine) -> bool {
        machine.goto_state(S::Off);
        false
    }

    fn build() -> Machine {
        let mut m = Machine::new(S::Scanning, Vec::new()).with_names(NAMES);
        m.on_enter(S::Link, action!(enter_link)).unwrap();
        m.on_exit(S::Link, action!(exit_link)).unwrap();
        m.on_event(S::Link, E::Reset, S::Scanning, None).unwrap();
        m.on_event(S::Link, E::Disable, S::Off, None).unwrap();

        m.inherit(S::Central, S::Link).unwrap();
        m.on_enter(S::Central, action!(enter_central)).unwrap();
        m.on_exit(S::Central, action!(exit_central)).unwrap();
        m.on_event(S::Central, E::Advertise, S::Advertising, Some(action!(noted)))
            .unwrap();

        m.inherit(S::Scanning, S::Central).unwrap();
        m.on_enter(S::Scanning, action!(enter_scanning)).unwrap();
        m.on_exit(S::Scanning, action!(exit_scanning)).unwrap();
        m.on_event(S::Scanning, E::Found, S::Connecting, None).unwrap();
        m.block(S::Scanning, E::Disable).unwrap();

        m.inherit(S::Connecting, S::Central).unwrap();
        m.on_enter(S::Connecting, action!(enter_connecting)).unwrap();
        m.on_exit(S::Connecting, action!(exit_connecting)).unwrap();
        m.on_event(S::Connecting, E::Cancel, S::Scanning, Some(action!(bail_out)))
            .unwrap();

        m.inherit(S::Peripheral, S::Link).unwrap();
        m.on_enter(S::Peripheral, action!(enter_peripheral)).unwrap();

        m.inherit(S::Advertising, S::Peripheral).unwrap();
        m.on_enter(S::Advertising, action!(enter_advertising)).unwrap();

        m.finalize().unwrap();
        m
    }

    fn drain(machine: &mut Machine) -> Vec<String> {
        std::mem::take(machine.context_mut())
    }

    #[test]
    fn initial_state_is_not_entered() {
        let machine = build();
        assert!(machine.context().is_empty());
        assert_eq!(machine.current_state(), S::Scanning);
    }

    #[test]
    fn siblings_only_leave_and_enter_themselves() {
        let mut machine = build();
        assert!(machine.send(E::Found));
        assert_eq!(
            drain(&mut machine),
            ["exit Scanning", "enter Connecting"]
        );
    }

    #[test]
    fn superstate_rule_is_inherited_and_brackets_by_common_ancestor() {
        let mut machine = build();
        assert_eq!(machine.handle(E::Advertise), SendResult::Handled);
        assert_eq!(machine.current_state(), S::Advertising);
        assert_eq!(
            drain(&mut machine),
            [
                "exit Scanning",
                "exit Central",
                "enter Peripheral",
                "enter Advertising",
                "action from Scanning",
            ]
        );
    }

    #[test]
    fn rule_two_levels_up_applies_to_grandchildren() {
        let mut machine = build();
        machine.goto_state(S::Advertising);
        drain(&mut machine);
        assert!(machine.send(E::Reset));
        assert_eq!(machine.current_state(), S::Scanning);
        assert_eq!(
            drain(&mut machine),
            ["enter Central", "enter Scanning"]
        );
    }

    #[test]
    fn block_hides_the_superstate_rule() {
        let mut machine = build();
        assert_eq!(machine.handle(E::Disable), SendResult::NoMatch);
        assert_eq!(machine.current_state(), S::Scanning);
        assert!(machine.context().is_empty());

        assert!(machine.send(E::Found));
        drain(&mut machine);
        assert!(machine.send(E::Disable));
        assert_eq!(machine.current_state(), S::Off);
        assert_eq!(
            drain(&mut machine),
            ["exit Connecting", "exit Central", "exit Link"]
        );
    }

    #[test]
    fn goto_from_a_failing_action_suppresses_rollback() {
        let mut machine = build();
        assert!(machine.send(E::Found));
        drain(&mut machine);
        assert_eq!(machine.handle(E::Cancel), SendResult::ActionFailed);
        assert_eq!(machine.current_state(), S::Off);
        assert_eq!(
            drain(&mut machine),
            [
                "exit Connecting",
                "enter Scanning",
                "exit Scanning",
                "exit Central",
                "exit Link",
            ]
        );
    }

    #[test]
    fn in_state_covers_every_ancestor() {
        let mut machine = build();
        assert!(machine.in_state(S::Scanning));
        assert!(machine.in_state(S::Central));
        assert!(machine.in_state(S::Link));
        assert!(!machine.in_state(S::Peripheral));
        assert!(!machine.in_state(S::Connecting));

        machine.goto_state(S::Off);
        assert!(machine.in_state(S::Off));
        assert!(!machine.in_state(S::Link));
    }

    #[test]
    fn unknown_events_in_detached_state_are_rejected() {
        let mut machine = build();
        machine.goto_state(S::Off);
        assert_eq!(machine.handle(E::Reset), SendResult::NoMatch);
        assert_eq!(machine.current_state(), S::Off);
    }

    #[test]
    fn template_copies_run_independently() {
        let template = build();
        let mut first = Machine::from_template(&template, Vec::new()).unwrap();
        let second = Machine::from_template(&template, Vec::new()).unwrap();
        assert!(first.send(E::Found));
        assert_eq!(first.current_state(), S::Connecting);
        assert_eq!(second.current_state(), S::Scanning);
        assert_eq!(second.names().state(S::Scanning).to_string(), "SCANNING");
    }

    #[test]
    fn missing_superstate_is_reported() {
        let mut machine = Machine::new(S::Scanning, Vec::new());
        machine.inherit(S::Scanning, S::Central).unwrap();
        assert_eq!(
            machine.finalize(),
            Err(ConfigError::UnknownSuperstate {
                state: S::Scanning,
                superstate: S::Central
            })
        );
    }
}
