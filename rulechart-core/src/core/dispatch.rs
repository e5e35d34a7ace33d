//! Event dispatch: rule lookup through the superstate chain, transition,
//! action invocation and rollback.

use super::rule::{Action, ActionFn, RuleKind};
use super::{Cursor, Engine, Model, SendResult};

/// Result of searching a state's chain for an Event rule.
enum Lookup<M: Model, const N: usize> {
    Matched {
        next: M::State,
        action: Option<Action<ActionFn<M, N>>>,
    },
    Blocked,
    Missing,
}

impl<M: Model, const N: usize> Engine<M, N> {
    /// Delivers one event.
    ///
    /// The current state's run is searched first, then each superstate in turn.
    /// On a match the machine transitions to the rule's target, then runs the
    /// rule's action; if the action returns `false` the transition is reversed
    /// (its exit/enter actions fire again) and [`SendResult::ActionFailed`] is
    /// returned.
    ///
    /// # Panics
    /// If the engine was not finalized and the implicit finalize fails.
    pub fn handle(&mut self, event: M::Event) -> SendResult {
        self.ensure_finalized();
        let origin = self.current;

        let (next, action) = match self.lookup(origin, event) {
            Lookup::Matched { next, action } => (next, action),
            Lookup::Blocked => {
                decode!(
                    self,
                    "{} blocked during {}, rejecting",
                    self.decode.names.event(event),
                    self.decode.names.state(self.current_state())
                );
                return SendResult::NoMatch;
            }
            Lookup::Missing => {
                decode!(
                    self,
                    "{} unexpected during {}, rejecting",
                    self.decode.names.event(event),
                    self.decode.names.state(self.current_state())
                );
                return SendResult::NoMatch;
            }
        };

        let target = self.resolve(next);
        if origin != target {
            decode!(
                self,
                "On {}, state goes from {} to {}",
                self.decode.names.event(event),
                self.decode.names.state(self.state_at(origin)),
                self.decode.names.state(next)
            );
        }
        self.transition(origin, target);

        let Some(action) = action else {
            return SendResult::Handled;
        };
        decode!(
            self,
            "On {}, calling {}()",
            self.decode.names.event(event),
            action.name().unwrap_or("<action>")
        );
        if (action.run())(self) {
            return SendResult::Handled;
        }

        // A goto_state issued by the action moved the machine; leave it there.
        if self.current == target {
            decode!(
                self,
                "{}() failed, rollback to {}",
                action.name().unwrap_or("<action>"),
                self.decode.names.state(self.state_at(origin))
            );
            self.transition(target, origin);
        }
        SendResult::ActionFailed
    }

    /// Finds the Event rule for `event`, climbing superstates from `from`.
    fn lookup(&self, from: Cursor<M::State>, event: M::Event) -> Lookup<M, N> {
        let Cursor::Run(mut lead) = from else {
            return Lookup::Missing;
        };
        loop {
            for rule in self.store.run(lead) {
                let RuleKind::Event {
                    event: candidate,
                    next,
                    action,
                } = rule.kind
                else {
                    continue;
                };
                if candidate > event {
                    break;
                }
                if candidate == event {
                    trace!("{:?} matched in {:?}", event, rule.state);
                    if rule.is_block() {
                        return Lookup::Blocked;
                    }
                    return Lookup::Matched { next, action };
                }
            }
            match self.superstate_of(lead) {
                Some(parent) => lead = parent,
                None => return Lookup::Missing,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action;

    struct Link;
    impl Model for Link {
        type State = u8;
        type Event = u32;
        type Context = Log;
    }

    #[derive(Default)]
    struct Log {
        calls: std::vec::Vec<&'static str>,
        connect_ok: bool,
    }

    type Sm = Engine<Link, 16>;

    const IDLE: u8 = 1;
    const SCANNING: u8 = 2;
    const CONNECTED: u8 = 3;
    const SCAN: u32 = 10;
    const CONNECT: u32 = 11;

    fn start_scan(sm: &mut Sm) {
        sm.context_mut().calls.push("start_scan");
    }

    fn do_connect(sm: &mut Sm) -> bool {
        sm.context_mut().calls.push("do_connect");
        sm.context().connect_ok
    }

    fn machine(connect_ok: bool) -> Sm {
        let mut sm = Sm::new(
            IDLE,
            Log {
                connect_ok,
                ..Log::default()
            },
        );
        sm.on_event(IDLE, SCAN, SCANNING, None).unwrap();
        sm.on_event(IDLE, CONNECT, CONNECTED, Some(action!(do_connect)))
            .unwrap();
        sm.on_enter(SCANNING, action!(start_scan)).unwrap();
        sm
    }

    #[test]
    fn scan_from_idle_enters_scanning() {
        let mut sm = machine(true);
        assert_eq!(sm.handle(SCAN), SendResult::Handled);
        assert_eq!(sm.current_state(), SCANNING);
        assert_eq!(sm.previous_state(), IDLE);
        assert_eq!(sm.context().calls, ["start_scan"]);
    }

    #[test]
    fn event_without_rule_is_rejected() {
        let mut sm = machine(true);
        let _ = sm.handle(SCAN);
        assert_eq!(sm.handle(SCAN), SendResult::NoMatch);
        assert_eq!(sm.current_state(), SCANNING);
        assert_eq!(sm.context().calls, ["start_scan"]);
    }

    #[test]
    fn failed_action_returns_to_origin() {
        let mut sm = machine(false);
        assert_eq!(sm.handle(CONNECT), SendResult::ActionFailed);
        assert_eq!(sm.current_state(), IDLE);
        assert_eq!(sm.context().calls, ["do_connect"]);
    }

    #[test]
    fn handle_finalizes_on_first_use() {
        let mut sm = machine(true);
        assert!(!sm.is_finalized());
        let _ = sm.handle(99);
        assert!(sm.is_finalized());
    }

    #[test]
    #[should_panic(expected = "implicit finalize failed")]
    fn handle_panics_when_initial_state_has_no_rules() {
        let mut sm = Sm::new(42, Log::default());
        sm.on_event(IDLE, SCAN, SCANNING, None).unwrap();
        let _ = sm.handle(SCAN);
    }
}
