//! Configuration errors.
//!
//! These are setup-time mistakes in a rule table: they never occur in a
//! correctly built machine and are not meant to be recovered from at runtime.
//! Event rejection is not an error; see [`SendResult`](super::SendResult).

use super::rule::{Rule, RuleKind, RuleTag};
use super::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ConfigError<S, E> {
    #[cfg_attr(feature = "std", error("rule store is full"))]
    StoreFull,

    #[cfg_attr(feature = "std", error("rules cannot be added after finalize"))]
    Finalized,

    #[cfg_attr(feature = "std", error("template engine is not finalized"))]
    NotFinalized,

    #[cfg_attr(feature = "std", error("state {state:?} already has an {kind:?} rule"))]
    DuplicateRule { state: S, kind: RuleTag },

    #[cfg_attr(feature = "std", error("state {state:?} already handles event {event:?}"))]
    DuplicateEvent { state: S, event: E },

    #[cfg_attr(
        feature = "std",
        error("state {state:?} inherits from {superstate:?}, which has no rules")
    )]
    UnknownSuperstate { state: S, superstate: S },

    #[cfg_attr(feature = "std", error("superstate chain of {state:?} loops back on itself"))]
    InheritanceCycle { state: S },

    #[cfg_attr(
        feature = "std",
        error("more than MAX_CHAIN_DEPTH states with enter rules above {state:?}")
    )]
    ChainTooDeep { state: S },

    #[cfg_attr(feature = "std", error("initial state has no rules"))]
    UnknownInitialState,
}

impl<S: Copy, E: Copy> ConfigError<S, E> {
    pub(crate) fn duplicate<M, const N: usize>(rule: &Rule<M, N>) -> Self
    where
        M: Model<State = S, Event = E>,
    {
        match rule.kind {
            RuleKind::Event { event, .. } => Self::DuplicateEvent {
                state: rule.state,
                event,
            },
            ref kind => Self::DuplicateRule {
                state: rule.state,
                kind: kind.tag(),
            },
        }
    }
}
