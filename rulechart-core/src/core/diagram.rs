//! Read-only export of the rule table as diagram edges.
//!
//! With the `diagram` feature the edge types serialize with serde, so a
//! host tool can dump a machine as JSON and draw it.

use super::rule::RuleKind;
use super::{Engine, Model};

/// One rule, seen as an edge leaving `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "diagram", derive(serde::Serialize))]
pub struct Edge<S, E> {
    pub state: S,
    pub kind: EdgeKind<S, E>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "diagram",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum EdgeKind<S, E> {
    Superstate {
        superstate: S,
    },
    Enter {
        action: Option<&'static str>,
    },
    Exit {
        action: Option<&'static str>,
    },
    Event {
        event: E,
        next: S,
        action: Option<&'static str>,
    },
    /// An event consumed in place, hiding superstate rules.
    Block {
        event: E,
    },
}

impl<M: Model, const N: usize> Engine<M, N> {
    /// Every rule as an [`Edge`], in store order. Action names are only
    /// present with the `debug-log` feature.
    pub fn diagram(&self) -> impl Iterator<Item = Edge<M::State, M::Event>> + '_ {
        self.rules().iter().map(|rule| {
            let kind = match rule.kind {
                RuleKind::Inherit { superstate, .. } => EdgeKind::Superstate { superstate },
                RuleKind::Enter(action) => EdgeKind::Enter {
                    action: action.name(),
                },
                RuleKind::Exit(action) => EdgeKind::Exit {
                    action: action.name(),
                },
                RuleKind::Event { event, .. } if rule.is_block() => EdgeKind::Block { event },
                RuleKind::Event {
                    event,
                    next,
                    action,
                } => EdgeKind::Event {
                    event,
                    next,
                    action: action.and_then(|action| action.name()),
                },
            };
            Edge {
                state: rule.state,
                kind,
            }
        })
    }
}
