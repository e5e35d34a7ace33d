//! Rule-table interpreter: store, configuration, finalize, dispatch and transitions.
//!
//! An [`Engine`] is configured by registering rules (`on_event`, `on_enter`,
//! `on_exit`, `inherit`, `block`), frozen once by [`Engine::finalize`], and then
//! driven by [`Engine::handle`]. Every operation runs to completion on the
//! caller's thread; the caller serializes event delivery.

// Low-level rule lookup tracing. Compiles to nothing without `debug-log`.
macro_rules! trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "debug-log")]
        {
            ::log::trace!(target: "rulechart::engine", $($arg)+);
        }
    };
}

// Per-engine decoding, gated at runtime by `Engine::enable_decode`.
macro_rules! decode {
    ($engine:expr, $($arg:tt)+) => {
        #[cfg(feature = "debug-log")]
        {
            if $engine.decode.enabled {
                ::log::info!(
                    target: "rulechart::decode",
                    "{}: {}",
                    $engine.decode.prefix,
                    format_args!($($arg)+)
                );
            }
        }
    };
}

mod decode;
mod diagram;
mod dispatch;
mod engine;
mod error;
mod rule;
mod store;
mod transition;

pub use decode::{Label, Names};
pub use diagram::{Edge, EdgeKind};
pub use engine::Engine;
pub use error::ConfigError;
pub use rule::{Action, ActionFn, EnterExitFn, Rule, RuleKind, RuleTag};
pub use store::RuleIndex;

use ::core::fmt::Debug;

/// Maximum number of states carrying an Enter rule along one superstate chain.
///
/// Entry actions are collected on a fixed stack before firing top-down, so a
/// chain deeper than this is rejected by [`Engine::finalize`].
pub const MAX_CHAIN_DEPTH: usize = 12;

/// Binds the state, event and context types of one family of engines.
///
/// States and events are small ordered identifiers; the order drives the
/// sorted layout of the rule store.
pub trait Model {
    type State: Copy + Ord + Debug + 'static;
    type Event: Copy + Ord + Debug + 'static;
    type Context;
}

/// Outcome of delivering one event to [`Engine::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SendResult {
    /// A rule matched; the transition happened and its action (if any) succeeded.
    Handled,
    /// No rule in the current state's chain, or the event is blocked.
    NoMatch,
    /// The rule's action reported failure and the transition was rolled back.
    ActionFailed,
}

impl SendResult {
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

impl From<SendResult> for bool {
    fn from(result: SendResult) -> Self {
        result.is_handled()
    }
}

/// Position of a state inside the engine.
///
/// `Detached` stands in for a transition target that has no rules at all: it
/// has no superstate and contributes no enter/exit actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursor<S> {
    Run(RuleIndex),
    Detached(S),
}
