//! Rule records and the callbacks they carry.

use ::core::cmp::Ordering;
use ::core::fmt;

use super::store::RuleIndex;
use super::{Engine, Model};

/// Event action. Returning `false` rolls the triggering transition back.
pub type ActionFn<M, const N: usize> = fn(&mut Engine<M, N>) -> bool;

/// Enter/exit action. Nothing can veto an enter or exit.
pub type EnterExitFn<M, const N: usize> = fn(&mut Engine<M, N>);

/// A callback plus the name it is reported under when decoding is on.
///
/// The name is only stored with the `debug-log` feature; release builds carry
/// the bare function pointer. Build one with [`action!`](crate::action).
#[derive(Clone, Copy)]
pub struct Action<F> {
    run: F,
    #[cfg(feature = "debug-log")]
    name: &'static str,
}

impl<F: Copy> Action<F> {
    #[cfg_attr(not(feature = "debug-log"), allow(unused_variables))]
    pub const fn new(run: F, name: &'static str) -> Self {
        Self {
            run,
            #[cfg(feature = "debug-log")]
            name,
        }
    }

    pub const fn run(&self) -> F {
        self.run
    }

    /// Name given at construction, if the build keeps names.
    pub const fn name(&self) -> Option<&'static str> {
        #[cfg(feature = "debug-log")]
        {
            Some(self.name)
        }
        #[cfg(not(feature = "debug-log"))]
        {
            None
        }
    }
}

impl<F> fmt::Debug for Action<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "debug-log")]
        {
            write!(f, "Action({})", self.name)
        }
        #[cfg(not(feature = "debug-log"))]
        {
            f.write_str("Action")
        }
    }
}

/// Wraps a function path in an [`Action`](crate::core::Action) named after it.
///
/// ```rust
/// use rulechart_core::{Engine, Model, action};
///
/// struct Door;
/// impl Model for Door {
///     type State = u8;
///     type Event = u32;
///     type Context = u32;
/// }
///
/// fn count(sm: &mut Engine<Door, 4>) -> bool {
///     *sm.context_mut() += 1;
///     true
/// }
///
/// let mut sm: Engine<Door, 4> = Engine::new(0, 0);
/// sm.on_event(0, 7, 1, Some(action!(count))).unwrap();
/// assert!(sm.handle(7).is_handled());
/// assert_eq!(*sm.context(), 1);
/// ```
#[macro_export]
macro_rules! action {
    ($f:path) => {
        $crate::core::Action::new($f, stringify!($f))
    };
}

/// Kind ordinal of a rule. Within one state the store keeps rules in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "diagram", derive(serde::Serialize))]
pub enum RuleTag {
    Inherit,
    Enter,
    Exit,
    Event,
}

/// Payload of a rule, tagged by kind.
pub enum RuleKind<M: Model, const N: usize> {
    /// The owning state's superstate. `resolved` is filled in by finalize.
    Inherit {
        superstate: M::State,
        resolved: Option<RuleIndex>,
    },
    Enter(Action<EnterExitFn<M, N>>),
    Exit(Action<EnterExitFn<M, N>>),
    /// `action == None && next == state` is a block.
    Event {
        event: M::Event,
        next: M::State,
        action: Option<Action<ActionFn<M, N>>>,
    },
}

impl<M: Model, const N: usize> RuleKind<M, N> {
    pub const fn tag(&self) -> RuleTag {
        match self {
            Self::Inherit { .. } => RuleTag::Inherit,
            Self::Enter(_) => RuleTag::Enter,
            Self::Exit(_) => RuleTag::Exit,
            Self::Event { .. } => RuleTag::Event,
        }
    }
}

impl<M: Model, const N: usize> Clone for RuleKind<M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Model, const N: usize> Copy for RuleKind<M, N> {}

impl<M: Model, const N: usize> fmt::Debug for RuleKind<M, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inherit {
                superstate,
                resolved,
            } => f
                .debug_struct("Inherit")
                .field("superstate", superstate)
                .field("resolved", resolved)
                .finish(),
            Self::Enter(action) => f.debug_tuple("Enter").field(action).finish(),
            Self::Exit(action) => f.debug_tuple("Exit").field(action).finish(),
            Self::Event {
                event,
                next,
                action,
            } => f
                .debug_struct("Event")
                .field("event", event)
                .field("next", next)
                .field("action", action)
                .finish(),
        }
    }
}

/// One entry of the rule store.
pub struct Rule<M: Model, const N: usize> {
    pub(crate) state: M::State,
    pub(crate) kind: RuleKind<M, N>,
    /// Set on the leading rule of a state run once finalized: index of the
    /// next state's leading rule.
    pub(crate) next_run: Option<RuleIndex>,
}

impl<M: Model, const N: usize> Rule<M, N> {
    pub(crate) const fn new(state: M::State, kind: RuleKind<M, N>) -> Self {
        Self {
            state,
            kind,
            next_run: None,
        }
    }

    pub const fn state(&self) -> M::State {
        self.state
    }

    pub const fn kind(&self) -> &RuleKind<M, N> {
        &self.kind
    }

    /// Store order: state, then kind ordinal, then event within Event rules.
    pub(crate) fn sort_cmp(&self, other: &Self) -> Ordering {
        self.state
            .cmp(&other.state)
            .then_with(|| self.kind.tag().cmp(&other.kind.tag()))
            .then_with(|| match (&self.kind, &other.kind) {
                (RuleKind::Event { event: a, .. }, RuleKind::Event { event: b, .. }) => a.cmp(b),
                _ => Ordering::Equal,
            })
    }

    pub(crate) fn is_block(&self) -> bool {
        matches!(self.kind, RuleKind::Event { action: None, next, .. } if next == self.state)
    }
}

impl<M: Model, const N: usize> Clone for Rule<M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Model, const N: usize> Copy for Rule<M, N> {}

impl<M: Model, const N: usize> fmt::Debug for Rule<M, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("state", &self.state)
            .field("kind", &self.kind)
            .field("next_run", &self.next_run)
            .finish()
    }
}
