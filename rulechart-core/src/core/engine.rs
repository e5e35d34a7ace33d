//! Engine construction, configuration, finalize and queries.

use super::decode::{Decode, Names};
use super::error::ConfigError;
use super::rule::{Action, ActionFn, EnterExitFn, Rule, RuleKind};
use super::store::{RuleIndex, RuleStore};
use super::{Cursor, MAX_CHAIN_DEPTH, Model};
use crate::StateMachine;

/// A hierarchical state machine interpreting a table of at most `N` rules.
///
/// Lifecycle: [`new`](Self::new) → configuration calls →
/// [`finalize`](Self::finalize) (explicit, or implicit on first
/// [`handle`](Self::handle) / [`goto_state`](Self::goto_state)) → operation.
/// The initial state is not entered: no Enter action fires at startup.
pub struct Engine<M: Model, const N: usize> {
    pub(crate) store: RuleStore<M, N>,
    pub(crate) context: M::Context,
    pub(crate) initial: M::State,
    pub(crate) current: Cursor<M::State>,
    pub(crate) previous: Cursor<M::State>,
    pub(crate) finalized: bool,
    pub(crate) decode: Decode<M>,
}

type Result<T, M> = ::core::result::Result<T, ConfigError<<M as Model>::State, <M as Model>::Event>>;

impl<M: Model, const N: usize> Engine<M, N> {
    pub const fn new(initial: M::State, context: M::Context) -> Self {
        Self {
            store: RuleStore::new(),
            context,
            initial,
            current: Cursor::Detached(initial),
            previous: Cursor::Detached(initial),
            finalized: false,
            decode: Decode::OFF,
        }
    }

    /// Creates a finalized engine sharing `template`'s behavior with its own
    /// context. The copy starts in the template's initial state.
    ///
    /// # Errors
    /// [`ConfigError::NotFinalized`] if `template` has not been finalized.
    pub fn from_template(template: &Self, context: M::Context) -> Result<Self, M> {
        if !template.finalized {
            return Err(ConfigError::NotFinalized);
        }
        let start = template
            .store
            .find_run(template.initial)
            .map(Cursor::Run)
            .ok_or(ConfigError::UnknownInitialState)?;
        Ok(Self {
            store: template.store.clone(),
            context,
            initial: template.initial,
            current: start,
            previous: start,
            finalized: true,
            decode: template.decode,
        })
    }

    // --- Configuration -------------------------------------------------------

    /// While in `state`, `event` moves the machine to `next` and then runs
    /// `action`. An action returning `false` rolls the transition back.
    ///
    /// Registering `next == state` with no action is a [`block`](Self::block).
    ///
    /// # Errors
    /// Store full, already finalized, or `(state, event)` already registered.
    pub fn on_event(
        &mut self,
        state: M::State,
        event: M::Event,
        next: M::State,
        action: Option<Action<ActionFn<M, N>>>,
    ) -> Result<(), M> {
        self.insert(Rule::new(
            state,
            RuleKind::Event {
                event,
                next,
                action,
            },
        ))
    }

    /// Runs `action` whenever `state` (directly or through a substate) is entered.
    ///
    /// # Errors
    /// Store full, already finalized, or `state` already has an Enter rule.
    pub fn on_enter(&mut self, state: M::State, action: Action<EnterExitFn<M, N>>) -> Result<(), M> {
        self.insert(Rule::new(state, RuleKind::Enter(action)))
    }

    /// Runs `action` whenever `state` is exited.
    ///
    /// # Errors
    /// Store full, already finalized, or `state` already has an Exit rule.
    pub fn on_exit(&mut self, state: M::State, action: Action<EnterExitFn<M, N>>) -> Result<(), M> {
        self.insert(Rule::new(state, RuleKind::Exit(action)))
    }

    /// Makes `superstate` the parent of `substate`: events `substate` does not
    /// handle are looked up in `superstate`, and transitions are bracketed by
    /// the shared part of both chains.
    ///
    /// # Errors
    /// Store full, already finalized, or `substate` already has a superstate.
    pub fn inherit(&mut self, substate: M::State, superstate: M::State) -> Result<(), M> {
        self.insert(Rule::new(
            substate,
            RuleKind::Inherit {
                superstate,
                resolved: None,
            },
        ))
    }

    /// Consumes `event` in `state` without transition or action, hiding any
    /// superstate rule for it. `handle` reports it as [`NoMatch`](super::SendResult::NoMatch).
    ///
    /// # Errors
    /// Same as [`on_event`](Self::on_event).
    pub fn block(&mut self, state: M::State, event: M::Event) -> Result<(), M> {
        self.on_event(state, event, state, None)
    }

    fn insert(&mut self, rule: Rule<M, N>) -> Result<(), M> {
        if self.finalized {
            return Err(ConfigError::Finalized);
        }
        self.store.insert(rule)
    }

    // --- Finalize ------------------------------------------------------------

    /// Freezes the rule table: links state runs, resolves superstates, checks
    /// chains and locates the initial state. Calling it again is a no-op.
    ///
    /// # Errors
    /// Dangling superstate, inheritance cycle, an enter chain deeper than
    /// [`MAX_CHAIN_DEPTH`], or an initial state without rules. The engine
    /// stays unfinalized on error.
    pub fn finalize(&mut self) -> Result<(), M> {
        if self.finalized {
            return Ok(());
        }
        self.store.link_runs();

        let mut next = (self.store.len() > 0).then_some(0);
        while let Some(lead) = next {
            let rule = *self.store.get(lead);
            next = rule.next_run;
            if let RuleKind::Inherit { superstate, .. } = rule.kind {
                let target = self
                    .store
                    .find_run(superstate)
                    .ok_or(ConfigError::UnknownSuperstate {
                        state: rule.state,
                        superstate,
                    })?;
                if let Some(resolved) = self.store.inherit_mut(lead) {
                    *resolved = Some(target);
                }
            }
        }

        let run_count = self.store.runs().count();
        for lead in self.store.runs() {
            self.check_chain(lead, run_count)?;
        }

        let start = self
            .store
            .find_run(self.initial)
            .ok_or(ConfigError::UnknownInitialState)?;
        self.current = Cursor::Run(start);
        self.previous = Cursor::Run(start);
        self.finalized = true;
        trace!("finalized {} rules in {} runs", self.store.len(), run_count);
        Ok(())
    }

    /// Walks one superstate chain, rejecting loops and over-deep enter chains.
    fn check_chain(&self, lead: RuleIndex, run_count: usize) -> Result<(), M> {
        let state = self.store.get(lead).state;
        let mut enters = 0usize;
        let mut steps = 0usize;
        let mut cursor = Some(lead);
        while let Some(at) = cursor {
            steps += 1;
            if steps > run_count {
                return Err(ConfigError::InheritanceCycle { state });
            }
            if self.enter_action(Cursor::Run(at)).is_some() {
                enters += 1;
                if enters > MAX_CHAIN_DEPTH {
                    return Err(ConfigError::ChainTooDeep { state });
                }
            }
            cursor = self.superstate_of(at);
        }
        Ok(())
    }

    pub(crate) fn ensure_finalized(&mut self) {
        if let Err(err) = self.finalize() {
            panic!("rulechart: implicit finalize failed: {err:?}");
        }
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    // --- Queries -------------------------------------------------------------

    /// Current state. Before finalize this is the initial state.
    pub fn current_state(&self) -> M::State {
        self.state_at(self.current)
    }

    /// State left by the last transition. Meaningful inside an action invoked
    /// by [`handle`](Self::handle); equals the initial state before any transition.
    pub fn previous_state(&self) -> M::State {
        self.state_at(self.previous)
    }

    /// True if the current state is `test` or has `test` as an ancestor.
    pub fn in_state(&self, test: M::State) -> bool {
        let start = if self.finalized {
            self.current
        } else {
            self.store
                .scan_run(self.initial)
                .map_or(Cursor::Detached(self.initial), Cursor::Run)
        };
        // Bounded so an unchecked cycle before finalize cannot spin forever.
        self.ancestors(start)
            .take(self.store.len() + 1)
            .any(|cursor| self.state_at(cursor) == test)
    }

    /// Forces a transition to `new` outside event dispatch. Exit and enter
    /// actions fire as for any transition. A failing action in progress will
    /// not roll back past this point.
    ///
    /// # Panics
    /// If the implicit finalize fails.
    pub fn goto_state(&mut self, new: M::State) {
        self.ensure_finalized();
        let target = self.resolve(new);
        decode!(
            self,
            "Manual state change from {} to {}",
            self.decode.names.state(self.current_state()),
            self.decode.names.state(new)
        );
        self.transition(self.current, target);
        self.previous = self.current;
    }

    pub const fn context(&self) -> &M::Context {
        &self.context
    }

    pub const fn context_mut(&mut self) -> &mut M::Context {
        &mut self.context
    }

    pub fn into_context(self) -> M::Context {
        self.context
    }

    pub const fn initial_state(&self) -> M::State {
        self.initial
    }

    /// Rules in store order.
    pub fn rules(&self) -> &[Rule<M, N>] {
        self.store.as_slice()
    }

    pub fn rule_count(&self) -> usize {
        self.store.len()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    // --- Diagnostics ---------------------------------------------------------

    /// Logs every rejection, state change and action call under `prefix`.
    /// Output needs the `debug-log` feature; without it the switch is inert.
    pub fn enable_decode(&mut self, prefix: &'static str) {
        self.decode.enabled = true;
        self.decode.prefix = prefix;
    }

    pub fn disable_decode(&mut self) {
        self.decode.enabled = false;
    }

    pub const fn is_decoding(&self) -> bool {
        self.decode.enabled
    }

    /// Builder form of [`set_names`](Self::set_names).
    #[must_use]
    pub fn with_names(mut self, names: Names<M>) -> Self {
        self.decode.names = names;
        self
    }

    pub fn set_names(&mut self, names: Names<M>) {
        self.decode.names = names;
    }

    pub const fn names(&self) -> &Names<M> {
        &self.decode.names
    }

    // --- Cursor helpers ------------------------------------------------------

    pub(crate) fn state_at(&self, cursor: Cursor<M::State>) -> M::State {
        match cursor {
            Cursor::Run(lead) => self.store.get(lead).state,
            Cursor::Detached(state) => state,
        }
    }

    /// Cursor for `state`: its run, or a detached stand-in if it has no rules.
    pub(crate) fn resolve(&self, state: M::State) -> Cursor<M::State> {
        self.store
            .find_run(state)
            .map_or(Cursor::Detached(state), Cursor::Run)
    }

    /// Superstate run of the run at `lead`, resolved or not.
    pub(crate) fn superstate_of(&self, lead: RuleIndex) -> Option<RuleIndex> {
        match self.store.get(lead).kind {
            RuleKind::Inherit {
                resolved: Some(parent),
                ..
            } => Some(parent),
            RuleKind::Inherit {
                superstate,
                resolved: None,
            } => self.store.scan_run(superstate),
            _ => None,
        }
    }

    pub(crate) fn parent(&self, cursor: Cursor<M::State>) -> Option<Cursor<M::State>> {
        match cursor {
            Cursor::Run(lead) => self.superstate_of(lead).map(Cursor::Run),
            Cursor::Detached(_) => None,
        }
    }

    /// `cursor` followed by each of its superstates, innermost first.
    pub(crate) fn ancestors(
        &self,
        cursor: Cursor<M::State>,
    ) -> impl Iterator<Item = Cursor<M::State>> + '_ {
        ::core::iter::successors(Some(cursor), move |&at| self.parent(at))
    }

    pub(crate) fn enter_action(&self, cursor: Cursor<M::State>) -> Option<Action<EnterExitFn<M, N>>> {
        let Cursor::Run(lead) = cursor else {
            return None;
        };
        self.store.run(lead).find_map(|rule| match rule.kind {
            RuleKind::Enter(action) => Some(action),
            _ => None,
        })
    }

    pub(crate) fn exit_action(&self, cursor: Cursor<M::State>) -> Option<Action<EnterExitFn<M, N>>> {
        let Cursor::Run(lead) = cursor else {
            return None;
        };
        self.store.run(lead).find_map(|rule| match rule.kind {
            RuleKind::Exit(action) => Some(action),
            _ => None,
        })
    }
}

impl<M: Model, const N: usize> StateMachine for Engine<M, N> {
    type State = M::State;
    type Event = M::Event;
    type Context = M::Context;

    fn send(&mut self, event: Self::Event) -> bool {
        self.handle(event).is_handled()
    }

    fn state(&self) -> Self::State {
        self.current_state()
    }

    fn context(&self) -> &Self::Context {
        &self.context
    }

    fn context_mut(&mut self) -> &mut Self::Context {
        &mut self.context
    }
}

impl<M: Model, const N: usize> ::core::fmt::Debug for Engine<M, N> {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.debug_struct("Engine")
            .field("current", &self.current_state())
            .field("previous", &self.previous_state())
            .field("finalized", &self.finalized)
            .field("rules", &self.store.len())
            .finish_non_exhaustive()
    }
}
