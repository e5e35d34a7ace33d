//! Fixed-capacity sorted rule store.
//!
//! Rules sharing a state form a contiguous *run*. Once linked, every run's
//! leading rule points at the next run's leading rule, so walking states costs
//! O(states) instead of O(rules).

use heapless::Vec;

use super::error::ConfigError;
use super::rule::{Rule, RuleKind};
use super::Model;

/// Index of a rule inside its store.
pub type RuleIndex = u16;

pub(crate) struct RuleStore<M: Model, const N: usize> {
    rules: Vec<Rule<M, N>, N>,
}

impl<M: Model, const N: usize> RuleStore<M, N> {
    // Rule indices are u16.
    const INDEX_FITS: () = assert!(N <= RuleIndex::MAX as usize, "rule capacity exceeds u16 indices");

    pub(crate) const fn new() -> Self {
        let () = Self::INDEX_FITS;
        Self { rules: Vec::new() }
    }

    pub(crate) fn as_slice(&self) -> &[Rule<M, N>] {
        &self.rules
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn get(&self, index: RuleIndex) -> &Rule<M, N> {
        &self.rules[usize::from(index)]
    }

    /// Inserts `rule` at its sorted position, shifting later rules up by one.
    pub(crate) fn insert(&mut self, rule: Rule<M, N>) -> Result<(), ConfigError<M::State, M::Event>> {
        if self.rules.is_full() {
            return Err(ConfigError::StoreFull);
        }
        let pos = match self.rules.binary_search_by(|existing| existing.sort_cmp(&rule)) {
            Ok(_) => return Err(ConfigError::duplicate(&rule)),
            Err(pos) => pos,
        };
        self.rules
            .push(rule)
            .map_err(|_| ConfigError::StoreFull)?;
        self.rules[pos..].rotate_right(1);
        self.unlink();
        Ok(())
    }

    /// Drops run links and resolved superstates; indices shift on insert.
    fn unlink(&mut self) {
        for rule in self.rules.iter_mut() {
            rule.next_run = None;
            if let RuleKind::Inherit { resolved, .. } = &mut rule.kind {
                *resolved = None;
            }
        }
    }

    /// Stamps each run's leading rule with the index of the next run.
    pub(crate) fn link_runs(&mut self) {
        let mut lead = 0usize;
        for pos in 0..self.rules.len() {
            self.rules[pos].next_run = None;
            if self.rules[pos].state != self.rules[lead].state {
                self.rules[lead].next_run = Some(pos as RuleIndex);
                lead = pos;
            }
        }
    }

    /// Leading rule index of every run, following the links.
    pub(crate) fn runs(&self) -> Runs<'_, M, N> {
        Runs {
            store: self,
            next: if self.rules.is_empty() { None } else { Some(0) },
        }
    }

    /// Finds a state's run through the run links.
    pub(crate) fn find_run(&self, state: M::State) -> Option<RuleIndex> {
        self.runs().find(|&lead| self.get(lead).state == state)
    }

    /// Finds a state's run without relying on links; usable before finalize.
    pub(crate) fn scan_run(&self, state: M::State) -> Option<RuleIndex> {
        let pos = self.rules.partition_point(|rule| rule.state < state);
        (self.rules.get(pos)?.state == state).then_some(pos as RuleIndex)
    }

    /// All rules of the run starting at `lead`.
    pub(crate) fn run(&self, lead: RuleIndex) -> impl Iterator<Item = &Rule<M, N>> + '_ {
        let state = self.get(lead).state;
        self.rules[usize::from(lead)..]
            .iter()
            .take_while(move |rule| rule.state == state)
    }

    /// Mutable access to a run's Inherit rule; it always sorts first.
    pub(crate) fn inherit_mut(&mut self, lead: RuleIndex) -> Option<&mut Option<RuleIndex>> {
        match &mut self.rules[usize::from(lead)].kind {
            RuleKind::Inherit { resolved, .. } => Some(resolved),
            _ => None,
        }
    }
}

impl<M: Model, const N: usize> Clone for RuleStore<M, N> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

pub(crate) struct Runs<'a, M: Model, const N: usize> {
    store: &'a RuleStore<M, N>,
    next: Option<RuleIndex>,
}

impl<M: Model, const N: usize> Iterator for Runs<'_, M, N> {
    type Item = RuleIndex;

    fn next(&mut self) -> Option<RuleIndex> {
        let lead = self.next?;
        self.next = self.store.get(lead).next_run;
        Some(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rule::{Action, RuleTag};
    use crate::core::Engine;
    use ::core::cmp::Ordering;
    use proptest::prelude::*;

    struct T;
    impl Model for T {
        type State = u8;
        type Event = u32;
        type Context = ();
    }

    fn ok(_: &mut Engine<T, 8>) -> bool {
        true
    }

    fn noop(_: &mut Engine<T, 8>) {}

    fn event(state: u8, event: u32, next: u8) -> Rule<T, 8> {
        Rule::new(
            state,
            RuleKind::Event {
                event,
                next,
                action: Some(Action::new(ok as fn(&mut Engine<T, 8>) -> bool, "ok")),
            },
        )
    }

    fn shape(store: &RuleStore<T, 8>) -> std::vec::Vec<(u8, RuleTag)> {
        store
            .as_slice()
            .iter()
            .map(|rule| (rule.state, rule.kind.tag()))
            .collect()
    }

    #[test]
    fn insert_keeps_state_then_kind_then_event_order() {
        let mut store = RuleStore::<T, 8>::new();
        store.insert(event(2, 9, 1)).unwrap();
        store.insert(event(1, 5, 2)).unwrap();
        store
            .insert(Rule::new(2, RuleKind::Enter(Action::new(noop as fn(&mut Engine<T, 8>), "noop"))))
            .unwrap();
        store.insert(event(2, 3, 1)).unwrap();
        store
            .insert(Rule::new(2, RuleKind::Inherit { superstate: 1, resolved: None }))
            .unwrap();

        assert_eq!(
            shape(&store),
            [
                (1, RuleTag::Event),
                (2, RuleTag::Inherit),
                (2, RuleTag::Enter),
                (2, RuleTag::Event),
                (2, RuleTag::Event),
            ]
        );
        let events: std::vec::Vec<u32> = store
            .run(3)
            .filter_map(|rule| match rule.kind {
                RuleKind::Event { event, .. } => Some(event),
                _ => None,
            })
            .collect();
        assert_eq!(events, [3, 9]);
    }

    #[test]
    fn duplicate_event_pair_is_rejected() {
        let mut store = RuleStore::<T, 8>::new();
        store.insert(event(1, 5, 2)).unwrap();
        assert_eq!(
            store.insert(event(1, 5, 3)),
            Err(ConfigError::DuplicateEvent { state: 1, event: 5 })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn full_store_is_rejected() {
        let mut store = RuleStore::<T, 8>::new();
        for e in 0..8 {
            store.insert(event(1, e, 2)).unwrap();
        }
        assert_eq!(store.insert(event(1, 99, 2)), Err(ConfigError::StoreFull));
    }

    #[test]
    fn runs_follow_links_after_linking() {
        let mut store = RuleStore::<T, 8>::new();
        store.insert(event(4, 1, 1)).unwrap();
        store.insert(event(1, 1, 4)).unwrap();
        store.insert(event(1, 2, 4)).unwrap();
        store.insert(event(7, 1, 1)).unwrap();
        store.link_runs();

        let leads: std::vec::Vec<RuleIndex> = store.runs().collect();
        assert_eq!(leads, [0, 2, 3]);
        assert_eq!(store.find_run(7), Some(3));
        assert_eq!(store.find_run(5), None);
        assert_eq!(store.scan_run(4), Some(2));
        assert_eq!(store.scan_run(0), None);
    }

    proptest! {
        #[test]
        fn store_stays_strictly_sorted(
            pairs in proptest::collection::vec((0u8..6, 0u32..6), 0..20)
        ) {
            let mut store = RuleStore::<T, 8>::new();
            for (state, e) in pairs {
                let _ = store.insert(event(state, e, 0));
            }
            prop_assert!(
                store
                    .as_slice()
                    .windows(2)
                    .all(|pair| pair[0].sort_cmp(&pair[1]) == Ordering::Less)
            );
        }
    }
}
