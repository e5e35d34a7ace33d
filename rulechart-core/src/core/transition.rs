//! Transition executor: common ancestor, bottom-up exits, top-down entries.

use heapless::Vec;

use super::rule::{Action, EnterExitFn};
use super::{Cursor, Engine, MAX_CHAIN_DEPTH, Model};

impl<M: Model, const N: usize> Engine<M, N> {
    /// Lowest state present in both chains, each chain including its own start.
    ///
    /// Walks `old`'s chain outward and, at each step, scans all of `new`'s
    /// chain; O(depth²), which shallow hierarchies make cheap.
    pub(crate) fn common_ancestor(
        &self,
        old: Cursor<M::State>,
        new: Cursor<M::State>,
    ) -> Option<Cursor<M::State>> {
        self.ancestors(old)
            .find(|&top| self.ancestors(new).any(|candidate| candidate == top))
    }

    /// Moves from `old` to `new`, firing exit actions from `old` up to (not
    /// including) the common ancestor, then enter actions from just below the
    /// ancestor down to `new`. A no-op when `old == new`.
    pub(crate) fn transition(&mut self, old: Cursor<M::State>, new: Cursor<M::State>) {
        if old == new {
            return;
        }
        let top = self.common_ancestor(old, new);

        let mut at = Some(old);
        while let Some(cursor) = at {
            if Some(cursor) == top {
                break;
            }
            if let Some(exit) = self.exit_action(cursor) {
                decode!(
                    self,
                    "Exiting {}, calling {}",
                    self.decode.names.state(self.state_at(cursor)),
                    exit.name().unwrap_or("<action>")
                );
                (exit.run())(self);
            }
            at = self.parent(cursor);
        }

        self.current = new;
        self.previous = old;

        let mut entries: Vec<(Cursor<M::State>, Action<EnterExitFn<M, N>>), MAX_CHAIN_DEPTH> =
            Vec::new();
        let mut at = Some(new);
        while let Some(cursor) = at {
            if Some(cursor) == top {
                break;
            }
            if let Some(enter) = self.enter_action(cursor) {
                if entries.push((cursor, enter)).is_err() {
                    // finalize rejects chains with more enter rules than this.
                    unreachable!("enter chain exceeds MAX_CHAIN_DEPTH");
                }
            }
            at = self.parent(cursor);
        }
        while let Some((_cursor, enter)) = entries.pop() {
            decode!(
                self,
                "Entering {}, calling {}",
                self.decode.names.state(self.state_at(_cursor)),
                enter.name().unwrap_or("<action>")
            );
            (enter.run())(self);
        }
    }
}
