//! Human-readable names for decoded engine activity.

use ::core::fmt;

use super::Model;

/// Optional name tables for states and events.
///
/// Values missing from a table are printed with their `Debug` form.
pub struct Names<M: Model> {
    pub states: &'static [(M::State, &'static str)],
    pub events: &'static [(M::Event, &'static str)],
}

impl<M: Model> Names<M> {
    pub const EMPTY: Self = Self {
        states: &[],
        events: &[],
    };

    pub const fn new(
        states: &'static [(M::State, &'static str)],
        events: &'static [(M::Event, &'static str)],
    ) -> Self {
        Self { states, events }
    }

    pub fn state(&self, state: M::State) -> Label<'static, M::State> {
        Label::new(state, self.states)
    }

    pub fn event(&self, event: M::Event) -> Label<'static, M::Event> {
        Label::new(event, self.events)
    }
}

impl<M: Model> Clone for Names<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Model> Copy for Names<M> {}

impl<M: Model> Default for Names<M> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<M: Model> fmt::Debug for Names<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Names")
            .field("states", &self.states.len())
            .field("events", &self.events.len())
            .finish()
    }
}

/// A state or event value rendered through a name table.
pub struct Label<'a, T> {
    value: T,
    table: &'a [(T, &'static str)],
}

impl<'a, T: Copy + PartialEq> Label<'a, T> {
    pub const fn new(value: T, table: &'a [(T, &'static str)]) -> Self {
        Self { value, table }
    }

    pub fn name(&self) -> Option<&'static str> {
        self.table
            .iter()
            .find(|(value, _)| *value == self.value)
            .map(|&(_, name)| name)
    }
}

impl<T: Copy + PartialEq + fmt::Debug> fmt::Display for Label<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:?}", self.value),
        }
    }
}

/// Decoding switch carried by every engine.
pub(crate) struct Decode<M: Model> {
    pub(crate) enabled: bool,
    #[cfg_attr(not(feature = "debug-log"), allow(dead_code))]
    pub(crate) prefix: &'static str,
    pub(crate) names: Names<M>,
}

impl<M: Model> Decode<M> {
    pub(crate) const OFF: Self = Self {
        enabled: false,
        prefix: "",
        names: Names::EMPTY,
    };
}

impl<M: Model> Clone for Decode<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Model> Copy for Decode<M> {}
