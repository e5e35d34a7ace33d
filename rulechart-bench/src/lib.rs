//! Performance benchmarks for rulechart
//!
//! Criterion benchmarks for dispatch, transition and finalize costs on the
//! host. Machines are built by [`fixtures`].

pub mod fixtures;

/// Common benchmark utilities and test data
pub mod common {
    use rulechart_core::Model;

    /// States and events are plain integers so fixtures can size freely.
    pub struct Bench;

    impl Model for Bench {
        type State = u16;
        type Event = u16;
        type Context = u64;
    }

    pub const TOGGLE: u16 = 0;
    pub const HOP: u16 = 1;
}
