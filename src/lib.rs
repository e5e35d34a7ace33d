//! # rulechart
//! Table-driven hierarchical state machines, plus a BLE link supervisor
//! built on them.
//!
//! The engine itself lives in [`rulechart_core`] and is `no_std`; this crate
//! re-exports it with `std`, `debug-log` and `diagram` turned on.

pub use rulechart_core::*;

pub mod link;
