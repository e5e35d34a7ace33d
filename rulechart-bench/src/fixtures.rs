//! Benchmark machines of various shapes

use rulechart_core::{Action, ConfigError, Engine};

use crate::common::{Bench, HOP, TOGGLE};

pub type BenchResult<T> = Result<T, ConfigError<u16, u16>>;

fn count<const N: usize>(machine: &mut Engine<Bench, N>) {
    *machine.context_mut() += 1;
}

/// Two states flipping on `TOGGLE`.
pub fn toggle() -> BenchResult<Engine<Bench, 4>> {
    let mut machine = Engine::new(0, 0);
    machine.on_event(0, TOGGLE, 1, None)?;
    machine.on_event(1, TOGGLE, 0, None)?;
    machine.finalize()?;
    Ok(machine)
}

/// Two leaves under separate chains of `depth` superstates. `HOP` is only
/// registered on the roots, so every dispatch climbs the whole chain and
/// every transition exits and enters `depth + 1` states.
///
/// `depth` must stay below `MAX_CHAIN_DEPTH`.
pub fn twin_chains<const N: usize>(depth: u16) -> BenchResult<Engine<Bench, N>> {
    let left = |level: u16| level;
    let right = |level: u16| 100 + level;
    let mut machine = Engine::new(left(depth), 0);
    for level in 0..=depth {
        for state in [left(level), right(level)] {
            machine.on_enter(state, Action::new(count::<N>, "count"))?;
            machine.on_exit(state, Action::new(count::<N>, "count"))?;
            if level > 0 {
                machine.inherit(state, state - 1)?;
            }
        }
    }
    machine.on_event(left(0), HOP, right(depth), None)?;
    machine.on_event(right(0), HOP, left(depth), None)?;
    machine.finalize()?;
    Ok(machine)
}

/// `states` flat states in a ring, each advancing on `TOGGLE`.
pub fn ring<const N: usize>(states: u16) -> BenchResult<Engine<Bench, N>> {
    let mut machine = Engine::new(0, 0);
    for state in 0..states {
        machine.on_event(state, TOGGLE, (state + 1) % states, None)?;
    }
    machine.finalize()?;
    Ok(machine)
}
