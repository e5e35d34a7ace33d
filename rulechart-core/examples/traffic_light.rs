//! Three-light cycle driven by a timer event, with a pedestrian request that
//! is only honored while the light is green.

use rulechart_core::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Light {
    Red,
    Green,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Signal {
    TimerElapsed,
    WalkRequest,
}

#[derive(Debug, Default)]
struct Counters {
    cycles: u32,
    walk_requests: u32,
}

struct TrafficLight;

impl Model for TrafficLight {
    type State = Light;
    type Event = Signal;
    type Context = Counters;
}

type Machine = Engine<TrafficLight, 8>;

fn announce(machine: &mut Machine) {
    println!("  light is now {:?}", machine.current_state());
}

fn count_cycle(machine: &mut Machine) -> bool {
    machine.context_mut().cycles += 1;
    true
}

fn cut_green_short(machine: &mut Machine) -> bool {
    machine.context_mut().walk_requests += 1;
    true
}

fn build() -> Result<Machine, rulechart_core::ConfigError<Light, Signal>> {
    let mut machine = Machine::new(Light::Red, Counters::default());
    machine.on_event(Light::Red, Signal::TimerElapsed, Light::Green, None)?;
    machine.on_event(Light::Green, Signal::TimerElapsed, Light::Yellow, None)?;
    machine.on_event(
        Light::Green,
        Signal::WalkRequest,
        Light::Yellow,
        Some(action!(cut_green_short)),
    )?;
    machine.on_event(
        Light::Yellow,
        Signal::TimerElapsed,
        Light::Red,
        Some(action!(count_cycle)),
    )?;
    machine.on_enter(Light::Red, action!(announce))?;
    machine.on_enter(Light::Green, action!(announce))?;
    machine.on_enter(Light::Yellow, action!(announce))?;
    machine.finalize()?;
    Ok(machine)
}

fn main() -> Result<(), rulechart_core::ConfigError<Light, Signal>> {
    let mut machine = build()?;
    let script = [
        Signal::TimerElapsed,
        Signal::WalkRequest,
        Signal::TimerElapsed,
        Signal::WalkRequest,
        Signal::TimerElapsed,
        Signal::TimerElapsed,
        Signal::TimerElapsed,
    ];
    for signal in script {
        println!("{signal:?} in {:?}", machine.current_state());
        match machine.handle(signal) {
            SendResult::Handled => {}
            SendResult::NoMatch => println!("  ignored"),
            SendResult::ActionFailed => println!("  action failed, rolled back"),
        }
    }
    let counters = machine.context();
    println!(
        "finished in {:?} after {} cycles ({} walk requests)",
        machine.current_state(),
        counters.cycles,
        counters.walk_requests
    );
    Ok(())
}
