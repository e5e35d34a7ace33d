//! Media player with a `Powered` superstate.
//!
//! Power-off lives on `Powered`, so both `Stopped` and `Playing` inherit it.
//! Leaving `Powered` (Power from either child) runs its exit action; moving
//! between the two children does not. `Play` fails (and rolls back) while no
//! track is loaded.

use rulechart_core::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Player {
    Off,
    Powered,
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Key {
    Power,
    Load,
    Play,
    Stop,
    VolumeUp,
    VolumeDown,
}

#[derive(Debug, Default)]
struct Deck {
    track: Option<&'static str>,
    volume: u8,
}

struct MediaPlayer;

impl Model for MediaPlayer {
    type State = Player;
    type Event = Key;
    type Context = Deck;
}

type Machine = Engine<MediaPlayer, 24>;

fn power_on(machine: &mut Machine) {
    println!("  [enter Powered] amplifier on");
    machine.context_mut().volume = 5;
}

fn power_off(_: &mut Machine) {
    println!("  [exit Powered] amplifier off");
}

fn spin_up(machine: &mut Machine) {
    println!("  [enter Playing] {:?}", machine.context().track);
}

fn spin_down(_: &mut Machine) {
    println!("  [exit Playing]");
}

fn load_track(machine: &mut Machine) -> bool {
    machine.context_mut().track = Some("side-a.flac");
    true
}

fn has_track(machine: &mut Machine) -> bool {
    machine.context().track.is_some()
}

fn louder(machine: &mut Machine) -> bool {
    let deck = machine.context_mut();
    deck.volume = deck.volume.saturating_add(1).min(10);
    true
}

fn quieter(machine: &mut Machine) -> bool {
    let deck = machine.context_mut();
    deck.volume = deck.volume.saturating_sub(1);
    true
}

fn build() -> Result<Machine, rulechart_core::ConfigError<Player, Key>> {
    use Key::*;
    use Player::*;

    let mut machine = Machine::new(Off, Deck::default());
    machine.on_event(Off, Power, Stopped, None)?;

    machine.on_enter(Powered, action!(power_on))?;
    machine.on_exit(Powered, action!(power_off))?;
    machine.on_event(Powered, Power, Off, None)?;

    machine.inherit(Stopped, Powered)?;
    machine.on_event(Stopped, Load, Stopped, Some(action!(load_track)))?;
    machine.on_event(Stopped, Play, Playing, Some(action!(has_track)))?;

    machine.inherit(Playing, Powered)?;
    machine.on_enter(Playing, action!(spin_up))?;
    machine.on_exit(Playing, action!(spin_down))?;
    machine.on_event(Playing, Stop, Stopped, None)?;
    machine.on_event(Playing, VolumeUp, Playing, Some(action!(louder)))?;
    machine.on_event(Playing, VolumeDown, Playing, Some(action!(quieter)))?;
    machine.block(Playing, Load)?;

    machine.finalize()?;
    Ok(machine)
}

fn main() -> Result<(), rulechart_core::ConfigError<Player, Key>> {
    let mut machine = build()?;
    let script = [
        Key::Power,
        Key::Play,
        Key::Load,
        Key::Play,
        Key::Load,
        Key::VolumeUp,
        Key::VolumeUp,
        Key::Stop,
        Key::VolumeDown,
        Key::Power,
    ];
    for key in script {
        println!("{key:?} in {:?}", machine.current_state());
        let result = machine.handle(key);
        println!(
            "  -> {result:?}, now {:?} (in Powered: {}, volume {})",
            machine.current_state(),
            machine.in_state(Player::Powered),
            machine.context().volume
        );
    }
    Ok(())
}
