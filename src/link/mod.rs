//! BLE link supervisor built on the rule engine.
//!
//! One engine tracks which role the radio is in (peripheral advertising or
//! connected, central scanning, connecting or connected, idle). Radio
//! callbacks and user commands arrive as [`LinkEvent`]s; enter, exit and
//! event actions drive a [`LinkRadio`] and queue [`LinkNotice`]s for the
//! application layer.

mod agent;
mod radio;

pub use agent::LinkAgent;
pub use radio::{LinkRadio, SimulatedRadio};

use rulechart_core::prelude::*;
use rulechart_core::{ConfigError, Names};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LinkState {
    PeripheralAdvertising,
    PeripheralConnected,
    CentralScanning,
    CentralConnecting,
    CentralConnected,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LinkEvent {
    PeripheralAdvertisingStopped,
    PeripheralConnectionFailed,
    PeripheralDisconnected,
    PeripheralConnected,
    AdvertiseCommand,
    ScanCommand,
    ConnectCommand,
    CentralConnected,
    CentralConnectionFailed,
    CentralDisconnected,
    ScanComplete,
}

/// Notifications for the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkNotice {
    AdvertisingStarted,
    AdvertisingStopped,
    PeripheralConnected,
    PeripheralDisconnected,
    ScanStarted,
    ScanStopped,
    CentralConnected,
    CentralDisconnected,
}

/// Role the link starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Central,
    Peripheral,
}

pub struct LinkContext {
    pub radio: Box<dyn LinkRadio + Send>,
    pub notices: Vec<LinkNotice>,
}

pub struct LinkModel;

impl Model for LinkModel {
    type State = LinkState;
    type Event = LinkEvent;
    type Context = LinkContext;
}

pub type LinkMachine = Engine<LinkModel, 24>;

pub type LinkConfigError = ConfigError<LinkState, LinkEvent>;

pub const LINK_NAMES: Names<LinkModel> = Names::new(
    &[
        (LinkState::PeripheralAdvertising, "BLE_STATE_PERIPHERAL_ADVERTISING"),
        (LinkState::PeripheralConnected, "BLE_STATE_PERIPHERAL_CONNECTED"),
        (LinkState::CentralScanning, "BLE_STATE_CENTRAL_SCANNING"),
        (LinkState::CentralConnecting, "BLE_STATE_CENTRAL_CONNECTING"),
        (LinkState::CentralConnected, "BLE_STATE_CENTRAL_CONNECTED"),
        (LinkState::Idle, "BLE_STATE_IDLE"),
    ],
    &[
        (LinkEvent::PeripheralAdvertisingStopped, "BLE_SM_EVT_PERIPHERAL_ADV_STOPPED"),
        (LinkEvent::PeripheralConnectionFailed, "BLE_SM_EVT_PERIPHERAL_CONNECTION_FAIL"),
        (LinkEvent::PeripheralDisconnected, "BLE_SM_EVT_PERIPHERAL_DISCONNECTED"),
        (LinkEvent::PeripheralConnected, "BLE_SM_EVT_PERIPHERAL_CONNECTED"),
        (LinkEvent::AdvertiseCommand, "BLE_SM_EVT_PERIPHERAL_LEADV_CMD"),
        (LinkEvent::ScanCommand, "BLE_SM_EVT_CENTRAL_LESCAN_CMD"),
        (LinkEvent::ConnectCommand, "BLE_SM_EVT_CENTRAL_LECONN_CMD"),
        (LinkEvent::CentralConnected, "BLE_SM_EVT_CENTRAL_CONNECTED"),
        (LinkEvent::CentralConnectionFailed, "BLE_SM_EVT_CENTRAL_CONNECTION_FAIL"),
        (LinkEvent::CentralDisconnected, "BLE_SM_EVT_CENTRAL_DISCONNECTED"),
        (LinkEvent::ScanComplete, "BLE_SM_EVT_CENTRAL_SCANNED"),
    ],
);

fn notify(machine: &mut LinkMachine, notice: LinkNotice) {
    debug!(?notice, "queued link notice");
    machine.context_mut().notices.push(notice);
}

fn start_advertising(machine: &mut LinkMachine) -> bool {
    if !machine.context_mut().radio.set_advertising(true) {
        return false;
    }
    notify(machine, LinkNotice::AdvertisingStarted);
    true
}

fn peripheral_connected(machine: &mut LinkMachine) {
    notify(machine, LinkNotice::AdvertisingStopped);
    notify(machine, LinkNotice::PeripheralConnected);
}

fn peripheral_disconnected(machine: &mut LinkMachine) {
    notify(machine, LinkNotice::PeripheralDisconnected);
}

fn start_scanning(machine: &mut LinkMachine) {
    let radio = &mut machine.context_mut().radio;
    if !radio.is_scanning() {
        radio.set_scanning(true);
    }
    notify(machine, LinkNotice::ScanStarted);
}

fn scanning_stopped(machine: &mut LinkMachine) {
    notify(machine, LinkNotice::ScanStopped);
}

fn central_connected(machine: &mut LinkMachine) {
    notify(machine, LinkNotice::CentralConnected);
}

fn central_disconnected(machine: &mut LinkMachine) {
    notify(machine, LinkNotice::CentralDisconnected);
}

/// Builds and finalizes the link rule table, starting in `role`'s initial
/// state. The starting state is not entered; see [`start`].
pub fn build(role: Role, radio: Box<dyn LinkRadio + Send>) -> Result<LinkMachine, LinkConfigError> {
    use LinkEvent as E;
    use LinkState as S;

    let initial = match role {
        Role::Central => S::CentralScanning,
        Role::Peripheral => S::PeripheralAdvertising,
    };
    let mut m = LinkMachine::new(
        initial,
        LinkContext {
            radio,
            notices: Vec::new(),
        },
    )
    .with_names(LINK_NAMES);
    m.enable_decode("BLE");

    m.block(S::PeripheralAdvertising, E::PeripheralConnectionFailed)?;
    m.on_event(S::PeripheralAdvertising, E::PeripheralConnected, S::PeripheralConnected, None)?;
    m.on_event(S::PeripheralAdvertising, E::ScanCommand, S::CentralScanning, None)?;

    m.on_event(
        S::PeripheralConnected,
        E::PeripheralDisconnected,
        S::PeripheralAdvertising,
        Some(action!(start_advertising)),
    )?;
    m.on_enter(S::PeripheralConnected, action!(peripheral_connected))?;
    m.on_exit(S::PeripheralConnected, action!(peripheral_disconnected))?;

    m.on_event(S::CentralScanning, E::ScanComplete, S::Idle, None)?;
    m.on_event(
        S::CentralScanning,
        E::AdvertiseCommand,
        S::PeripheralAdvertising,
        Some(action!(start_advertising)),
    )?;
    m.on_enter(S::CentralScanning, action!(start_scanning))?;
    m.on_exit(S::CentralScanning, action!(scanning_stopped))?;

    m.on_event(S::CentralConnecting, E::CentralConnectionFailed, S::Idle, None)?;
    m.on_event(S::CentralConnecting, E::CentralConnected, S::CentralConnected, None)?;

    m.on_event(S::CentralConnected, E::CentralDisconnected, S::Idle, None)?;
    m.on_enter(S::CentralConnected, action!(central_connected))?;
    m.on_exit(S::CentralConnected, action!(central_disconnected))?;

    m.on_event(S::Idle, E::ScanCommand, S::CentralScanning, None)?;
    m.on_event(S::Idle, E::ConnectCommand, S::CentralConnecting, None)?;
    m.on_event(
        S::Idle,
        E::AdvertiseCommand,
        S::PeripheralAdvertising,
        Some(action!(start_advertising)),
    )?;

    m.finalize()?;
    Ok(m)
}

/// Turns the radio on for the machine's starting role and queues the first
/// notice.
pub fn start(machine: &mut LinkMachine) -> anyhow::Result<()> {
    match machine.current_state() {
        LinkState::CentralScanning => {
            anyhow::ensure!(
                machine.context_mut().radio.set_scanning(true),
                "radio refused to start scanning"
            );
            notify(machine, LinkNotice::ScanStarted);
        }
        LinkState::PeripheralAdvertising => {
            anyhow::ensure!(
                machine.context_mut().radio.set_advertising(true),
                "radio refused to start advertising"
            );
            notify(machine, LinkNotice::AdvertisingStarted);
        }
        state => anyhow::bail!("link cannot start from {state:?}"),
    }
    Ok(())
}
