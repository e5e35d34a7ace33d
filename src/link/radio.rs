use tracing::trace;

/// Radio operations the link machine needs from the BLE stack.
pub trait LinkRadio {
    /// Turns advertising on or off. Returns `false` if the stack refused.
    fn set_advertising(&mut self, enabled: bool) -> bool;

    /// Turns scanning on or off. Returns `false` if the stack refused.
    fn set_scanning(&mut self, enabled: bool) -> bool;

    fn is_scanning(&self) -> bool;
}

/// In-memory radio for demos and tests.
#[derive(Debug, Default, Clone)]
pub struct SimulatedRadio {
    pub advertising: bool,
    pub scanning: bool,
    pub refuse_advertising: bool,
}

impl LinkRadio for SimulatedRadio {
    fn set_advertising(&mut self, enabled: bool) -> bool {
        if enabled && self.refuse_advertising {
            trace!("simulated radio refusing to advertise");
            return false;
        }
        self.advertising = enabled;
        true
    }

    fn set_scanning(&mut self, enabled: bool) -> bool {
        self.scanning = enabled;
        true
    }

    fn is_scanning(&self) -> bool {
        self.scanning
    }
}
