use anyhow::{Context, Result};
use rulechart_core::SendResult;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{LinkEvent, LinkMachine, LinkNotice};

/// Owns one link machine and feeds it events one at a time.
///
/// Radio callbacks and commands from any task go through the event sender;
/// notices queued by actions are forwarded after each event.
pub struct LinkAgent {
    machine: LinkMachine,
    events: mpsc::Receiver<LinkEvent>,
    notices: mpsc::UnboundedSender<LinkNotice>,
}

impl LinkAgent {
    pub fn new(
        machine: LinkMachine,
        events: mpsc::Receiver<LinkEvent>,
        notices: mpsc::UnboundedSender<LinkNotice>,
    ) -> Self {
        Self {
            machine,
            events,
            notices,
        }
    }

    /// Builds an agent with fresh channels: `capacity` bounds the event queue.
    pub fn channel(
        machine: LinkMachine,
        capacity: usize,
    ) -> (
        Self,
        mpsc::Sender<LinkEvent>,
        mpsc::UnboundedReceiver<LinkNotice>,
    ) {
        let (event_tx, event_rx) = mpsc::channel(capacity);
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        (Self::new(machine, event_rx, notice_tx), event_tx, notice_rx)
    }

    /// Runs until every event sender is dropped, then hands the machine back.
    pub async fn run(mut self) -> Result<LinkMachine> {
        info!(state = ?self.machine.current_state(), "link agent starting");
        self.forward_notices()?;

        while let Some(event) = self.events.recv().await {
            let from = self.machine.current_state();
            match self.machine.handle(event) {
                SendResult::Handled => {
                    debug!(?event, ?from, to = ?self.machine.current_state(), "event handled");
                }
                SendResult::NoMatch => {
                    debug!(?event, state = ?from, "event not applicable");
                }
                SendResult::ActionFailed => {
                    warn!(?event, state = ?from, "action failed, link rolled back");
                }
            }
            self.forward_notices()?;
        }

        info!(state = ?self.machine.current_state(), "event channel closed, link agent stopping");
        Ok(self.machine)
    }

    fn forward_notices(&mut self) -> Result<()> {
        for notice in self.machine.context_mut().notices.drain(..) {
            self.notices
                .send(notice)
                .context("link notice receiver dropped")?;
        }
        Ok(())
    }
}
