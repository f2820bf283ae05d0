//! Poll loop: advance slots and decide when they are done.

use std::time::Duration;

use crate::transfer::{Connector, Transfer, TransferError};

use super::dispatch::ResultHandler;
use super::Engine;

/// Why a slot left the pool.
#[derive(Debug)]
pub(super) enum Termination {
    /// The transport finished the exchange (success or failure).
    Finished,
    /// perform or wait failed at the driver level.
    DriverFailed(TransferError),
    /// `max_bytes` reached; the body so far is delivered as a result.
    ByteCap,
    /// No bytes for at least the stall timeout.
    Stalled(Duration),
}

impl Termination {
    pub(super) fn into_error(self) -> Option<TransferError> {
        match self {
            Termination::DriverFailed(e) => Some(e),
            Termination::Stalled(d) => Some(TransferError::Stalled(d)),
            Termination::Finished | Termination::ByteCap => None,
        }
    }
}

impl<H: ResultHandler, C: Connector> Engine<H, C> {
    /// Drives the slot at `index` and finalizes it when a termination
    /// condition holds. Returns true if the slot was removed.
    pub(super) fn advance(&mut self, index: usize) -> bool {
        let max_bytes = self.max_bytes;
        let stall_timeout = self.stall_timeout;
        let slot = &mut self.slots[index];
        let driven = slot.drive(max_bytes);

        let termination = if !slot.transfer.is_active() {
            Some(Termination::Finished)
        } else if let Err(e) = driven {
            Some(Termination::DriverFailed(e))
        } else if slot.bytes_received >= max_bytes {
            Some(Termination::ByteCap)
        } else {
            stall_timeout
                .filter(|t| slot.stalled_for(*t))
                .map(Termination::Stalled)
        };

        match termination {
            Some(t) => {
                self.finalize(index, t);
                true
            }
            None => false,
        }
    }

    /// One pass over the pool in admission order: bounded wait, then advance.
    pub(super) fn poll_all(&mut self) {
        let budget = self.poll_budget;
        let mut i = 0;
        while i < self.slots.len() {
            if let Err(e) = self.slots[i].transfer.wait(budget) {
                self.finalize(i, Termination::DriverFailed(e));
                continue;
            }
            if !self.advance(i) {
                i += 1;
            }
        }
    }
}
