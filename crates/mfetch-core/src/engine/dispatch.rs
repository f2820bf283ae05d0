//! Finalize slots and hand results to the caller's handler.

use serde::Serialize;

use crate::transfer::{Closed, Connector, ResponseInfo, Transfer};

use super::poll::Termination;
use super::slot::SessionSlot;
use super::Engine;

/// Outcome of one admitted URL.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    /// URL as submitted (see `info.effective_url` for the final one).
    pub url: String,
    /// Body received, possibly cut at the byte cap. `None` on transport failure.
    pub content: Option<Vec<u8>>,
    pub info: ResponseInfo,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        self.content.is_some()
    }
}

/// Receives every finished or truncated fetch exactly once.
pub trait ResultHandler {
    fn on_load(&mut self, result: FetchResult);
}

impl<F> ResultHandler for F
where
    F: FnMut(FetchResult),
{
    fn on_load(&mut self, result: FetchResult) {
        self(result)
    }
}

impl<H: ResultHandler, C: Connector> Engine<H, C> {
    /// Removes the slot, closes its transfer, then dispatches. The transfer is
    /// released before the handler runs, so a panicking handler leaks nothing.
    pub(super) fn finalize(&mut self, index: usize, termination: Termination) {
        let SessionSlot {
            id,
            url,
            transfer,
            bytes_received,
            ..
        } = self.slots.remove(index);

        let transport_error = transfer.last_error().map(ToString::to_string);
        let Closed { body, mut info } = transfer.close();

        match &termination {
            Termination::ByteCap => {
                tracing::debug!(slot = id, "{} reached byte cap at {} bytes", url, bytes_received)
            }
            Termination::Finished => {
                tracing::debug!(slot = id, "{} finished, HTTP {}", url, info.status)
            }
            Termination::DriverFailed(_) | Termination::Stalled(_) => {}
        }

        let error = transport_error
            .or_else(|| info.error.take())
            .or_else(|| termination.into_error().map(|e| e.to_string()));
        let content = match &error {
            None => Some(body),
            Some(e) => {
                tracing::warn!(slot = id, "{} failed: {}", url, e);
                None
            }
        };
        info.error = error;
        self.dispatch(FetchResult { url, content, info });
    }

    pub(super) fn dispatch(&mut self, result: FetchResult) {
        self.handler.on_load(result);
    }
}
