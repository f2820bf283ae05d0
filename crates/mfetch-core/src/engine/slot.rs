//! One unit of concurrency: a transfer with its URL and merged options.

use std::time::{Duration, Instant};

use crate::options::RequestOptions;
use crate::transfer::{Transfer, TransferError};

pub(crate) type SlotId = u64;

/// Active entry in the pool. Owns its transfer until finalize or release.
pub(super) struct SessionSlot<T> {
    pub(super) id: SlotId,
    pub(super) url: String,
    pub(super) options: RequestOptions,
    pub(super) transfer: T,
    pub(super) bytes_received: u64,
    last_progress: Instant,
}

impl<T: Transfer> SessionSlot<T> {
    pub(super) fn new(id: SlotId, url: String, options: RequestOptions, transfer: T) -> Self {
        Self {
            id,
            url,
            options,
            transfer,
            bytes_received: 0,
            last_progress: Instant::now(),
        }
    }

    /// Calls perform while it keeps producing bytes. Stops when the transfer
    /// goes idle, finishes, or reaches `max_bytes`.
    pub(super) fn drive(&mut self, max_bytes: u64) -> Result<(), TransferError> {
        loop {
            let before = self.transfer.bytes_downloaded();
            self.transfer.perform()?;
            let now = self.transfer.bytes_downloaded();
            self.bytes_received = now;
            if now > before {
                self.last_progress = Instant::now();
            }
            if !self.transfer.is_active() || now == before || now >= max_bytes {
                return Ok(());
            }
        }
    }

    pub(super) fn stalled_for(&self, timeout: Duration) -> bool {
        self.last_progress.elapsed() >= timeout
    }

    /// Closes the transfer without dispatching a result.
    pub(super) fn release(self) {
        let closed = self.transfer.close();
        tracing::debug!(slot = self.id, "released {} after {} bytes", self.url, closed.body.len());
    }
}
