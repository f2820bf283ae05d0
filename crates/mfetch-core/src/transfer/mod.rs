//! Transport abstraction used by the engine.
//!
//! A `Connector` opens one `Transfer` per admitted URL. The engine never
//! looks inside a transfer: it asks it to make non-blocking progress, to wait
//! for readiness for a bounded time, and finally closes it by value to take
//! the body and response metadata out.

mod multi;

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::error::EngineError;
use crate::options::RequestOptions;

pub use self::multi::{check_environment, version_info, CurlConnector, CurlTransfer};

/// Failure of one transfer. Recovered by the engine, never propagated.
#[derive(Debug, Error)]
pub enum TransferError {
    /// libcurl reported an error for the easy handle (timeout, DNS, TLS...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The multi driver returned something other than CURLM_OK.
    #[error("curl multi: {0}")]
    Multi(#[from] curl::MultiError),
    /// No bytes arrived within the configured stall timeout.
    #[error("no data received for {0:?}")]
    Stalled(Duration),
    #[error("{0}")]
    Other(String),
}

/// Response metadata available once a transfer has been closed. Fields the
/// transport could not provide keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseInfo {
    pub effective_url: Option<String>,
    /// HTTP status of the last response; 0 when none was received.
    pub status: u32,
    pub content_type: Option<String>,
    /// Header lines of the final response (after redirects).
    pub headers: Vec<String>,
    pub redirect_count: u32,
    /// Body bytes received, including any beyond the byte cap.
    pub size_download: u64,
    /// Average download speed in bytes per second.
    pub speed_download: f64,
    /// Content-Length announced by the server, if any.
    pub content_length: Option<u64>,
    pub primary_ip: Option<String>,
    pub namelookup_time: f64,
    pub connect_time: f64,
    pub starttransfer_time: f64,
    pub total_time: f64,
    /// Set when the transfer ended in a transport failure.
    pub error: Option<String>,
}

impl ResponseInfo {
    /// Metadata for a URL that never produced a transfer.
    pub fn failed(error: &TransferError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// What is left of a transfer after it was closed.
#[derive(Debug, Default)]
pub struct Closed {
    pub body: Vec<u8>,
    pub info: ResponseInfo,
}

/// One in-flight request/response exchange.
pub trait Transfer {
    /// Non-blocking progress. An `Err` is a driver-level failure, distinct
    /// from a transfer that finished with an error (see `last_error`).
    fn perform(&mut self) -> Result<(), TransferError>;

    /// Blocks until the transport has something to do or `budget` elapses.
    /// Reaching the budget is not an error.
    fn wait(&mut self, budget: Duration) -> Result<(), TransferError>;

    fn is_active(&self) -> bool;

    fn bytes_downloaded(&self) -> u64;

    /// Transport error of a finished exchange, if it failed.
    fn last_error(&self) -> Option<&TransferError>;

    /// Detaches and releases the transfer, returning body and metadata.
    /// A failed detach is reported in `info.error`.
    fn close(self) -> Closed;
}

/// Opens transfers for the engine.
pub trait Connector {
    type Transfer: Transfer;

    fn open(&mut self, url: &str, options: &RequestOptions)
        -> Result<Self::Transfer, TransferError>;

    /// Confirms the transport is usable in this runtime.
    fn check_environment() -> Result<(), EngineError>
    where
        Self: Sized;
}
