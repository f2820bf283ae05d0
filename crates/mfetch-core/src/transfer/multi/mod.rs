//! Curl multi backend: one Multi handle per transfer, one Easy2 handle inside.
//!
//! Each transfer owns its multi handle so the engine can advance and wait on
//! slots one at a time. Waiting uses `Multi::poll` (curl_multi_poll), which
//! sleeps for the budget even when libcurl has no socket to watch yet.

mod collector;
mod info;
mod setup;

use curl::easy::Easy2;
use curl::multi::{Easy2Handle, Multi};
use std::mem;
use std::time::Duration;

use crate::error::EngineError;
use crate::options::RequestOptions;

use self::collector::Collector;
use super::{Closed, Connector, ResponseInfo, Transfer, TransferError};

/// Opens libcurl transfers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurlConnector;

impl CurlConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for CurlConnector {
    type Transfer = CurlTransfer;

    fn open(&mut self, url: &str, options: &RequestOptions) -> Result<CurlTransfer, TransferError> {
        let mut easy = Easy2::new(Collector::default());
        setup::configure(&mut easy, url, options)?;
        let multi = Multi::new();
        let handle = multi.add2(easy)?;
        Ok(CurlTransfer {
            handle: Some(handle),
            multi,
            active: true,
            error: None,
        })
    }

    fn check_environment() -> Result<(), EngineError> {
        check_environment()
    }
}

/// Confirms libcurl is loaded and speaks HTTP.
pub fn check_environment() -> Result<(), EngineError> {
    curl::init();
    let version = curl::Version::get();
    if !version.protocols().any(|p| p.eq_ignore_ascii_case("http")) {
        return Err(EngineError::Environment(format!(
            "libcurl {} was built without HTTP support",
            version.version()
        )));
    }
    tracing::debug!("libcurl {} available", version.version());
    Ok(())
}

/// Human-readable libcurl version, e.g. "libcurl 8.5.0 (OpenSSL/3.0.13)".
pub fn version_info() -> String {
    let version = curl::Version::get();
    match version.ssl_version() {
        Some(ssl) => format!("libcurl {} ({})", version.version(), ssl),
        None => format!("libcurl {}", version.version()),
    }
}

/// One Easy2 handle registered under its own Multi handle.
pub struct CurlTransfer {
    // Declared before `multi` so the easy handle is detached first on drop.
    handle: Option<Easy2Handle<Collector>>,
    multi: Multi,
    active: bool,
    error: Option<TransferError>,
}

impl Transfer for CurlTransfer {
    fn perform(&mut self) -> Result<(), TransferError> {
        let Some(handle) = self.handle.as_ref() else {
            return Ok(());
        };
        if !self.active {
            return Ok(());
        }
        let running = self.multi.perform()?;
        let mut finished = None;
        self.multi.messages(|msg| {
            if let Some(res) = msg.result_for2(handle) {
                finished = Some(res);
            }
        });
        match finished {
            Some(Ok(())) => self.active = false,
            Some(Err(e)) => {
                self.active = false;
                self.error = Some(TransferError::Curl(e));
            }
            None if running == 0 => self.active = false,
            None => {}
        }
        Ok(())
    }

    fn wait(&mut self, budget: Duration) -> Result<(), TransferError> {
        if self.active && self.handle.is_some() {
            self.multi.poll(&mut [], budget)?;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn bytes_downloaded(&self) -> u64 {
        self.handle.as_ref().map_or(0, |h| h.get_ref().received())
    }

    fn last_error(&self) -> Option<&TransferError> {
        self.error.as_ref()
    }

    fn close(mut self) -> Closed {
        let Some(handle) = self.handle.take() else {
            return Closed::default();
        };
        match self.multi.remove2(handle) {
            Ok(mut easy) => {
                let info = info::collect(&mut easy);
                let body = mem::take(&mut easy.get_mut().body);
                Closed { body, info }
            }
            Err(e) => {
                tracing::warn!("curl multi remove: {}", e);
                Closed {
                    body: Vec::new(),
                    info: ResponseInfo::failed(&TransferError::Multi(e)),
                }
            }
        }
    }
}

impl Drop for CurlTransfer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.multi.remove2(handle) {
                tracing::warn!("curl multi remove on drop: {}", e);
            }
        }
    }
}
