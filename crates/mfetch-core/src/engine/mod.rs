//! Bounded-concurrency fetch engine.
//!
//! Accepts any number of URLs, keeps at most `max_sessions` transfers in
//! flight, cuts each transfer off once it has received `max_bytes`, and hands
//! every admitted URL to the result handler exactly once. Everything runs on
//! the caller's thread: `submit` polls the pool while it is full and `drain`
//! polls until it is empty.

mod dispatch;
mod poll;
mod slot;


use std::time::Duration;

use crate::config::MfetchConfig;
use crate::error::EngineError;
use crate::options::RequestOptions;
use crate::transfer::{Connector, CurlConnector, ResponseInfo};

use self::slot::{SessionSlot, SlotId};

pub use self::dispatch::{FetchResult, ResultHandler};

pub const DEFAULT_MAX_SESSIONS: usize = 10;
/// 10 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Upper bound for one readiness wait in a pool-wide pass.
pub const DEFAULT_POLL_BUDGET: Duration = Duration::from_secs(1);

/// Read-only view of an active session.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub id: u64,
    pub url: &'a str,
    /// Defaults merged with the per-call options of this submission.
    pub options: &'a RequestOptions,
    pub bytes_received: u64,
}

/// The fetch engine. `H` receives results, `C` opens transfers.
pub struct Engine<H: ResultHandler, C: Connector = CurlConnector> {
    options: RequestOptions,
    max_sessions: usize,
    max_bytes: u64,
    poll_budget: Duration,
    stall_timeout: Option<Duration>,
    /// Active slots in admission order.
    slots: Vec<SessionSlot<C::Transfer>>,
    next_id: SlotId,
    connector: C,
    handler: H,
}

impl<H: ResultHandler> Engine<H, CurlConnector> {
    /// Engine over libcurl with the baseline options.
    pub fn new(handler: H) -> Self {
        Self::with_connector(handler, CurlConnector::new(), RequestOptions::new())
    }

    /// Engine over libcurl. Empty `options` select the baseline set.
    pub fn with_options(handler: H, options: RequestOptions) -> Self {
        Self::with_connector(handler, CurlConnector::new(), options)
    }

    /// Engine over libcurl configured from the config file.
    pub fn from_config(handler: H, cfg: &MfetchConfig) -> Result<Self, EngineError> {
        let mut engine = Self::with_options(handler, cfg.options.clone().unwrap_or_default());
        engine.set_max_sessions(cfg.max_sessions)?;
        engine.set_max_bytes(cfg.max_bytes)?;
        engine.set_poll_budget(Duration::from_millis(cfg.poll_budget_ms))?;
        engine.set_stall_timeout(cfg.stall_timeout_secs.map(Duration::from_secs))?;
        Ok(engine)
    }
}

impl<H: ResultHandler, C: Connector> Engine<H, C> {
    pub fn with_connector(handler: H, connector: C, options: RequestOptions) -> Self {
        let options = if options.is_empty() {
            RequestOptions::baseline()
        } else {
            options.enforced()
        };
        Self {
            options,
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_bytes: DEFAULT_MAX_BYTES,
            poll_budget: DEFAULT_POLL_BUDGET,
            stall_timeout: None,
            slots: Vec::new(),
            next_id: 0,
            connector,
            handler,
        }
    }

    /// Confirms the transport behind `C` is usable.
    pub fn check_environment() -> Result<(), EngineError> {
        C::check_environment()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn set_max_sessions(&mut self, n: usize) -> Result<(), EngineError> {
        if n == 0 {
            return Err(EngineError::invalid("max sessions must be greater than zero"));
        }
        self.max_sessions = n;
        Ok(())
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn set_max_bytes(&mut self, n: u64) -> Result<(), EngineError> {
        if n == 0 {
            return Err(EngineError::invalid("max bytes must be greater than zero"));
        }
        self.max_bytes = n;
        Ok(())
    }

    pub fn poll_budget(&self) -> Duration {
        self.poll_budget
    }

    pub fn set_poll_budget(&mut self, budget: Duration) -> Result<(), EngineError> {
        if budget.is_zero() {
            return Err(EngineError::invalid("poll budget must be greater than zero"));
        }
        self.poll_budget = budget;
        Ok(())
    }

    pub fn stall_timeout(&self) -> Option<Duration> {
        self.stall_timeout
    }

    /// `None` disables stall detection; a silent transfer then stays in the
    /// pool until the transport itself gives up.
    pub fn set_stall_timeout(&mut self, timeout: Option<Duration>) -> Result<(), EngineError> {
        if timeout.is_some_and(|t| t.is_zero()) {
            return Err(EngineError::invalid("stall timeout must be greater than zero"));
        }
        self.stall_timeout = timeout;
        Ok(())
    }

    /// Defaults applied to every future submission.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RequestOptions) {
        self.options = options.enforced();
    }

    pub fn active_sessions(&self) -> usize {
        self.slots.len()
    }

    /// Active sessions in admission order.
    pub fn sessions(&self) -> impl Iterator<Item = SessionView<'_>> {
        self.slots.iter().map(|s| SessionView {
            id: s.id,
            url: &s.url,
            options: &s.options,
            bytes_received: s.bytes_received,
        })
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Admits one URL, polling the pool first while it is full.
    pub fn submit(&mut self, url: &str, options: &RequestOptions) -> Result<(), EngineError> {
        validate_url(url)?;
        self.admit(url, options);
        Ok(())
    }

    /// Admits every URL in order. Nothing is admitted if the batch is empty
    /// or any URL is invalid.
    pub fn submit_all<I, S>(&mut self, urls: I, options: &RequestOptions) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls: Vec<S> = urls.into_iter().collect();
        if urls.is_empty() {
            return Err(EngineError::invalid("URL list is empty"));
        }
        for url in &urls {
            validate_url(url.as_ref())?;
        }
        for url in &urls {
            self.admit(url.as_ref(), options);
        }
        Ok(())
    }

    /// Polls until every admitted transfer has been dispatched.
    pub fn drain(&mut self) {
        while !self.slots.is_empty() {
            self.poll_all();
        }
    }

    fn admit(&mut self, url: &str, options: &RequestOptions) {
        while self.slots.len() >= self.max_sessions {
            self.poll_all();
        }
        let merged = self.options.merged_with(options);
        let id = self.next_id;
        self.next_id += 1;
        match self.connector.open(url, &merged) {
            Ok(transfer) => {
                tracing::debug!(slot = id, "admitted {}", url);
                self.slots.push(SessionSlot::new(id, url.to_string(), merged, transfer));
                self.advance(self.slots.len() - 1);
            }
            Err(e) => {
                tracing::warn!(slot = id, "open {} failed: {}", url, e);
                self.dispatch(FetchResult {
                    url: url.to_string(),
                    content: None,
                    info: ResponseInfo::failed(&e),
                });
            }
        }
    }
}

impl<H: ResultHandler, C: Connector> Drop for Engine<H, C> {
    fn drop(&mut self) {
        if !self.slots.is_empty() {
            tracing::debug!("engine dropped with {} active sessions", self.slots.len());
        }
        for slot in self.slots.drain(..) {
            slot.release();
        }
    }
}

fn validate_url(url: &str) -> Result<(), EngineError> {
    if url.trim().is_empty() {
        return Err(EngineError::invalid("URL is empty"));
    }
    Ok(())
}
