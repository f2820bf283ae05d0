//! Per-request transport options and the layering rules between them.
//!
//! Options come in two layers: engine-wide defaults and per-call overrides.
//! A per-call value replaces the default for that field (header lists are
//! replaced as a whole, not appended). After merging, two settings are
//! enforced: redirects are followed unless explicitly disabled, and the body
//! is always buffered in memory because the handler receives it whole.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User agent sent when the engine falls back to its baseline options.
pub const BASELINE_USER_AGENT: &str = "Googlebot/2.1 (+http://www.google.com/bot.html)";

/// Transport options for one request. Every field is optional; `None` means
/// "not set at this layer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Raw header lines ("Name: value"). "Name:" with no value suppresses a
    /// header libcurl would otherwise add.
    pub headers: Option<Vec<String>>,
    pub user_agent: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    /// Overall transfer timeout.
    pub timeout_secs: Option<u64>,
    pub follow_location: Option<bool>,
    pub max_redirections: Option<u32>,
    /// Prepend the response header block to the body.
    pub include_headers: Option<bool>,
    pub referer: Option<String>,
    pub cookie: Option<String>,
    /// Accept-Encoding; "" lets libcurl advertise every encoding it supports.
    pub accept_encoding: Option<String>,
    pub proxy: Option<String>,
    /// Verify TLS peer and host name (libcurl default: true).
    pub verify_tls: Option<bool>,
    /// Receive speed cap in bytes per second.
    pub max_recv_speed: Option<u64>,
    /// Always forced to `Some(true)`; kept visible so `options()` reports it.
    pub buffer_body: Option<bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The option set used when an engine is created without defaults.
    pub fn baseline() -> Self {
        Self {
            headers: Some(vec![
                "Accept: */*".to_string(),
                "Cache-Control: max-age=0".to_string(),
                "Accept-Charset: utf-8;q=0.7,*;q=0.7".to_string(),
                "Accept-Language: en-us,en;q=0.5".to_string(),
                "Pragma:".to_string(),
            ]),
            user_agent: Some(BASELINE_USER_AGENT.to_string()),
            connect_timeout_secs: Some(20),
            timeout_secs: Some(10),
            ..Self::default()
        }
        .enforced()
    }

    /// True when no field is set at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the two hard settings: follow redirects unless the caller said
    /// otherwise, and always buffer the body.
    pub fn enforced(mut self) -> Self {
        if self.follow_location.is_none() {
            self.follow_location = Some(true);
        }
        self.buffer_body = Some(true);
        self
    }

    /// Layers `overrides` on top of `self` and enforces the hard settings.
    pub fn merged_with(&self, overrides: &RequestOptions) -> RequestOptions {
        fn pick<T: Clone>(over: &Option<T>, base: &Option<T>) -> Option<T> {
            over.as_ref().or(base.as_ref()).cloned()
        }
        RequestOptions {
            headers: pick(&overrides.headers, &self.headers),
            user_agent: pick(&overrides.user_agent, &self.user_agent),
            connect_timeout_secs: pick(&overrides.connect_timeout_secs, &self.connect_timeout_secs),
            timeout_secs: pick(&overrides.timeout_secs, &self.timeout_secs),
            follow_location: pick(&overrides.follow_location, &self.follow_location),
            max_redirections: pick(&overrides.max_redirections, &self.max_redirections),
            include_headers: pick(&overrides.include_headers, &self.include_headers),
            referer: pick(&overrides.referer, &self.referer),
            cookie: pick(&overrides.cookie, &self.cookie),
            accept_encoding: pick(&overrides.accept_encoding, &self.accept_encoding),
            proxy: pick(&overrides.proxy, &self.proxy),
            verify_tls: pick(&overrides.verify_tls, &self.verify_tls),
            max_recv_speed: pick(&overrides.max_recv_speed, &self.max_recv_speed),
            buffer_body: pick(&overrides.buffer_body, &self.buffer_body),
        }
        .enforced()
    }

    pub fn header(mut self, line: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Vec::new).push(line.into());
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    pub fn follow_location(mut self, follow: bool) -> Self {
        self.follow_location = Some(follow);
        self
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
