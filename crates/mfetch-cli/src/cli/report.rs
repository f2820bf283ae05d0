//! Result handler that prints each fetch as it is dispatched.

use mfetch_core::checksum::sha256_hex;
use mfetch_core::{FetchResult, ResponseInfo, ResultHandler};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub ok: usize,
    pub failed: usize,
}

/// One JSON output line.
#[derive(Serialize)]
struct ResultLine<'a> {
    url: &'a str,
    ok: bool,
    bytes: Option<usize>,
    sha256: Option<String>,
    info: &'a ResponseInfo,
}

/// Prints results to a writer and counts successes and failures.
pub struct Reporter<W: Write> {
    out: W,
    json: bool,
    checksum: bool,
    summary: Summary,
}

impl Reporter<io::Stdout> {
    pub fn stdout(json: bool, checksum: bool) -> Self {
        Self::new(io::stdout(), json, checksum)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, json: bool, checksum: bool) -> Self {
        Self {
            out,
            json,
            checksum,
            summary: Summary::default(),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&self, r: &FetchResult) -> String {
        let sha = match (&r.content, self.checksum) {
            (Some(body), true) => Some(sha256_hex(body)),
            _ => None,
        };
        if self.json {
            let line = ResultLine {
                url: &r.url,
                ok: r.is_success(),
                bytes: r.content.as_ref().map(Vec::len),
                sha256: sha,
                info: &r.info,
            };
            return serde_json::to_string(&line)
                .unwrap_or_else(|e| format!("{{\"url\":{:?},\"error\":\"{}\"}}", r.url, e));
        }
        match &r.content {
            Some(body) => {
                let mut s = format!(
                    "[{}] {} {} bytes {:.3}s",
                    r.url,
                    r.info.status,
                    body.len(),
                    r.info.total_time
                );
                if let Some(sha) = sha {
                    s.push_str(&format!(" sha256={}", sha));
                }
                s
            }
            None => format!(
                "[{}] error: {}",
                r.url,
                r.info.error.as_deref().unwrap_or("unknown transport failure")
            ),
        }
    }
}

impl<W: Write> ResultHandler for Reporter<W> {
    fn on_load(&mut self, result: FetchResult) {
        if result.is_success() {
            self.summary.ok += 1;
        } else {
            self.summary.failed += 1;
        }
        let line = self.render(&result);
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::warn!("write result for {}: {}", result.url, e);
        }
    }
}
