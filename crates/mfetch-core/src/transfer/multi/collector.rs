//! Easy2 Handler that buffers the response body and header lines in memory.

use std::str;

/// Handler state for one transfer. Implements curl's Handler for Easy2.
#[derive(Debug, Default)]
pub struct Collector {
    pub(super) body: Vec<u8>,
    /// Header lines of the most recent response; cleared on each status line
    /// so redirects leave only the final response.
    pub(super) headers: Vec<String>,
    /// Mirrors CURLOPT_HEADER: libcurl then also passes header data to `write`.
    pub(super) headers_in_body: bool,
    header_bytes: u64,
}

impl Collector {
    /// Body bytes received so far, not counting headers mixed into `body`.
    pub(super) fn received(&self) -> u64 {
        let len = self.body.len() as u64;
        if self.headers_in_body {
            len.saturating_sub(self.header_bytes)
        } else {
            len
        }
    }
}

impl curl::easy::Handler for Collector {
    fn header(&mut self, data: &[u8]) -> bool {
        self.header_bytes += data.len() as u64;
        if let Ok(s) = str::from_utf8(data) {
            let line = s.trim_end();
            if line.starts_with("HTTP/") {
                self.headers.clear();
            }
            if !line.is_empty() {
                self.headers.push(line.to_string());
            }
        }
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        self.body.extend_from_slice(data);
        Ok(data.len())
    }
}
