//! Build ResponseInfo from a detached Easy2 handle (getinfo + handler state).

use curl::easy::Easy2;

use super::collector::Collector;
use super::super::ResponseInfo;

/// Reads whatever libcurl knows about the transfer. Individual getinfo
/// failures leave the field at its default.
pub(super) fn collect(easy: &mut Easy2<Collector>) -> ResponseInfo {
    let effective_url = easy.effective_url().ok().flatten().map(str::to_string);
    let content_type = easy.content_type().ok().flatten().map(str::to_string);
    let primary_ip = easy
        .primary_ip()
        .ok()
        .flatten()
        .filter(|ip| !ip.is_empty())
        .map(str::to_string);
    let content_length = easy
        .content_length_download()
        .ok()
        .filter(|n| *n >= 0.0)
        .map(|n| n as u64);
    let seconds = |d: Result<std::time::Duration, curl::Error>| {
        d.map(|d| d.as_secs_f64()).unwrap_or(0.0)
    };

    ResponseInfo {
        effective_url,
        status: easy.response_code().unwrap_or(0),
        content_type,
        headers: easy.get_ref().headers.clone(),
        redirect_count: easy.redirect_count().unwrap_or(0),
        size_download: easy.get_ref().received(),
        speed_download: easy.download_speed().unwrap_or(0.0),
        content_length,
        primary_ip,
        namelookup_time: seconds(easy.namelookup_time()),
        connect_time: seconds(easy.connect_time()),
        starttransfer_time: seconds(easy.starttransfer_time()),
        total_time: seconds(easy.total_time()),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curl::easy::Handler;

    #[test]
    fn collect_on_unperformed_handle_uses_defaults() {
        let mut easy = Easy2::new(Collector::default());
        easy.get_mut().write(b"abc").unwrap();
        let info = collect(&mut easy);
        assert_eq!(info.status, 0);
        assert_eq!(info.size_download, 3);
        assert!(info.error.is_none());
        assert!(info.content_length.is_none());
    }
}
