//! Apply merged `RequestOptions` to a fresh Easy2 handle.

use curl::easy::{Easy2, List};

use crate::options::RequestOptions;

use super::collector::Collector;

pub(super) fn configure(
    easy: &mut Easy2<Collector>,
    url: &str,
    options: &RequestOptions,
) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(options.follow_location.unwrap_or(true))?;
    if let Some(max) = options.max_redirections {
        easy.max_redirections(max)?;
    }
    if let Some(ua) = &options.user_agent {
        easy.useragent(ua)?;
    }
    if let Some(headers) = &options.headers {
        if !headers.is_empty() {
            let mut list = List::new();
            for line in headers {
                list.append(line.trim())?;
            }
            easy.http_headers(list)?;
        }
    }
    if let Some(t) = options.connect_timeout() {
        easy.connect_timeout(t)?;
    }
    if let Some(t) = options.total_timeout() {
        easy.timeout(t)?;
    }
    if let Some(show) = options.include_headers {
        easy.show_header(show)?;
        easy.get_mut().headers_in_body = show;
    }
    if let Some(referer) = &options.referer {
        easy.referer(referer)?;
    }
    if let Some(cookie) = &options.cookie {
        easy.cookie(cookie)?;
    }
    if let Some(enc) = &options.accept_encoding {
        easy.accept_encoding(enc)?;
    }
    if let Some(proxy) = &options.proxy {
        easy.proxy(proxy)?;
    }
    if let Some(verify) = options.verify_tls {
        easy.ssl_verify_peer(verify)?;
        easy.ssl_verify_host(verify)?;
    }
    if let Some(speed) = options.max_recv_speed {
        easy.max_recv_speed(speed)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_accepts_baseline() {
        let mut easy = Easy2::new(Collector::default());
        let opts = RequestOptions::baseline();
        configure(&mut easy, "http://127.0.0.1:1/", &opts).unwrap();
    }

    #[test]
    fn configure_accepts_every_option() {
        let mut easy = Easy2::new(Collector::default());
        let opts = RequestOptions {
            headers: Some(vec!["X-A: 1".to_string()]),
            user_agent: Some("t".to_string()),
            connect_timeout_secs: Some(1),
            timeout_secs: Some(2),
            follow_location: Some(false),
            max_redirections: Some(3),
            include_headers: Some(true),
            referer: Some("http://r/".to_string()),
            cookie: Some("a=b".to_string()),
            accept_encoding: Some(String::new()),
            proxy: Some(String::new()),
            verify_tls: Some(true),
            max_recv_speed: Some(1024),
            buffer_body: Some(true),
        };
        configure(&mut easy, "https://example.com/", &opts).unwrap();
        assert!(easy.get_ref().headers_in_body);
    }
}
