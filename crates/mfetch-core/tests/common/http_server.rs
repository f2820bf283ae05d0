//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes:
//! - `/hello`    200 with "hello world"
//! - `/big`      200 with `BIG_LEN` bytes, written in chunks
//! - `/missing`  404 with "not found"
//! - `/redirect` 302 to `/hello`
//! - `/agent`    200 echoing the request's User-Agent

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

pub const BIG_LEN: usize = 4 * 1024 * 1024;

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A URL on a port nobody listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (path, user_agent) = parse_request(request);
    match path {
        "/hello" => respond(&mut stream, "200 OK", &[], b"hello world"),
        "/missing" => respond(&mut stream, "404 Not Found", &[], b"not found"),
        "/redirect" => respond(&mut stream, "302 Found", &["Location: /hello"], b""),
        "/agent" => respond(&mut stream, "200 OK", &[], user_agent.as_bytes()),
        "/big" => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\
                 Content-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
                BIG_LEN
            );
            if stream.write_all(head.as_bytes()).is_err() {
                return;
            }
            let chunk = vec![b'b'; 64 * 1024];
            for _ in 0..BIG_LEN / chunk.len() {
                if stream.write_all(&chunk).is_err() {
                    return;
                }
            }
        }
        _ => respond(&mut stream, "404 Not Found", &[], b""),
    }
}

fn respond(stream: &mut TcpStream, status: &str, extra: &[&str], body: &[u8]) {
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for line in extra {
        head.push_str(line);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

/// Returns (path, user agent) from the request head.
fn parse_request(request: &str) -> (&str, String) {
    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let mut user_agent = String::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = value.trim().to_string();
            }
        }
    }
    (path, user_agent)
}
