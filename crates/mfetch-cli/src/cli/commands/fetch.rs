//! `mfetch fetch <url>...` – fetch URLs in parallel and report each result.

use anyhow::{bail, Context, Result};
use mfetch_core::config::MfetchConfig;
use mfetch_core::{Engine, RequestOptions};
use std::fs;
use std::time::Duration;

use super::super::report::Reporter;
use super::super::FetchArgs;

pub fn run_fetch(cfg: &MfetchConfig, args: &FetchArgs) -> Result<()> {
    let mut urls = args.urls.clone();
    if let Some(path) = &args.input {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        urls.extend(parse_url_list(&text));
    }
    if urls.is_empty() {
        bail!("no URLs given");
    }
    for u in &urls {
        validate_url(u)?;
    }

    let reporter = Reporter::stdout(args.json, args.checksum);
    let mut engine = Engine::from_config(reporter, cfg)?;
    if let Some(n) = args.max_sessions {
        engine.set_max_sessions(n)?;
    }
    if let Some(n) = args.max_bytes {
        engine.set_max_bytes(n)?;
    }

    let per_call = per_call_options(args);
    tracing::info!(
        "fetching {} URLs with {} sessions, cap {} bytes",
        urls.len(),
        engine.max_sessions(),
        engine.max_bytes()
    );
    engine.submit_all(&urls, &per_call)?;
    engine.drain();

    let summary = engine.handler().summary();
    eprintln!("{} fetched, {} failed", summary.ok, summary.failed);
    if summary.failed > 0 {
        bail!("{} of {} fetches failed", summary.failed, summary.ok + summary.failed);
    }
    Ok(())
}

/// Options set on the command line; unset flags leave config defaults alone.
fn per_call_options(args: &FetchArgs) -> RequestOptions {
    let mut opts = RequestOptions::new();
    if !args.headers.is_empty() {
        opts.headers = Some(args.headers.clone());
    }
    if let Some(ua) = &args.user_agent {
        opts = opts.user_agent(ua.clone());
    }
    if let Some(secs) = args.timeout {
        opts = opts.timeout(Duration::from_secs(secs));
    }
    if args.no_follow {
        opts = opts.follow_location(false);
    }
    if args.include_headers {
        opts.include_headers = Some(true);
    }
    opts
}

/// URLs from a list file: one per line, blank lines and '#' comments skipped.
pub(crate) fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.split('#').next().unwrap_or("").trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accept only absolute http/https URLs.
pub(crate) fn validate_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid URL: {}", raw))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("unsupported scheme {:?} in {}", other, raw),
    }
}
