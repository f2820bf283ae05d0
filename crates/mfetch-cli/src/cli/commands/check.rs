//! `mfetch check` – confirm libcurl is usable.

use anyhow::Result;
use mfetch_core::transfer;

pub fn run_check() -> Result<()> {
    transfer::check_environment()?;
    println!("ok: {}", transfer::version_info());
    Ok(())
}
