//! `mfetch config` – show where the config lives and what is in effect.

use anyhow::Result;
use mfetch_core::config::{self, MfetchConfig};
use std::path::Path;

pub fn run_config(explicit: Option<&Path>, cfg: &MfetchConfig) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    if cfg.options.is_none() {
        println!("# no [options] section: built-in baseline request options apply");
    }
    Ok(())
}
