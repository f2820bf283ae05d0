//! CLI command handlers, one file per command.

mod check;
mod config;
mod fetch;

pub use check::run_check;
pub use config::run_config;
pub use fetch::run_fetch;

#[cfg(test)]
pub(crate) use fetch::{parse_url_list, validate_url};
