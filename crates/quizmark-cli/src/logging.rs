//! Log output setup.
//!
//! Library crates log through the `log` facade. The subscriber installed
//! here also captures those records and writes everything to stderr, so
//! stdout carries only reports.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence when set.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("warning: logging already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0, false), "warn");
        assert_eq!(default_directive(1, false), "debug");
        assert_eq!(default_directive(5, false), "trace");
        assert_eq!(default_directive(2, true), "error");
    }
}
