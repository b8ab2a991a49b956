//! CLI argument parsing using clap.

use clap::Parser;

/// netwake: network change monitor
///
/// Watches the host's network configuration and logs a line every time the
/// operating system reports a change. One synthetic event is always logged
/// immediately at startup.
#[derive(Debug, Parser)]
#[command(name = "netwake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Exit after this many logged events (the startup event counts)
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Parses arguments from the process environment.
    ///
    /// Excluded from coverage as a thin wrapper around clap.
    #[cfg(not(tarpaulin_include))]
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["netwake"]).expect("parse failed");

        assert!(cli.count.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_count_and_verbose() {
        let cli = Cli::try_parse_from(["netwake", "--count", "3", "-v"]).expect("parse failed");

        assert_eq!(cli.count, Some(3));
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_non_numeric_count() {
        let result = Cli::try_parse_from(["netwake", "--count", "lots"]);

        assert!(result.is_err());
    }
}
