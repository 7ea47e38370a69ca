//! Tracing setup for the intake service.
//!
//! Output goes to stderr through `tracing-subscriber`'s formatter. The
//! filter comes from `RUST_LOG` when set, otherwise from the CLI verbosity.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// How much the binary logs, chosen by `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Accepted submissions and lifecycle events.
    #[default]
    Normal,
    /// Adds rejected submissions and store activity.
    Verbose,
    /// Everything, including axum's extractor rejections.
    Trace,
}

impl Verbosity {
    /// Resolve the command-line flags. `quiet` wins over any `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Level applied to this crate's own events.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(self) -> String {
        let crate_directive = format!("survey_intake={}", self.level());
        if self >= Self::Verbose {
            format!("{crate_directive},axum::rejection=trace")
        } else {
            crate_directive
        }
    }

    fn env_filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

/// Install the global subscriber.
///
/// Call once at startup; later calls leave the first subscriber in place.
///
/// ```no_run
/// use survey_intake::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(verbosity.env_filter())
        .with_target(verbosity >= Verbosity::Verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(false, 7), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
    }

    #[test]
    fn test_levels() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.level(), Level::INFO);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.level(), Level::TRACE);
    }

    #[test]
    fn test_directive() {
        assert_eq!(Verbosity::Normal.directive(), "survey_intake=INFO");
        assert_eq!(Verbosity::Quiet.directive(), "survey_intake=ERROR");
        assert_eq!(
            Verbosity::Verbose.directive(),
            "survey_intake=DEBUG,axum::rejection=trace"
        );
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ] {
            assert!(verbosity.directive().parse::<EnvFilter>().is_ok());
        }
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
