//! Configuration error types.

/// Errors that can occur when loading, parsing, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// A value parsed fine but makes no sense for the simulation.
    #[error("invalid config: {field} {reason}")]
    Invalid {
        /// Dotted path of the offending field, e.g. `sim.logic_rate`.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}
