//! CLI error types.

use fab_topology::TopologyError;

/// CLI-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Topology resolution, resource fetch or rendering failed.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// Snapshot could not be decoded.
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
