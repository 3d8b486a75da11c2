//! Error types for topology resolution and rendering.

/// Errors that abort a topology command.
///
/// None of these are recovered internally: each one ends the current
/// command with a non-zero exit.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// A required deployment or one of its expected arguments is absent.
    #[error("config extraction failed: {0}")]
    ConfigExtraction(String),

    /// A record could not be retrieved from the resource store.
    #[error("failed to fetch {kind} {name}: {message}")]
    ResourceFetch {
        /// Record kind (deployment, node, community, cluster).
        kind: &'static str,
        /// Record name, or `*` for list operations.
        name: String,
        /// Underlying failure.
        message: String,
    },

    /// A node or edge was rejected, or the layout engine failed.
    #[error("graph construction failed: {0}")]
    GraphConstruction(String),

    /// A label query could not be parsed.
    #[error("invalid label selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The offending selector text.
        selector: String,
        /// Why it was rejected.
        reason: String,
    },

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TopologyError {
    /// Shorthand for a `ResourceFetch` error.
    pub fn fetch(kind: &'static str, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceFetch {
            kind,
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TopologyError>;
