//! # fab-cli
//!
//! `fabctl`, a diagnostic command-line tool for FabEdge clusters.
//!
//! Provides commands for:
//! - Rendering the tunnel topology of a cluster
//! - Inspecting the network facts of edge nodes and other nodes
//! - Showing cluster-wide FabEdge settings
//!
//! # Architecture
//!
//! Commands read cluster resources through a [`store::ResourceStore`] and
//! hand them to `fab-topology`, which resolves the operator configuration,
//! builds endpoints and assembles the graph.
//!
//! ```text
//! ┌───────────┐   ResourceStore   ┌──────────────┐   render   ┌──────────┐
//! │  fab-cli  │──────────────────►│ fab-topology │───────────►│ Graphviz │
//! └───────────┘   (snapshot)      └──────────────┘            └──────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod store;

pub use cli::{Cli, Commands, EdgesArgs, Format, NodesArgs, TopologyArgs};
pub use error::CliError;
pub use output::OutputFormat;
pub use store::{ResourceStore, Snapshot, SnapshotStore};
