//! Edges command implementation.

use std::io::Write;

use tracing::warn;

use crate::cli::EdgesArgs;
use crate::commands::{fetch_named_nodes, load_cluster, node_report};
use crate::error::CliError;
use crate::output::{NodeReportList, OutputFormat};
use crate::store::ResourceStore;

/// Edges command executor.
pub struct EdgesCommand<'a, S> {
    store: &'a S,
}

impl<'a, S: ResourceStore> EdgesCommand<'a, S> {
    /// Create a new edges command.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Execute the edges command.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &EdgesArgs,
    ) -> Result<(), CliError> {
        let list = self.reports(args)?;
        format.write(writer, &list)
    }

    /// Collect reports for the requested edge nodes.
    pub fn reports(&self, args: &EdgesArgs) -> Result<NodeReportList, CliError> {
        let (config, communities) = load_cluster(self.store)?;

        let nodes = if args.nodes.is_empty() {
            self.store.list_nodes(&config.edge_selector())?
        } else {
            let nodes = fetch_named_nodes(self.store, &args.nodes);
            for node in nodes.iter().filter(|n| !config.is_edge_node(n)) {
                warn!(node = %node.name, "node does not carry the edge labels");
            }
            nodes
        };

        Ok(NodeReportList {
            nodes: nodes
                .iter()
                .map(|node| node_report(&config, &communities, node, false))
                .collect(),
        })
    }
}
