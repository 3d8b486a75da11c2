//! Nodes command implementation.
//!
//! Like `edges`, but for any node, and with the raw spec pod CIDRs shown
//! next to the CNI-derived ones.

use std::io::Write;

use fab_topology::LabelSelector;

use crate::cli::NodesArgs;
use crate::commands::{fetch_named_nodes, load_cluster, node_report};
use crate::error::CliError;
use crate::output::{NodeReportList, OutputFormat};
use crate::store::ResourceStore;

/// Nodes command executor.
pub struct NodesCommand<'a, S> {
    store: &'a S,
}

impl<'a, S: ResourceStore> NodesCommand<'a, S> {
    /// Create a new nodes command.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Execute the nodes command.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &NodesArgs,
    ) -> Result<(), CliError> {
        let list = self.reports(args)?;
        format.write(writer, &list)
    }

    /// Collect reports for the requested nodes.
    pub fn reports(&self, args: &NodesArgs) -> Result<NodeReportList, CliError> {
        let (config, communities) = load_cluster(self.store)?;

        let nodes = if !args.nodes.is_empty() {
            fetch_named_nodes(self.store, &args.nodes)
        } else if args.edge_only {
            self.store.list_nodes(&config.edge_selector())?
        } else {
            let selector = LabelSelector::parse(&args.selector)?;
            self.store.list_nodes(&selector)?
        };

        Ok(NodeReportList {
            nodes: nodes
                .iter()
                .map(|node| node_report(&config, &communities, node, true))
                .collect(),
        })
    }
}
