//! Topology command implementation.
//!
//! Collects local edge nodes and every cluster's advertised endpoints,
//! links them by connector fan-out and community membership, and renders
//! the result with Graphviz.

use std::io::Write;

use fab_topology::render::{self, RenderFormat, RenderOptions};
use fab_topology::{build_topology, EndpointFactory, TopologyGraph};
use tracing::info;

use crate::cli::TopologyArgs;
use crate::commands::load_cluster;
use crate::error::CliError;
use crate::store::ResourceStore;

/// Topology command executor.
pub struct TopologyCommand<'a, S> {
    store: &'a S,
}

impl<'a, S: ResourceStore> TopologyCommand<'a, S> {
    /// Create a new topology command.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Build the graph and render it to a file or `writer`.
    pub fn execute<W: Write>(&self, writer: &mut W, args: &TopologyArgs) -> Result<(), CliError> {
        let graph = self.build()?;
        let options = RenderOptions {
            format: args.output,
            layout: args.layout.clone(),
            engine: args.graphviz.clone(),
        };

        match &args.filename {
            None => render::render(&graph, &options, writer)?,
            Some(path) => {
                render::render_to_file(&graph, &options, path)?;
                writeln!(writer, "Topology information is written to {}.", path.display())?;
                if options.format != RenderFormat::Xdot {
                    writeln!(
                        writer,
                        "If you run `fabctl topology` on a remote computer, serve the file over http to view it, e.g.: python -m http.server 8080."
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Build the topology graph of the cluster.
    pub fn build(&self) -> Result<TopologyGraph, CliError> {
        let (config, communities) = load_cluster(self.store)?;
        let edge_nodes = self.store.list_nodes(&config.edge_selector())?;
        let clusters = self.store.list_clusters()?;

        info!(
            cluster = %config.name,
            edge_nodes = edge_nodes.len(),
            clusters = clusters.len(),
            communities = communities.len(),
            "building topology"
        );

        let endpoints = EndpointFactory::new(&config).collect(&clusters, &edge_nodes);
        Ok(build_topology(&config.name, &endpoints, &communities)?)
    }
}
