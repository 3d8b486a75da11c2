//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fab_topology::render::{DEFAULT_ENGINE, DEFAULT_LAYOUT};
use fab_topology::RenderFormat;

/// fabctl - diagnostics for FabEdge edge networking.
#[derive(Parser, Debug, Clone)]
#[command(name = "fabctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON snapshot of the cluster's resources.
    #[arg(short, long, env = "FABCTL_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Namespace FabEdge is installed in.
    #[arg(short, long, env = "FABCTL_NAMESPACE", default_value = "fabedge", global = true)]
    pub namespace: String,

    /// Report output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Report output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the network topology of the current cluster.
    #[command(after_help = "Examples:\n  fabctl topology network.svg\n  fabctl topology -l dot -o dot network.dot")]
    Topology(TopologyArgs),

    /// Show network information about edge nodes.
    Edges(EdgesArgs),

    /// Show network information about nodes.
    Nodes(NodesArgs),

    /// Show information related to FabEdge of a cluster.
    ClusterInfo,
}

/// Arguments for the topology command.
#[derive(Args, Debug, Clone)]
pub struct TopologyArgs {
    /// File to write; standard output when omitted.
    pub filename: Option<PathBuf>,

    /// Diagram format.
    #[arg(short = 'o', long = "output", default_value_t = RenderFormat::Svg, value_parser = parse_render_format)]
    pub output: RenderFormat,

    /// Graphviz layout engine, see https://graphviz.org/docs/layouts/.
    #[arg(short, long, default_value = DEFAULT_LAYOUT)]
    pub layout: String,

    /// Graphviz executable used for laid-out formats.
    #[arg(long, env = "FABCTL_GRAPHVIZ", default_value = DEFAULT_ENGINE)]
    pub graphviz: PathBuf,
}

/// Arguments for the edges command.
#[derive(Args, Debug, Clone)]
pub struct EdgesArgs {
    /// Edge nodes to show; all edge nodes when omitted.
    pub nodes: Vec<String>,
}

/// Arguments for the nodes command.
#[derive(Args, Debug, Clone)]
pub struct NodesArgs {
    /// Nodes to show; selector-matched nodes when omitted.
    pub nodes: Vec<String>,

    /// Label query, supports '=', '==' and '!=' (e.g. -l key1=value1,key2=value2).
    /// Ignored when node names are given.
    #[arg(short = 'l', long, default_value = "")]
    pub selector: String,

    /// Show edge nodes only. Overrides the selector.
    #[arg(short, long)]
    pub edge_only: bool,
}

fn parse_render_format(value: &str) -> Result<RenderFormat, String> {
    value.parse()
}
