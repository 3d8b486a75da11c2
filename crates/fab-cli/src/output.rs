//! Output formatting for report commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use fab_topology::ClusterInfo;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as human-readable text.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Network facts of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    /// Node name.
    pub name: String,
    /// Public addresses of the node's endpoint.
    pub public_addresses: Vec<String>,
    /// Node subnets.
    pub node_subnets: Vec<String>,
    /// Pod CIDRs from the node spec; only reported by `nodes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_pod_cidrs: Option<Vec<String>>,
    /// Pod CIDRs as seen by the CNI strategy.
    pub pod_cidrs: Vec<String>,
    /// Communities the endpoint belongs to.
    pub communities: Vec<String>,
    /// Endpoints sharing a community.
    pub peers: Vec<String>,
}

impl TableDisplay for NodeReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer)?;
        writeln!(writer, "Name:             {}", self.name)?;
        writeln!(writer, "Public Addresses: {}", self.public_addresses.join(","))?;
        writeln!(writer, "Node Subnets:     {}", self.node_subnets.join(","))?;
        match &self.spec_pod_cidrs {
            Some(spec) => {
                writeln!(writer, "PodCIDRs:         {}", spec.join(","))?;
                writeln!(writer, "EdgePodCIDRs:     {}", self.pod_cidrs.join(","))?;
            }
            None => writeln!(writer, "PodCIDRs:         {}", self.pod_cidrs.join(","))?,
        }
        writeln!(writer, "Communities:      {}", self.communities.join(","))?;
        writeln!(writer, "Peers:            {}", self.peers.join(","))?;
        Ok(())
    }
}

/// Reports for several nodes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeReportList {
    /// One report per node.
    pub nodes: Vec<NodeReport>,
}

impl TableDisplay for NodeReportList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.nodes.is_empty() {
            writeln!(writer, "No nodes found")?;
            return Ok(());
        }
        for node in &self.nodes {
            node.write_table(writer)?;
        }
        Ok(())
    }
}

impl TableDisplay for ClusterInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer)?;
        writeln!(writer, "Name:                       {}", self.name)?;
        writeln!(writer, "Role:                       {}", self.role)?;
        writeln!(writer, "Region:                     {}", self.region)?;
        writeln!(writer, "Zone:                       {}", self.zone)?;
        writeln!(writer, "CNI Type:                   {}", self.cni_type)?;
        writeln!(writer, "EdgePodCIDR:                {}", self.edge_pod_cidr)?;
        writeln!(writer, "Connector Public Addresses: {}", self.connector_public_addresses)?;
        writeln!(writer, "Connector Subnets:          {}", self.connector_subnets)?;
        Ok(())
    }
}
