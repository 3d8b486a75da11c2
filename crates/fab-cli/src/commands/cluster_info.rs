//! Cluster info command implementation.

use std::io::Write;

use fab_topology::config::{OPERATOR_DEPLOYMENT, SERVICE_HUB_DEPLOYMENT};
use fab_topology::ClusterInfo;

use crate::commands::required_deployment;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::store::ResourceStore;

/// Cluster info command executor.
pub struct ClusterInfoCommand<'a, S> {
    store: &'a S,
}

impl<'a, S: ResourceStore> ClusterInfoCommand<'a, S> {
    /// Create a new cluster info command.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Execute the cluster info command.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let info = self.fetch()?;
        format.write(writer, &info)
    }

    /// Read cluster settings from the operator and service hub deployments.
    pub fn fetch(&self) -> Result<ClusterInfo, CliError> {
        let operator = required_deployment(self.store, OPERATOR_DEPLOYMENT)?;
        let service_hub = required_deployment(self.store, SERVICE_HUB_DEPLOYMENT)?;
        Ok(ClusterInfo::from_deployments(&operator, &service_hub)?)
    }
}
