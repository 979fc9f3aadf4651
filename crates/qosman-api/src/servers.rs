// Topology and server snapshot endpoints.

use tracing::debug;

use crate::client::AgentClient;
use crate::error::Error;
use crate::models::{AgentServer, HostMembership};

impl AgentClient {
    /// Current hypervisor -> servers membership.
    ///
    /// `GET /hosts`
    pub async fn get_hosts(&self) -> Result<HostMembership, Error> {
        let url = self.url(["hosts"])?;
        self.get(url).await
    }

    /// Interface and QoS snapshot of one server.
    ///
    /// `GET /server/{hypervisor}/{server}`
    pub async fn get_server_data(
        &self,
        hypervisor: &str,
        server_name: &str,
    ) -> Result<AgentServer, Error> {
        let url = self.url(["server", hypervisor, server_name])?;
        debug!(hypervisor, server = server_name, "fetching server data");
        self.get(url).await
    }
}
