// OVS flow endpoints.

use tracing::debug;

use crate::client::AgentClient;
use crate::error::Error;
use crate::models::FlowRequest;

impl AgentClient {
    /// Install a batch of flows.
    ///
    /// `POST /flows`; the agent echoes the accepted batch.
    pub async fn set_flow(&self, request: &FlowRequest) -> Result<FlowRequest, Error> {
        let url = self.url(["flows"])?;
        debug!(flows = request.flow_count(), "submitting flow batch");
        self.post(url, request).await
    }

    /// Delete every flow matching (protocol, source ip) on a hypervisor.
    ///
    /// `DELETE /flow/{hypervisor}/{protocol}/{src_ip}`
    pub async fn delete_flow(
        &self,
        hypervisor: &str,
        protocol: &str,
        src_ip: &str,
    ) -> Result<(), Error> {
        let url = self.url(["flow", hypervisor, protocol, src_ip])?;
        debug!(hypervisor, protocol, src_ip, "deleting flows");
        self.delete(url).await
    }
}
