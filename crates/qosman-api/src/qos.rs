// QoS queue endpoints.

use tracing::debug;

use crate::client::AgentClient;
use crate::error::Error;
use crate::models::QosAddRequest;

impl AgentClient {
    /// Add queues to one or more servers in a single batch.
    ///
    /// `POST /qoses`; the response echoes the applied per-server state.
    pub async fn set_qos(&self, request: &QosAddRequest) -> Result<QosAddRequest, Error> {
        let url = self.url(["qoses"])?;
        debug!(servers = request.values.len(), "submitting QoS batch");
        self.post(url, request).await
    }

    /// Delete an interface's QoS descriptor together with all of its queues.
    ///
    /// `DELETE /qoses/{hypervisor}/{qos_uuid}`
    pub async fn del_qos(&self, hypervisor: &str, qos_uuid: &str) -> Result<(), Error> {
        let url = self.url(["qoses", hypervisor, qos_uuid])?;
        debug!(hypervisor, qos_uuid, "deleting QoS");
        self.delete(url).await
    }
}
