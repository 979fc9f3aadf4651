// ── Connectivity agent seam ──
//
// The engines only ever talk to the agent through this trait, so tests can
// swap in a recording fake and callers can wrap the HTTP client.

use std::future::Future;

use qosman_api::AgentClient;
use qosman_api::models::{AgentServer, FlowRequest, HostMembership, QosAddRequest};

/// Operations the QoS and flow engines need from the connectivity agent.
///
/// Speaks wire types; conversion to the domain model happens in the engines.
pub trait ConnectivityAgent: Send + Sync + 'static {
    fn get_hosts(&self) -> impl Future<Output = Result<HostMembership, qosman_api::Error>> + Send;

    fn get_server_data(
        &self,
        hypervisor: &str,
        server_name: &str,
    ) -> impl Future<Output = Result<AgentServer, qosman_api::Error>> + Send;

    fn set_qos(
        &self,
        request: &QosAddRequest,
    ) -> impl Future<Output = Result<QosAddRequest, qosman_api::Error>> + Send;

    fn del_qos(
        &self,
        hypervisor: &str,
        qos_uuid: &str,
    ) -> impl Future<Output = Result<(), qosman_api::Error>> + Send;

    fn set_flow(
        &self,
        request: &FlowRequest,
    ) -> impl Future<Output = Result<FlowRequest, qosman_api::Error>> + Send;

    fn delete_flow(
        &self,
        hypervisor: &str,
        protocol: &str,
        src_ip: &str,
    ) -> impl Future<Output = Result<(), qosman_api::Error>> + Send;
}

impl ConnectivityAgent for AgentClient {
    async fn get_hosts(&self) -> Result<HostMembership, qosman_api::Error> {
        AgentClient::get_hosts(self).await
    }

    async fn get_server_data(
        &self,
        hypervisor: &str,
        server_name: &str,
    ) -> Result<AgentServer, qosman_api::Error> {
        AgentClient::get_server_data(self, hypervisor, server_name).await
    }

    async fn set_qos(&self, request: &QosAddRequest) -> Result<QosAddRequest, qosman_api::Error> {
        AgentClient::set_qos(self, request).await
    }

    async fn del_qos(&self, hypervisor: &str, qos_uuid: &str) -> Result<(), qosman_api::Error> {
        AgentClient::del_qos(self, hypervisor, qos_uuid).await
    }

    async fn set_flow(&self, request: &FlowRequest) -> Result<FlowRequest, qosman_api::Error> {
        AgentClient::set_flow(self, request).await
    }

    async fn delete_flow(
        &self,
        hypervisor: &str,
        protocol: &str,
        src_ip: &str,
    ) -> Result<(), qosman_api::Error> {
        AgentClient::delete_flow(self, hypervisor, protocol, src_ip).await
    }
}
