// In-memory agent that records every call, for engine tests.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use qosman_api::models::{
    AgentInterface, AgentQos, AgentServer, FlowRequest, HostMembership, QosAddRequest,
};

use crate::agent::ConnectivityAgent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GetHosts,
    GetServer { hypervisor: String, server: String },
    SetQos(QosAddRequest),
    DelQos { hypervisor: String, qos_uuid: String },
    SetFlow(FlowRequest),
    DeleteFlow { hypervisor: String, protocol: String, src_ip: String },
}

#[derive(Default)]
pub(crate) struct FakeAgent {
    hosts: HostMembership,
    servers: BTreeMap<(String, String), AgentServer>,
    /// qos uuids or source ips whose deletion fails
    failing: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeAgent {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a host with no server data behind it.
    pub(crate) fn with_host(mut self, hypervisor: &str, server: &str) -> Self {
        self.hosts
            .hypervisors
            .entry(hypervisor.to_owned())
            .or_default()
            .push(server.to_owned());
        self
    }

    pub(crate) fn with_server(mut self, hypervisor: &str, server: AgentServer) -> Self {
        self = self.with_host(hypervisor, &server.name);
        self.servers
            .insert((hypervisor.to_owned(), server.name.clone()), server);
        self
    }

    pub(crate) fn failing_on(mut self, target: &str) -> Self {
        self.failing.push(target.to_owned());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, target: &str) -> Result<(), qosman_api::Error> {
        if self.failing.iter().any(|t| t == target) {
            return Err(qosman_api::Error::Agent {
                status: 500,
                message: format!("cannot delete {target}"),
            });
        }
        Ok(())
    }
}

impl ConnectivityAgent for FakeAgent {
    async fn get_hosts(&self) -> Result<HostMembership, qosman_api::Error> {
        self.record(Call::GetHosts);
        Ok(self.hosts.clone())
    }

    async fn get_server_data(
        &self,
        hypervisor: &str,
        server_name: &str,
    ) -> Result<AgentServer, qosman_api::Error> {
        self.record(Call::GetServer {
            hypervisor: hypervisor.to_owned(),
            server: server_name.to_owned(),
        });
        self.servers
            .get(&(hypervisor.to_owned(), server_name.to_owned()))
            .cloned()
            .ok_or_else(|| qosman_api::Error::Agent {
                status: 404,
                message: format!("no server {server_name} on {hypervisor}"),
            })
    }

    /// Echoes the request, assigning a uuid to descriptors that lack one.
    async fn set_qos(&self, request: &QosAddRequest) -> Result<QosAddRequest, qosman_api::Error> {
        self.record(Call::SetQos(request.clone()));
        let mut response = request.clone();
        for server in &mut response.values {
            for iface in &mut server.interfaces {
                if let Some(qos) = iface.qos.as_mut().filter(|q| q.qos_uuid.is_empty()) {
                    qos.qos_uuid = format!("qos-{}", iface.ip);
                }
            }
        }
        Ok(response)
    }

    async fn del_qos(&self, hypervisor: &str, qos_uuid: &str) -> Result<(), qosman_api::Error> {
        self.record(Call::DelQos {
            hypervisor: hypervisor.to_owned(),
            qos_uuid: qos_uuid.to_owned(),
        });
        self.check(qos_uuid)
    }

    async fn set_flow(&self, request: &FlowRequest) -> Result<FlowRequest, qosman_api::Error> {
        self.record(Call::SetFlow(request.clone()));
        Ok(request.clone())
    }

    async fn delete_flow(
        &self,
        hypervisor: &str,
        protocol: &str,
        src_ip: &str,
    ) -> Result<(), qosman_api::Error> {
        self.record(Call::DeleteFlow {
            hypervisor: hypervisor.to_owned(),
            protocol: protocol.to_owned(),
            src_ip: src_ip.to_owned(),
        });
        self.check(src_ip)
    }
}

pub(crate) fn agent_server(id: &str, name: &str, interfaces: Vec<AgentInterface>) -> AgentServer {
    AgentServer {
        id: id.into(),
        name: name.into(),
        interfaces,
    }
}

/// Interface with an optional `(qos_uuid, actual_id)` descriptor and no queues.
pub(crate) fn agent_iface(ip: &str, port: u32, qos: Option<(&str, u32)>) -> AgentInterface {
    AgentInterface {
        ip: ip.into(),
        ovs_port_number: port,
        qos: qos.map(|(uuid, actual_id)| AgentQos {
            qos_uuid: uuid.into(),
            actual_id,
            queues: Vec::new(),
        }),
    }
}
