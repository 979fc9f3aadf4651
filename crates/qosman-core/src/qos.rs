// ── QoS allocation engine ──
//
// Adds one queue per requested interface on fresh server snapshots, submits
// all servers in a single batch and folds the agent's answer back in.
// Removal deletes every QoS descriptor of the targeted servers.

use std::sync::Arc;

use qosman_api::models::{AgentInterface, QosAddRequest, ServerQos};
use tracing::{debug, info, warn};

use crate::agent::ConnectivityAgent;
use crate::error::CoreError;
use crate::model::{HostMap, InterfaceQos, QosAllocation, QosReference, Quality, Server};
use crate::removal::RemovalReport;

pub struct QosHandler<A> {
    agent: Arc<A>,
}

impl<A: ConnectivityAgent> QosHandler<A> {
    pub fn new(agent: Arc<A>) -> Self {
        Self { agent }
    }

    /// Create the requested queues and return the merged server snapshots.
    ///
    /// Every server is resolved before the agent is contacted, so an unknown
    /// server aborts the request without side effects.
    pub async fn create_queues(
        &self,
        hosts: &HostMap,
        allocations: &[QosAllocation],
        request_id: &str,
    ) -> Result<Vec<Server>, CoreError> {
        info!(request_id, servers = allocations.len(), "creating QoS queues");

        let mut resolved = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let hypervisor = hosts.resolve(&allocation.server_name)?;
            resolved.push((allocation, hypervisor));
        }

        let mut servers = Vec::with_capacity(resolved.len());
        let mut values = Vec::new();
        for (allocation, hypervisor) in resolved {
            let snapshot = self
                .agent
                .get_server_data(hypervisor, &allocation.server_name)
                .await?;
            let mut server = Server::from(snapshot);
            let interfaces = compile_server_request(&mut server, &allocation.ifaces)?;
            if interfaces.is_empty() {
                warn!(
                    request_id,
                    server = %allocation.server_name,
                    "no requested interface found on server"
                );
            } else {
                values.push(ServerQos {
                    hypervisor_id: hypervisor.to_owned(),
                    server_id: server.id.clone(),
                    interfaces,
                });
            }
            servers.push(server);
        }

        if values.is_empty() {
            info!(request_id, "nothing to submit");
            return Ok(servers);
        }

        let request = QosAddRequest::new(values);
        debug!(request_id, ?request, "QoS add request");
        let response = self.agent.set_qos(&request).await?;
        debug!(request_id, ?response, "QoS add response");

        update_servers(&mut servers, &response);
        info!(request_id, servers = servers.len(), "QoS queues created");
        Ok(servers)
    }

    /// Delete the QoS descriptor of every interface of every server whose
    /// name contains one of `server_ids`. Failures are recorded and skipped.
    pub async fn remove_qos(
        &self,
        hosts: &HostMap,
        servers: &[Server],
        server_ids: &[String],
        request_id: &str,
    ) -> RemovalReport {
        info!(request_id, targets = ?server_ids, "removing QoS");
        let mut report = RemovalReport::new();

        for server in servers {
            if !server.matches_any(server_ids) {
                continue;
            }
            let hypervisor = match hosts.resolve(&server.name) {
                Ok(hv) => hv,
                Err(e) => {
                    warn!(request_id, server = %server.name, error = %e, "skipping server");
                    report.record_failure(&server.name, &server.name, e);
                    continue;
                }
            };
            for iface in &server.interfaces {
                let Some(qos) = &iface.qos else {
                    continue;
                };
                if qos.qos_uuid.is_empty() {
                    continue;
                }
                report.record_attempt();
                match self.agent.del_qos(hypervisor, &qos.qos_uuid).await {
                    Ok(()) => debug!(request_id, hypervisor, qos_uuid = %qos.qos_uuid, "QoS deleted"),
                    Err(e) => {
                        warn!(
                            request_id,
                            hypervisor,
                            qos_uuid = %qos.qos_uuid,
                            error = %e,
                            "QoS deletion failed"
                        );
                        report.record_failure(&server.name, &qos.qos_uuid, e);
                    }
                }
            }
        }

        info!(
            request_id,
            attempted = report.attempted,
            failed = report.failures.len(),
            "QoS removal done"
        );
        report
    }
}

/// Add one queue per matching reference to `server` and return the
/// touched interfaces in wire form.
///
/// Fails with `QueueIdExhausted` when an interface's counter cannot grow.
pub fn compile_server_request(
    server: &mut Server,
    refs: &[QosReference],
) -> Result<Vec<AgentInterface>, CoreError> {
    let mut touched = Vec::new();
    for iface in &mut server.interfaces {
        let qualities: Vec<Quality> = refs
            .iter()
            .filter(|r| r.ip == iface.ip)
            .map(|r| r.quality)
            .collect();
        if qualities.is_empty() {
            continue;
        }
        for quality in qualities {
            let id = iface.add_queue(quality.queue_params())?;
            debug!(server = %server.name, ip = %iface.ip, queue = id, %quality, "queue added");
        }
        touched.push(AgentInterface::from(&*iface));
    }
    Ok(touched)
}

/// Fold an agent QoS response into `servers`, matching entries by server id.
/// Servers without an entry are left unchanged.
pub fn update_servers(servers: &mut [Server], response: &QosAddRequest) {
    for server in servers {
        let Some(entry) = response.server(&server.id) else {
            continue;
        };
        let reported = entry.interfaces.iter().cloned().map(InterfaceQos::from).collect();
        server.update_interfaces(reported);
    }
}
