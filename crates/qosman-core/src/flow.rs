// ── Flow allocation engine ──
//
// Builds the full mesh of unidirectional flows inside each virtual-link
// group, steering traffic into the queue the QoS engine assigned to the
// destination interface.

use std::sync::Arc;

use qosman_api::models::{FlowRequest, FlowServer};
use tracing::{debug, info, warn};

use crate::agent::ConnectivityAgent;
use crate::config::FlowSettings;
use crate::error::CoreError;
use crate::model::{Flow, FlowAllocation, HostMap, Server, ServerFlows, find_interface};
use crate::removal::RemovalReport;

pub struct FlowHandler<A> {
    agent: Arc<A>,
    settings: FlowSettings,
}

impl<A: ConnectivityAgent> FlowHandler<A> {
    pub fn new(agent: Arc<A>, settings: FlowSettings) -> Self {
        Self { agent, settings }
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Compile one batch per source endpoint.
    ///
    /// For every group member found in `servers`, a flow is built towards
    /// each other member IP of the same group. Destinations missing from
    /// `servers` or without a queue are skipped with a warning; servers
    /// missing from `hosts` abort with `UnresolvedServer`.
    pub fn compile_flows(
        &self,
        hosts: &HostMap,
        servers: &[Server],
        allocation: &FlowAllocation,
    ) -> Result<Vec<ServerFlows>, CoreError> {
        let mut batches = Vec::new();

        for vlr in allocation.vlrs() {
            let ips = allocation.ips_for(vlr);
            for reference in allocation.references_for(vlr) {
                for source in servers.iter().filter(|s| s.name == reference.hostname) {
                    if !source.has_interface(&reference.ip) {
                        warn!(vlr, server = %source.name, ip = %reference.ip, "source interface not on server");
                        continue;
                    }
                    let hypervisor_id = hosts.resolve(&source.name)?.to_owned();

                    let mut flows = Vec::new();
                    for &dest_ip in ips.iter().filter(|ip| **ip != reference.ip) {
                        let Some((dest, dest_iface)) = find_interface(servers, dest_ip) else {
                            warn!(vlr, ip = dest_ip, "destination not among allocated servers");
                            continue;
                        };
                        let Some(dest_queue) = dest_iface.queue_number() else {
                            warn!(vlr, server = %dest.name, ip = dest_ip, "destination has no QoS queue");
                            continue;
                        };
                        flows.push(Flow {
                            src_ip: reference.ip.clone(),
                            dest_ip: dest_ip.to_owned(),
                            dest_hypervisor: hosts.resolve(&dest.name)?.to_owned(),
                            dest_ovs_port: dest_iface.ovs_port_number,
                            dest_queue,
                            protocol: self.settings.protocol.clone(),
                            priority: self.settings.priority,
                        });
                    }

                    if !flows.is_empty() {
                        batches.push(ServerFlows {
                            hypervisor_id,
                            server_name: source.name.clone(),
                            flows,
                        });
                    }
                }
            }
        }
        Ok(batches)
    }

    /// Compile and submit all flows in a single batch.
    pub async fn create_flows(
        &self,
        hosts: &HostMap,
        servers: &[Server],
        allocation: &FlowAllocation,
        request_id: &str,
    ) -> Result<Vec<ServerFlows>, CoreError> {
        info!(request_id, vlrs = allocation.vlrs().count(), "creating flows");
        let batches = self.compile_flows(hosts, servers, allocation)?;
        if batches.is_empty() {
            info!(request_id, "no flows to install");
            return Ok(batches);
        }

        let request = FlowRequest::new(batches.iter().map(FlowServer::from).collect());
        debug!(request_id, ?request, "flow request");
        let response = self.agent.set_flow(&request).await?;
        debug!(request_id, echoed = response.flow_count(), "flow response");

        info!(request_id, flows = request.flow_count(), "flows created");
        Ok(batches)
    }

    /// Delete flows sourced at every interface of every server whose name
    /// contains one of `server_ids`. Failures are recorded and skipped.
    pub async fn remove_flows(
        &self,
        hosts: &HostMap,
        server_ids: &[String],
        servers: &[Server],
        request_id: &str,
    ) -> RemovalReport {
        info!(request_id, targets = ?server_ids, "removing flows");
        let protocol = self.settings.protocol.as_str();
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
                report.record_attempt();
                match self.agent.delete_flow(hypervisor, protocol, &iface.ip).await {
                    Ok(()) => debug!(request_id, hypervisor, ip = %iface.ip, "flows deleted"),
                    Err(e) => {
                        warn!(request_id, hypervisor, ip = %iface.ip, error = %e, "flow deletion failed");
                        report.record_failure(&server.name, &iface.ip, e);
                    }
                }
            }
        }

        info!(
            request_id,
            attempted = report.attempted,
            failed = report.failures.len(),
            "flow removal done"
        );
        report
    }
}
