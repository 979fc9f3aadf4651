// ── QosManager facade ──
//
// Ties the QoS and flow engines to one agent: allocation runs queues first
// and flows second, release refreshes the agent's view of the targeted
// servers before tearing them down.

use std::sync::Arc;

use qosman_api::transport::{TlsMode, TransportConfig};
use qosman_api::AgentClient;
use serde::Serialize;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::agent::ConnectivityAgent;
use crate::config::{FlowSettings, ManagerConfig, TlsVerification};
use crate::error::CoreError;
use crate::flow::FlowHandler;
use crate::model::{AllocationPlan, HostMap, Server, ServerFlows, VnfRecord};
use crate::qos::QosHandler;
use crate::removal::{RemovalReport, RemoveQosTask};

/// Result of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationOutcome {
    /// Merged server snapshots, with the newly assigned queues.
    pub servers: Vec<Server>,
    /// Flow batches submitted to the agent.
    pub flows: Vec<ServerFlows>,
}

/// Entry point for allocating and releasing QoS for deployments.
///
/// Cheaply cloneable; clones share the agent and the background task
/// tracker. Holds no per-request state, so concurrent calls are safe.
pub struct QosManager<A: ConnectivityAgent = AgentClient> {
    inner: Arc<ManagerInner<A>>,
}

struct ManagerInner<A> {
    agent: Arc<A>,
    qos: QosHandler<A>,
    flows: FlowHandler<A>,
    releases: TaskTracker,
}

impl<A: ConnectivityAgent> Clone for QosManager<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl QosManager<AgentClient> {
    /// Build a manager talking HTTP to the agent described by `config`.
    pub fn from_config(config: &ManagerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: config.timeout,
            api_token: config.api_token.clone(),
        };
        let client = AgentClient::new(config.url.clone(), &transport)?;
        Ok(Self::new(Arc::new(client), config.flows.clone()))
    }
}

impl<A: ConnectivityAgent> QosManager<A> {
    pub fn new(agent: Arc<A>, settings: FlowSettings) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                qos: QosHandler::new(Arc::clone(&agent)),
                flows: FlowHandler::new(Arc::clone(&agent), settings),
                agent,
                releases: TaskTracker::new(),
            }),
        }
    }

    pub fn agent(&self) -> &A {
        &self.inner.agent
    }

    pub fn qos(&self) -> &QosHandler<A> {
        &self.inner.qos
    }

    pub fn flows(&self) -> &FlowHandler<A> {
        &self.inner.flows
    }

    /// Current server -> hypervisor map as the agent sees it.
    pub async fn hosts(&self) -> Result<HostMap, CoreError> {
        let membership = self.inner.agent.get_hosts().await?;
        Ok(membership.into())
    }

    /// Fresh snapshot of one server.
    pub async fn server(&self, hypervisor: &str, server_name: &str) -> Result<Server, CoreError> {
        let snapshot = self.inner.agent.get_server_data(hypervisor, server_name).await?;
        Ok(snapshot.into())
    }

    /// Create the plan's queues, then the flows that point at them.
    pub async fn allocate(
        &self,
        hosts: &HostMap,
        plan: &AllocationPlan,
    ) -> Result<AllocationOutcome, CoreError> {
        plan.validate()?;
        let request_id = plan.request_id.as_str();
        let servers = self.inner.qos.create_queues(hosts, &plan.qos, request_id).await?;
        let flows = self
            .inner
            .flows
            .create_flows(hosts, &servers, &plan.flows, request_id)
            .await?;
        info!(request_id, servers = servers.len(), batches = flows.len(), "allocation complete");
        Ok(AllocationOutcome { servers, flows })
    }

    /// Remove queues and flows of every server whose name contains one of
    /// `server_ids`.
    ///
    /// The host map is refreshed from the agent; failing that is the only
    /// hard error. Everything after is best-effort and lands in the report.
    pub async fn release(
        &self,
        server_ids: &[String],
        request_id: &str,
    ) -> Result<RemovalReport, CoreError> {
        let hosts = self.hosts().await?;
        let mut report = RemovalReport::new();

        let mut servers = Vec::new();
        for (name, hypervisor) in hosts.matching(server_ids) {
            match self.inner.agent.get_server_data(hypervisor, name).await {
                Ok(snapshot) => servers.push(Server::from(snapshot)),
                Err(e) => {
                    warn!(request_id, server = name, hypervisor, error = %e, "could not fetch server");
                    report.record_failure(name, name, e);
                }
            }
        }
        if servers.is_empty() {
            info!(request_id, targets = ?server_ids, "no matching servers on the agent");
        }

        report.merge(
            self.inner
                .qos
                .remove_qos(&hosts, &servers, server_ids, request_id)
                .await,
        );
        report.merge(
            self.inner
                .flows
                .remove_flows(&hosts, server_ids, &servers, request_id)
                .await,
        );
        Ok(report)
    }

    /// Start a detached removal for a deployment's records.
    ///
    /// Returns immediately; use [`wait_for_releases`](Self::wait_for_releases)
    /// to drain outstanding removals before shutdown.
    pub fn spawn_release(&self, records: Vec<VnfRecord>, request_id: impl Into<String>) {
        RemoveQosTask::new(self.clone(), records, request_id).spawn(&self.inner.releases);
    }

    /// Number of detached removals still running.
    pub fn pending_releases(&self) -> usize {
        self.inner.releases.len()
    }

    /// Wait until no detached removal is running.
    ///
    /// The tracker stays closed afterwards; removals spawned later are still
    /// tracked and a later call waits for them too. Any number of callers
    /// may wait at once.
    pub async fn wait_for_releases(&self) {
        self.inner.releases.close();
        self.inner.releases.wait().await;
    }
}
