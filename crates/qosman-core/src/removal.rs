// ── Removal ──
//
// Best-effort teardown bookkeeping, and the detached task that re-derives
// a deployment's QoS servers from its VNF records and releases them.

use std::fmt;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::agent::ConnectivityAgent;
use crate::error::CoreError;
use crate::extract::{dedup_servers, removal_targets};
use crate::manager::QosManager;
use crate::model::VnfRecord;

// ── RemovalReport ───────────────────────────────────────────────────

/// One deletion that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalFailure {
    pub server: String,
    /// What was being deleted: a qos uuid, a flow source ip, or the server
    /// itself when it could not be resolved or fetched.
    pub target: String,
    pub reason: String,
}

impl fmt::Display for RemovalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.server, self.target, self.reason)
    }
}

/// Outcome of a best-effort removal pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    /// Delete calls issued (successful or not).
    pub attempted: usize,
    pub failures: Vec<RemovalFailure>,
}

impl RemovalReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&mut self) {
        self.attempted += 1;
    }

    pub fn record_failure(
        &mut self,
        server: impl Into<String>,
        target: impl Into<String>,
        reason: impl fmt::Display,
    ) {
        self.failures.push(RemovalFailure {
            server: server.into(),
            target: target.into(),
            reason: reason.to_string(),
        });
    }

    pub fn merge(&mut self, other: RemovalReport) {
        self.attempted += other.attempted;
        self.failures.extend(other.failures);
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok` if nothing failed, `RemovalIncomplete` otherwise.
    pub fn into_result(self) -> Result<Self, CoreError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(CoreError::RemovalIncomplete {
                attempted: self.attempted,
                failures: self.failures,
            })
        }
    }
}

// ── RemoveQosTask ───────────────────────────────────────────────────

/// Detached teardown of one deployment's QoS state.
///
/// Has no caller to report to: outcomes are logged, never returned.
pub struct RemoveQosTask<A: ConnectivityAgent> {
    manager: QosManager<A>,
    records: Vec<VnfRecord>,
    request_id: String,
}

impl<A: ConnectivityAgent> RemoveQosTask<A> {
    pub fn new(manager: QosManager<A>, records: Vec<VnfRecord>, request_id: impl Into<String>) -> Self {
        Self {
            manager,
            records,
            request_id: request_id.into(),
        }
    }

    /// Derive the target servers and release them.
    pub async fn execute(&self) -> Result<RemovalReport, CoreError> {
        let targets = dedup_servers(&removal_targets(&self.records)?);
        if targets.is_empty() {
            info!(request_id = %self.request_id, "no servers with QoS, nothing to remove");
            return Ok(RemovalReport::new());
        }
        info!(request_id = %self.request_id, servers = ?targets, "removing QoS");
        self.manager.release(&targets, &self.request_id).await
    }

    /// Run to completion, logging the outcome.
    pub async fn run(self) {
        match self.execute().await {
            Ok(report) if report.is_complete() => {
                info!(
                    request_id = %self.request_id,
                    deletions = report.attempted,
                    "QoS removal finished"
                );
            }
            Ok(report) => {
                for failure in &report.failures {
                    warn!(request_id = %self.request_id, %failure, "removal step failed");
                }
                warn!(
                    request_id = %self.request_id,
                    attempted = report.attempted,
                    failed = report.failures.len(),
                    "QoS removal finished with failures"
                );
            }
            Err(e) => error!(request_id = %self.request_id, error = %e, "QoS removal aborted"),
        }
    }

    /// Start on `tracker`; the caller does not wait for it.
    pub fn spawn(self, tracker: &TaskTracker) -> JoinHandle<()> {
        tracker.spawn(self.run())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::FlowSettings;
    use crate::model::{Component, ConnectionPoint, DeploymentUnit, InternalVirtualLink};
    use crate::test_support::{Call, FakeAgent, agent_iface, agent_server};

    fn record(id: &str, hostname: &str) -> VnfRecord {
        VnfRecord {
            id: id.into(),
            name: id.into(),
            vdu: vec![DeploymentUnit {
                id: None,
                hostname: hostname.into(),
                vnfc: vec![Component {
                    connection_point: vec![
                        ConnectionPoint {
                            virtual_link_reference: "vl-1".into(),
                        },
                        ConnectionPoint {
                            virtual_link_reference: "vl-1".into(),
                        },
                    ],
                }],
            }],
            virtual_link: vec![InternalVirtualLink {
                name: "vl-1".into(),
                qos: vec!["minimum_bandwith:HIGH".into()],
            }],
        }
    }

    #[test]
    fn report_converts_failures_into_error() {
        let mut report = RemovalReport::new();
        report.record_attempt();
        report.record_attempt();
        assert!(report.clone().into_result().is_ok());

        report.record_failure("web-1", "qos-1", "agent said no");
        let err = report.into_result().unwrap_err();
        assert!(matches!(err, CoreError::RemovalIncomplete { attempted: 2, ref failures } if failures.len() == 1));
        assert_eq!(err.to_string(), "Removal incomplete: 1 of 2 deletions failed");
    }

    #[tokio::test]
    async fn task_releases_each_discovered_server_once() {
        let agent = Arc::new(
            FakeAgent::new()
                .with_server("hv-A", agent_server("srv-1", "s1", vec![agent_iface("10.0.0.5", 1, Some(("qos-1", 2)))]))
                .with_server("hv-B", agent_server("srv-2", "s2", vec![agent_iface("10.0.0.6", 2, Some(("qos-2", 1)))])),
        );
        let manager = QosManager::new(Arc::clone(&agent), FlowSettings::default());

        let task = RemoveQosTask::new(manager, vec![record("r1", "s1"), record("r2", "s2")], "nsr-1");
        let report = task.execute().await.unwrap();

        assert!(report.is_complete());
        // two qos deletions + two flow deletions
        assert_eq!(report.attempted, 4);
        let calls = agent.calls();
        let del_qos: Vec<&Call> = calls.iter().filter(|c| matches!(c, Call::DelQos { .. })).collect();
        assert_eq!(del_qos.len(), 2);
        assert!(calls.contains(&Call::DeleteFlow {
            hypervisor: "hv-B".into(),
            protocol: "udp".into(),
            src_ip: "10.0.0.6".into(),
        }));
    }

    #[tokio::test]
    async fn spawned_task_runs_to_completion() {
        let agent = Arc::new(FakeAgent::new().with_server(
            "hv-A",
            agent_server("srv-1", "s1", vec![agent_iface("10.0.0.5", 1, Some(("qos-1", 2)))]),
        ));
        let manager = QosManager::new(Arc::clone(&agent), FlowSettings::default());

        manager.spawn_release(vec![record("r1", "s1")], "nsr-1");
        manager.wait_for_releases().await;

        assert!(agent.calls().contains(&Call::DelQos {
            hypervisor: "hv-A".into(),
            qos_uuid: "qos-1".into(),
        }));
    }

    #[tokio::test]
    async fn records_without_qos_touch_nothing() {
        let agent = Arc::new(FakeAgent::new());
        let manager = QosManager::new(Arc::clone(&agent), FlowSettings::default());
        let mut plain = record("r1", "s1");
        plain.virtual_link[0].qos.clear();

        let report = RemoveQosTask::new(manager, vec![plain], "nsr-1").execute().await.unwrap();
        assert_eq!(report, RemovalReport::new());
        assert!(agent.calls().is_empty());
    }
}
