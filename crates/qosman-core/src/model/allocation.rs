// ── Allocation requests ──
//
// What the orchestrator asks for: queues per server interface, and the
// full-mesh flow groups per virtual link.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::quality::Quality;
use super::topology::HostMap;
use crate::error::CoreError;

/// Quality requested for one interface, identified by IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosReference {
    pub ip: String,
    pub quality: Quality,
}

/// Queues requested on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosAllocation {
    pub server_name: String,
    #[serde(default)]
    pub ifaces: Vec<QosReference>,
}

/// One endpoint of a virtual-link group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReference {
    pub hostname: String,
    pub ip: String,
}

/// Virtual link -> endpoints that must all reach each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowAllocation {
    links: BTreeMap<String, Vec<FlowReference>>,
}

impl FlowAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, vlr: impl Into<String>, reference: FlowReference) {
        self.links.entry(vlr.into()).or_default().push(reference);
    }

    /// Virtual link names, in sorted order.
    pub fn vlrs(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    pub fn references_for(&self, vlr: &str) -> &[FlowReference] {
        self.links.get(vlr).map_or(&[], Vec::as_slice)
    }

    pub fn ips_for(&self, vlr: &str) -> Vec<&str> {
        self.references_for(vlr)
            .iter()
            .map(|r| r.ip.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.links.values().all(Vec::is_empty)
    }
}

/// A complete allocation request for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Deployment (network service record) identifier, used for logging.
    pub request_id: String,
    /// Host map to use instead of asking the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<HostMap>,
    #[serde(default)]
    pub qos: Vec<QosAllocation>,
    #[serde(default)]
    pub flows: FlowAllocation,
}

impl AllocationPlan {
    /// Reject plans the engines cannot act on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.request_id.trim().is_empty() {
            return Err(CoreError::InvalidPlan {
                message: "request_id must not be empty".into(),
            });
        }
        for allocation in &self.qos {
            if allocation.server_name.is_empty() {
                return Err(CoreError::InvalidPlan {
                    message: "qos allocation without server_name".into(),
                });
            }
            if let Some(r) = allocation.ifaces.iter().find(|r| r.ip.is_empty()) {
                return Err(CoreError::InvalidPlan {
                    message: format!(
                        "interface reference with empty ip on '{}' ({})",
                        allocation.server_name, r.quality
                    ),
                });
            }
        }
        for vlr in self.flows.vlrs() {
            if self
                .flows
                .references_for(vlr)
                .iter()
                .any(|r| r.hostname.is_empty() || r.ip.is_empty())
            {
                return Err(CoreError::InvalidPlan {
                    message: format!("flow reference on '{vlr}' needs hostname and ip"),
                });
            }
        }
        Ok(())
    }
}
