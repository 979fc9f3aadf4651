// Wire types exchanged with the connectivity-management agent.
//
// Field names follow the agent's JSON (snake_case, `hypervisor_id`,
// `qos_flows`, `dest_hyp`, ...). These are raw shapes; `qosman-core`
// converts them into its domain model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Topology ────────────────────────────────────────────────────────

/// Host membership as reported by `GET /hosts`: hypervisor -> server names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMembership {
    #[serde(default)]
    pub hypervisors: BTreeMap<String, Vec<String>>,
}

// ── Server snapshot ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentServer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub interfaces: Vec<AgentInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInterface {
    pub ip: String,
    #[serde(default)]
    pub ovs_port_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos: Option<AgentQos>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQos {
    pub qos_uuid: String,
    /// Id of the most recently assigned queue on this interface.
    #[serde(default)]
    pub actual_id: u32,
    #[serde(default)]
    pub queues: Vec<AgentQueue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQueue {
    pub id: u32,
    pub rates: AgentQueueRates,
    #[serde(default)]
    pub label: String,
}

/// Shaping parameters of one queue, in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQueueRates {
    pub min_rate: u64,
    pub max_rate: u64,
}

// ── QoS add ─────────────────────────────────────────────────────────

/// Queue additions for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerQos {
    pub hypervisor_id: String,
    pub server_id: String,
    #[serde(default)]
    pub interfaces: Vec<AgentInterface>,
}

/// Body of `POST /qoses`; the agent echoes the applied state in the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosAddRequest {
    #[serde(default)]
    pub values: Vec<ServerQos>,
}

impl QosAddRequest {
    pub fn new(values: Vec<ServerQos>) -> Self {
        Self { values }
    }

    /// Entry for the given server id, if the agent returned one.
    pub fn server(&self, server_id: &str) -> Option<&ServerQos> {
        self.values.iter().find(|s| s.server_id == server_id)
    }
}

// ── Flows ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFlow {
    pub src_ipv4: String,
    pub dest_ipv4: String,
    pub dest_hyp: String,
    pub ovs_port_number: u32,
    pub queue_number: u32,
    pub protocol: String,
    pub priority: u16,
}

/// Flows installed on behalf of one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowServer {
    pub hypervisor_id: String,
    pub server_id: String,
    #[serde(default)]
    pub qos_flows: Vec<AgentFlow>,
}

/// Body of `POST /flows`; echoed back by the agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRequest {
    #[serde(default)]
    pub values: Vec<FlowServer>,
}

impl FlowRequest {
    pub fn new(values: Vec<FlowServer>) -> Self {
        Self { values }
    }

    /// Total number of flows across all servers.
    pub fn flow_count(&self) -> usize {
        self.values.iter().map(|s| s.qos_flows.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_snapshot_tolerates_missing_qos() {
        let server: AgentServer = serde_json::from_value(json!({
            "id": "srv-1",
            "name": "web-1",
            "interfaces": [{ "ip": "10.0.0.5", "ovs_port_number": 7 }]
        }))
        .unwrap();

        assert_eq!(server.interfaces.len(), 1);
        assert!(server.interfaces[0].qos.is_none());
    }

    #[test]
    fn qos_add_request_finds_server_entry() {
        let req = QosAddRequest::new(vec![ServerQos {
            hypervisor_id: "hv-A".into(),
            server_id: "srv-1".into(),
            interfaces: vec![],
        }]);

        assert!(req.server("srv-1").is_some());
        assert!(req.server("srv-2").is_none());
    }

    #[test]
    fn flow_request_serializes_agent_field_names() {
        let req = FlowRequest::new(vec![FlowServer {
            hypervisor_id: "hv-A".into(),
            server_id: "web-1".into(),
            qos_flows: vec![AgentFlow {
                src_ipv4: "10.0.0.5".into(),
                dest_ipv4: "10.0.0.6".into(),
                dest_hyp: "hv-B".into(),
                ovs_port_number: 3,
                queue_number: 4,
                protocol: "udp".into(),
                priority: 2,
            }],
        }]);

        let value = serde_json::to_value(&req).unwrap();
        let flow = &value["values"][0]["qos_flows"][0];
        assert_eq!(flow["dest_hyp"], "hv-B");
        assert_eq!(flow["queue_number"], 4);
        assert_eq!(req.flow_count(), 1);
    }
}
