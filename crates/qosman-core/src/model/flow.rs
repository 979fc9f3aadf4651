// ── Flow domain types ──

use serde::{Deserialize, Serialize};

/// A forwarding rule steering traffic from one interface into the
/// destination interface's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub src_ip: String,
    pub dest_ip: String,
    pub dest_hypervisor: String,
    pub dest_ovs_port: u32,
    pub dest_queue: u32,
    pub protocol: String,
    pub priority: u16,
}

/// Flows installed on behalf of one server, submitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFlows {
    pub hypervisor_id: String,
    pub server_name: String,
    pub flows: Vec<Flow>,
}
