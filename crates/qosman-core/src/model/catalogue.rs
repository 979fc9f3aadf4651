// ── Orchestrator catalogue (read-only input) ──
//
// Flat projections of the orchestrator's VNF records: just the fields the
// link-quality extraction walks. Field names follow the orchestrator's
// JSON so records can be deserialized as-is; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Runtime record of one deployed VNF instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VnfRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vdu: Vec<DeploymentUnit>,
    #[serde(default)]
    pub virtual_link: Vec<InternalVirtualLink>,
}

/// Virtual deployment unit. `hostname` is the server name prefix its
/// component instances are launched under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentUnit {
    #[serde(default)]
    pub id: Option<String>,
    pub hostname: String,
    #[serde(default)]
    pub vnfc: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub connection_point: Vec<ConnectionPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    /// Name of the virtual link this connection point attaches to.
    pub virtual_link_reference: String,
}

/// A virtual link internal to the record, with raw `key:value` QoS annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalVirtualLink {
    pub name: String,
    #[serde(default)]
    pub qos: Vec<String>,
}
