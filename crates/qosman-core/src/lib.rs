//! QoS allocation between an NFV orchestrator and the connectivity agent.
//!
//! Translates virtual-link quality annotations into per-hypervisor QoS
//! queues and the OVS flows that steer traffic into them:
//!
//! - **[`QosManager`]**: Facade over one agent. [`allocate()`](QosManager::allocate)
//!   creates queues and then the flows referencing them;
//!   [`release()`](QosManager::release) tears both down again and
//!   [`spawn_release()`](QosManager::spawn_release) does so detached.
//!
//! - **Engines**: [`QosHandler`] compiles and submits queue additions and
//!   folds the agent's answer back into the server model; [`FlowHandler`]
//!   builds the full mesh of flows per virtual link. Both remove
//!   best-effort and report through [`RemovalReport`].
//!
//! - **[`extract`]**: Finds annotated links and the servers on them in a
//!   set of VNF records; feeds [`RemoveQosTask`].
//!
//! - **Domain model** ([`model`]): Quality catalog, host map, server and
//!   interface model, flows, allocation plans and catalogue records.
//!
//! The agent is reached through the [`ConnectivityAgent`] trait, implemented
//! for [`qosman_api::AgentClient`].

pub mod agent;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod flow;
pub mod manager;
pub mod model;
pub mod qos;
pub mod removal;

#[cfg(test)]
mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use agent::ConnectivityAgent;
pub use config::{FlowSettings, ManagerConfig, TlsVerification};
pub use error::CoreError;
pub use extract::{LinkQuality, dedup_servers, link_qualities, removal_targets, servers_with_qos};
pub use flow::FlowHandler;
pub use manager::{AllocationOutcome, QosManager};
pub use qos::{QosHandler, update_servers};
pub use removal::{RemovalFailure, RemovalReport, RemoveQosTask};

pub use model::{
    AllocationPlan, Flow, FlowAllocation, FlowReference, HostMap, InterfaceQos, QosAllocation,
    QosDescriptor, QosReference, Quality, Queue, QueueParams, Server, ServerFlows, VnfRecord,
    classify,
};
