// ── Domain model ──
//
// Canonical types the engines work on. Agent wire types are converted
// into these in `convert.rs`; catalogue types are orchestrator input.

pub mod allocation;
pub mod catalogue;
pub mod flow;
pub mod quality;
pub mod server;
pub mod topology;

// ── Re-exports ──────────────────────────────────────────────────────

pub use allocation::{AllocationPlan, FlowAllocation, FlowReference, QosAllocation, QosReference};
pub use catalogue::{Component, ConnectionPoint, DeploymentUnit, InternalVirtualLink, VnfRecord};
pub use flow::{Flow, ServerFlows};
pub use quality::{Quality, QueueParams, classify};
pub use server::{InterfaceQos, QosDescriptor, Queue, Server, find_interface};
pub use topology::HostMap;
