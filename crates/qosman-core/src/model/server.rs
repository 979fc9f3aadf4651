// ── Server / interface model ──
//
// In-memory view of a server's interfaces and the QoS queues attached to
// them. Snapshots come fresh from the agent; the QoS engine appends queues
// and then folds the agent's answer back in.

use serde::{Deserialize, Serialize};

use super::quality::QueueParams;
use crate::error::CoreError;

/// One traffic-shaping queue on an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: u32,
    pub params: QueueParams,
    pub label: String,
}

/// An interface's QoS descriptor: backend uuid, queues and id counter.
///
/// `actual_id` is the id of the most recently assigned queue. It only ever
/// grows, so ids handed out by [`add_queue`](Self::add_queue) are unique
/// and strictly increasing for the interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosDescriptor {
    pub qos_uuid: String,
    actual_id: u32,
    queues: Vec<Queue>,
}

impl QosDescriptor {
    pub fn new(qos_uuid: impl Into<String>, actual_id: u32) -> Self {
        Self {
            qos_uuid: qos_uuid.into(),
            actual_id,
            queues: Vec::new(),
        }
    }

    /// Rebuild a descriptor from backend data. The counter is raised to the
    /// highest existing queue id if the backend reported a lower one.
    pub fn with_queues(qos_uuid: impl Into<String>, actual_id: u32, queues: Vec<Queue>) -> Self {
        let highest = queues.iter().map(|q| q.id).max().unwrap_or(0);
        Self {
            qos_uuid: qos_uuid.into(),
            actual_id: actual_id.max(highest),
            queues,
        }
    }

    pub fn actual_id(&self) -> u32 {
        self.actual_id
    }

    pub fn queues(&self) -> &[Queue] {
        &self.queues
    }

    /// `None` once the counter has reached `u32::MAX`.
    pub fn next_queue_id(&self) -> Option<u32> {
        self.actual_id.checked_add(1)
    }

    /// Append a queue with the next free id and return that id.
    pub fn add_queue(&mut self, params: QueueParams) -> Result<u32, CoreError> {
        let id = self
            .next_queue_id()
            .ok_or_else(|| CoreError::QueueIdExhausted {
                qos_uuid: self.qos_uuid.clone(),
            })?;
        self.queues.push(Queue {
            id,
            params,
            label: String::new(),
        });
        self.actual_id = id;
        Ok(id)
    }
}

/// A network interface of a server, identified by its IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceQos {
    pub ip: String,
    pub ovs_port_number: u32,
    pub qos: Option<QosDescriptor>,
}

impl InterfaceQos {
    pub fn new(ip: impl Into<String>, ovs_port_number: u32) -> Self {
        Self {
            ip: ip.into(),
            ovs_port_number,
            qos: None,
        }
    }

    pub fn with_qos(mut self, qos: QosDescriptor) -> Self {
        self.qos = Some(qos);
        self
    }

    /// Queue number flows towards this interface should select.
    pub fn queue_number(&self) -> Option<u32> {
        self.qos.as_ref().map(QosDescriptor::actual_id)
    }

    /// Add a queue, creating an empty descriptor if the interface has none
    /// yet (the agent assigns its uuid).
    pub fn add_queue(&mut self, params: QueueParams) -> Result<u32, CoreError> {
        self.qos
            .get_or_insert_with(QosDescriptor::default)
            .add_queue(params)
    }
}

/// A server (VM) with its interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Backend identifier; keys the agent's QoS responses.
    pub id: String,
    pub name: String,
    pub interfaces: Vec<InterfaceQos>,
}

impl Server {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            interfaces: Vec::new(),
        }
    }

    pub fn with_interface(mut self, iface: InterfaceQos) -> Self {
        self.interfaces.push(iface);
        self
    }

    pub fn from_ip(&self, ip: &str) -> Option<&InterfaceQos> {
        self.interfaces.iter().find(|i| i.ip == ip)
    }

    pub fn from_ip_mut(&mut self, ip: &str) -> Option<&mut InterfaceQos> {
        self.interfaces.iter_mut().find(|i| i.ip == ip)
    }

    pub fn has_interface(&self, ip: &str) -> bool {
        self.from_ip(ip).is_some()
    }

    /// Substring match of the server name against removal targets.
    pub fn matches_any(&self, ids: &[String]) -> bool {
        ids.iter().any(|id| self.name.contains(id.as_str()))
    }

    /// Fold interface state reported by the agent into this snapshot.
    ///
    /// Reported interfaces replace the local ones with the same IP; unknown
    /// IPs are appended. Interfaces the agent did not report are kept.
    pub fn update_interfaces(&mut self, reported: Vec<InterfaceQos>) {
        for iface in reported {
            match self.from_ip_mut(&iface.ip) {
                Some(existing) => *existing = iface,
                None => self.interfaces.push(iface),
            }
        }
    }
}

/// First server in `servers` owning an interface with `ip`.
pub fn find_interface<'a>(servers: &'a [Server], ip: &str) -> Option<(&'a Server, &'a InterfaceQos)> {
    servers
        .iter()
        .find_map(|server| server.from_ip(ip).map(|iface| (server, iface)))
}
