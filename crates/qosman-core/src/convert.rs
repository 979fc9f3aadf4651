// ── Wire <-> domain conversions ──
//
// The agent speaks `qosman_api::models`; the engines speak `crate::model`.
// Conversions are lossless in both directions except for the descriptor
// counter, which `QosDescriptor::with_queues` may raise.

use qosman_api::models::{
    AgentFlow, AgentInterface, AgentQos, AgentQueue, AgentQueueRates, AgentServer, FlowServer,
    HostMembership,
};

use crate::model::{Flow, HostMap, InterfaceQos, QosDescriptor, Queue, QueueParams, Server, ServerFlows};

// ── Agent -> domain ─────────────────────────────────────────────────

impl From<AgentQueueRates> for QueueParams {
    fn from(r: AgentQueueRates) -> Self {
        Self {
            min_rate: r.min_rate,
            max_rate: r.max_rate,
        }
    }
}

impl From<AgentQueue> for Queue {
    fn from(q: AgentQueue) -> Self {
        Self {
            id: q.id,
            params: q.rates.into(),
            label: q.label,
        }
    }
}

impl From<AgentQos> for QosDescriptor {
    fn from(q: AgentQos) -> Self {
        QosDescriptor::with_queues(
            q.qos_uuid,
            q.actual_id,
            q.queues.into_iter().map(Queue::from).collect(),
        )
    }
}

impl From<AgentInterface> for InterfaceQos {
    fn from(i: AgentInterface) -> Self {
        Self {
            ip: i.ip,
            ovs_port_number: i.ovs_port_number,
            qos: i.qos.map(QosDescriptor::from),
        }
    }
}

impl From<AgentServer> for Server {
    fn from(s: AgentServer) -> Self {
        Self {
            id: s.id,
            name: s.name,
            interfaces: s.interfaces.into_iter().map(InterfaceQos::from).collect(),
        }
    }
}

impl From<HostMembership> for HostMap {
    fn from(m: HostMembership) -> Self {
        HostMap::from_membership(m.hypervisors)
    }
}

impl From<AgentFlow> for Flow {
    fn from(f: AgentFlow) -> Self {
        Self {
            src_ip: f.src_ipv4,
            dest_ip: f.dest_ipv4,
            dest_hypervisor: f.dest_hyp,
            dest_ovs_port: f.ovs_port_number,
            dest_queue: f.queue_number,
            protocol: f.protocol,
            priority: f.priority,
        }
    }
}

impl From<FlowServer> for ServerFlows {
    fn from(s: FlowServer) -> Self {
        Self {
            hypervisor_id: s.hypervisor_id,
            server_name: s.server_id,
            flows: s.qos_flows.into_iter().map(Flow::from).collect(),
        }
    }
}

// ── Domain -> agent ─────────────────────────────────────────────────

impl From<QueueParams> for AgentQueueRates {
    fn from(p: QueueParams) -> Self {
        Self {
            min_rate: p.min_rate,
            max_rate: p.max_rate,
        }
    }
}

impl From<&Queue> for AgentQueue {
    fn from(q: &Queue) -> Self {
        Self {
            id: q.id,
            rates: q.params.into(),
            label: q.label.clone(),
        }
    }
}

impl From<&QosDescriptor> for AgentQos {
    fn from(q: &QosDescriptor) -> Self {
        Self {
            qos_uuid: q.qos_uuid.clone(),
            actual_id: q.actual_id(),
            queues: q.queues().iter().map(AgentQueue::from).collect(),
        }
    }
}

impl From<&InterfaceQos> for AgentInterface {
    fn from(i: &InterfaceQos) -> Self {
        Self {
            ip: i.ip.clone(),
            ovs_port_number: i.ovs_port_number,
            qos: i.qos.as_ref().map(AgentQos::from),
        }
    }
}

impl From<&Flow> for AgentFlow {
    fn from(f: &Flow) -> Self {
        Self {
            src_ipv4: f.src_ip.clone(),
            dest_ipv4: f.dest_ip.clone(),
            dest_hyp: f.dest_hypervisor.clone(),
            ovs_port_number: f.dest_ovs_port,
            queue_number: f.dest_queue,
            protocol: f.protocol.clone(),
            priority: f.priority,
        }
    }
}

impl From<&ServerFlows> for FlowServer {
    fn from(s: &ServerFlows) -> Self {
        Self {
            hypervisor_id: s.hypervisor_id.clone(),
            server_id: s.server_name.clone(),
            qos_flows: s.flows.iter().map(AgentFlow::from).collect(),
        }
    }
}
