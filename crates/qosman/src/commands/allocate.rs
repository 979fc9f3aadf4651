//! `qosman allocate`: queues first, then the flows that use them.

use tabled::{Tabled, settings::Style};

use qosman_core::{AllocationOutcome, AllocationPlan, QosManager};

use crate::cli::{AllocateArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "QoS")]
    qos: String,
    #[tabled(rename = "Queue")]
    queue: u32,
}

#[derive(Tabled)]
struct FlowRow {
    #[tabled(rename = "Hypervisor")]
    hypervisor: String,
    #[tabled(rename = "Source")]
    src: String,
    #[tabled(rename = "Destination")]
    dest: String,
    #[tabled(rename = "Dest port")]
    port: u32,
    #[tabled(rename = "Queue")]
    queue: u32,
}

fn queue_rows(outcome: &AllocationOutcome) -> Vec<QueueRow> {
    let mut rows = Vec::new();
    for server in &outcome.servers {
        for iface in &server.interfaces {
            let Some(desc) = &iface.qos else { continue };
            for queue in desc.queues() {
                rows.push(QueueRow {
                    server: server.name.clone(),
                    ip: iface.ip.clone(),
                    qos: desc.qos_uuid.clone(),
                    queue: queue.id,
                });
            }
        }
    }
    rows
}

fn flow_rows(outcome: &AllocationOutcome) -> Vec<FlowRow> {
    outcome
        .flows
        .iter()
        .flat_map(|batch| {
            batch.flows.iter().map(|f| FlowRow {
                hypervisor: batch.hypervisor_id.clone(),
                src: f.src_ip.clone(),
                dest: f.dest_ip.clone(),
                port: f.dest_ovs_port,
                queue: f.dest_queue,
            })
        })
        .collect()
}

fn summary(outcome: &AllocationOutcome) -> String {
    let mut sections = Vec::new();

    let queues = queue_rows(outcome);
    if !queues.is_empty() {
        sections.push(tabled::Table::new(queues).with(Style::rounded()).to_string());
    }
    let flows = flow_rows(outcome);
    if flows.is_empty() {
        sections.push("No flows installed".into());
    } else {
        sections.push(tabled::Table::new(flows).with(Style::rounded()).to_string());
    }
    sections.join("\n\n")
}

fn plain(outcome: &AllocationOutcome) -> String {
    flow_rows(outcome)
        .iter()
        .map(|f| format!("{} {} {} {}", f.hypervisor, f.src, f.dest, f.queue))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(
    args: AllocateArgs,
    manager: &QosManager,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut plan: AllocationPlan = util::read_document(&args.plan)?;
    if let Some(id) = args.request_id {
        plan.request_id = id;
    }

    let hosts = match plan.hosts.take() {
        Some(hosts) => hosts,
        None => manager.hosts().await?,
    };
    tracing::info!(request_id = %plan.request_id, servers = hosts.len(), "allocating");

    let outcome = manager.allocate(&hosts, &plan).await?;

    let out = output::render_single(&global.output, &outcome, summary, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
