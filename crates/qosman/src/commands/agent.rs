//! Read-only agent queries: host map and server snapshots.

use serde::Serialize;
use tabled::Tabled;

use qosman_core::{InterfaceQos, QosManager, Server};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct HostEntry {
    server: String,
    hypervisor: String,
}

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Hypervisor")]
    hypervisor: String,
}

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "OVS port")]
    port: u32,
    #[tabled(rename = "QoS")]
    qos: String,
    #[tabled(rename = "Queues")]
    queues: String,
}

impl From<&InterfaceQos> for InterfaceRow {
    fn from(iface: &InterfaceQos) -> Self {
        let (qos, queues) = match &iface.qos {
            Some(desc) => (
                desc.qos_uuid.clone(),
                desc.queues()
                    .iter()
                    .map(|q| format!("{} ({}-{})", q.id, q.params.min_rate, q.params.max_rate))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            None => ("-".into(), String::new()),
        };
        Self {
            ip: iface.ip.clone(),
            port: iface.ovs_port_number,
            qos,
            queues,
        }
    }
}

fn server_detail(server: &Server) -> String {
    let mut lines = vec![
        format!("Server: {}", server.name),
        format!("ID:     {}", server.id),
    ];
    if server.interfaces.is_empty() {
        lines.push("No interfaces".into());
    } else {
        let rows: Vec<InterfaceRow> = server.interfaces.iter().map(InterfaceRow::from).collect();
        lines.push(
            tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string(),
        );
    }
    lines.join("\n")
}

pub async fn hosts(manager: &QosManager, global: &GlobalOpts) -> Result<(), CliError> {
    let hosts = manager.hosts().await?;
    let entries: Vec<HostEntry> = hosts
        .iter()
        .map(|(server, hypervisor)| HostEntry {
            server: server.to_owned(),
            hypervisor: hypervisor.to_owned(),
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &entries,
        |e| HostRow {
            server: e.server.clone(),
            hypervisor: e.hypervisor.clone(),
        },
        |e| e.server.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn server(
    manager: &QosManager,
    hypervisor: &str,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let server = manager.server(hypervisor, name).await?;
    let out = output::render_single(&global.output, &server, server_detail, |s| s.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
