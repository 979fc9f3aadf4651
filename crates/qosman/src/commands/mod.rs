pub mod agent;
pub mod allocate;
pub mod catalog;
pub mod config_cmd;
pub mod release;
pub mod util;

use qosman_core::QosManager;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs the connectivity agent.
pub async fn dispatch(
    cmd: Command,
    manager: &QosManager,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Hosts => agent::hosts(manager, global).await,
        Command::Server { hypervisor, server } => {
            agent::server(manager, &hypervisor, &server, global).await
        }
        Command::Allocate(args) => allocate::handle(args, manager, global).await,
        Command::Release(args) => release::handle(args, manager, global).await,

        // Handled in main without an agent
        Command::Classify { .. }
        | Command::Qualities
        | Command::Links(_)
        | Command::Targets { .. }
        | Command::Config(_)
        | Command::Completions(_) => unreachable!("handled before dispatch"),
    }
}
