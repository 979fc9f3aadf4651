//! `qosman release`: tear down queues and flows.
//!
//! With `--records` the removal runs as a detached task, exactly as an
//! orchestrator would trigger it, and outcomes only reach the log. With
//! `--servers` it runs inline and failures turn into a non-zero exit.

use tabled::Tabled;

use qosman_core::{QosManager, RemovalFailure, RemovalReport, VnfRecord, removal_targets};

use crate::cli::{GlobalOpts, ReleaseArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&RemovalFailure> for FailureRow {
    fn from(f: &RemovalFailure) -> Self {
        Self {
            server: f.server.clone(),
            target: f.target.clone(),
            reason: f.reason.clone(),
        }
    }
}

fn report_detail(report: &RemovalReport) -> String {
    format!("Released: {} delete call(s) succeeded", report.attempted)
}

pub async fn handle(
    args: ReleaseArgs,
    manager: &QosManager,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let request_id = args
        .request_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let color = output::should_color(&global.color);

    if let Some(path) = args.records {
        let records: Vec<VnfRecord> = util::read_document(&path)?;
        // Annotation errors surface here; the task itself can only log them.
        let targets = removal_targets(&records)?;
        if !global.quiet {
            eprintln!("Releasing {} server(s) for {request_id}", targets.len());
        }

        manager.spawn_release(records, request_id.clone());
        manager.wait_for_releases().await;

        if !global.quiet {
            eprintln!("{} {request_id}", output::good("Release finished:", color));
        }
        return Ok(());
    }

    let report = manager.release(&args.servers, &request_id).await?;
    if !report.is_complete() && !global.quiet {
        eprintln!(
            "{}\n{}",
            output::bad("Some removals failed:", color),
            failure_table(&report)
        );
    }
    let report = report.into_result()?;

    let out = output::render_single(&global.output, &report, report_detail, |r| {
        r.attempted.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn failure_table(report: &RemovalReport) -> String {
    let rows: Vec<FailureRow> = report.failures.iter().map(FailureRow::from).collect();
    tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string()
}
