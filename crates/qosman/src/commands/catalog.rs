//! Offline catalog commands: quality tags and VNF record inspection.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use qosman_core::{LinkQuality, Quality, dedup_servers, link_qualities, removal_targets};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct QualityInfo {
    quality: Quality,
    min_rate: u64,
    max_rate: u64,
}

impl From<Quality> for QualityInfo {
    fn from(quality: Quality) -> Self {
        let params = quality.queue_params();
        Self {
            quality,
            min_rate: params.min_rate,
            max_rate: params.max_rate,
        }
    }
}

#[derive(Tabled)]
struct QualityRow {
    #[tabled(rename = "Quality")]
    quality: String,
    #[tabled(rename = "Min rate (kbit/s)")]
    min_rate: u64,
    #[tabled(rename = "Max rate (kbit/s)")]
    max_rate: u64,
}

impl From<&QualityInfo> for QualityRow {
    fn from(q: &QualityInfo) -> Self {
        Self {
            quality: q.quality.to_string(),
            min_rate: q.min_rate,
            max_rate: q.max_rate,
        }
    }
}

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Record")]
    record: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Quality")]
    quality: String,
}

impl From<&LinkQuality> for LinkRow {
    fn from(t: &LinkQuality) -> Self {
        Self {
            record: t.vnfr_id.clone(),
            link: t.link_id.clone(),
            quality: t.quality.to_string(),
        }
    }
}

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "Server")]
    server: String,
}

fn detail(q: &QualityInfo) -> String {
    [
        format!("Quality:  {}", q.quality),
        format!("Min rate: {} kbit/s", q.min_rate),
        format!("Max rate: {} kbit/s", q.max_rate),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let rendered = match cmd {
        Command::Classify { tag } => {
            let info = QualityInfo::from(Quality::classify(&tag)?);
            output::render_single(&global.output, &info, detail, |q| q.quality.to_string())?
        }

        Command::Qualities => {
            let all: Vec<QualityInfo> = Quality::iter().map(QualityInfo::from).collect();
            output::render_list(&global.output, &all, |q| QualityRow::from(q), |q| {
                q.quality.to_string()
            })?
        }

        Command::Links(args) => {
            let records = util::read_document::<Vec<_>>(&args.records)?;
            let tuples = link_qualities(&records)?;
            output::render_list(&global.output, &tuples, |t| LinkRow::from(t), |t| {
                format!("{}/{}", t.vnfr_id, t.link_id)
            })?
        }

        Command::Targets { records, unique } => {
            let records = util::read_document::<Vec<_>>(&records.records)?;
            let mut servers = removal_targets(&records)?;
            if unique {
                servers = dedup_servers(&servers);
            }
            output::render_list(
                &global.output,
                &servers,
                |s| TargetRow { server: s.clone() },
                Clone::clone,
            )?
        }

        other => {
            return Err(CliError::Internal {
                message: format!("{other:?} is not a catalog command"),
            });
        }
    };

    output::print_output(&rendered, global.quiet);
    Ok(())
}
