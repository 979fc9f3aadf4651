//! `qosman config`: inspect the resolved configuration.

use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct PathInfo {
    path: String,
    exists: bool,
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let (cfg, source) = config::load(global)?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    let body = cfg.to_toml_redacted()?;
                    format!("# source: {source}\n{body}")
                }
                _ => output::render_single(&global.output, &cfg.redacted(), |_| String::new(), |_| {
                    String::new()
                })?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = config::override_path(global);
            let info = PathInfo {
                exists: path.is_file(),
                path: path.display().to_string(),
            };
            let out = output::render_single(
                &global.output,
                &info,
                |i| {
                    if i.exists {
                        i.path.clone()
                    } else {
                        format!("{} (not present, using bundled defaults)", i.path)
                    }
                },
                |i| i.path.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
