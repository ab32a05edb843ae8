//! `xtensio inspect`: print the assembled configuration to stdout.

use crate::cli::InspectArgs;
use crate::commands::utils;
use crate::config::{CliOverrides, XtensioConfig};
use crate::error::{CliError, Result};

pub async fn execute(args: InspectArgs) -> Result<()> {
    if args.schema {
        let schema = schemars::schema_for!(XtensioConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let root = utils::resolve_project_root(args.project.cwd.as_deref())?;
    let overrides = CliOverrides {
        mode: args.mode.map(Into::into),
        ..CliOverrides::default()
    };
    let config = utils::load_config(&args.project, &root, overrides)?;
    let mode = config.mode.unwrap_or_default();

    let build = utils::assemble(&config, &root, mode).await?;

    let json = if args.manifest {
        let manifest = build
            .config
            .manifest()
            .ok_or_else(|| CliError::Custom("assembled configuration has no manifest plugin".to_string()))?;
        serde_json::to_string_pretty(manifest)?
    } else {
        serde_json::to_string_pretty(&build.config)?
    };
    println!("{json}");
    Ok(())
}
