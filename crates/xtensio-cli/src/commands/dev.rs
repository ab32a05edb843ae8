//! `xtensio dev`: development bundle, then launch it in Chromium.

use std::time::Instant;

use xtensio_config::BuildMode;

use crate::cli::DevArgs;
use crate::commands::utils;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::{external, ui};

pub async fn execute(args: DevArgs) -> Result<()> {
    let start_time = Instant::now();

    let root = utils::resolve_project_root(args.project.cwd.as_deref())?;
    let overrides = CliOverrides {
        out_dir: args.out_dir.clone(),
        ..CliOverrides::default()
    };
    let config = utils::load_config(&args.project, &root, overrides)?;

    let out_dir = utils::assemble_and_bundle(&config, &root, BuildMode::Development).await?;
    ui::success(&format!(
        "Development bundle ready in {}",
        ui::format_duration(start_time.elapsed())
    ));

    if args.no_run {
        ui::info(&format!("Load the unpacked extension from {}", out_dir.display()));
        return Ok(());
    }

    ui::info("Launching extension in Chromium...");
    external::run_extension(&config, &root, &out_dir).await
}
