//! `xtensio build`: production bundle, then package.

use std::time::Instant;

use xtensio_config::BuildMode;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::{external, ui};

/// Execute the build command.
///
/// 1. Load configuration (CLI > Env > File > Defaults)
/// 2. Assemble the production configuration
/// 3. Run the bundler
/// 4. Package the output unless `--no-package` or `package: false`
///
/// Packaging only starts after the bundler succeeded.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    let root = utils::resolve_project_root(args.project.cwd.as_deref())?;
    let overrides = CliOverrides {
        out_dir: args.out_dir.clone(),
        package: args.no_package.then_some(false),
        ..CliOverrides::default()
    };
    let config = utils::load_config(&args.project, &root, overrides)?;

    let out_dir = utils::assemble_and_bundle(&config, &root, BuildMode::Production).await?;

    if config.package {
        let spinner = ui::Spinner::new("Packaging...");
        match external::run_packager(&config, &root, &out_dir).await {
            Ok(_) => spinner.finish(&format!("Packaged into {}", config.artifacts_dir(&root).display())),
            Err(err) => {
                spinner.fail("Packaging failed");
                return Err(err);
            }
        }
    } else {
        tracing::debug!("packaging disabled");
    }

    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(start_time.elapsed())
    ));
    Ok(())
}
