//! Conversion from CLI errors to miette reports.

use miette::Report;
use xtensio_config::AssembleError;

use crate::error::{BuildError, CliError};

/// Convert a CliError into a miette Report.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Assemble(e) => assemble_error_to_miette(e),
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert an assembly failure into a report with a hint for the user.
pub fn assemble_error_to_miette(err: AssembleError) -> Report {
    match err {
        AssembleError::ManifestNotFound { root, stem } => miette::miette!(
            "No extension manifest in {}\n\nHint: Create {stem}.ts (or {stem}.json) at the project root, or set conventions.manifest in xtensio.config.json",
            root.display()
        ),
        AssembleError::Spawn { program, source } => miette::miette!(
            "Could not run `{}`: {}\n\nHint: Install Node.js and TypeScript, or point `compiler`/`node` in xtensio.config.json at working commands",
            program,
            source
        ),
        AssembleError::Compile {
            source_path,
            status,
            stderr,
        } => miette::miette!(
            "Failed to compile {} ({})\n\n{}\n\nHint: Fix the compiler errors above and rebuild",
            source_path.display(),
            status,
            stderr.trim_end()
        ),
        AssembleError::InvalidDescriptor {
            path,
            field,
            expected,
        } => miette::miette!(
            "Invalid content script export in {}: `{}` must be {}\n\nHint: Content scripts export {{ matches: string[], component?, shadowRoot? }}",
            path.display(),
            field,
            expected
        ),
        other => miette::miette!("{}", other),
    }
}

/// Convert a BuildError into a miette Report.
pub fn build_error_to_miette(err: BuildError) -> Report {
    miette::miette!("{}", err)
}
