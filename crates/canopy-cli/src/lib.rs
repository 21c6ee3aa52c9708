//! CLI logic for the Canopy hierarchy diagram tool.
//!
//! This module scans a project directory for scene files, loads the
//! declaration manifest and writes one `*.g.puml` file per requested entity
//! next to the entity's source file.

pub mod error_adapter;

mod args;
mod config;
mod discover;
mod manifest;

pub use args::Args;

use std::fs;

use log::info;

use canopy::{CanopyError, Generation, Generator, ProjectInput};

/// Run the Canopy CLI application
///
/// Malformed scene files do not abort the run; they are returned in
/// [`Generation::failures`] for the caller to report.
///
/// # Errors
///
/// Returns `CanopyError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Declaration manifest errors
/// - Diagram assembly errors
pub fn run(args: &Args) -> Result<Generation, CanopyError> {
    info!(project_dir = args.project_dir, dry_run = args.dry_run; "Generating diagrams");

    let app_config = config::load_config(args.config.as_ref())?;

    let declarations = match &args.declarations {
        Some(path) => manifest::load_manifest(path)?,
        None => Vec::new(),
    };

    let root = fs::canonicalize(&args.project_dir)?;
    let input = ProjectInput {
        project_dir: root.to_string_lossy().replace('\\', "/"),
        scenes: discover::discover_scenes(&root)?,
        declarations,
    };

    let generation = Generator::new(app_config).generate(&input)?;

    for output in &generation.outputs {
        let target = root.join(&output.path);
        if args.dry_run {
            info!(entity = output.entity, path = output.path; "Skipping write (dry run)");
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &output.contents)?;
        info!(entity = output.entity, path = target.display().to_string(); "Diagram written");
    }

    Ok(generation)
}
