//! Declaration manifest loading.
//!
//! The manifest is a TOML document of `[[declaration]]` tables, each one a
//! [`TypeDeclaration`] fragment produced by whatever tool analyses the
//! project's scripts.

use std::{fs, path::Path};

use log::info;
use serde::Deserialize;

use canopy::CanopyError;
use canopy_core::declaration::TypeDeclaration;

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default, rename = "declaration")]
    declarations: Vec<TypeDeclaration>,
}

/// Load the declaration fragments listed in the manifest at `path`.
///
/// # Errors
///
/// Returns `CanopyError::Io` if the file cannot be read and
/// `CanopyError::Config` if it is not a valid manifest.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<TypeDeclaration>, CanopyError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let declarations = parse_manifest(&content)
        .map_err(|message| CanopyError::Config(format!("{}: {message}", path.display())))?;

    info!(
        path = path.display().to_string(),
        declarations = declarations.len();
        "Loaded declaration manifest"
    );
    Ok(declarations)
}

fn parse_manifest(content: &str) -> Result<Vec<TypeDeclaration>, String> {
    let manifest: Manifest = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(manifest.declarations)
}
