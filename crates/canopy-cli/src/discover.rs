//! Scene file discovery.

use std::{fs, io, path::Path};

use log::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use canopy::SceneSource;

const SCENE_EXTENSION: &str = "tscn";

/// Read every `*.tscn` file below `root`, sorted by relative path.
///
/// Hidden directories (such as the editor's `.godot` cache) are skipped and
/// symbolic links are not followed. Returned paths are relative to `root`
/// and use `/` separators.
pub fn discover_scenes(root: &Path) -> io::Result<Vec<SceneSource>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
    {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(SCENE_EXTENSION)
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut scenes = Vec::with_capacity(paths.len());
    for path in paths {
        let relative = relative_path(root, &path);
        trace!(path = relative.as_str(); "Reading scene");
        scenes.push(SceneSource::new(relative, fs::read_to_string(&path)?));
    }

    debug!(root = root.display().to_string(), scenes = scenes.len(); "Discovered scenes");
    Ok(scenes)
}

/// Dot-prefixed entries below the root.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// `path` relative to `root`, joined with `/`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
