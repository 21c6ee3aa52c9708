//! Navigation links embedded in diagrams.
//!
//! Diagram lines carry `[[<link> <label>]]` references back to the files an
//! entity was declared in. A [`Linker`] turns a project-relative path into
//! the `<link>` part, either relative to the generated file or as an
//! absolute editor URL.

/// Computes link targets for one generated diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Linker {
    /// Climbs `depth` directories from the generated file, then descends
    /// into the project-relative path.
    Relative { depth: usize },
    /// Prefixes the project-relative path with a fixed scheme and the
    /// project directory.
    Absolute { prefix: String },
}

impl Linker {
    pub fn relative(depth: usize) -> Self {
        Self::Relative { depth }
    }

    /// Creates an absolute linker producing `<scheme><project_dir>/<path>`.
    pub fn absolute(scheme: &str, project_dir: &str) -> Self {
        let project_dir = project_dir.trim_end_matches('/');
        let prefix = if project_dir.is_empty() {
            scheme.to_string()
        } else {
            format!("{scheme}{project_dir}/")
        };
        Self::Absolute { prefix }
    }

    /// Returns the link for a project-relative `path`.
    ///
    /// An empty path has no link and yields an empty string.
    pub fn link(&self, path: &str) -> String {
        if path.trim().is_empty() {
            return String::new();
        }

        match self {
            Self::Relative { depth } => format!("{}{path}", "../".repeat(*depth)),
            Self::Absolute { prefix } => format!("{prefix}{path}"),
        }
    }
}
