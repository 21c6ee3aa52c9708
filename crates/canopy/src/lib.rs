//! Canopy - hierarchy class diagrams for scene-based game projects.
//!
//! Canopy reads a project's scene files together with the type declarations
//! of its scripts, works out which entities contain, depend on or provide
//! which others, and renders one PlantUML class diagram per requested
//! entity.
//!
//! # Processing Flow
//!
//! 1. Every scene is parsed; malformed scenes are set aside as failures
//! 2. Scenes and declarations are indexed into entities by file stem
//! 3. Relations between entities are resolved into a graph
//! 4. Each requested entity is rendered through the facet registry

pub mod config;
pub mod export;
pub mod facet;
pub mod structure;

mod error;

pub use error::CanopyError;

use log::{debug, info, warn};

use canopy_core::declaration::TypeDeclaration;
use canopy_parser::error::ParseError;

use config::AppConfig;
use export::{Linker, PumlRenderer};
use facet::{FacetContext, FacetRegistry};
use structure::{Entity, EntityIndex};

/// A scene file handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSource {
    /// Path relative to the project directory, with `/` separators.
    pub path: String,
    pub text: String,
}

impl SceneSource {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Everything one run works on.
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    /// Project root, used for absolute links.
    pub project_dir: String,
    pub scenes: Vec<SceneSource>,
    /// Declaration fragments, with files relative to `project_dir`.
    pub declarations: Vec<TypeDeclaration>,
}

/// One generated diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOutput {
    /// Name of the diagrammed entity.
    pub entity: String,
    /// Output file path relative to the project directory.
    pub path: String,
    /// Number of directories between the project root and `path`.
    pub depth: usize,
    /// Complete `@startuml` document.
    pub contents: String,
}

/// A scene that could not be parsed. The rest of the run is unaffected.
#[derive(Debug, Clone)]
pub struct SceneFailure {
    pub path: String,
    pub source: String,
    pub error: ParseError,
}

impl From<SceneFailure> for CanopyError {
    fn from(failure: SceneFailure) -> Self {
        CanopyError::new_parse_error(failure.error, failure.source, failure.path)
    }
}

/// Result of a run: the diagrams plus the scenes that were skipped.
#[derive(Debug, Default)]
pub struct Generation {
    pub outputs: Vec<DiagramOutput>,
    pub failures: Vec<SceneFailure>,
}

/// Generates hierarchy diagrams for a project.
///
/// # Examples
///
/// ```rust
/// use canopy::{Generator, ProjectInput, SceneSource, config::AppConfig};
/// use canopy_core::declaration::{Attribute, DeclarationKind, TypeDeclaration};
///
/// let input = ProjectInput {
///     project_dir: "/work/game".to_string(),
///     scenes: vec![SceneSource::new(
///         "scenes/World.tscn",
///         "[gd_scene format=3]\n\n[node name=\"World\" type=\"Node3D\"]\n",
///     )],
///     declarations: vec![
///         TypeDeclaration::new(DeclarationKind::Class, "World", "src/World.cs")
///             .with_attribute(Attribute::new("ClassDiagram")),
///     ],
/// };
///
/// let generation = Generator::new(AppConfig::default())
///     .generate(&input)
///     .expect("Failed to generate");
///
/// assert_eq!(generation.outputs[0].path, "scenes/World.g.puml");
/// assert!(generation.failures.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Generator {
    config: AppConfig,
    registry: FacetRegistry,
}

impl Generator {
    /// Create a new generator with the given configuration and the standard
    /// facets.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            registry: FacetRegistry::standard(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs the whole pipeline over `input`.
    ///
    /// # Errors
    ///
    /// Returns `CanopyError::Export` if a diagram cannot be assembled.
    /// Malformed scenes are not errors; they are reported in
    /// [`Generation::failures`].
    pub fn generate(&self, input: &ProjectInput) -> Result<Generation, CanopyError> {
        info!(scenes = input.scenes.len(), declarations = input.declarations.len(); "Generating diagrams");

        let mut failures = Vec::new();
        let mut scenes = Vec::new();
        for source in &input.scenes {
            match canopy_parser::parse_scene(&source.text, &source.path) {
                Ok(scene) => scenes.push(scene),
                Err(error) => {
                    warn!(path = source.path.as_str(); "Skipping malformed scene: {error}");
                    failures.push(SceneFailure {
                        path: source.path.clone(),
                        source: source.text.clone(),
                        error,
                    });
                }
            }
        }

        let markers = self.config.markers();
        let index = EntityIndex::build(scenes, input.declarations.iter().cloned(), markers);
        let graph = structure::resolve(&index, markers);

        let mut outputs = Vec::new();
        for (id, entity) in index.iter().filter(|(_, entity)| self.is_requested(entity)) {
            let path = output_path(entity);
            let depth = path.matches('/').count();
            let options = self.config.diagram().options(entity.diagram_attribute());
            let linker = if options.absolute_links {
                Linker::absolute(self.config.diagram().link_scheme(), &input.project_dir)
            } else {
                Linker::relative(depth)
            };

            let ctx = FacetContext::new(&index, &graph, markers, options, linker);
            let diagram = PumlRenderer::new(&ctx, &self.registry).render(id)?;
            debug!(entity = entity.name(), path = path.as_str(), depth = depth; "Rendered diagram");

            outputs.push(DiagramOutput {
                entity: entity.name().to_string(),
                path,
                depth,
                contents: format!("@startuml\n{diagram}\n@enduml\n"),
            });
        }

        info!(diagrams = outputs.len(), failures = failures.len(); "Generation finished");
        Ok(Generation { outputs, failures })
    }

    fn is_requested(&self, entity: &Entity) -> bool {
        entity.diagram_attribute().is_some() || self.config.diagram().includes(entity.name())
    }
}

/// `<dir of entity file>/<Name>.g.puml`.
fn output_path(entity: &Entity) -> String {
    match entity.file().rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{}.g.puml", entity.name()),
        None => format!("{}.g.puml", entity.name()),
    }
}
