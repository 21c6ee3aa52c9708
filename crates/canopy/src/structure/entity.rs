//! Diagram entities.
//!
//! An [`Entity`] is one diagrammed unit: a scene file, a group of type
//! declarations sharing a source file, or a scene backed by the type
//! declared in a same-named source file.

use std::{fmt, path::Path};

use canopy_core::{
    declaration::{Attribute, TypeDeclaration},
    scene::SceneTree,
};

/// Opaque handle of an entity inside an [`EntityIndex`](super::EntityIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(usize);

impl EntityId {
    pub(super) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(super) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of file an entity links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Script,
    Scene,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Script => write!(f, "Script"),
            FileKind::Scene => write!(f, "Scene"),
        }
    }
}

/// One diagrammed unit.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    file: String,
    scene: Option<SceneTree>,
    declaration: Option<TypeDeclaration>,
    interface: Option<TypeDeclaration>,
    diagram_attribute: Option<Attribute>,
}

impl Entity {
    /// Creates a scene-rooted entity named after the scene file.
    pub fn from_scene(scene: SceneTree) -> Self {
        Self {
            name: file_stem(scene.path()).to_string(),
            file: scene.path().to_string(),
            scene: Some(scene),
            declaration: None,
            interface: None,
            diagram_attribute: None,
        }
    }

    /// Creates a declaration-only entity for the source file `file`.
    pub fn from_file(file: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            name: file_stem(&file).to_string(),
            file,
            scene: None,
            declaration: None,
            interface: None,
            diagram_attribute: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scene file for scene entities, otherwise the declaration file.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn scene(&self) -> Option<&SceneTree> {
        self.scene.as_ref()
    }

    pub fn is_scene(&self) -> bool {
        self.scene.is_some()
    }

    /// The merged class, record or struct declaration backing this entity.
    pub fn declaration(&self) -> Option<&TypeDeclaration> {
        self.declaration.as_ref()
    }

    /// The interface conventionally paired with this entity (`I<Name>`).
    pub fn interface(&self) -> Option<&TypeDeclaration> {
        self.interface.as_ref()
    }

    /// The diagram marker attribute, if any fragment carries one.
    pub fn diagram_attribute(&self) -> Option<&Attribute> {
        self.diagram_attribute.as_ref()
    }

    /// The script path: the scene's attached script, then the backing
    /// declaration's file, then the entity file itself for declaration-only
    /// entities.
    pub fn script(&self) -> Option<&str> {
        match &self.scene {
            Some(scene) => scene
                .script()
                .or_else(|| self.declaration.as_ref().map(|declaration| declaration.file())),
            None => Some(&self.file),
        }
    }

    /// The file diagram links should point at, and what kind of file it is.
    pub fn link_target(&self) -> (&str, FileKind) {
        match self.script() {
            Some(script) => (script, FileKind::Script),
            None => (&self.file, FileKind::Scene),
        }
    }

    /// Merges a class, record or struct fragment into the declaration.
    pub(super) fn absorb_declaration(&mut self, fragment: TypeDeclaration) {
        match &mut self.declaration {
            Some(declaration) => declaration.merge(fragment),
            None => self.declaration = Some(fragment),
        }
    }

    /// Merges an interface fragment into the paired interface.
    pub(super) fn absorb_interface(&mut self, fragment: TypeDeclaration) {
        match &mut self.interface {
            Some(interface) => interface.merge(fragment),
            None => self.interface = Some(fragment),
        }
    }

    pub(super) fn mark_for_diagram(&mut self, attribute: Attribute) {
        if self.diagram_attribute.is_none() {
            self.diagram_attribute = Some(attribute);
        }
    }
}

/// File name without directories and extension.
pub(crate) fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
}
