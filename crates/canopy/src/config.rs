//! Configuration types for Canopy diagram generation.
//!
//! This module provides configuration structures that control which entities
//! are diagrammed and how their diagrams are rendered. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`DiagramConfig`] - Rendering defaults shared by every diagram.
//! - [`MarkerConfig`] - Attribute and naming conventions recognized in
//!   declarations.
//! - [`RenderOptions`] - Options for a single diagram request.
//!
//! # Example
//!
//! ```
//! # use canopy::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [diagram]
//!     show_all_methods = true
//!
//!     [markers]
//!     dependency_attribute = "Inject"
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(config.diagram().show_all_methods());
//! assert_eq!(config.markers().dependency_attribute(), "Inject");
//! assert_eq!(config.markers().diagram_attribute(), "ClassDiagram");
//! ```

use serde::Deserialize;

use canopy_core::declaration::Attribute;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Diagram rendering section.
    #[serde(default)]
    diagram: DiagramConfig,

    /// Declaration marker section.
    #[serde(default)]
    markers: MarkerConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(diagram: DiagramConfig, markers: MarkerConfig) -> Self {
        Self { diagram, markers }
    }

    /// Returns the diagram configuration.
    pub fn diagram(&self) -> &DiagramConfig {
        &self.diagram
    }

    /// Returns the marker configuration.
    pub fn markers(&self) -> &MarkerConfig {
        &self.markers
    }
}

/// Rendering defaults applied to every diagram request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Link with absolute `link_scheme` URLs instead of relative paths.
    use_absolute_links: bool,

    /// List every plain property, not only those typed as known entities.
    show_all_members: bool,

    /// List plain methods.
    show_all_methods: bool,

    /// Prefix for absolute links.
    link_scheme: String,

    /// Entity names to diagram even without the diagram marker attribute.
    include: Vec<String>,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            use_absolute_links: false,
            show_all_members: false,
            show_all_methods: false,
            link_scheme: "vscode://file/".to_string(),
            include: Vec::new(),
        }
    }
}

impl DiagramConfig {
    pub fn use_absolute_links(&self) -> bool {
        self.use_absolute_links
    }

    pub fn show_all_members(&self) -> bool {
        self.show_all_members
    }

    pub fn show_all_methods(&self) -> bool {
        self.show_all_methods
    }

    pub fn link_scheme(&self) -> &str {
        &self.link_scheme
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Returns a copy with `name` added to the include list.
    pub fn with_include(mut self, name: impl Into<String>) -> Self {
        self.include.push(name.into());
        self
    }

    /// Returns a copy with absolute links switched on or off.
    pub fn with_absolute_links(mut self, enabled: bool) -> Self {
        self.use_absolute_links = enabled;
        self
    }

    /// Returns `true` if `name` is in the include list.
    pub fn includes(&self, name: &str) -> bool {
        self.include.iter().any(|included| included == name)
    }

    /// Computes the options for one diagram request.
    ///
    /// The configured defaults are OR'ed with the boolean named arguments of
    /// the diagram marker attribute, so an attribute can switch an option on
    /// but never off.
    pub fn options(&self, attribute: Option<&Attribute>) -> RenderOptions {
        let flag = |names: &[&str]| {
            attribute.is_some_and(|attribute| names.iter().any(|name| attribute.flag(name)))
        };

        RenderOptions {
            absolute_links: self.use_absolute_links
                || flag(&["UseVSCodePaths", "UseAbsoluteLinks"]),
            show_all_members: self.show_all_members
                || flag(&["ShowAllProperties", "ShowAllMembers"]),
            show_all_methods: self.show_all_methods || flag(&["ShowAllMethods"]),
        }
    }
}

/// Attribute names and naming conventions recognized in declarations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Type attribute requesting a diagram.
    diagram_attribute: String,

    /// Property attribute marking an injected dependency.
    dependency_attribute: String,

    /// Generic interface whose explicit implementations provide a value.
    provide_interface: String,

    /// Leading character of interface names.
    interface_prefix: char,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            diagram_attribute: "ClassDiagram".to_string(),
            dependency_attribute: "Dependency".to_string(),
            provide_interface: "IProvide".to_string(),
            interface_prefix: 'I',
        }
    }
}

impl MarkerConfig {
    pub fn diagram_attribute(&self) -> &str {
        &self.diagram_attribute
    }

    pub fn dependency_attribute(&self) -> &str {
        &self.dependency_attribute
    }

    pub fn provide_interface(&self) -> &str {
        &self.provide_interface
    }

    pub fn interface_prefix(&self) -> char {
        self.interface_prefix
    }

    /// Returns the interface name conventionally paired with `type_name`.
    pub fn interface_name(&self, type_name: &str) -> String {
        format!("{}{type_name}", self.interface_prefix)
    }
}

/// Options for rendering one requested diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub absolute_links: bool,
    pub show_all_members: bool,
    pub show_all_methods: bool,
}
