//! Facets of an entity diagram.
//!
//! A facet is one section of an entity's class block: its dependencies, its
//! properties, its scene nodes and so on. Each facet works in two steps:
//!
//! 1. [`Facet::extract`] collects [`FacetItem`]s from the entity, optionally
//!    cross-referencing another entity per item.
//! 2. [`Facet::render`] turns those items into diagram lines.
//!
//! Facets are stateless. The [`FacetRegistry`] holds the fixed list of
//! facets in render order.

mod constructor;
mod dependency;
mod interface_method;
mod interface_property;
mod method;
mod node;
mod property;
mod provision;

use std::fmt;

use canopy_core::declaration::TypeDeclaration;

pub use constructor::ConstructorFacet;
pub use dependency::DependencyFacet;
pub use interface_method::InterfaceMethodFacet;
pub use interface_property::InterfacePropertyFacet;
pub use method::MethodFacet;
pub use node::NodeFacet;
pub use property::PropertyFacet;
pub use provision::ProvisionFacet;

use crate::{
    config::{MarkerConfig, RenderOptions},
    export::link::Linker,
    structure::{Entity, EntityId, EntityIndex, RelationGraph},
};

/// Render tier of a facet. Lower tiers are rendered first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetOrder {
    First = 0,
    Middle = 100,
    Last = 200,
}

/// How a facet's cross-referenced entities are drawn inside the package of
/// the entity being diagrammed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    /// Referenced entities are only linked.
    Never,
    /// Referenced entities are nested when they have content of their own.
    WithContent,
    /// Referenced entities are always nested.
    Always,
}

/// One extracted fact about an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetItem {
    entity: Option<EntityId>,
    type_name: String,
    name: Option<String>,
    line: usize,
}

impl FacetItem {
    pub fn new(type_name: impl Into<String>, name: Option<&str>, line: usize) -> Self {
        Self {
            entity: None,
            type_name: type_name.into(),
            name: name.map(str::to_string),
            line,
        }
    }

    /// Cross-references the item to `entity`.
    pub fn with_entity(mut self, entity: Option<EntityId>) -> Self {
        self.entity = entity;
        self
    }

    /// The related entity, if the item's type resolved to one.
    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    /// The declared type name as written.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The member, parameter or node name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Source line the item links back to.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Everything a facet may read while extracting and rendering.
#[derive(Debug)]
pub struct FacetContext<'a> {
    index: &'a EntityIndex,
    graph: &'a RelationGraph,
    markers: &'a MarkerConfig,
    options: RenderOptions,
    linker: Linker,
}

impl<'a> FacetContext<'a> {
    pub fn new(
        index: &'a EntityIndex,
        graph: &'a RelationGraph,
        markers: &'a MarkerConfig,
        options: RenderOptions,
        linker: Linker,
    ) -> Self {
        Self {
            index,
            graph,
            markers,
            options,
            linker,
        }
    }

    pub fn index(&self) -> &'a EntityIndex {
        self.index
    }

    pub fn graph(&self) -> &'a RelationGraph {
        self.graph
    }

    pub fn markers(&self) -> &'a MarkerConfig {
        self.markers
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn linker(&self) -> &Linker {
        &self.linker
    }

    pub fn entity(&self, id: EntityId) -> &'a Entity {
        self.index.get(id)
    }

    /// Link to the file an entity's members are declared in.
    pub fn own_link(&self, id: EntityId) -> String {
        let (path, _) = self.entity(id).link_target();
        self.linker.link(path)
    }

    /// `[[<link> <Kind>]]` reference to another entity's file.
    pub fn file_reference(&self, id: EntityId) -> String {
        let (path, kind) = self.entity(id).link_target();
        format!("[[{} {kind}]]", self.linker.link(path))
    }

    /// Standard item line: `[[<own>:<line> <name>]]`, followed by
    /// ` - [[<child> Script]]` when the item is cross-referenced.
    pub fn item_line(&self, own: &str, item: &FacetItem) -> String {
        let mut line = format!("[[{own}:{} {}]]", item.line(), item.name().unwrap_or_default());
        if let Some(child) = item.entity() {
            line.push_str(" - ");
            line.push_str(&self.file_reference(child));
        }
        line
    }
}

/// One section of an entity's class block.
pub trait Facet: fmt::Debug {
    /// Render tier.
    fn order(&self) -> FacetOrder;

    /// Section heading, such as `[Properties]`.
    fn title(&self) -> &'static str;

    /// Collects the items of entity `id`, already in render order.
    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem>;

    /// Lazily renders previously extracted items as diagram lines.
    fn render<'a>(
        &self,
        ctx: &'a FacetContext<'a>,
        id: EntityId,
        items: &'a [FacetItem],
    ) -> Box<dyn Iterator<Item = String> + 'a>;

    /// Whether cross-referenced items of this facet are drawn nested inside
    /// the entity's package.
    fn nesting(&self) -> Nesting {
        Nesting::Never
    }
}

/// The fixed, ordered list of facets.
#[derive(Debug)]
pub struct FacetRegistry {
    facets: Vec<Box<dyn Facet>>,
}

impl FacetRegistry {
    /// Creates a registry, stably sorting `facets` by [`FacetOrder`].
    pub fn new(mut facets: Vec<Box<dyn Facet>>) -> Self {
        facets.sort_by_key(|facet| facet.order());
        Self { facets }
    }

    /// The facets every diagram is built from.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(DependencyFacet),
            Box::new(ProvisionFacet),
            Box::new(InterfacePropertyFacet),
            Box::new(PropertyFacet),
            Box::new(ConstructorFacet),
            Box::new(NodeFacet),
            Box::new(InterfaceMethodFacet),
            Box::new(MethodFacet),
        ])
    }

    /// Iterates over the facets in render order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Facet> {
        self.facets.iter().map(|facet| facet.as_ref())
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

impl Default for FacetRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Names of the properties of the entity's paired interface.
fn interface_property_names(entity: &Entity) -> Vec<&str> {
    entity
        .interface()
        .map(|interface| interface.properties().map(|p| p.name()).collect())
        .unwrap_or_default()
}

/// Names of the methods of the entity's paired interface.
fn interface_method_names(entity: &Entity) -> Vec<&str> {
    entity
        .interface()
        .map(|interface| interface.methods().map(|m| m.name()).collect())
        .unwrap_or_default()
}

/// Renders `[[<own>:<line> <name>()]]` method lines.
fn method_lines<'a>(
    ctx: &'a FacetContext<'a>,
    id: EntityId,
    items: &'a [FacetItem],
) -> Box<dyn Iterator<Item = String> + 'a> {
    let own = ctx.own_link(id);
    Box::new(items.iter().map(move |item| {
        format!("[[{own}:{} {}()]]", item.line(), item.name().unwrap_or_default())
    }))
}

/// Sorts items alphabetically by name, keeping declaration order for ties.
fn sort_by_name(items: &mut [FacetItem]) {
    items.sort_by(|a, b| a.name().cmp(&b.name()));
}

fn declaration<'a>(ctx: &FacetContext<'a>, id: EntityId) -> Option<&'a TypeDeclaration> {
    ctx.entity(id).declaration()
}
