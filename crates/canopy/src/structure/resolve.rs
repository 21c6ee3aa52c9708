//! Relationship resolution.
//!
//! Walks every entity of an [`EntityIndex`] once and records the edges it
//! implies in a [`RelationGraph`]:
//!
//! - scene nodes whose type names an entity exactly become children;
//! - plain properties and constructor parameters whose type resolves become
//!   children;
//! - properties carrying the dependency attribute become dependencies;
//! - explicit implementations of the provide interface become provisions.
//!
//! Edges are only ever added, so the resulting graph does not depend on the
//! order entities are visited in.

use log::{debug, trace, warn};

use canopy_core::declaration::{Method, ParameterList, TypeDeclaration};

use super::{
    EntityId, EntityIndex,
    graph::{Relation, RelationGraph},
};
use crate::config::MarkerConfig;

/// Resolves the relations of every entity in `index`.
pub fn resolve(index: &EntityIndex, markers: &MarkerConfig) -> RelationGraph {
    let mut resolver = Resolver {
        index,
        markers,
        graph: RelationGraph::new(),
    };

    for (id, _) in index.iter() {
        resolver.resolve_entity(id);
    }

    debug!(entities = index.len(), edges = resolver.graph.edge_count(); "Resolved relations");
    resolver.graph
}

/// Returns the type a provision method provides, if `method` explicitly
/// implements the provide interface with a single type argument.
pub(crate) fn provided_type<'a>(method: &'a Method, markers: &MarkerConfig) -> Option<&'a str> {
    method
        .explicit_interface()
        .filter(|interface| interface.name() == markers.provide_interface())
        .and_then(|interface| interface.single_type_argument())
}

struct Resolver<'a> {
    index: &'a EntityIndex,
    markers: &'a MarkerConfig,
    graph: RelationGraph,
}

impl Resolver<'_> {
    fn resolve_entity(&mut self, id: EntityId) {
        let index = self.index;
        let entity = index.get(id);

        if let Some(scene) = entity.scene() {
            for node in scene.nodes() {
                let Some(type_name) = node.type_name() else {
                    continue;
                };
                match index.lookup(type_name) {
                    Some(target) if target != id => {
                        self.add(id, target, Relation::Child, Some(node.name()));
                    }
                    Some(_) => trace!(entity = entity.name(), node = node.name(); "Skipping self-typed node"),
                    None => trace!(entity = entity.name(), type_name = type_name; "Unresolved node type"),
                }
            }
        }

        if let Some(declaration) = entity.declaration() {
            self.resolve_declaration(id, declaration);
        }
    }

    fn resolve_declaration(&mut self, id: EntityId, declaration: &TypeDeclaration) {
        let dependency_attribute = self.markers.dependency_attribute();

        for property in declaration.properties() {
            let Some(target) = self.resolve_type(id, property.type_name()) else {
                continue;
            };

            if property.has_attribute(dependency_attribute) {
                self.add(id, target, Relation::Dependency, Some(property.name()));
            } else if target != id && !self.graph.contains(id, target, Relation::Child) {
                self.add(id, target, Relation::Child, Some(property.name()));
            }
        }

        for method in declaration.methods() {
            let Some(provided) = provided_type(method, self.markers) else {
                continue;
            };
            if let Some(target) = self.resolve_type(id, provided) {
                self.add(id, target, Relation::Provision, Some(method.name()));
            }
        }

        let constructors = declaration
            .primary_constructor()
            .into_iter()
            .chain(declaration.constructors());
        for parameters in constructors {
            self.resolve_parameters(id, parameters);
        }
    }

    fn resolve_parameters(&mut self, id: EntityId, parameters: &ParameterList) {
        for parameter in parameters.parameters() {
            let Some(target) = self.resolve_type(id, parameter.type_name()) else {
                continue;
            };
            if target != id && !self.graph.contains(id, target, Relation::Child) {
                self.add(id, target, Relation::Child, Some(parameter.name()));
            }
        }
    }

    fn resolve_type(&self, id: EntityId, type_name: &str) -> Option<EntityId> {
        let target = self.index.resolve(type_name);
        if target.is_none() {
            trace!(entity = self.index.get(id).name(), type_name = type_name; "Unresolved type");
        }
        target
    }

    fn add(&mut self, source: EntityId, target: EntityId, relation: Relation, member: Option<&str>) {
        if let Err(err) = self.graph.add_edge(source, target, relation, member) {
            warn!(
                entity = self.index.get(source).name(),
                target = self.index.get(target).name(),
                member = member.unwrap_or_default();
                "{err}"
            );
        }
    }
}
