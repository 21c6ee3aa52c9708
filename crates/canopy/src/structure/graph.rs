//! Relation graph between entities.
//!
//! This module stores the edges the resolver discovers between entities.
//! It is a small adjacency-list graph keyed by [`EntityId`]: edges live in a
//! single `Vec` and every node keeps the indices of its incoming and outgoing
//! edges, so both directions of a relation can be walked without a search.
//!
//! # Architecture
//!
//! - [`Relation`]: the category of an edge (containment, dependency,
//!   provision)
//! - [`Edge`]: source, target, relation and the member that produced it
//! - [`RelationGraph`]: the graph itself
//!
//! Every `(source, target, relation)` triple is stored at most once. Adding
//! it again fails with [`DuplicateEdge`] and leaves the first edge in place.

use std::{collections::HashMap, fmt};

use thiserror::Error;

use super::EntityId;

// =============================================================================
// Edge primitives
// =============================================================================

/// Category of a relation between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The target is structurally contained by the source.
    Child,
    /// The target is injected into the source.
    Dependency,
    /// The source provides a value of the target type.
    Provision,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Child => write!(f, "child"),
            Relation::Dependency => write!(f, "dependency"),
            Relation::Provision => write!(f, "provision"),
        }
    }
}

/// Index of an edge in a [`RelationGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIndex(usize);

/// A directed edge between two entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: EntityId,
    target: EntityId,
    relation: Relation,
    member: Option<String>,
}

impl Edge {
    pub fn source(&self) -> EntityId {
        self.source
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// The member, scene node or parameter name that produced the edge.
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }
}

/// An edge with the same source, target and relation already exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate {relation} edge {source_id} -> {target_id}")]
pub struct DuplicateEdge {
    pub source_id: EntityId,
    pub target_id: EntityId,
    pub relation: Relation,
    /// The edge that was kept.
    pub existing: EdgeIndex,
}

// =============================================================================
// Graph
// =============================================================================

/// Directed multi-relation graph between entities.
#[derive(Debug, Default)]
pub struct RelationGraph {
    edges: Vec<Edge>,
    incoming_edges: HashMap<EntityId, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<EntityId, Vec<EdgeIndex>>,
}

impl RelationGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the edge at `idx`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub fn edge(&self, idx: EdgeIndex) -> &Edge {
        &self.edges[idx.0]
    }

    /// Returns an iterator over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Returns the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the outgoing edges of `source` with the given relation, in
    /// insertion order.
    pub fn outgoing(&self, source: EntityId, relation: Relation) -> impl Iterator<Item = &Edge> {
        self.outgoing_edges
            .get(&source)
            .into_iter()
            .flatten()
            .map(|idx| &self.edges[idx.0])
            .filter(move |edge| edge.relation == relation)
    }

    /// Returns the incoming edges of `target` with the given relation, in
    /// insertion order.
    pub fn incoming(&self, target: EntityId, relation: Relation) -> impl Iterator<Item = &Edge> {
        self.incoming_edges
            .get(&target)
            .into_iter()
            .flatten()
            .map(|idx| &self.edges[idx.0])
            .filter(move |edge| edge.relation == relation)
    }

    /// Returns the entities `source` points at through `relation`.
    pub fn targets(&self, source: EntityId, relation: Relation) -> impl Iterator<Item = EntityId> {
        self.outgoing(source, relation).map(Edge::target)
    }

    /// Returns the entities pointing at `target` through `relation`.
    ///
    /// For [`Relation::Child`] these are the parents of `target`.
    pub fn sources(&self, target: EntityId, relation: Relation) -> impl Iterator<Item = EntityId> {
        self.incoming(target, relation).map(Edge::source)
    }

    /// Checks whether the `(source, target, relation)` edge exists.
    pub fn contains(&self, source: EntityId, target: EntityId, relation: Relation) -> bool {
        self.find(source, target, relation).is_some()
    }

    /// Returns the member name recorded on the `(source, target, relation)`
    /// edge, if the edge exists and has one.
    pub fn member(&self, source: EntityId, target: EntityId, relation: Relation) -> Option<&str> {
        self.find(source, target, relation)
            .and_then(|idx| self.edges[idx.0].member())
    }

    /// Adds a directed edge.
    ///
    /// # Errors
    /// Returns [`DuplicateEdge`] if the same source, target and relation are
    /// already connected. The existing edge, including its member name, is
    /// kept.
    ///
    /// # Panics
    /// Panics in debug mode on a [`Relation::Child`] edge from an entity to
    /// itself. Callers must filter self-containment before adding edges.
    pub fn add_edge(
        &mut self,
        source: EntityId,
        target: EntityId,
        relation: Relation,
        member: Option<&str>,
    ) -> Result<EdgeIndex, DuplicateEdge> {
        debug_assert!(
            !(relation == Relation::Child && source == target),
            "Adding edge: entity {source} cannot contain itself",
        );

        if let Some(existing) = self.find(source, target, relation) {
            return Err(DuplicateEdge {
                source_id: source,
                target_id: target,
                relation,
                existing,
            });
        }

        self.edges.push(Edge {
            source,
            target,
            relation,
            member: member.map(str::to_string),
        });

        let idx = EdgeIndex(self.edges.len() - 1);
        self.outgoing_edges.entry(source).or_default().push(idx);
        self.incoming_edges.entry(target).or_default().push(idx);
        Ok(idx)
    }

    fn find(&self, source: EntityId, target: EntityId, relation: Relation) -> Option<EdgeIndex> {
        self.outgoing_edges
            .get(&source)?
            .iter()
            .copied()
            .find(|idx| {
                let edge = &self.edges[idx.0];
                edge.target == target && edge.relation == relation
            })
    }
}
