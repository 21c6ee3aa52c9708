//! Entity structure of a project.
//!
//! This module turns parsed scenes and declaration fragments into the data
//! the facets and the renderer work on:
//!
//! - [`EntityIndex`]: every entity of the run, addressable by name
//! - [`RelationGraph`]: child, dependency and provision edges between them
//! - [`resolve`]: builds the graph from the index
//!
//! # Processing Flow
//!
//! 1. Scenes and declarations are indexed by file stem
//! 2. Every entity is resolved once, in index order, adding edges
//! 3. The finished index and graph are only read from then on

mod entity;
mod graph;
mod index;
mod resolve;

pub use entity::{Entity, EntityId, FileKind};
pub use graph::{DuplicateEdge, Edge, EdgeIndex, Relation, RelationGraph};
pub use index::EntityIndex;
pub use resolve::resolve;

pub(crate) use resolve::provided_type;
