//! Diagram export.
//!
//! - [`link`]: navigation links embedded in diagram lines
//! - [`puml`]: PlantUML rendering of entity diagrams

pub mod link;
pub mod puml;

pub use link::Linker;
pub use puml::PumlRenderer;
