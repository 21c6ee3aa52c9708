//! # Canopy Parser
//!
//! Parser for Godot-style text scene files (`.tscn`). The pipeline turns
//! source text into a [`canopy_core::scene::SceneTree`]: the root node, its
//! descendants and the script each node carries.
//!
//! ## Usage
//!
//! ```
//! # use canopy_parser::{parse_scene, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//! [gd_scene load_steps=2 format=3]
//!
//! [ext_resource type="Script" path="res://World.cs" id="1_w"]
//!
//! [node name="World" type="Node3D"]
//! script = ExtResource("1_w")
//!
//! [node name="Player" type="CharacterBody3D" parent="."]
//! "#;
//!
//!     let tree = parse_scene(source, "World.tscn")?;
//!     assert_eq!(tree.script(), Some("World.cs"));
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use span::{Location, Span};

use canopy_core::scene::SceneTree;

use elaborate::Builder;
use error::ParseError;

/// Parse scene source text into a [`SceneTree`].
///
/// The pipeline runs in three steps:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Group tokens into sections and properties
/// 3. **Elaborate** - Resolve external resources and build the node tree
///
/// # Arguments
///
/// * `source` - The scene file contents
/// * `path` - Path of the scene, stored on the returned tree and used in logs
///
/// # Errors
///
/// Returns a [`ParseError`] with every diagnostic collected in the failing
/// phase. Lexing and elaboration report all problems they find; parsing
/// stops at the first malformed construct.
pub fn parse_scene(source: &str, path: &str) -> Result<SceneTree, ParseError> {
    let tokens = lexer::tokenize(source)?;

    let sections = parser::build_sections(&tokens)?;

    Builder::new(source, path).build(&sections)
}
