//! Elaboration of parsed sections into a [`SceneTree`].
//!
//! External resources are collected first so node sections can reference
//! them in any order. The root node is the first `[node]` section without a
//! `parent` attribute; every other node becomes a descendant in file order.

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, trace};

use canopy_core::scene::{SceneNode, SceneTree};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{Section, Value},
    span::{Span, Spanned},
};

const RESOURCE_PREFIX: &str = "res://";

/// An `[ext_resource]` declaration.
#[derive(Debug)]
struct ExtResource {
    path: String,
    span: Span,
}

/// Builds a [`SceneTree`] from parsed sections, collecting diagnostics.
pub(crate) struct Builder<'a> {
    source: &'a str,
    path: &'a str,
    diagnostics: DiagnosticCollector,
}

impl<'a> Builder<'a> {
    pub fn new(source: &'a str, path: &'a str) -> Self {
        Self {
            source,
            path,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    pub fn build(mut self, sections: &[Section<'_>]) -> Result<SceneTree, ParseError> {
        let resources = self.collect_resources(sections);

        let mut root: Option<(SceneNode, Span)> = None;
        let mut nodes = Vec::new();

        for section in sections.iter().filter(|s| *s.tag.inner() == "node") {
            let Some(node) = self.build_node(section, &resources) else {
                continue;
            };

            if !node.is_root() {
                nodes.push(node);
                continue;
            }

            match &root {
                None => root = Some((node, section.header_span)),
                Some((first, first_span)) => {
                    self.diagnostics.emit(
                        Diagnostic::error(format!(
                            "scene declares a second root node `{}`",
                            node.name()
                        ))
                        .with_code(ErrorCode::E201)
                        .with_label(section.header_span, "second node without a parent")
                        .with_secondary_label(
                            *first_span,
                            format!("`{}` is already the root", first.name()),
                        )
                        .with_help("give the node a `parent` attribute"),
                    );
                }
            }
        }

        let Some((root, _)) = root else {
            let span = sections
                .first()
                .map(|section| section.header_span)
                .unwrap_or_default();
            self.diagnostics.emit(
                Diagnostic::error("scene has no root node")
                    .with_code(ErrorCode::E200)
                    .with_label(span, "no `[node]` section without a `parent` attribute")
                    .with_help("declare the root as `[node name=\"Root\" type=\"Node\"]`"),
            );
            return Err(self.finish_with_errors());
        };

        self.diagnostics.finish()?;

        debug!(path = self.path, root = root.name(), nodes = nodes.len(); "Elaborated scene");

        Ok(SceneTree::new(self.path, root, nodes))
    }

    fn finish_with_errors(self) -> ParseError {
        match self.diagnostics.finish() {
            Err(err) => err,
            Ok(()) => ParseError::new(Vec::new()),
        }
    }

    /// Map `[ext_resource]` ids to their paths.
    fn collect_resources(&mut self, sections: &[Section<'_>]) -> IndexMap<String, ExtResource> {
        let mut resources = IndexMap::new();

        for section in sections.iter().filter(|s| *s.tag.inner() == "ext_resource") {
            let id = section.attribute("id").and_then(|id| id.as_key());
            let path = section.attribute("path").and_then(|path| path.as_str());

            match (id, path) {
                (Some(id), Some(path)) => {
                    trace!(id = id, path = path; "External resource");
                    resources.insert(
                        id.to_string(),
                        ExtResource {
                            path: strip_resource_prefix(path).to_string(),
                            span: section.header_span,
                        },
                    );
                }
                _ => self.diagnostics.emit(
                    Diagnostic::warning("external resource without `id` or `path` is ignored")
                        .with_label(section.header_span, "incomplete resource declaration"),
                ),
            }
        }

        resources
    }

    /// Build one node declaration, or `None` if the section is unusable.
    fn build_node(
        &mut self,
        section: &Section<'_>,
        resources: &IndexMap<String, ExtResource>,
    ) -> Option<SceneNode> {
        let line = section.header_span.location(self.source).line;

        let Some(name) = section.attribute("name").and_then(|name| name.as_str()) else {
            self.diagnostics.emit(
                Diagnostic::warning("node section without `name` is ignored")
                    .with_label(section.header_span, "missing `name` attribute"),
            );
            return None;
        };

        let mut node = SceneNode::new(name, line);

        if let Some(parent) = section.attribute("parent").and_then(|p| p.as_str()) {
            node = node.with_parent(parent);
        }

        let declared_type = section.attribute("type").and_then(|t| t.as_str());
        if let Some(type_name) = declared_type {
            node = node.with_type(type_name);
        } else if let Some(instance) = section.attribute("instance") {
            if let Some(resource) = self.resolve_resource(instance, resources) {
                node = node.with_type(file_stem(&resource.path));
            }
        }

        if let Some(script) = section.property("script") {
            if let Some(resource) = self.resolve_resource(script, resources) {
                node = node.with_script(resource.path.as_str());
            }
        }

        Some(node)
    }

    /// Resolve an `ExtResource(id)` value.
    ///
    /// Values of any other shape (`null`, `SubResource(...)`) resolve to
    /// `None` silently; unknown ids are reported as E202.
    fn resolve_resource<'r>(
        &mut self,
        value: &Spanned<Value<'_>>,
        resources: &'r IndexMap<String, ExtResource>,
    ) -> Option<&'r ExtResource> {
        let id = value.ext_resource_id()?;
        let key = id.as_key()?;

        match resources.get(key) {
            Some(resource) => {
                trace!(id = key, span:? = resource.span; "Resolved external resource");
                Some(resource)
            }
            None => {
                let mut diag = Diagnostic::error(format!("unknown external resource `{key}`"))
                    .with_code(ErrorCode::E202)
                    .with_label(
                        value.span(),
                        format!("`{}` is not declared", id.span().text(self.source)),
                    );
                if let Some((_, first)) = resources.first() {
                    diag = diag.with_secondary_label(first.span, "resources are declared here");
                }
                self.diagnostics.emit(diag);
                None
            }
        }
    }
}

fn strip_resource_prefix(path: &str) -> &str {
    path.strip_prefix(RESOURCE_PREFIX).unwrap_or(path)
}

fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, parser};

    fn build(source: &str) -> Result<SceneTree, ParseError> {
        let tokens = lexer::tokenize(source).unwrap();
        let sections = parser::build_sections(&tokens).unwrap();
        Builder::new(source, "scenes/Test.tscn").build(&sections)
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("scenes/player/Player.tscn"), "Player");
        assert_eq!(file_stem("Enemy.cs"), "Enemy");
    }

    #[test]
    fn test_strip_resource_prefix() {
        assert_eq!(strip_resource_prefix("res://src/World.cs"), "src/World.cs");
        assert_eq!(strip_resource_prefix("src/World.cs"), "src/World.cs");
    }

    #[test]
    fn test_legacy_numeric_ids() {
        let tree = build(
            "[gd_scene load_steps=2 format=2]\n\
             [ext_resource path=\"res://World.cs\" type=\"Script\" id=1]\n\
             [node name=\"World\" type=\"Spatial\"]\n\
             script = ExtResource( 1 )\n",
        )
        .unwrap();

        assert_eq!(tree.script(), Some("World.cs"));
    }

    #[test]
    fn test_non_resource_script_is_ignored() {
        let tree = build("[node name=\"Root\" type=\"Node\"]\nscript = null\n").unwrap();
        assert_eq!(tree.script(), None);
    }

    #[test]
    fn test_nameless_node_is_skipped() {
        let tree = build("[node name=\"Root\" type=\"Node\"]\n[node type=\"Node\" parent=\".\"]\n")
            .unwrap();
        assert!(tree.nodes().is_empty());
    }

    #[test]
    fn test_errors_are_collected() {
        let err = build(
            "[node name=\"Root\" type=\"Node\"]\n\
             script = ExtResource(\"9\")\n\
             [node name=\"Other\" type=\"Node\"]\n",
        )
        .unwrap_err();

        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::E202, ErrorCode::E201]);
    }
}
