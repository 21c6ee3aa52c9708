//! PlantUML class diagram rendering.
//!
//! An entity renders as a `class` block holding one section per non-empty
//! facet. When some of its facets reference entities that should be drawn
//! as well, the class block is wrapped in a `package` together with the
//! nested blocks of those children and one relationship line per child:
//!
//! ```text
//! package World-Scene [[scenes/World.tscn]] {
//!     class World {
//!         [[src/World.cs ScriptFile]]
//!         --
//!         [Nodes]
//!         [[scenes/World.tscn:11 player1]] - [[src/Player.cs Script]]
//!     }
//!     class Player {
//!         ...
//!     }
//!     World::player1 --> Player
//! }
//! ```

use std::{collections::HashSet, fmt::Write};

use log::debug;

use crate::{
    error::CanopyError,
    facet::{Facet, FacetContext, FacetItem, FacetRegistry, Nesting},
    structure::{EntityId, FileKind, Relation},
};

const INDENT: usize = 4;

/// Renders entity diagrams from resolved facets.
#[derive(Debug)]
pub struct PumlRenderer<'a> {
    ctx: &'a FacetContext<'a>,
    registry: &'a FacetRegistry,
}

/// State carried through one recursive render.
#[derive(Debug, Default)]
struct RenderState {
    out: String,
    /// Entities on the path from the requested entity to the current one.
    ancestors: Vec<EntityId>,
    /// Entities already drawn in this diagram.
    rendered: HashSet<EntityId>,
}

impl<'a> PumlRenderer<'a> {
    pub fn new(ctx: &'a FacetContext<'a>, registry: &'a FacetRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Renders the diagram body for entity `id`, without the
    /// `@startuml`/`@enduml` envelope or a trailing newline.
    pub fn render(&self, id: EntityId) -> Result<String, CanopyError> {
        let mut state = RenderState::default();
        self.render_entity(&mut state, id, 0)?;

        let trimmed = state.out.trim_end().len();
        state.out.truncate(trimmed);
        Ok(state.out)
    }

    fn render_entity(&self, state: &mut RenderState, id: EntityId, level: usize) -> Result<(), CanopyError> {
        let sections = self.sections(id);
        let children = self.drawable_children(id, &sections, &state.ancestors);
        state.rendered.insert(id);

        if children.is_empty() {
            return self.write_class(state, id, &sections, level);
        }

        let entity = self.ctx.entity(id);
        let kind = if entity.is_scene() { "Scene" } else { "Type" };
        let link = self.ctx.linker().link(entity.file());
        write_line(&mut state.out, level, &format!("package {}-{kind} [[{link}]] {{", entity.name()))?;

        self.write_class(state, id, &sections, level + 1)?;

        state.ancestors.push(id);
        for &child in &children {
            if state.rendered.contains(&child) {
                debug!(entity = entity.name(), child = self.ctx.entity(child).name(); "Child already drawn");
                continue;
            }
            self.render_entity(state, child, level + 1)?;
        }

        for &child in &children {
            let relationship = self.relationship(id, child, &state.ancestors);
            write_line(&mut state.out, level + 1, &relationship)?;
        }
        state.ancestors.pop();

        write_line(&mut state.out, level, "}")?;
        Ok(())
    }

    /// Extracts every facet of `id`, keeping the empty ones.
    fn sections(&self, id: EntityId) -> Vec<(&'a dyn Facet, Vec<FacetItem>)> {
        self.registry
            .iter()
            .map(|facet| (facet, facet.extract(self.ctx, id)))
            .collect()
    }

    fn has_content(&self, id: EntityId) -> bool {
        self.registry
            .iter()
            .any(|facet| !facet.extract(self.ctx, id).is_empty())
    }

    /// Entities to nest inside the package of `id`, in order of first
    /// reference.
    ///
    /// `ancestors` are the entities whose packages enclose `id`. They are
    /// never nested again, which breaks reference cycles.
    fn drawable_children(
        &self,
        id: EntityId,
        sections: &[(&'a dyn Facet, Vec<FacetItem>)],
        ancestors: &[EntityId],
    ) -> Vec<EntityId> {
        let mut children = Vec::new();

        for (facet, items) in sections {
            let nesting = facet.nesting();
            if nesting == Nesting::Never {
                continue;
            }

            for child in items.iter().filter_map(FacetItem::entity) {
                if child == id || children.contains(&child) {
                    continue;
                }
                if ancestors.contains(&child) {
                    debug!(
                        entity = self.ctx.entity(id).name(),
                        child = self.ctx.entity(child).name();
                        "Breaking reference cycle"
                    );
                    continue;
                }
                if nesting == Nesting::Always || self.has_content(child) {
                    children.push(child);
                }
            }
        }

        children
    }

    /// `<Parent>::<member> --> <Child>`, with `--->` when the child has its
    /// own nested children.
    fn relationship(&self, id: EntityId, child: EntityId, ancestors: &[EntityId]) -> String {
        let parent = self.ctx.entity(id);
        let child_entity = self.ctx.entity(child);
        let member = self
            .ctx
            .graph()
            .member(id, child, Relation::Child)
            .unwrap_or(child_entity.name());

        let grandchildren = self.drawable_children(child, &self.sections(child), ancestors);
        let arrow = if grandchildren.is_empty() { "-->" } else { "--->" };

        format!("{}::{member} {arrow} {}", parent.name(), child_entity.name())
    }

    fn write_class(
        &self,
        state: &mut RenderState,
        id: EntityId,
        sections: &[(&'a dyn Facet, Vec<FacetItem>)],
        level: usize,
    ) -> Result<(), CanopyError> {
        let entity = self.ctx.entity(id);
        let (path, kind) = entity.link_target();
        let spot = match kind {
            FileKind::Script => "",
            FileKind::Scene => " << (S,black) >>",
        };
        let out = &mut state.out;

        write_line(out, level, &format!("class {}{spot} {{", entity.name()))?;
        write_line(out, level + 1, &format!("[[{} {kind}File]]", self.ctx.linker().link(path)))?;

        for (facet, items) in sections.iter().filter(|(_, items)| !items.is_empty()) {
            write_line(out, level + 1, "--")?;
            write_line(out, level + 1, facet.title())?;
            for line in facet.render(self.ctx, id, items) {
                write_line(out, level + 1, &line)?;
            }
        }

        write_line(out, level, "}")?;
        Ok(())
    }
}

fn write_line(out: &mut String, level: usize, text: &str) -> Result<(), CanopyError> {
    writeln!(out, "{:width$}{text}", "", width = level * INDENT)?;
    Ok(())
}
