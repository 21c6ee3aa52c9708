//! `[Nodes]`: scene nodes instancing other entities.

use super::{Facet, FacetContext, FacetItem, FacetOrder, Nesting};
use crate::structure::EntityId;

/// Lists scene nodes in file order whose type names another entity exactly.
///
/// Items link to the `[node]` header line in the scene file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFacet;

impl Facet for NodeFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::Middle
    }

    fn title(&self) -> &'static str {
        "[Nodes]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        let Some(scene) = ctx.entity(id).scene() else {
            return Vec::new();
        };

        scene
            .nodes()
            .iter()
            .filter_map(|node| {
                let type_name = node.type_name()?;
                let target = ctx.index().lookup(type_name).filter(|&target| target != id)?;
                Some(FacetItem::new(type_name, Some(node.name()), node.line()).with_entity(Some(target)))
            })
            .collect()
    }

    fn render<'a>(
        &self,
        ctx: &'a FacetContext<'a>,
        id: EntityId,
        items: &'a [FacetItem],
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let scene_link = ctx.linker().link(ctx.entity(id).file());
        Box::new(items.iter().map(move |item| ctx.item_line(&scene_link, item)))
    }

    fn nesting(&self) -> Nesting {
        Nesting::Always
    }
}
