//! `[Provisions]`: explicit implementations of the provide interface.

use super::{Facet, FacetContext, FacetItem, FacetOrder, declaration};
use crate::structure::{EntityId, Relation, provided_type};

/// Lists provided types in declaration order, named after the provided
/// type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionFacet;

impl Facet for ProvisionFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::First
    }

    fn title(&self) -> &'static str {
        "[Provisions]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        let Some(declaration) = declaration(ctx, id) else {
            return Vec::new();
        };

        declaration
            .methods()
            .filter_map(|method| {
                let provided = provided_type(method, ctx.markers())?;
                let target = ctx
                    .index()
                    .resolve(provided)
                    .filter(|&target| ctx.graph().contains(id, target, Relation::Provision));
                Some(FacetItem::new(provided, Some(provided), method.line()).with_entity(target))
            })
            .collect()
    }

    fn render<'a>(
        &self,
        ctx: &'a FacetContext<'a>,
        id: EntityId,
        items: &'a [FacetItem],
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let own = ctx.own_link(id);
        Box::new(items.iter().map(move |item| ctx.item_line(&own, item)))
    }
}
