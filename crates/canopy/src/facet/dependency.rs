//! `[Dependencies]`: properties carrying the dependency attribute.

use super::{Facet, FacetContext, FacetItem, FacetOrder, declaration};
use crate::structure::{EntityId, Relation};

/// Lists injected dependencies in declaration order.
///
/// Every marked property is listed. Only those whose type resolved to a
/// dependency edge link to the injected entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyFacet;

impl Facet for DependencyFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::First
    }

    fn title(&self) -> &'static str {
        "[Dependencies]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        let Some(declaration) = declaration(ctx, id) else {
            return Vec::new();
        };
        let attribute = ctx.markers().dependency_attribute();

        declaration
            .properties()
            .filter(|property| property.has_attribute(attribute))
            .map(|property| {
                let target = ctx
                    .index()
                    .resolve(property.type_name())
                    .filter(|&target| ctx.graph().contains(id, target, Relation::Dependency));
                FacetItem::new(property.type_name(), Some(property.name()), property.line())
                    .with_entity(target)
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
