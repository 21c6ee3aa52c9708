//! `[Interface Properties]`: properties the paired interface exposes.

use super::{Facet, FacetContext, FacetItem, FacetOrder, Nesting, declaration, interface_property_names, sort_by_name};
use crate::structure::EntityId;

#[derive(Debug, Clone, Copy, Default)]
pub struct InterfacePropertyFacet;

impl Facet for InterfacePropertyFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::Middle
    }

    fn title(&self) -> &'static str {
        "[Interface Properties]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        let Some(declaration) = declaration(ctx, id) else {
            return Vec::new();
        };
        let surfaced = interface_property_names(ctx.entity(id));

        let mut items: Vec<_> = declaration
            .properties()
            .filter(|property| surfaced.contains(&property.name()))
            .map(|property| {
                FacetItem::new(property.type_name(), Some(property.name()), property.line())
                    .with_entity(ctx.index().resolve(property.type_name()))
            })
            .collect();
        sort_by_name(&mut items);
        items
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

    fn nesting(&self) -> Nesting {
        Nesting::WithContent
    }
}
