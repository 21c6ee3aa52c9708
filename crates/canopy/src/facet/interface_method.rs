//! `[Interface Methods]`: methods the paired interface exposes.

use super::{
    Facet, FacetContext, FacetItem, FacetOrder, declaration, interface_method_names, method_lines,
    sort_by_name,
};
use crate::structure::EntityId;

#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceMethodFacet;

impl Facet for InterfaceMethodFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::Last
    }

    fn title(&self) -> &'static str {
        "[Interface Methods]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        let Some(declaration) = declaration(ctx, id) else {
            return Vec::new();
        };
        let surfaced = interface_method_names(ctx.entity(id));

        let mut items: Vec<_> = declaration
            .methods()
            .filter(|method| method.explicit_interface().is_none() && surfaced.contains(&method.name()))
            .map(|method| FacetItem::new("", Some(method.name()), method.line()))
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
        method_lines(ctx, id, items)
    }
}
