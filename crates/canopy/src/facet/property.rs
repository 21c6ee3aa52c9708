//! `[Properties]`: plain data members.

use super::{Facet, FacetContext, FacetItem, FacetOrder, Nesting, declaration, interface_property_names, sort_by_name};
use crate::structure::EntityId;

/// Lists plain properties alphabetically.
///
/// Dependency-marked, interface-surfaced and override properties belong to
/// other sections or are hidden. By default only properties whose type
/// resolves to an entity are listed; `show_all_members` lists every one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyFacet;

impl Facet for PropertyFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::Middle
    }

    fn title(&self) -> &'static str {
        "[Properties]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        let Some(declaration) = declaration(ctx, id) else {
            return Vec::new();
        };
        let surfaced = interface_property_names(ctx.entity(id));
        let dependency = ctx.markers().dependency_attribute();
        let show_all = ctx.options().show_all_members;

        let mut items: Vec<_> = declaration
            .properties()
            .filter(|property| {
                !property.is_override()
                    && !property.has_attribute(dependency)
                    && !surfaced.contains(&property.name())
            })
            .filter_map(|property| {
                let target = ctx.index().resolve(property.type_name());
                (show_all || target.is_some()).then(|| {
                    FacetItem::new(property.type_name(), Some(property.name()), property.line())
                        .with_entity(target)
                })
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
