//! `[Methods]`: plain methods, listed only on request.

use super::{Facet, FacetContext, FacetItem, FacetOrder, declaration, interface_method_names, method_lines, sort_by_name};
use crate::structure::{EntityId, provided_type};

/// Lists methods alphabetically when `show_all_methods` is set.
///
/// Provision methods, interface-surfaced methods and overrides are left
/// out. Other explicit interface implementations are named
/// `Interface.Method`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodFacet;

impl Facet for MethodFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::Last
    }

    fn title(&self) -> &'static str {
        "[Methods]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        if !ctx.options().show_all_methods {
            return Vec::new();
        }
        let Some(declaration) = declaration(ctx, id) else {
            return Vec::new();
        };
        let surfaced = interface_method_names(ctx.entity(id));

        let mut items: Vec<_> = declaration
            .methods()
            .filter(|method| {
                !method.is_override()
                    && provided_type(method, ctx.markers()).is_none()
                    && !(method.explicit_interface().is_none() && surfaced.contains(&method.name()))
            })
            .map(|method| {
                let name = match method.explicit_interface() {
                    Some(interface) => format!("{interface}.{}", method.name()),
                    None => method.name().to_string(),
                };
                FacetItem::new("", Some(name.as_str()), method.line())
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
        method_lines(ctx, id, items)
    }
}

#[cfg(test)]
mod tests {
    use canopy_core::declaration::{DeclarationKind, ExplicitInterface, Method, TypeDeclaration};

    use super::*;
    use crate::{config::RenderOptions, facet::test_support::Fixture};

    fn fixture() -> Fixture {
        Fixture::new(
            Vec::new(),
            vec![
                TypeDeclaration::new(DeclarationKind::Class, "Player", "src/Player.cs")
                    .with_member(Method::new("Tick", 30))
                    .with_member(Method::new("Move", 20))
                    .with_member(Method::new("_Ready", 40).with_override())
                    .with_member(
                        Method::new("Value", 44).with_explicit_interface(
                            ExplicitInterface::new("IProvide").with_type_argument("Map"),
                        ),
                    )
                    .with_member(
                        Method::new("Dispose", 50)
                            .with_explicit_interface(ExplicitInterface::new("IDisposable")),
                    ),
                TypeDeclaration::new(DeclarationKind::Interface, "IPlayer", "src/Player.cs")
                    .with_member(Method::new("Move", 4)),
            ],
        )
    }

    #[test]
    fn test_hidden_by_default() {
        assert!(fixture().lines(&MethodFacet, "Player", RenderOptions::default()).is_empty());
    }

    #[test]
    fn test_show_all_methods() {
        let options = RenderOptions {
            show_all_methods: true,
            ..RenderOptions::default()
        };

        assert_eq!(
            fixture().lines(&MethodFacet, "Player", options),
            vec!["[[src/Player.cs:50 IDisposable.Dispose()]]", "[[src/Player.cs:30 Tick()]]"]
        );
    }
}
