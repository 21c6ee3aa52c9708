//! `[Constructors]`: primary and regular constructor parameter lists.

use super::{Facet, FacetContext, FacetItem, FacetOrder, declaration};
use crate::structure::EntityId;

/// Lists constructors in declaration order, primary constructor first.
///
/// Each parameter becomes one item at the line of its parameter list, and
/// a parameterless constructor becomes a single unnamed item. Rendering
/// groups items by line, one output line per constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructorFacet;

impl Facet for ConstructorFacet {
    fn order(&self) -> FacetOrder {
        FacetOrder::Middle
    }

    fn title(&self) -> &'static str {
        "[Constructors]"
    }

    fn extract(&self, ctx: &FacetContext<'_>, id: EntityId) -> Vec<FacetItem> {
        let Some(declaration) = declaration(ctx, id) else {
            return Vec::new();
        };

        let mut items = Vec::new();
        let lists = declaration
            .primary_constructor()
            .into_iter()
            .chain(declaration.constructors());
        for list in lists {
            if list.is_empty() {
                items.push(FacetItem::new("", None, list.line()));
                continue;
            }
            items.extend(list.parameters().iter().map(|parameter| {
                FacetItem::new(parameter.type_name(), Some(parameter.name()), list.line())
                    .with_entity(ctx.index().resolve(parameter.type_name()))
            }));
        }
        items
    }

    fn render<'a>(
        &self,
        ctx: &'a FacetContext<'a>,
        id: EntityId,
        items: &'a [FacetItem],
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let own = ctx.own_link(id);
        let type_name = ctx.entity(id).declaration().map_or("", |d| d.name());

        Box::new(items.chunk_by(|a, b| a.line() == b.line()).map(move |group| {
            let parameters: Vec<_> = group
                .iter()
                .filter_map(|item| {
                    let name = item.name()?;
                    Some(match item.entity() {
                        Some(child) => {
                            let (path, _) = ctx.entity(child).link_target();
                            format!("[[{} {}]] {name}", ctx.linker().link(path), item.type_name())
                        }
                        None => format!("{} {name}", item.type_name()),
                    })
                })
                .collect();
            format!("[[{own}:{} {type_name}]]({})", group[0].line(), parameters.join(", "))
        }))
    }
}

#[cfg(test)]
mod tests {
    use canopy_core::declaration::{DeclarationKind, Parameter, ParameterList, TypeDeclaration};

    use super::*;
    use crate::{config::RenderOptions, facet::test_support::Fixture};

    #[test]
    fn test_constructors_grouped_by_line() {
        let fixture = Fixture::new(
            Vec::new(),
            vec![
                TypeDeclaration::new(DeclarationKind::Record, "Game", "src/Game.cs")
                    .with_primary_constructor(ParameterList::new(
                        3,
                        vec![Parameter::new("map", "IMap", 3), Parameter::new("seed", "int", 3)],
                    ))
                    .with_constructor(ParameterList::new(9, Vec::new())),
                TypeDeclaration::new(DeclarationKind::Class, "Map", "src/Map.cs"),
            ],
        );

        assert_eq!(
            fixture.lines(&ConstructorFacet, "Game", RenderOptions::default()),
            vec![
                "[[src/Game.cs:3 Game]]([[src/Map.cs IMap]] map, int seed)",
                "[[src/Game.cs:9 Game]]()",
            ]
        );
    }

    #[test]
    fn test_no_constructors() {
        let fixture = Fixture::new(
            Vec::new(),
            vec![TypeDeclaration::new(DeclarationKind::Class, "Map", "src/Map.cs")],
        );

        assert!(fixture.lines(&ConstructorFacet, "Map", RenderOptions::default()).is_empty());
    }
}
