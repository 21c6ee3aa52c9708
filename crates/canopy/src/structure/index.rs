//! Entity index.
//!
//! The index owns every [`Entity`] of a run and maps entity names to
//! [`EntityId`] handles. Names come from file stems: a scene file
//! `scenes/World.tscn` and a source file `src/World.cs` both produce the
//! entity `World`, and the declarations of the source file are merged into
//! the scene entity.

use indexmap::IndexMap;
use log::{debug, trace, warn};

use canopy_core::{declaration::TypeDeclaration, scene::SceneTree};

use super::entity::{Entity, EntityId, file_stem};
use crate::config::MarkerConfig;

/// All entities of a run, in discovery order.
#[derive(Debug, Default)]
pub struct EntityIndex {
    entities: Vec<Entity>,
    by_name: IndexMap<String, EntityId>,
    prefix: char,
}

impl EntityIndex {
    /// Builds the index from parsed scenes and declaration fragments.
    ///
    /// Scenes are indexed first, in the order given. When two scenes share a
    /// file stem the first one is kept and the duplicate is logged.
    ///
    /// Declaration fragments are grouped by originating file, in order of
    /// first appearance. Each group either augments the scene entity of the
    /// same name or creates a declaration-only entity. Within a group, the
    /// first class, record or struct fragment names the backing type; later
    /// fragments of that type are merged into it, and the interface named
    /// `<prefix><Name>` becomes the entity's paired interface.
    pub fn build(
        scenes: impl IntoIterator<Item = SceneTree>,
        declarations: impl IntoIterator<Item = TypeDeclaration>,
        markers: &MarkerConfig,
    ) -> Self {
        let mut index = Self {
            prefix: markers.interface_prefix(),
            ..Self::default()
        };

        for scene in scenes {
            let entity = Entity::from_scene(scene);
            if let Some(&existing) = index.by_name.get(entity.name()) {
                warn!(
                    name = entity.name(),
                    kept = index.get(existing).file(),
                    skipped = entity.file();
                    "Duplicate scene entity name"
                );
                continue;
            }
            index.insert(entity);
        }

        let mut groups: IndexMap<String, Vec<TypeDeclaration>> = IndexMap::new();
        for declaration in declarations {
            groups
                .entry(declaration.file().to_string())
                .or_default()
                .push(declaration);
        }

        for (file, fragments) in groups {
            let id = match index.by_name.get(file_stem(&file)) {
                Some(&id) => id,
                None => index.insert(Entity::from_file(file.as_str())),
            };
            index.absorb_group(id, fragments, markers);
        }

        debug!(entities = index.len(); "Built entity index");
        index
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        let id = EntityId::new(self.entities.len());
        self.by_name.insert(entity.name().to_string(), id);
        self.entities.push(entity);
        id
    }

    fn absorb_group(&mut self, id: EntityId, fragments: Vec<TypeDeclaration>, markers: &MarkerConfig) {
        let entity = &mut self.entities[id.index()];
        let interface_name = markers.interface_name(entity.name());
        let mut primary: Option<String> = None;

        for fragment in fragments {
            if fragment.kind().is_interface() {
                if fragment.name() == interface_name {
                    entity.absorb_interface(fragment);
                } else {
                    trace!(entity = entity.name(), interface = fragment.name(); "Skipping unpaired interface");
                }
                continue;
            }

            let primary_name = primary.get_or_insert_with(|| fragment.name().to_string());
            if fragment.name() != primary_name.as_str() {
                trace!(entity = entity.name(), declaration = fragment.name(); "Skipping secondary declaration");
                continue;
            }

            if let Some(attribute) = fragment.attribute(markers.diagram_attribute()) {
                entity.mark_for_diagram(attribute.clone());
            }
            entity.absorb_declaration(fragment);
        }
    }

    /// Returns the number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the entity behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was produced by another index.
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    /// Iterates over all entities in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (EntityId::new(i), entity))
    }

    /// Looks up an entity by its exact name.
    ///
    /// Scene node types are matched this way.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    /// Resolves a declared type name to an entity.
    ///
    /// The exact name is tried first. Only when it is unknown is a single
    /// leading interface prefix stripped, so `IRepo` resolves to `IRepo`
    /// when such an entity exists and to `Repo` otherwise.
    pub fn resolve(&self, type_name: &str) -> Option<EntityId> {
        self.lookup(type_name).or_else(|| {
            type_name
                .strip_prefix(self.prefix)
                .filter(|stripped| !stripped.is_empty())
                .and_then(|stripped| self.lookup(stripped))
        })
    }
}

#[cfg(test)]
mod tests {
    use canopy_core::{
        declaration::{Attribute, DeclarationKind, Property},
        scene::SceneNode,
    };

    use super::*;

    fn scene(path: &str) -> SceneTree {
        SceneTree::new(path, SceneNode::new("Root", 3).with_type("Node"), Vec::new())
    }

    fn class(name: &str, file: &str) -> TypeDeclaration {
        TypeDeclaration::new(DeclarationKind::Class, name, file)
    }

    fn build(scenes: Vec<SceneTree>, declarations: Vec<TypeDeclaration>) -> EntityIndex {
        EntityIndex::build(scenes, declarations, &MarkerConfig::default())
    }

    #[test]
    fn test_empty_index() {
        let index = build(Vec::new(), Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.resolve("World"), None);
    }

    #[test]
    fn test_duplicate_scene_first_wins() {
        let index = build(
            vec![scene("a/World.tscn"), scene("b/World.tscn")],
            Vec::new(),
        );

        assert_eq!(index.len(), 1);
        let world = index.lookup("World").unwrap();
        assert_eq!(index.get(world).file(), "a/World.tscn");
    }

    #[test]
    fn test_declarations_augment_scene_entity() {
        let index = build(
            vec![scene("scenes/World.tscn")],
            vec![class("World", "src/World.cs").with_member(Property::new("Score", "int", 4))],
        );

        assert_eq!(index.len(), 1);
        let world = index.get(index.lookup("World").unwrap());
        assert!(world.is_scene());
        assert_eq!(world.file(), "scenes/World.tscn");
        assert_eq!(world.declaration().map(|d| d.properties().count()), Some(1));
    }

    #[test]
    fn test_fragments_merge_in_discovery_order() {
        let index = build(
            Vec::new(),
            vec![
                class("Player", "src/Player.cs").with_member(Property::new("Health", "int", 5)),
                class("Weapon", "src/Weapon.cs"),
                class("Player", "src/Player.cs").with_member(Property::new("Armor", "int", 9)),
            ],
        );

        assert_eq!(index.len(), 2);
        let player = index.get(index.lookup("Player").unwrap());
        let names: Vec<_> = player
            .declaration()
            .unwrap()
            .properties()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["Health", "Armor"]);

        let order: Vec<_> = index.iter().map(|(_, e)| e.name()).collect();
        assert_eq!(order, vec!["Player", "Weapon"]);
    }

    #[test]
    fn test_paired_interface_and_secondary_types() {
        let index = build(
            Vec::new(),
            vec![
                TypeDeclaration::new(DeclarationKind::Interface, "IRepo", "src/Repo.cs"),
                class("Repo", "src/Repo.cs"),
                class("RepoOptions", "src/Repo.cs").with_member(Property::new("Path", "string", 30)),
                TypeDeclaration::new(DeclarationKind::Interface, "IDisposable", "src/Repo.cs"),
            ],
        );

        let repo = index.get(index.lookup("Repo").unwrap());
        assert_eq!(repo.interface().map(|i| i.name()), Some("IRepo"));
        assert_eq!(repo.declaration().map(|d| d.name()), Some("Repo"));
        assert_eq!(repo.declaration().map(|d| d.properties().count()), Some(0));
    }

    #[test]
    fn test_diagram_marker() {
        let index = build(
            Vec::new(),
            vec![
                class("Hud", "src/Hud.cs"),
                class("Hud", "src/Hud.cs").with_attribute(Attribute::new("ClassDiagramAttribute")),
                class("Menu", "src/Menu.cs"),
            ],
        );

        let hud = index.get(index.lookup("Hud").unwrap());
        assert!(hud.diagram_attribute().is_some());
        let menu = index.get(index.lookup("Menu").unwrap());
        assert!(menu.diagram_attribute().is_none());
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let index = build(
            Vec::new(),
            vec![class("Foo", "src/Foo.cs"), class("IFoo", "src/IFoo.cs")],
        );

        let foo = index.lookup("Foo").unwrap();
        let ifoo = index.lookup("IFoo").unwrap();
        assert_eq!(index.resolve("IFoo"), Some(ifoo));
        assert_eq!(index.resolve("Foo"), Some(foo));
    }

    #[test]
    fn test_resolve_strips_single_prefix() {
        let index = build(Vec::new(), vec![class("Repo", "src/Repo.cs")]);
        let repo = index.lookup("Repo").unwrap();

        assert_eq!(index.resolve("IRepo"), Some(repo));
        assert_eq!(index.resolve("IIRepo"), None);
        assert_eq!(index.lookup("IRepo"), None);
    }

    #[test]
    fn test_resolve_prefix_alone_is_unresolved() {
        let index = build(Vec::new(), vec![class("Repo", "src/Repo.cs")]);

        assert_eq!(index.resolve("I"), None);
        assert_eq!(index.resolve(""), None);
    }
}
