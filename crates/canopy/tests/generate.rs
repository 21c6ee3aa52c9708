use canopy::{
    CanopyError, Generator, ProjectInput, SceneSource,
    config::{AppConfig, DiagramConfig, MarkerConfig},
    structure::{self, EntityIndex, Relation},
};
use canopy_core::declaration::{Attribute, DeclarationKind, Property, TypeDeclaration};
use proptest::prelude::*;

const WORLD_SCENE: &str = r#"[gd_scene load_steps=3 format=3]

[ext_resource type="Script" path="res://src/World.cs" id="1_w"]
[ext_resource type="PackedScene" path="res://scenes/Player.tscn" id="2_p"]

[node name="World" type="Node3D"]
script = ExtResource("1_w")

[node name="player1" parent="." instance=ExtResource("2_p")]
"#;

fn class(name: &str) -> TypeDeclaration {
    TypeDeclaration::new(DeclarationKind::Class, name, format!("src/{name}.cs"))
}

fn diagram(declaration: TypeDeclaration) -> TypeDeclaration {
    declaration.with_attribute(Attribute::new("ClassDiagram"))
}

fn service_input() -> ProjectInput {
    ProjectInput {
        project_dir: "/work/game".to_string(),
        scenes: Vec::new(),
        declarations: vec![
            diagram(class("Service")).with_member(
                Property::new("Repo", "IRepo", 7).with_attribute(Attribute::new("Dependency")),
            ),
            class("Repo"),
        ],
    }
}

#[test]
fn test_world_scene_with_player() {
    let input = ProjectInput {
        project_dir: "/work/game".to_string(),
        scenes: vec![SceneSource::new("scenes/World.tscn", WORLD_SCENE)],
        declarations: vec![class("World"), class("Player")],
    };
    let config = AppConfig::new(
        DiagramConfig::default().with_include("World"),
        MarkerConfig::default(),
    );

    let generation = Generator::new(config)
        .generate(&input)
        .expect("Failed to generate");

    assert_eq!(generation.outputs.len(), 1);
    let output = &generation.outputs[0];
    assert_eq!(output.path, "scenes/World.g.puml");
    assert_eq!(output.depth, 1);

    let expected = "\
@startuml
package World-Scene [[../scenes/World.tscn]] {
    class World {
        [[../src/World.cs ScriptFile]]
        --
        [Nodes]
        [[../scenes/World.tscn:9 player1]] - [[../src/Player.cs Script]]
    }
    class Player {
        [[../src/Player.cs ScriptFile]]
    }
    World::player1 --> Player
}
@enduml
";
    assert_eq!(output.contents, expected);
}

#[test]
fn test_unscripted_scene_links_members_to_declaration() {
    let input = ProjectInput {
        project_dir: "/work/game".to_string(),
        scenes: vec![SceneSource::new(
            "scenes/World.tscn",
            "[gd_scene format=3]\n\n[node name=\"World\" type=\"Node3D\"]\n",
        )],
        declarations: vec![
            diagram(class("World")).with_member(Property::new("Hero", "Player", 42)),
            class("Player"),
        ],
    };

    let generation = Generator::default().generate(&input).expect("Failed to generate");

    let output = &generation.outputs[0];
    assert_eq!(output.path, "scenes/World.g.puml");

    let expected = "\
@startuml
class World {
    [[../src/World.cs ScriptFile]]
    --
    [Properties]
    [[../src/World.cs:42 Hero]] - [[../src/Player.cs Script]]
}
@enduml
";
    assert_eq!(output.contents, expected);
}

#[test]
fn test_dependency_resolved_through_interface_prefix() {
    let generation = Generator::default()
        .generate(&service_input())
        .expect("Failed to generate");

    let output = &generation.outputs[0];
    assert_eq!(output.entity, "Service");
    assert_eq!(output.path, "src/Service.g.puml");

    let expected = "\
@startuml
class Service {
    [[../src/Service.cs ScriptFile]]
    --
    [Dependencies]
    [[../src/Service.cs:7 Repo]] - [[../src/Repo.cs Script]]
}
@enduml
";
    assert_eq!(output.contents, expected);
}

#[test]
fn test_absolute_links_from_attribute() {
    let mut input = service_input();
    input.declarations[0] = class("Service")
        .with_attribute(
            Attribute::new("ClassDiagram").with_argument(
                canopy_core::declaration::AttributeArgument::named("UseVSCodePaths", "true"),
            ),
        )
        .with_member(Property::new("Repo", "IRepo", 7).with_attribute(Attribute::new("Dependency")));

    let generation = Generator::default().generate(&input).expect("Failed to generate");

    let contents = &generation.outputs[0].contents;
    assert!(contents.contains("[[vscode://file//work/game/src/Service.cs ScriptFile]]"));
    assert!(contents.contains("[[vscode://file//work/game/src/Repo.cs Script]]"));
}

#[test]
fn test_malformed_scene_is_isolated() {
    let mut input = service_input();
    input.scenes = vec![
        SceneSource::new(
            "scenes/Broken.tscn",
            "[gd_scene format=3]\n\n[node name=\"A\" type=\"Node\"]\nposition Vector2(0, 0)\n",
        ),
        SceneSource::new("scenes/World.tscn", WORLD_SCENE),
    ];

    let generation = Generator::default().generate(&input).expect("Failed to generate");

    assert_eq!(generation.failures.len(), 1);
    assert_eq!(generation.failures[0].path, "scenes/Broken.tscn");
    assert_eq!(generation.outputs.len(), 1);
    assert_eq!(generation.outputs[0].entity, "Service");

    let failure = generation.failures.into_iter().next().expect("one failure");
    let error: CanopyError = failure.into();
    assert!(matches!(error, CanopyError::Parse { ref path, .. } if path == "scenes/Broken.tscn"));
}

#[test]
fn test_exact_name_preferred_over_stripped() {
    let input = ProjectInput {
        declarations: vec![
            diagram(class("Holder")).with_member(Property::new("Item", "IFoo", 5)),
            class("Foo"),
            class("IFoo"),
        ],
        ..ProjectInput::default()
    };

    let generation = Generator::default().generate(&input).expect("Failed to generate");

    let contents = &generation.outputs[0].contents;
    assert!(contents.contains("[[../src/Holder.cs:5 Item]] - [[../src/IFoo.cs Script]]"));
    assert!(!contents.contains("[[../src/Foo.cs"));
}

#[test]
fn test_generation_is_deterministic() {
    let input = ProjectInput {
        project_dir: "/work/game".to_string(),
        scenes: vec![SceneSource::new("scenes/World.tscn", WORLD_SCENE)],
        declarations: vec![
            diagram(class("World")).with_member(Property::new("Audio", "Audio", 4)),
            class("Player").with_member(Property::new("Weapon", "IWeapon", 6)),
            class("Weapon"),
            class("Audio"),
        ],
    };
    let generator = Generator::default();

    let first = generator.generate(&input).expect("Failed to generate");
    let second = generator.generate(&input).expect("Failed to generate");

    assert_eq!(first.outputs, second.outputs);
}

#[test]
fn test_no_requested_entities_is_empty() {
    let input = ProjectInput {
        declarations: vec![class("Foo"), class("Bar")],
        ..ProjectInput::default()
    };

    let generation = Generator::default().generate(&input).expect("Failed to generate");
    assert!(generation.outputs.is_empty());
}

// ===================
// Strategy Functions
// ===================

/// Up to eight classes, each holding properties typed after other classes
/// (possibly itself, possibly through the interface prefix).
fn declarations_strategy() -> impl Strategy<Value = Vec<TypeDeclaration>> {
    (1usize..8).prop_flat_map(|count| {
        prop::collection::vec(
            prop::collection::vec((0..count, any::<bool>(), any::<bool>()), 0..5),
            count,
        )
    })
    .prop_map(|members| {
        members
            .into_iter()
            .enumerate()
            .map(|(idx, properties)| {
                let mut declaration = diagram(class(&format!("T{idx}")));
                for (slot, (target, prefixed, dependency)) in properties.into_iter().enumerate() {
                    let type_name = if prefixed { format!("IT{target}") } else { format!("T{target}") };
                    let mut property = Property::new(format!("P{slot}"), type_name, slot + 1);
                    if dependency {
                        property = property.with_attribute(Attribute::new("Dependency"));
                    }
                    declaration = declaration.with_member(property);
                }
                declaration
            })
            .collect()
    })
}

// ===================
// Property Test Functions
// ===================

/// Every child edge is mirrored as a parent edge and never loops.
fn check_child_edges_are_symmetric(declarations: Vec<TypeDeclaration>) -> Result<(), TestCaseError> {
    let markers = MarkerConfig::default();
    let index = EntityIndex::build(Vec::new(), declarations, &markers);
    let graph = structure::resolve(&index, &markers);

    for (id, _) in index.iter() {
        for child in graph.targets(id, Relation::Child) {
            prop_assert_ne!(child, id, "entity {} contains itself", id);
            prop_assert!(
                graph.sources(child, Relation::Child).any(|parent| parent == id),
                "missing parent edge {} -> {}",
                child,
                id
            );
        }
        for parent in graph.sources(id, Relation::Child) {
            prop_assert!(graph.contains(parent, id, Relation::Child));
        }
    }
    Ok(())
}

/// Rendering terminates on cyclic input and repeats byte for byte.
fn check_rendering_is_deterministic(declarations: Vec<TypeDeclaration>) -> Result<(), TestCaseError> {
    let input = ProjectInput {
        declarations,
        ..ProjectInput::default()
    };
    let generator = Generator::default();

    let first = generator.generate(&input);
    let second = generator.generate(&input);
    prop_assert!(first.is_ok() && second.is_ok());

    let (first, second) = (first.unwrap(), second.unwrap());
    prop_assert_eq!(first.outputs.len(), input.declarations.len());
    prop_assert_eq!(first.outputs, second.outputs);
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn child_edges_are_symmetric(declarations in declarations_strategy()) {
        check_child_edges_are_symmetric(declarations)?;
    }

    #[test]
    fn rendering_is_deterministic(declarations in declarations_strategy()) {
        check_rendering_is_deterministic(declarations)?;
    }
}
