use canopy_parser::{error::ErrorCode, parse_scene};

const WORLD_SCENE: &str = r#"[gd_scene load_steps=5 format=3 uid="uid://c2w8r1vb0x3q"]

[ext_resource type="Script" uid="uid://bq1t7y" path="res://src/World.cs" id="1_wrld"]
[ext_resource type="PackedScene" uid="uid://d0p2" path="res://scenes/Player.tscn" id="2_plyr"]
[ext_resource type="Script" path="res://src/Hud.cs" id="3_hud"]

[sub_resource type="Environment" id="Environment_k2"]
background_mode = 1
ambient_light_color = Color(0.2, 0.2, 0.25, 1)

[node name="World" type="Node3D"]
script = ExtResource("1_wrld")

[node name="Environment" type="WorldEnvironment" parent="."]
environment = SubResource("Environment_k2")

[node name="Player" parent="." instance=ExtResource("2_plyr")]
transform = Transform3D(1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1.5, 0)

[node name="Hud" type="CanvasLayer" parent="."]
script = ExtResource("3_hud")

[node name="Score" type="Label" parent="Hud"]
text = "Score: 0"

[connection signal="died" from="Player" to="." method="_on_player_died"]
"#;

#[test]
fn test_world_scene() {
    let tree = parse_scene(WORLD_SCENE, "scenes/World.tscn").expect("Failed to parse");

    assert_eq!(tree.path(), "scenes/World.tscn");
    assert_eq!(tree.root().name(), "World");
    assert_eq!(tree.root().type_name(), Some("Node3D"));
    assert_eq!(tree.script(), Some("src/World.cs"));
    assert_eq!(tree.root().line(), 11);

    let names: Vec<_> = tree.nodes().iter().map(|node| node.name()).collect();
    assert_eq!(names, vec!["Environment", "Player", "Hud", "Score"]);
}

#[test]
fn test_instanced_node_takes_scene_name_as_type() {
    let tree = parse_scene(WORLD_SCENE, "scenes/World.tscn").expect("Failed to parse");

    let player = tree.first_of_type("Player").expect("Player node");
    assert_eq!(player.name(), "Player");
    assert_eq!(player.parent(), Some("."));
    assert_eq!(player.script(), None);
}

#[test]
fn test_descendant_scripts_and_parents() {
    let tree = parse_scene(WORLD_SCENE, "scenes/World.tscn").expect("Failed to parse");

    let hud = tree.first_of_type("CanvasLayer").expect("Hud node");
    assert_eq!(hud.script(), Some("src/Hud.cs"));
    assert_eq!(hud.line(), 20);

    let score = tree.first_of_type("Label").expect("Score node");
    assert_eq!(score.parent(), Some("Hud"));
    assert_eq!(score.script(), None);
}

#[test]
fn test_godot3_scene() {
    let source = r#"[gd_scene load_steps=3 format=2]

[ext_resource path="res://Enemy.cs" type="Script" id=1]
[ext_resource path="res://Sprite.png" type="Texture" id=2]

[node name="Enemy" type="KinematicBody2D"]
script = ExtResource( 1 )

[node name="Sprite" type="Sprite" parent="."]
texture = ExtResource( 2 )
"#;

    let tree = parse_scene(source, "Enemy.tscn").expect("Failed to parse");
    assert_eq!(tree.script(), Some("Enemy.cs"));
    assert_eq!(tree.nodes().len(), 1);
}

#[test]
fn test_scene_without_script() {
    let source = "[gd_scene format=3]\n\n[node name=\"Level\" type=\"Node2D\"]\n";
    let tree = parse_scene(source, "Level.tscn").expect("Failed to parse");

    assert_eq!(tree.script(), None);
    assert!(tree.nodes().is_empty());
}

#[test]
fn test_object_property_with_key_value_arguments() {
    let source = r#"[gd_scene load_steps=2 format=3]

[ext_resource type="Script" path="res://src/Input.cs" id="1_in"]

[node name="Input" type="Node"]
script = ExtResource("1_in")
metadata/ev = Object(InputEventKey,"resource_local_to_scene":false,"keycode":4194305)
"#;
    let tree = parse_scene(source, "Input.tscn").expect("Failed to parse");

    assert_eq!(tree.script(), Some("src/Input.cs"));
}

#[test]
fn test_missing_root() {
    let source = "[gd_scene format=3]\n\n[node name=\"Child\" type=\"Node\" parent=\".\"]\n";
    let err = parse_scene(source, "Broken.tscn").unwrap_err();

    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E200));
}

#[test]
fn test_empty_scene_is_missing_root() {
    let err = parse_scene("", "Empty.tscn").unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E200));
}

#[test]
fn test_duplicate_root_points_at_both_nodes() {
    let source = "[node name=\"A\" type=\"Node\"]\n\n[node name=\"B\" type=\"Node\"]\n";
    let err = parse_scene(source, "Twice.tscn").unwrap_err();

    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E201));

    let lines: Vec<_> = diag
        .labels()
        .iter()
        .map(|label| label.span().location(source).line)
        .collect();
    assert_eq!(lines, vec![3, 1]);
}

#[test]
fn test_unknown_resource() {
    let source = r#"[ext_resource type="Script" path="res://A.cs" id="1_a"]

[node name="A" type="Node"]
script = ExtResource("2_b")
"#;
    let err = parse_scene(source, "A.tscn").unwrap_err();

    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E202));
    assert_eq!(diag.message(), "unknown external resource `2_b`");
    let primary = err.primary_span().expect("primary span");
    assert_eq!(primary.text(source), "ExtResource(\"2_b\")");
}

#[test]
fn test_lexer_errors_are_all_reported() {
    let source = "[node name=\"A\" type=\"Node\"]\nicon = $\nhint = @\n";
    let err = parse_scene(source, "A.tscn").unwrap_err();

    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, vec![ErrorCode::E002, ErrorCode::E002]);
}

#[test]
fn test_syntax_error_location() {
    let source = "[gd_scene format=3]\n\n[node name=\"A\" type=\"Node\"]\nposition Vector2(0, 0)\n";
    let err = parse_scene(source, "A.tscn").unwrap_err();

    let location = err.primary_span().expect("primary span").location(source);
    assert_eq!((location.line, location.column), (4, 10));
    assert_eq!(err.to_string(), "error[E100]: unexpected `Vector2`");
}
