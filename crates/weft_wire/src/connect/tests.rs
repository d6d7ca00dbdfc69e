#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use weft_tree::{impl_script, ClassId, SceneTree};

use super::*;
use crate::{install, slot, ConnectSpec, Declaration, Member, Method, WireSpec};

#[derive(Default)]
struct Door {
    button: Option<NodeId>,
    presses: usize,
    pinged_by: Vec<NodeId>,
}
impl_script!(Door);

impl Door {
    fn on_pressed(&mut self, _emitter: NodeId) {
        self.presses += 1;
    }

    fn on_ping(&mut self, emitter: NodeId) {
        self.pinged_by.push(emitter);
    }
}

/// A `Door` wires a `Button` child named `button` and listens to its
/// `pressed` signal, plus its own `ping` signal.
fn door_class() -> (ClassId, ClassId) {
    let door = ClassId::define("Door", ClassId::NODE);
    let button = ClassId::define("Button", ClassId::NODE);
    Declaration::of(door)
        .wired(
            Member::field("button", button, slot!(Door, button)),
            WireSpec::new().optional(),
        )
        .connect(
            Method::on::<Door>("on_pressed", Door::on_pressed),
            ConnectSpec::new("pressed").emitter("button"),
        )
        .connect(
            Method::on::<Door>("on_ping", Door::on_ping),
            ConnectSpec::new("ping"),
        )
        .register()
        .unwrap();
    (door, button)
}

fn door_with_button(tree: &mut SceneTree, door_class: ClassId, button_class: ClassId) -> (NodeId, NodeId) {
    let root = tree.root();
    let door = tree.create_with_script("door", door_class, Door::default());
    let button = tree.create("button", button_class);
    tree.add_child(root, door).unwrap();
    tree.add_child(door, button).unwrap();
    (door, button)
}

fn door(tree: &SceneTree, node: NodeId) -> &Door {
    tree.script_as::<Door>(node).unwrap()
}

#[test]
fn connects_member_emitter_and_self() {
    let (door_class, button_class) = door_class();
    let mut tree = SceneTree::new();
    let (door_node, button) = door_with_button(&mut tree, door_class, button_class);

    install(&mut tree, door_node, None).unwrap();
    assert_eq!(connect(&mut tree, door_node).unwrap(), 2);

    assert!(tree.is_connected(button, "pressed", door_node, "on_pressed"));
    assert!(tree.is_connected(door_node, "ping", door_node, "on_ping"));

    assert_eq!(tree.emit(button, "pressed"), 1);
    assert_eq!(tree.emit(door_node, "ping"), 1);
    assert_eq!(door(&tree, door_node).presses, 1);
    assert_eq!(door(&tree, door_node).pinged_by, vec![door_node]);
}

#[test]
fn second_pass_connects_nothing() {
    let (door_class, button_class) = door_class();
    let mut tree = SceneTree::new();
    let (door_node, button) = door_with_button(&mut tree, door_class, button_class);
    install(&mut tree, door_node, None).unwrap();

    assert_eq!(connect(&mut tree, door_node).unwrap(), 2);
    assert_eq!(connect(&mut tree, door_node).unwrap(), 0);
    assert_eq!(tree.connection_count(), 2);

    tree.emit(button, "pressed");
    assert_eq!(door(&tree, door_node).presses, 1);
}

#[test]
fn empty_emitter_member_is_skipped() {
    let (door_class, button_class) = door_class();
    let mut tree = SceneTree::new();
    let (door_node, _button) = door_with_button(&mut tree, door_class, button_class);

    // Not installed: `button` is still empty
    assert_eq!(connect(&mut tree, door_node).unwrap(), 1);
    assert!(tree.is_connected(door_node, "ping", door_node, "on_ping"));
}

#[test]
fn emitter_pending_destruction_is_skipped() {
    let (door_class, button_class) = door_class();
    let mut tree = SceneTree::new();
    let (door_node, button) = door_with_button(&mut tree, door_class, button_class);
    install(&mut tree, door_node, None).unwrap();
    tree.queue_free(button).unwrap();

    assert_eq!(connect(&mut tree, door_node).unwrap(), 1);
    assert!(!tree.is_connected(button, "pressed", door_node, "on_pressed"));
}

#[test]
fn unknown_emitter_member_is_skipped() {
    let lamp = ClassId::define("Lamp", ClassId::NODE);
    Declaration::of(lamp)
        .connect(
            Method::on::<Door>("on_pressed", Door::on_pressed),
            ConnectSpec::new("pressed").emitter("switch"),
        )
        .register()
        .unwrap();

    let mut tree = SceneTree::new();
    let root = tree.root();
    let node = tree.create_with_script("lamp", lamp, Door::default());
    tree.add_child(root, node).unwrap();

    assert_eq!(connect(&mut tree, node).unwrap(), 0);
}

#[test]
fn class_without_handlers_connects_nothing() {
    let mut tree = SceneTree::new();
    let root = tree.root();
    assert_eq!(connect(&mut tree, root).unwrap(), 0);
}
