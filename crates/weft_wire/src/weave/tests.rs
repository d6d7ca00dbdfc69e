#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use weft_tree::{impl_script, ClassId, Tree, TreeError};

use super::*;
use crate::{slot, ConnectSpec, Declaration, FailureLog, Member, Method, UnwritablePolicy, WireSpec};

#[derive(Default)]
struct Gate {
    lever: Option<NodeId>,
    keeper: Option<NodeId>,
    pulls: usize,
}
impl_script!(Gate);

impl Gate {
    fn on_pulled(&mut self, _emitter: NodeId) {
        self.pulls += 1;
    }
}

struct Classes {
    gate: ClassId,
    lever: ClassId,
    keeper: ClassId,
}

/// A `Gate` needs a `Lever` descendant and an optional `Keeper` ancestor,
/// and listens to the lever's `pulled` signal.
fn classes() -> Classes {
    let gate = ClassId::define("Gate", ClassId::NODE);
    let lever = ClassId::define("Lever", ClassId::NODE);
    let keeper = ClassId::define("Keeper", ClassId::NODE);
    Declaration::of(gate)
        .wired(
            Member::field("lever", lever, slot!(Gate, lever)),
            WireSpec::new().type_only(),
        )
        .wired(
            Member::field("keeper", keeper, slot!(Gate, keeper)),
            WireSpec::new().type_only().ancestor().optional(),
        )
        .connect(
            Method::on::<Gate>("on_pulled", Gate::on_pulled),
            ConnectSpec::new("pulled").emitter("lever"),
        )
        .register()
        .unwrap();
    Classes {
        gate,
        lever,
        keeper,
    }
}

/// A detached gate with a lever child.
fn gate(tree: &mut SceneTree, c: &Classes) -> (NodeId, NodeId) {
    let gate = tree.create_with_script("gate", c.gate, Gate::default());
    let lever = tree.create("lever", c.lever);
    tree.add_child(gate, lever).unwrap();
    (gate, lever)
}

fn gate_state(tree: &SceneTree, node: NodeId) -> (Option<NodeId>, Option<NodeId>, usize) {
    let gate = tree.script_as::<Gate>(node).unwrap();
    (gate.lever, gate.keeper, gate.pulls)
}

#[test]
fn weave_installs_then_connects() {
    let c = classes();
    let mut tree = SceneTree::new();
    let root = tree.root();
    let (gate_node, lever) = gate(&mut tree, &c);
    tree.add_child(root, gate_node).unwrap();

    let woven = weave(&mut tree, gate_node, None, &WeaveConfig::default()).unwrap();

    assert_eq!(woven.installed.wired, 1);
    assert_eq!(woven.connected, 1);
    tree.emit(lever, "pulled");
    assert_eq!(gate_state(&tree, gate_node), (Some(lever), None, 1));
}

#[test]
fn weave_without_signals_only_installs() {
    let c = classes();
    let mut tree = SceneTree::new();
    let root = tree.root();
    let (gate_node, lever) = gate(&mut tree, &c);
    tree.add_child(root, gate_node).unwrap();

    let config = WeaveConfig::default().with_signals(false);
    let woven = weave(&mut tree, gate_node, None, &config).unwrap();

    assert_eq!(woven.connected, 0);
    assert_eq!(tree.connection_count(), 0);
    assert_eq!(gate_state(&tree, gate_node).0, Some(lever));
}

#[test]
fn weaver_injects_once() {
    let mut tree = SceneTree::new();
    assert!(Weaver::default().inject(&mut tree));
    assert!(!Weaver::default().inject(&mut tree));
    assert!(tree.is_node_added_connected(Weaver::KEY));
}

#[test]
fn weaver_wires_entering_subtree() {
    let c = classes();
    let mut tree = SceneTree::new();
    let root = tree.root();
    Weaver::default().inject(&mut tree);

    let keeper = tree.create("keeper", c.keeper);
    let (gate_node, lever) = gate(&mut tree, &c);
    tree.add_child(keeper, gate_node).unwrap();
    // Nothing happens while detached
    assert_eq!(gate_state(&tree, gate_node), (None, None, 0));

    tree.add_child(root, keeper).unwrap();

    assert_eq!(gate_state(&tree, gate_node), (Some(lever), Some(keeper), 0));
    tree.emit(lever, "pulled");
    assert_eq!(gate_state(&tree, gate_node).2, 1);
}

#[test]
fn weaver_failure_surfaces_from_add_child() {
    let c = classes();
    let mut tree = SceneTree::new();
    let root = tree.root();
    Weaver::default().inject(&mut tree);

    let lonely = tree.create_with_script("gate", c.gate, Gate::default());
    let err = tree.add_child(root, lonely).unwrap_err();

    match err {
        TreeError::Hook { hook, node, source } => {
            assert_eq!(hook, Weaver::KEY);
            assert_eq!(node, lonely);
            assert!(source.to_string().contains("does not have any installed descendant"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The node stays attached
    assert_eq!(tree.parent(lonely), Some(root));
}

#[test]
fn reporting_weaver_collects_failures() {
    let c = classes();
    let mut tree = SceneTree::new();
    let root = tree.root();
    let log = Arc::new(Mutex::new(FailureLog::new()));
    Weaver::default()
        .reporting_to(log.clone())
        .inject(&mut tree);

    let lonely = tree.create_with_script("gate", c.gate, Gate::default());
    tree.add_child(root, lonely).unwrap();
    let (gate_node, lever) = gate(&mut tree, &c);
    tree.add_child(root, gate_node).unwrap();

    let log = log.lock();
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].0, lonely);
    assert_eq!(gate_state(&tree, gate_node).0, Some(lever));
}

#[test]
fn weaver_honours_unwritable_policy() {
    let c = classes();
    let mut tree = SceneTree::new();
    let root = tree.root();
    let config = WeaveConfig::default().with_unwritable(UnwritablePolicy::Error);
    Weaver::new(config).inject(&mut tree);

    // Gate class, but no script to write into
    let bare = tree.create("bare", c.gate);
    let lever = tree.create("lever", c.lever);
    tree.add_child(bare, lever).unwrap();

    let err = tree.add_child(root, bare).unwrap_err();
    assert!(err.to_string().contains("cannot be written"));
}
