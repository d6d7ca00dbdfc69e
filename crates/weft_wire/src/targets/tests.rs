#![allow(clippy::unwrap_used)]

use parking_lot::RwLock;
use pretty_assertions::assert_eq;
use rayon::prelude::*;
use weft_tree::{impl_script, NodeId};

use super::*;
use crate::{ConnectSpec, Method};

/// `clear_caches` is process-wide; tests comparing `Arc` identity hold the
/// read side so a concurrent clear cannot split them.
static CLEARING: RwLock<()> = RwLock::new(());

#[derive(Default)]
struct Turret {
    target: Option<NodeId>,
    barrel: Option<NodeId>,
    hits: usize,
}
impl_script!(Turret);

impl Turret {
    fn on_hit(&mut self, _emitter: NodeId) {
        self.hits += 1;
    }
}

#[derive(Default)]
struct Sentry {
    turret: Turret,
    lamp: Option<NodeId>,
}
impl_script!(Sentry => turret);

impl Sentry {
    fn beam(&self) -> Option<NodeId> {
        self.lamp
    }
}

fn field(name: &'static str, slot: crate::Slot) -> Member {
    Member::field(name, ClassId::NODE, slot)
}

fn target_names(resolved: &Resolved) -> Vec<(&'static str, WireSpec)> {
    resolved
        .targets()
        .iter()
        .map(|t| (t.member().name(), *t.spec()))
        .collect()
}

/// `Turret` declares `target` and `barrel`; `Sentry` overrides `target`,
/// adds `lamp` and an unsettable `beam`.
fn hierarchy() -> (ClassId, ClassId) {
    let turret = ClassId::define("Turret", ClassId::NODE);
    let sentry = ClassId::define("Sentry", turret);

    Declaration::of(turret)
        .wired(field("target", crate::slot!(Turret, target)), WireSpec::new())
        .wired(field("barrel", crate::slot!(Turret, barrel)), WireSpec::new().type_only())
        .connect(Method::on::<Turret>("on_hit", Turret::on_hit), ConnectSpec::new("hit"))
        .connect(Method::on::<Turret>("on_reload", Turret::on_hit), ConnectSpec::new("reload"))
        .register()
        .unwrap();

    Declaration::of(sentry)
        .wired(
            field("target", crate::slot!(Turret, target)),
            WireSpec::new().named("Intruder"),
        )
        .wired(field("lamp", crate::slot!(Sentry, lamp)), WireSpec::new().optional())
        .wired(
            Member::read_only("beam", ClassId::NODE, Sentry::beam),
            WireSpec::new(),
        )
        .connect(
            Method::on::<Turret>("on_hit", Turret::on_hit),
            ConnectSpec::new("alarm"),
        )
        .connect(
            Method::on::<Turret>("on_hit", Turret::on_hit),
            ConnectSpec::new("hit").emitter("lamp"),
        )
        .register()
        .unwrap();

    (turret, sentry)
}

#[test]
fn base_class_targets_in_declaration_order() {
    let (turret, _) = hierarchy();
    let resolved = resolve(turret);
    assert_eq!(
        target_names(&resolved),
        vec![
            ("target", WireSpec::new()),
            ("barrel", WireSpec::new().type_only()),
        ]
    );
}

#[test]
fn derived_declaration_overrides_base() {
    let (_, sentry) = hierarchy();
    let resolved = resolve(sentry);

    assert_eq!(resolved.class(), sentry);
    assert_eq!(
        target_names(&resolved),
        vec![
            ("target", WireSpec::new().named("Intruder")),
            ("lamp", WireSpec::new().optional()),
            ("barrel", WireSpec::new().type_only()),
        ]
    );
}

#[test]
fn derived_method_hides_base_bindings() {
    let (_, sentry) = hierarchy();
    let resolved = resolve(sentry);

    let handlers: Vec<_> = resolved
        .handlers()
        .iter()
        .map(|h| (h.method().name(), h.spec().signal(), h.spec().emitter_member()))
        .collect();
    assert_eq!(
        handlers,
        vec![
            ("on_hit", "alarm", None),
            ("on_hit", "hit", Some("lamp")),
            ("on_reload", "reload", None),
        ]
    );
}

#[test]
fn unsettable_members_are_readable_not_targets() {
    let (_, sentry) = hierarchy();
    let resolved = resolve(sentry);

    assert!(resolved.targets().iter().all(|t| t.member().name() != "beam"));
    assert!(resolved.member("beam").is_some());
    assert!(resolved.member("barrel").is_some());
    assert!(resolved.member("missing").is_none());
}

#[test]
fn undeclared_class_resolves_empty() {
    let plain = ClassId::define("Plain", ClassId::NODE);
    let resolved = resolve(plain);
    assert!(resolved.is_empty());
}

#[test]
fn undeclared_subclass_inherits_everything() {
    let (turret, _) = hierarchy();
    let heavy = ClassId::define("HeavyTurret", turret);
    assert_eq!(target_names(&resolve(heavy)), target_names(&resolve(turret)));
}

#[test]
fn resolution_is_memoized() {
    let _guard = CLEARING.read();
    let (_, sentry) = hierarchy();
    assert!(Arc::ptr_eq(&resolve(sentry), &resolve(sentry)));
}

#[test]
fn concurrent_population_agrees() {
    let _guard = CLEARING.read();
    let (_, sentry) = hierarchy();

    let all: Vec<Arc<Resolved>> = (0..64).into_par_iter().map(|_| resolve(sentry)).collect();
    assert!(all.iter().all(|r| Arc::ptr_eq(r, &all[0])));
    assert_eq!(all[0].targets().len(), 3);
}

#[test]
fn clear_caches_forces_rediscovery() {
    let _guard = CLEARING.write();
    let (turret, _) = hierarchy();
    let before = resolve(turret);

    clear_caches();
    let after = resolve(turret);

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(target_names(&before), target_names(&after));
}
