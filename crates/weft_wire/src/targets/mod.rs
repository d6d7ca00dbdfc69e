//! Per-class wiring targets, resolved once.
//!
//! [`resolve`] gathers, for a concrete class, every wired member and every
//! connectable method declared on the class or any of its bases. The walk
//! goes from the most-derived class to `NODE`, so a member or method name
//! recorded at a derived level hides the same name further up.
//!
//! # Caching
//! Results are memoized for the process in a `DashMap`; a hit only takes the
//! shard read lock. Misses serialize on one mutex guarding the discovery
//! scratch buffers and re-check the map after acquiring it, so each class is
//! discovered once. [`clear_caches`] drops every result.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use weft_tree::ClassId;

use crate::declare::{Declaration, DeclaredHandler};
use crate::{Member, WireSpec};

/// A wired member together with its specification.
#[derive(Clone, Debug)]
pub struct Target {
    member: Member,
    spec: WireSpec,
}

impl Target {
    #[inline]
    pub fn member(&self) -> &Member {
        &self.member
    }

    #[inline]
    pub fn spec(&self) -> &WireSpec {
        &self.spec
    }
}

/// Everything the wiring passes need to know about one concrete class.
#[derive(Debug)]
pub struct Resolved {
    class: ClassId,
    targets: Vec<Target>,
    handlers: Vec<DeclaredHandler>,
    members: FxHashMap<&'static str, Member>,
}

impl Resolved {
    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Settable wired members, most-derived class first, declaration order
    /// within a class.
    #[inline]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Connectable methods, ordered like `targets`.
    #[inline]
    pub fn handlers(&self) -> &[DeclaredHandler] {
        &self.handlers
    }

    /// Any declared member by name, wired or not.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.handlers.is_empty()
    }
}

#[derive(Default)]
struct Scratch {
    targets: Vec<Target>,
    handlers: Vec<DeclaredHandler>,
    level_methods: Vec<&'static str>,
    seen_members: FxHashSet<&'static str>,
    seen_methods: FxHashSet<&'static str>,
}

impl Scratch {
    fn discover(&mut self, class: ClassId) -> Resolved {
        let mut members = FxHashMap::default();

        for level in class.inheritance() {
            let Some(declaration) = Declaration::lookup(level) else {
                continue;
            };

            for declared in declaration.members() {
                let member = declared.member();
                members
                    .entry(member.name())
                    .or_insert_with(|| member.clone());

                let Some(spec) = declared.wire() else {
                    continue;
                };
                if member.is_settable() && self.seen_members.insert(member.name()) {
                    self.targets.push(Target {
                        member: member.clone(),
                        spec: *spec,
                    });
                }
            }

            // Every binding of a method at this level survives; the name only
            // hides methods declared further up.
            for handler in declaration.handlers() {
                let name = handler.method().name();
                if !self.seen_methods.contains(name) {
                    self.handlers.push(handler.clone());
                    self.level_methods.push(name);
                }
            }
            self.seen_methods.extend(self.level_methods.drain(..));
        }

        let resolved = Resolved {
            class,
            targets: self.targets.drain(..).collect(),
            handlers: self.handlers.drain(..).collect(),
            members,
        };
        self.seen_members.clear();
        self.seen_methods.clear();
        resolved
    }
}

struct TargetCache {
    resolved: DashMap<ClassId, Arc<Resolved>, FxBuildHasher>,
    scratch: Mutex<Scratch>,
}

static CACHE: OnceLock<TargetCache> = OnceLock::new();

fn cache() -> &'static TargetCache {
    CACHE.get_or_init(|| TargetCache {
        resolved: DashMap::with_hasher(FxBuildHasher),
        scratch: Mutex::new(Scratch::default()),
    })
}

/// The wiring targets and handlers of `class`, discovered on first use.
pub fn resolve(class: ClassId) -> Arc<Resolved> {
    let cache = cache();
    if let Some(hit) = cache.resolved.get(&class) {
        return Arc::clone(hit.value());
    }

    let mut scratch = cache.scratch.lock();
    if let Some(hit) = cache.resolved.get(&class) {
        return Arc::clone(hit.value());
    }

    let resolved = Arc::new(scratch.discover(class));
    tracing::debug!(
        %class,
        targets = resolved.targets.len(),
        handlers = resolved.handlers.len(),
        "resolve class"
    );
    cache.resolved.insert(class, Arc::clone(&resolved));
    resolved
}

/// Forget every resolved class. Classes are rediscovered on next use.
pub fn clear_caches() {
    let cache = cache();
    let _scratch = cache.scratch.lock();
    cache.resolved.clear();
    tracing::debug!("clear target caches");
}

#[cfg(test)]
mod tests;
