//! Member descriptors.
//!
//! A [`Member`] describes one node-reference member of a script: its name,
//! the class of node it holds, whether it is a field or a property, and how
//! (if at all) it can be written. [`Member::set`] hides the difference
//! between a property setter and a storage slot, so the installer writes
//! every member the same way.
//!
//! Members are built from a [`Slot`], the type-erased read/write pair for
//! one `Option<NodeId>` location inside a concrete script type:
//!
//! ```text
//! Member::field("health_bar", BAR, slot!(Hud, health_bar))
//! Member::property("target", ENEMY, Slot::accessors(Turret::target, Turret::aim_at))
//! ```

use std::fmt;
use std::sync::Arc;

use weft_tree::{ClassId, NodeId, Script, SignalHandler};

type Reader = Arc<dyn Fn(&(dyn Script + 'static)) -> Option<NodeId> + Send + Sync>;
type Writer = Arc<dyn Fn(&mut (dyn Script + 'static), NodeId) -> bool + Send + Sync>;

/// Read/write access to one node-reference location in a script type.
///
/// Both halves downcast the script (through embedded base scripts) and
/// report a shape mismatch as `None` / `false`.
#[derive(Clone)]
pub struct Slot {
    read: Reader,
    write: Writer,
}

impl Slot {
    /// Slot over a stored `Option<NodeId>` in script type `S`.
    pub fn field<S: Script>(
        read: fn(&S) -> &Option<NodeId>,
        write: fn(&mut S) -> &mut Option<NodeId>,
    ) -> Self {
        Slot {
            read: Arc::new(move |script: &(dyn Script + 'static)| {
                script.downcast_ref::<S>().and_then(|s| *read(s))
            }),
            write: Arc::new(move |script: &mut (dyn Script + 'static), node: NodeId| {
                match script.downcast_mut::<S>() {
                    Some(s) => {
                        *write(s) = Some(node);
                        true
                    }
                    None => false,
                }
            }),
        }
    }

    /// Slot over a getter/setter pair on script type `S`.
    pub fn accessors<S: Script>(get: fn(&S) -> Option<NodeId>, set: fn(&mut S, NodeId)) -> Self {
        Slot {
            read: Arc::new(move |script: &(dyn Script + 'static)| {
                script.downcast_ref::<S>().and_then(get)
            }),
            write: Arc::new(move |script: &mut (dyn Script + 'static), node: NodeId| {
                match script.downcast_mut::<S>() {
                    Some(s) => {
                        set(s, node);
                        true
                    }
                    None => false,
                }
            }),
        }
    }

    /// Read-only view over a getter on script type `S`.
    fn getter<S: Script>(get: fn(&S) -> Option<NodeId>) -> Reader {
        Arc::new(move |script: &(dyn Script + 'static)| script.downcast_ref::<S>().and_then(get))
    }
}

/// Build a [`Slot`] over a named `Option<NodeId>` field of a script type.
#[macro_export]
macro_rules! slot {
    ($script:ty, $field:ident) => {
        $crate::Slot::field::<$script>(|s| &s.$field, |s| &mut s.$field)
    };
}

/// Whether a member is stored data or an accessor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberKind {
    Field,
    Property,
}

/// How a member can be written.
#[derive(Clone)]
pub enum Access {
    /// A property setter.
    Setter(Writer),
    /// Direct storage: a field, or the backing storage of a read-only property.
    Storage(Writer),
    /// Not writable.
    None,
}

impl Access {
    fn writer(&self) -> Option<&Writer> {
        match self {
            Access::Setter(write) | Access::Storage(write) => Some(write),
            Access::None => None,
        }
    }
}

impl fmt::Debug for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Setter(_) => f.write_str("Setter"),
            Access::Storage(_) => f.write_str("Storage"),
            Access::None => f.write_str("None"),
        }
    }
}

/// A node-reference member of a script.
#[derive(Clone)]
pub struct Member {
    name: &'static str,
    class: ClassId,
    kind: MemberKind,
    access: Access,
    read: Reader,
}

impl Member {
    /// A stored field.
    pub fn field(name: &'static str, class: ClassId, slot: Slot) -> Self {
        Member {
            name,
            class,
            kind: MemberKind::Field,
            access: Access::Storage(slot.write),
            read: slot.read,
        }
    }

    /// A property with a setter.
    pub fn property(name: &'static str, class: ClassId, slot: Slot) -> Self {
        Member {
            name,
            class,
            kind: MemberKind::Property,
            access: Access::Setter(slot.write),
            read: slot.read,
        }
    }

    /// A read-only property written through its backing storage.
    pub fn backed(name: &'static str, class: ClassId, storage: Slot) -> Self {
        Member {
            name,
            class,
            kind: MemberKind::Property,
            access: Access::Storage(storage.write),
            read: storage.read,
        }
    }

    /// A computed property with no storage. Readable, never written.
    pub fn read_only<S: Script>(
        name: &'static str,
        class: ClassId,
        get: fn(&S) -> Option<NodeId>,
    ) -> Self {
        Member {
            name,
            class,
            kind: MemberKind::Property,
            access: Access::None,
            read: Slot::getter(get),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared value class: the class of node this member holds.
    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn access(&self) -> &Access {
        &self.access
    }

    pub fn is_settable(&self) -> bool {
        self.access.writer().is_some()
    }

    /// Write `value` into the member on `script`.
    ///
    /// Returns `false` when the member is not writable or `script` does not
    /// contain the type the member was declared on.
    pub fn set(&self, script: &mut (dyn Script + 'static), value: NodeId) -> bool {
        self.access.writer().is_some_and(|write| write(script, value))
    }

    /// Current value of the member on `script`.
    pub fn get(&self, script: &(dyn Script + 'static)) -> Option<NodeId> {
        (self.read)(script)
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("class", &self.class)
            .field("kind", &self.kind)
            .field("access", &self.access)
            .finish()
    }
}

/// A script method that can be connected to a signal.
#[derive(Clone)]
pub struct Method {
    name: &'static str,
    handler: SignalHandler,
}

impl Method {
    pub fn new(name: &'static str, handler: SignalHandler) -> Self {
        Method { name, handler }
    }

    /// A method whose handler receives the script as `S`. Invocations on a
    /// script of another shape are ignored.
    pub fn on<S: Script>(name: &'static str, handler: fn(&mut S, NodeId)) -> Self {
        Method::new(
            name,
            Arc::new(move |script: &mut (dyn Script + 'static), emitter: NodeId| {
                if let Some(script) = script.downcast_mut::<S>() {
                    handler(script, emitter);
                }
            }),
        )
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn handler(&self) -> &SignalHandler {
        &self.handler
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Method").field(&self.name).finish()
    }
}
