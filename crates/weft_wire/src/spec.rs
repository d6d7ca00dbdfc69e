//! Wiring and connection specifications.
//!
//! A [`WireSpec`] says how a member is populated with a related node: which
//! direction to search, whether the node name matters, whether absence is an
//! error, and optionally which ancestor class to search from. A
//! [`ConnectSpec`] names a signal a method should be connected to.
//!
//! Both are plain immutable values built with `const` builders, so they can
//! be declared as constants next to the script they describe.

use bitflags::bitflags;
use weft_tree::ClassId;

bitflags! {
    /// Search options for a wired member.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct WireFlags: u8 {
        /// A missing target is not a failure; the member is left untouched.
        const OPTIONAL = 1 << 0;
        /// Search the ancestors instead of the descendants.
        const ANCESTOR = 1 << 1;
        /// Match on class alone, ignoring names.
        const TYPE_ONLY = 1 << 2;
    }
}

/// How a member finds the node it is wired to.
///
/// The defaults describe a required descendant whose name equals the
/// member name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct WireSpec {
    name: Option<&'static str>,
    flags: WireFlags,
    from: Option<ClassId>,
}

impl WireSpec {
    pub const fn new() -> Self {
        WireSpec {
            name: None,
            flags: WireFlags::empty(),
            from: None,
        }
    }

    /// Search for `name` instead of the member name.
    #[must_use]
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub const fn optional(self) -> Self {
        self.with(WireFlags::OPTIONAL)
    }

    #[must_use]
    pub const fn ancestor(self) -> Self {
        self.with(WireFlags::ANCESTOR)
    }

    #[must_use]
    pub const fn type_only(self) -> Self {
        self.with(WireFlags::TYPE_ONLY)
    }

    /// Start the search at the nearest ancestor (or the node itself) of
    /// class `class`. Falls back to the node when there is none.
    #[must_use]
    pub const fn from(mut self, class: ClassId) -> Self {
        self.from = Some(class);
        self
    }

    #[must_use]
    pub const fn with(mut self, flags: WireFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    #[inline]
    pub const fn has(&self, flag: WireFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub const fn flags(&self) -> WireFlags {
        self.flags
    }

    /// The explicit target name, if one was given.
    #[inline]
    pub const fn name(&self) -> Option<&'static str> {
        self.name
    }

    #[inline]
    pub const fn from_class(&self) -> Option<ClassId> {
        self.from
    }
}

/// Signal a method connects to.
///
/// With no emitter the node's own signal is used; otherwise the emitter is
/// the node currently held in the named member.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConnectSpec {
    signal: &'static str,
    emitter: Option<&'static str>,
}

impl ConnectSpec {
    pub const fn new(signal: &'static str) -> Self {
        ConnectSpec {
            signal,
            emitter: None,
        }
    }

    /// Listen on the node held in member `member` instead of the node itself.
    #[must_use]
    pub const fn emitter(mut self, member: &'static str) -> Self {
        self.emitter = Some(member);
        self
    }

    #[inline]
    pub const fn signal(&self) -> &'static str {
        self.signal
    }

    #[inline]
    pub const fn emitter_member(&self) -> Option<&'static str> {
        self.emitter
    }
}
