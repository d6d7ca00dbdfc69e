//! Per-class member and handler declarations.
//!
//! Each class declares only what it adds itself: its own members (some of
//! them carrying a [`WireSpec`]) and its own connectable methods. Inherited
//! declarations are gathered later by the target cache, walking the class
//! chain. A class is declared at most once, before nodes of that class are
//! wired; the target cache does not see declarations registered after it
//! resolved the class.
//!
//! ```text
//! Declaration::of(HUD)
//!     .member(Member::field("health_bar", BAR, slot!(Hud, health_bar)))
//!     .wire("health_bar", WireSpec::new().type_only())
//!     .connect(Method::on::<Hud>("on_hit", Hud::on_hit), ConnectSpec::new("hit"))
//!     .register()?;
//! ```

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use weft_tree::ClassId;

use crate::{ConnectSpec, DeclareError, Member, Method, WireSpec};

/// A member as declared on one class, with its wiring if it has any.
#[derive(Clone, Debug)]
pub struct DeclaredMember {
    member: Member,
    wire: Option<WireSpec>,
}

impl DeclaredMember {
    #[inline]
    pub fn member(&self) -> &Member {
        &self.member
    }

    #[inline]
    pub fn wire(&self) -> Option<&WireSpec> {
        self.wire.as_ref()
    }
}

/// A connectable method with one of its signal bindings.
#[derive(Clone, Debug)]
pub struct DeclaredHandler {
    method: Method,
    spec: ConnectSpec,
}

impl DeclaredHandler {
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn spec(&self) -> &ConnectSpec {
        &self.spec
    }
}

/// Everything one class declares itself, inherited declarations excluded.
#[derive(Debug)]
pub struct Declaration {
    class: ClassId,
    members: Vec<DeclaredMember>,
    handlers: Vec<DeclaredHandler>,
}

impl Declaration {
    /// Start declaring `class`.
    pub fn of(class: ClassId) -> DeclarationBuilder {
        DeclarationBuilder {
            class,
            members: Vec::new(),
            wires: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// The registered declaration of `class`, if any.
    pub fn lookup(class: ClassId) -> Option<Arc<Declaration>> {
        registry().read().get(&class).cloned()
    }

    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Declared members in declaration order.
    #[inline]
    pub fn members(&self) -> &[DeclaredMember] {
        &self.members
    }

    /// Declared handlers in declaration order.
    #[inline]
    pub fn handlers(&self) -> &[DeclaredHandler] {
        &self.handlers
    }
}

/// Builder returned by [`Declaration::of`].
#[must_use]
pub struct DeclarationBuilder {
    class: ClassId,
    members: Vec<Member>,
    wires: Vec<(&'static str, WireSpec)>,
    handlers: Vec<DeclaredHandler>,
}

impl DeclarationBuilder {
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Attach `spec` to the member named `member`. A later spec for the same
    /// member replaces an earlier one.
    pub fn wire(mut self, member: &'static str, spec: WireSpec) -> Self {
        self.wires.push((member, spec));
        self
    }

    /// Declare `member` and wire it in one step.
    pub fn wired(self, member: Member, spec: WireSpec) -> Self {
        let name = member.name();
        self.member(member).wire(name, spec)
    }

    /// Bind `method` to a signal. A method may be bound more than once.
    pub fn connect(mut self, method: Method, spec: ConnectSpec) -> Self {
        self.handlers.push(DeclaredHandler { method, spec });
        self
    }

    /// Validate without registering.
    pub fn build(self) -> Result<Declaration, DeclareError> {
        let class = self.class;
        let mut members: Vec<DeclaredMember> = Vec::with_capacity(self.members.len());
        for member in self.members {
            if members.iter().any(|m| m.member.name() == member.name()) {
                return Err(DeclareError::DuplicateMember {
                    class,
                    member: member.name(),
                });
            }
            members.push(DeclaredMember { member, wire: None });
        }

        for (name, spec) in self.wires {
            let declared = members
                .iter_mut()
                .find(|m| m.member.name() == name)
                .ok_or(DeclareError::UnknownMember {
                    class,
                    member: name,
                })?;
            declared.wire = Some(spec);
        }

        Ok(Declaration {
            class,
            members,
            handlers: self.handlers,
        })
    }

    /// Validate and register process-wide.
    pub fn register(self) -> Result<Arc<Declaration>, DeclareError> {
        let declaration = Arc::new(self.build()?);
        let class = declaration.class;

        let mut registry = registry().write();
        if registry.contains_key(&class) {
            return Err(DeclareError::AlreadyDeclared { class });
        }
        registry.insert(class, Arc::clone(&declaration));

        tracing::debug!(
            %class,
            members = declaration.members.len(),
            handlers = declaration.handlers.len(),
            "declare class"
        );
        Ok(declaration)
    }
}

type Registry = RwLock<FxHashMap<ClassId, Arc<Declaration>>>;

static DECLARATIONS: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    DECLARATIONS.get_or_init(|| RwLock::new(FxHashMap::default()))
}
