//! Runtime class hierarchy for scene nodes.
//!
//! Every node carries a `ClassId` naming its concrete runtime class. Classes
//! form a single-inheritance hierarchy rooted at [`ClassId::NODE`]. The table
//! is process-wide and append-only: a class never changes after definition,
//! which is what lets per-class caches live for the whole process.
//!
//! # Thread Safety
//! The table sits behind one `RwLock`. Lookups take the read side; only
//! `define` writes.

use parking_lot::RwLock;
use std::fmt;
use std::sync::OnceLock;

/// Identifier of a runtime node class.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ClassId(u32);

/// Error when defining a class fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassError {
    /// More classes than a `u32` index can address.
    #[error("class table exceeded capacity: {count} classes, max is {}", u32::MAX)]
    TableFull { count: usize },
}

#[derive(Copy, Clone)]
struct ClassInfo {
    name: &'static str,
    base: Option<ClassId>,
}

struct ClassTable {
    classes: RwLock<Vec<ClassInfo>>,
}

impl ClassTable {
    fn new() -> Self {
        // `ClassId::NODE` is pre-registered at index 0
        let root = ClassInfo {
            name: "Node",
            base: None,
        };
        ClassTable {
            classes: RwLock::new(vec![root]),
        }
    }

    fn info(&self, class: ClassId) -> ClassInfo {
        self.classes.read()[class.index()]
    }
}

static CLASSES: OnceLock<ClassTable> = OnceLock::new();

fn table() -> &'static ClassTable {
    CLASSES.get_or_init(ClassTable::new)
}

impl ClassId {
    /// The root class every node class derives from.
    pub const NODE: ClassId = ClassId(0);

    /// Try to define a new class deriving from `base`.
    pub fn try_define(name: &str, base: ClassId) -> Result<ClassId, ClassError> {
        let mut classes = table().classes.write();
        let index = u32::try_from(classes.len()).map_err(|_| ClassError::TableFull {
            count: classes.len(),
        })?;

        // Class names live as long as the table does
        let name: &'static str = Box::leak(name.to_owned().into_boxed_str());
        classes.push(ClassInfo {
            name,
            base: Some(base),
        });

        tracing::trace!(class = name, base = table_name(&classes, base), "define class");
        Ok(ClassId(index))
    }

    /// Define a new class deriving from `base`.
    ///
    /// Defining the same name twice yields two distinct classes.
    ///
    /// # Panics
    /// Panics if the table already holds `u32::MAX` classes. Use
    /// [`try_define`](Self::try_define) to handle that case.
    pub fn define(name: &str, base: ClassId) -> ClassId {
        match Self::try_define(name, base) {
            Ok(class) => class,
            Err(e) => panic!("{e}"),
        }
    }

    /// Get the index into the class table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The class name given at definition.
    pub fn name(self) -> &'static str {
        table().info(self).name
    }

    /// The direct base class, `None` only for [`ClassId::NODE`].
    pub fn base(self) -> Option<ClassId> {
        table().info(self).base
    }

    /// Whether `self` is `ancestor` or derives from it.
    pub fn is_a(self, ancestor: ClassId) -> bool {
        if ancestor == ClassId::NODE || self == ancestor {
            return true;
        }

        let classes = table().classes.read();
        let mut current = classes[self.index()].base;
        while let Some(class) = current {
            if class == ancestor {
                return true;
            }
            current = classes[class.index()].base;
        }
        false
    }

    /// Iterate from this class up through each base class to `NODE`.
    pub fn inheritance(self) -> Inheritance {
        Inheritance { next: Some(self) }
    }
}

fn table_name(classes: &[ClassInfo], class: ClassId) -> &'static str {
    classes[class.index()].name
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({}: {})", self.0, self.name())
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Most-derived-first walk of a class and its bases.
#[derive(Clone, Debug)]
pub struct Inheritance {
    next: Option<ClassId>,
}

impl Iterator for Inheritance {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        self.next = current.base();
        Some(current)
    }
}
