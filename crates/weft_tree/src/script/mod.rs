//! Per-node script instances.
//!
//! A node's script holds the state that wiring writes into. Class
//! inheritance is expressed by composition: a derived script embeds its base
//! script and exposes it through [`Script::base`] / [`Script::base_mut`], so a
//! member declared on a base class can be written on a derived instance.
//!
//! Implement the trait with [`impl_script!`](crate::impl_script):
//!
//! ```text
//! struct Hud { health_bar: Option<NodeId> }
//! impl_script!(Hud);
//!
//! struct BossHud { hud: Hud, phase_label: Option<NodeId> }
//! impl_script!(BossHud => hud);
//! ```

use std::any::Any;

/// State attached to a node instance.
pub trait Script: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The embedded base-class script, if this script extends one.
    fn base(&self) -> Option<&(dyn Script + 'static)> {
        None
    }

    /// Mutable access to the embedded base-class script.
    fn base_mut(&mut self) -> Option<&mut (dyn Script + 'static)> {
        None
    }
}

impl dyn Script {
    /// Find `S` in this script or any embedded base script.
    pub fn downcast_ref<S: Script>(&self) -> Option<&S> {
        if let Some(script) = self.as_any().downcast_ref::<S>() {
            return Some(script);
        }
        self.base()?.downcast_ref::<S>()
    }

    /// Mutable variant of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<S: Script>(&mut self) -> Option<&mut S> {
        if self.as_any().is::<S>() {
            return self.as_any_mut().downcast_mut::<S>();
        }
        self.base_mut()?.downcast_mut::<S>()
    }

    /// Whether this script is, or embeds, an `S`.
    pub fn is<S: Script>(&self) -> bool {
        self.downcast_ref::<S>().is_some()
    }
}

/// Implement [`Script`] for a type, optionally naming the field that holds
/// its base-class script.
#[macro_export]
macro_rules! impl_script {
    ($ty:ty) => {
        impl $crate::Script for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
    ($ty:ty => $base:ident) => {
        impl $crate::Script for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn base(&self) -> Option<&(dyn $crate::Script + 'static)> {
                Some(&self.$base)
            }

            fn base_mut(&mut self) -> Option<&mut (dyn $crate::Script + 'static)> {
                Some(&mut self.$base)
            }
        }
    };
}
