//! Type-safe identifier wrappers.
//!
//! Customers and events carry strongly-typed UUID v7 identifiers so the
//! compiler prevents accidental mixing. Dishes are different: their
//! identity is a human-readable slug (`fish_soup`, `special-...`) because
//! the base menu is static data and generated specials must remain
//! distinguishable from it. Two dishes with identical display names but
//! different ids are distinct orders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a customer waiting at the stall.
    CustomerId
}

define_id! {
    /// Unique identifier for a generated narrative event.
    EventId
}

/// Identity of a dish on the menu.
///
/// Base-menu dishes use fixed slugs; generated specials get a
/// `special-<uuid>` slug so every special is a distinct order even when
/// the generator reuses a display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DishId(String);

impl DishId {
    /// Create a dish id from a static slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Create a fresh id for a generated special dish.
    pub fn special() -> Self {
        Self(format!("special-{}", Uuid::now_v7()))
    }

    /// Return the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DishId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
