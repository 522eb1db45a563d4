//! Arena indices for network and schedule elements.
//!
//! Nodes, links, stops and routes live in `Vec`s owned by the `Network` or
//! the `TransitSchedule`; an ID is the element's position there and never
//! changes once the owning structure is built.  IDs order by position, which
//! is also declaration order, so sorting by ID gives reproducible iteration.

use std::fmt;

macro_rules! arena_id {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "no element", e.g. the predecessor link of a
            /// search root.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `None` if `index` does not fit the 32-bit arena range.
            #[inline]
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index).ok().filter(|&i| i != u32::MAX).map($name)
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, " {}"), self.0)
                } else {
                    f.write_str(concat!($label, " <invalid>"))
                }
            }
        }
    };
}

arena_id!(
    /// Road-network node.
    NodeId, "node"
);

arena_id!(
    /// Directed road-network link, numbered in insertion order.
    LinkId, "link"
);

arena_id!(
    /// Transit stop facility.
    StopId, "stop"
);

arena_id!(
    /// Transit route, numbered in declaration order.  Routes are scanned in
    /// this order by the router.
    RouteId, "route"
);
