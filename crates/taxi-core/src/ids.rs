//! Strongly typed, zero-cost identifier wrappers.
//!
//! Both IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct arithmetic (the shuttle steps `BranchId` up and down its line), but
//! callers should prefer the `.index()` helper when indexing.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Identity of one person in the roster.  Unique across the population.
    pub struct ActorId(u32);
}

typed_id! {
    /// Index of one stop on the line, `0..branch_count`.  Branch 0 is the
    /// origin (headquarters).  `u16` keeps shuttle state compact; no line
    /// needs more than 65,535 stops.
    pub struct BranchId(u16);
}

impl BranchId {
    /// The origin branch every actor starts from.
    pub const ORIGIN: BranchId = BranchId(0);
}
