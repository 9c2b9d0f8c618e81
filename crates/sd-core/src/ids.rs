//! Strongly typed handles into the road-network arena and the routing graphs.
//!
//! Every entity of the road network lives in a `Vec` owned by the network and
//! is addressed by one of these handles instead of a reference, so links,
//! segments and nodes can point at each other without ownership cycles.
//! All handles are `Copy + Ord + Hash`; the inner integer is `pub` but the
//! `.index()` helper reads better at call sites.

use std::fmt;

/// Generate a typed handle wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid handle".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so unset handles are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
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

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

// ── Road network ──────────────────────────────────────────────────────────────

typed_id! {
    /// Index of a node (uni-node or multi-node) in the road network.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a named link.
    pub struct LinkId(u32);
}

typed_id! {
    /// Index of a road segment.  Each segment belongs to exactly one link.
    pub struct SegmentId(u32);
}

typed_id! {
    /// Index of a lane.  Lane handles are global, not per segment.
    pub struct LaneId(u32);
}

typed_id! {
    /// Index of a pedestrian crossing.
    pub struct CrossingId(u32);
}

typed_id! {
    /// Index of a bus stop.
    pub struct BusStopId(u32);
}

// ── Routing graphs ────────────────────────────────────────────────────────────

typed_id! {
    /// Index of a vertex in a driving or walking graph.
    pub struct VertexId(u32);
}

typed_id! {
    /// Index of a directed edge in a driving or walking graph (CSR order).
    pub struct EdgeId(u32);
}
