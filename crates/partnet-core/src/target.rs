//! Part addressing
//!
//! A part is mounted at a *center* and observes or affects a *target*.

use serde::{Deserialize, Serialize};

use crate::{BlockPos, Facing, PartPos};

/// Immutable addressing value of a part.
///
/// Ordered and hashed structurally: center first, then target, each by
/// (position, facing).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartTarget {
    center: PartPos,
    target: PartPos,
}

impl PartTarget {
    pub fn new(center: PartPos, target: PartPos) -> Self {
        PartTarget { center, target }
    }

    /// Target of a part that looks outward through the face it is mounted on.
    ///
    /// The targeted block is the center's neighbor on that face. It is seen
    /// from `side_override`, or from the facing back toward the part when no
    /// override is set.
    pub fn for_part(center: PartPos, side_override: Option<Facing>) -> Self {
        let target_pos = center.pos.offset(center.side);
        let target_side = side_override.unwrap_or_else(|| Self::default_side(center));
        PartTarget {
            center,
            target: PartPos::new(target_pos, target_side),
        }
    }

    /// Target of a part that acts on its own position
    pub fn self_targeting(center: PartPos) -> Self {
        PartTarget {
            center,
            target: center,
        }
    }

    /// Side a target is seen from when no override is set
    #[inline]
    pub fn default_side(center: PartPos) -> Facing {
        center.side.opposite()
    }

    #[inline]
    pub fn center(&self) -> PartPos {
        self.center
    }

    #[inline]
    pub fn target(&self) -> PartPos {
        self.target
    }

    #[inline]
    pub fn center_pos(&self) -> BlockPos {
        self.center.pos
    }

    #[inline]
    pub fn center_side(&self) -> Facing {
        self.center.side
    }

    #[inline]
    pub fn target_pos(&self) -> BlockPos {
        self.target.pos
    }

    #[inline]
    pub fn target_side(&self) -> Facing {
        self.target.side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_part_default_side() {
        let center = PartPos::new(BlockPos::new(1, 2, 3), Facing::North);
        let target = PartTarget::for_part(center, None);

        assert_eq!(target.center(), center);
        assert_eq!(target.target_pos(), BlockPos::new(1, 2, 2));
        assert_eq!(target.target_side(), Facing::South);
    }

    #[test]
    fn test_for_part_side_override() {
        let center = PartPos::new(BlockPos::ORIGIN, Facing::Up);
        let target = PartTarget::for_part(center, Some(Facing::East));

        assert_eq!(target.target_pos(), BlockPos::new(0, 1, 0));
        assert_eq!(target.target_side(), Facing::East);
    }

    #[test]
    fn test_structural_equality() {
        let center = PartPos::new(BlockPos::ORIGIN, Facing::West);
        assert_eq!(PartTarget::for_part(center, None), PartTarget::for_part(center, None));
        assert_ne!(PartTarget::for_part(center, None), PartTarget::self_targeting(center));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_facing() -> impl Strategy<Value = Facing> {
            prop::sample::select(Facing::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn target_is_adjacent_to_center(
                x in -100i32..100,
                y in -100i32..100,
                z in -100i32..100,
                side in arb_facing(),
                side_override in prop::option::of(arb_facing()),
            ) {
                let center = PartPos::new(BlockPos::new(x, y, z), side);
                let target = PartTarget::for_part(center, side_override);

                prop_assert_eq!(target.target_pos().offset(side.opposite()), center.pos);
                prop_assert_eq!(
                    target.target_side(),
                    side_override.unwrap_or_else(|| PartTarget::default_side(center))
                );
            }
        }
    }
}
