//! Positions and facings
//!
//! Parts live on one face of a block position:
//! - BlockPos: integer world coordinate
//! - Facing: one of the six axis-aligned directions
//! - PartPos: a position plus the face a part is mounted on

use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis-aligned direction. Ordinals are the persisted encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Facing {
    /// All facings in ordinal order
    pub const ALL: [Facing; 6] = [
        Facing::Down,
        Facing::Up,
        Facing::North,
        Facing::South,
        Facing::West,
        Facing::East,
    ];

    /// Parse from ordinal
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        match ordinal {
            0 => Some(Facing::Down),
            1 => Some(Facing::Up),
            2 => Some(Facing::North),
            3 => Some(Facing::South),
            4 => Some(Facing::West),
            5 => Some(Facing::East),
            _ => None,
        }
    }

    #[inline]
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Encode an optional facing the way it is persisted (-1 = none)
    pub fn to_persisted(side: Option<Facing>) -> i32 {
        side.map(Facing::ordinal).unwrap_or(-1)
    }

    pub fn opposite(self) -> Self {
        match self {
            Facing::Down => Facing::Up,
            Facing::Up => Facing::Down,
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::West => Facing::East,
            Facing::East => Facing::West,
        }
    }

    /// Unit step of this direction as (dx, dy, dz)
    pub fn step(self) -> (i32, i32, i32) {
        match self {
            Facing::Down => (0, -1, 0),
            Facing::Up => (0, 1, 0),
            Facing::North => (0, 0, -1),
            Facing::South => (0, 0, 1),
            Facing::West => (-1, 0, 0),
            Facing::East => (1, 0, 0),
        }
    }

    /// Lowercase name, as shown in side selectors
    pub fn name(self) -> &'static str {
        match self {
            Facing::Down => "down",
            Facing::Up => "up",
            Facing::North => "north",
            Facing::South => "south",
            Facing::West => "west",
            Facing::East => "east",
        }
    }

    /// Parse a lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        Facing::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// World block coordinate, ordered lexicographically by (x, y, z)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPos { x, y, z }
    }

    /// Neighboring position in the given direction
    pub fn offset(self, facing: Facing) -> Self {
        let (dx, dy, dz) = facing.step();
        BlockPos {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            z: self.z.wrapping_add(dz),
        }
    }

    /// All six neighbors in facing ordinal order
    pub fn neighbors(self) -> impl Iterator<Item = BlockPos> {
        Facing::ALL.into_iter().map(move |f| self.offset(f))
    }
}

impl fmt::Debug for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// A position plus a face, ordered by (pos, side)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartPos {
    pub pos: BlockPos,
    pub side: Facing,
}

impl PartPos {
    #[inline]
    pub fn new(pos: BlockPos, side: Facing) -> Self {
        PartPos { pos, side }
    }
}

impl fmt::Display for PartPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.pos, self.side)
    }
}
