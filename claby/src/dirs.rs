use std::fmt;
use std::ops::{Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub, SubAssign};

use rand::seq::SliceRandom;
use smallvec::SmallVec;
use thiserror::Error;

use crate::algorithms::Random;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirsError {
    #[error("unknown direction letter {letter:?}, expected one of \"lrud\"")]
    UnknownLetter { letter: char },
    #[error("{dirs} is not a single direction")]
    NotSingle { dirs: Dirs },
    #[error("{dirs} has no opposite")]
    NoOpposite { dirs: Dirs },
    #[error("{dirs} has no normal axis")]
    NoNormal { dirs: Dirs },
}

/// A set of the four grid directions, packed into one nibble.
///
/// Cells use it for their open passages, routes for the way they went,
/// the renderer for picking box-drawing glyphs. Set operations are the
/// plain bit operators; iteration always yields the single directions
/// in the fixed order left, right, up, down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dirs(u8);

impl Dirs {
    pub const NONE: Dirs = Dirs(0b0000);
    pub const LEFT: Dirs = Dirs(0b0001);
    pub const RIGHT: Dirs = Dirs(0b0010);
    pub const UP: Dirs = Dirs(0b0100);
    pub const DOWN: Dirs = Dirs(0b1000);
    /// The horizontal axis, `LEFT | RIGHT`.
    pub const H: Dirs = Dirs(0b0011);
    /// The vertical axis, `UP | DOWN`.
    pub const V: Dirs = Dirs(0b1100);
    pub const ALL: Dirs = Dirs(0b1111);

    /// The single directions in canonical order.
    pub fn seq() -> [Dirs; 4] {
        [Dirs::LEFT, Dirs::RIGHT, Dirs::UP, Dirs::DOWN]
    }

    /// Parse a direction set from its letters, case-insensitively.
    pub fn from_letters(letters: &str) -> Result<Dirs, DirsError> {
        let mut dirs = Dirs::NONE;
        for letter in letters.chars() {
            dirs |= match letter.to_ascii_lowercase() {
                'l' => Dirs::LEFT,
                'r' => Dirs::RIGHT,
                'u' => Dirs::UP,
                'd' => Dirs::DOWN,
                other => return Err(DirsError::UnknownLetter { letter: other }),
            };
        }
        Ok(dirs)
    }

    pub fn is_empty(self) -> bool {
        self == Dirs::NONE
    }

    /// Whether every member of `other` is also a member of `self`.
    pub fn contains(self, other: Dirs) -> bool {
        self & other == other
    }

    /// Whether `self` and `other` share at least one member.
    pub fn intersects(self, other: Dirs) -> bool {
        self & other != Dirs::NONE
    }

    /// The mirrored set. Defined for single directions and the two axis
    /// composites; arbitrary compositions have no opposite.
    pub fn opposite(self) -> Result<Dirs, DirsError> {
        match self {
            Dirs::LEFT => Ok(Dirs::RIGHT),
            Dirs::RIGHT => Ok(Dirs::LEFT),
            Dirs::UP => Ok(Dirs::DOWN),
            Dirs::DOWN => Ok(Dirs::UP),
            Dirs::H | Dirs::V => Ok(self),
            _ => Err(DirsError::NoOpposite { dirs: self }),
        }
    }

    /// The perpendicular axis of a single direction or an axis composite.
    pub fn normal(self) -> Result<Dirs, DirsError> {
        if !self.is_empty() && Dirs::H.contains(self) {
            Ok(Dirs::V)
        } else if !self.is_empty() && Dirs::V.contains(self) {
            Ok(Dirs::H)
        } else {
            Err(DirsError::NoNormal { dirs: self })
        }
    }

    /// The unit translation of a single direction, as (row, column).
    pub fn delta(self) -> Result<Pos, DirsError> {
        match self {
            Dirs::LEFT => Ok(Pos(0, -1)),
            Dirs::RIGHT => Ok(Pos(0, 1)),
            Dirs::UP => Ok(Pos(-1, 0)),
            Dirs::DOWN => Ok(Pos(1, 0)),
            _ => Err(DirsError::NotSingle { dirs: self }),
        }
    }

    /// One uniformly chosen member, or `NONE` when the set is empty.
    pub fn choice(self, rng: &mut Random) -> Dirs {
        let members: SmallVec<[Dirs; 4]> = self.iter().collect();
        members.choose(rng).copied().unwrap_or(Dirs::NONE)
    }

    pub fn iter(self) -> DirsIter {
        self.into_iter()
    }
}

impl BitOr for Dirs {
    type Output = Dirs;

    fn bitor(self, other: Dirs) -> Dirs {
        Dirs(self.0 | other.0)
    }
}

impl BitOrAssign for Dirs {
    fn bitor_assign(&mut self, other: Dirs) {
        self.0 |= other.0;
    }
}

impl BitAnd for Dirs {
    type Output = Dirs;

    fn bitand(self, other: Dirs) -> Dirs {
        Dirs(self.0 & other.0)
    }
}

impl BitAndAssign for Dirs {
    fn bitand_assign(&mut self, other: Dirs) {
        self.0 &= other.0;
    }
}

impl Not for Dirs {
    type Output = Dirs;

    fn not(self) -> Dirs {
        Dirs(!self.0 & Dirs::ALL.0)
    }
}

impl fmt::Display for Dirs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for dir in self.iter() {
            f.write_str(match dir {
                Dirs::LEFT => "l",
                Dirs::RIGHT => "r",
                Dirs::UP => "u",
                Dirs::DOWN => "d",
                _ => unreachable!(),
            })?;
        }
        Ok(())
    }
}

pub struct DirsIter {
    dirs: Dirs,
    idx: usize,
}

impl Iterator for DirsIter {
    type Item = Dirs;

    fn next(&mut self) -> Option<Dirs> {
        while self.idx < 4 {
            let dir = Dirs::seq()[self.idx];
            self.idx += 1;
            if self.dirs.intersects(dir) {
                return Some(dir);
            }
        }
        None
    }
}

impl IntoIterator for Dirs {
    type Item = Dirs;
    type IntoIter = DirsIter;

    fn into_iter(self) -> DirsIter {
        DirsIter { dirs: self, idx: 0 }
    }
}

/// A (row, column) position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos(pub i32, pub i32);

impl Pos {
    pub const ZERO: Pos = Pos(0, 0);

    /// Row-major iteration over the rectangle `from..to`.
    pub fn iter_fill(from: Pos, to: Pos) -> impl Iterator<Item = Pos> {
        (from.0..to.0).flat_map(move |row| (from.1..to.1).map(move |col| Pos(row, col)))
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, other: Pos) -> Pos {
        Pos(self.0 + other.0, self.1 + other.1)
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, other: Pos) -> Pos {
        Pos(self.0 - other.0, self.1 - other.1)
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, other: Pos) {
        self.0 += other.0;
        self.1 += other.1;
    }
}

impl SubAssign for Pos {
    fn sub_assign(&mut self, other: Pos) {
        self.0 -= other.0;
        self.1 -= other.1;
    }
}

impl From<(i32, i32)> for Pos {
    fn from(tuple: (i32, i32)) -> Self {
        Pos(tuple.0, tuple.1)
    }
}

impl From<Pos> for (i32, i32) {
    fn from(val: Pos) -> Self {
        (val.0, val.1)
    }
}
