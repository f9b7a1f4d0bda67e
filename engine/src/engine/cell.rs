// engine/src/engine/cell.rs
#![forbid(unsafe_code)]

/// One grid position.
///
/// `Cat`, `Chick` and `Cow` are plain tokens. `HeadLeft`, `Body` and `HeadRight` are the
/// parts of a multi-cell creature; contiguous horizontal runs of them shrink as a unit
/// when their row clears (see `runs`).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Cat,
    Chick,
    Cow,
    HeadLeft,
    Body,
    HeadRight,
}

impl Cell {
    /// Plain tokens, in code order. Random rows draw from this set.
    pub const PLAIN: [Cell; 3] = [Cell::Cat, Cell::Chick, Cell::Cow];

    pub fn all() -> &'static [Cell] {
        use Cell::*;
        &[Empty, Cat, Chick, Cow, HeadLeft, Body, HeadRight]
    }

    /// Stable integer code used for external board/row input (0 = empty).
    pub fn code(self) -> u8 {
        use Cell::*;
        match self {
            Empty => 0,
            Cat => 1,
            Chick => 2,
            Cow => 3,
            HeadLeft => 4,
            Body => 5,
            HeadRight => 6,
        }
    }

    /// Inverse of `code()`. Returns None for codes outside the enumeration.
    pub fn from_code(code: i64) -> Option<Self> {
        use Cell::*;
        match code {
            0 => Some(Empty),
            1 => Some(Cat),
            2 => Some(Chick),
            3 => Some(Cow),
            4 => Some(HeadLeft),
            5 => Some(Body),
            6 => Some(HeadRight),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        use Cell::*;
        match self {
            Empty => '.',
            Cat => 'c',
            Chick => 'h',
            Cow => 'w',
            HeadLeft => '<',
            Body => '=',
            HeadRight => '>',
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[inline]
    pub fn is_special(self) -> bool {
        matches!(self, Cell::HeadLeft | Cell::Body | Cell::HeadRight)
    }
}
