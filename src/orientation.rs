//! Sides of a piece and orientations of a piece pair.

/// One of the four sides of a piece within the puzzle grid.
///
/// The `Ord` derive exists so candidate tuples containing a side have a
/// total order; the order between sides carries no meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Top,
    Right,
    Down,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Down, Side::Left];

    /// The side seen from the neighboring piece: T↔D, L↔R.
    pub fn complement(self) -> Side {
        match self {
            Side::Top => Side::Down,
            Side::Right => Side::Left,
            Side::Down => Side::Top,
            Side::Left => Side::Right,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Down => 2,
            Side::Left => 3,
        }
    }
}

/// How two pieces abut: first piece left of the second, or above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairOrientation {
    LeftRight,
    TopDown,
}

impl PairOrientation {
    pub const ALL: [PairOrientation; 2] = [PairOrientation::LeftRight, PairOrientation::TopDown];

    /// The `(first, second)` sides joined by this orientation:
    /// LR → (Left, Right), TD → (Top, Down).
    pub fn sides(self) -> (Side, Side) {
        match self {
            PairOrientation::LeftRight => (Side::Left, Side::Right),
            PairOrientation::TopDown => (Side::Top, Side::Down),
        }
    }
}
