/// A codel coordinate. Positions off the grid are legal and mean "beyond the
/// edge".
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Position {
    pub x: isize,
    pub y: isize,
}

impl Position {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one codel along `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

/// The direction pointer. Screen coordinates, so `Down` is `+y`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const fn vector(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    pub const fn clockwise(self) -> Self {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
        }
    }

    /// The unit vector pointing to the left hand of someone looking along
    /// this direction.
    pub const fn left_hand(self) -> (isize, isize) {
        let (dx, dy) = self.vector();
        (dy, -dx)
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }
}

/// The codel chooser, relative to the direction pointer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Chooser {
    Left,
    Right,
}

impl Chooser {
    pub const fn toggled(self) -> Self {
        match self {
            Chooser::Left => Chooser::Right,
            Chooser::Right => Chooser::Left,
        }
    }
}

/// Direction pointer and codel chooser together. This is a value type: a
/// rotation or a toggle produces a new state rather than mutating one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct DirectionState {
    pub pointer: Direction,
    pub chooser: Chooser,
}

impl Default for DirectionState {
    fn default() -> Self {
        Self {
            pointer: Direction::Right,
            chooser: Chooser::Left,
        }
    }
}

impl DirectionState {
    pub const fn rotated(self) -> Self {
        Self {
            pointer: self.pointer.clockwise(),
            chooser: self.chooser,
        }
    }

    pub const fn toggled(self) -> Self {
        Self {
            pointer: self.pointer,
            chooser: self.chooser.toggled(),
        }
    }

    /// The perpendicular unit vector the codel chooser prefers when picking
    /// among exit codels on a block's furthest edge.
    pub const fn preferred_side(self) -> (isize, isize) {
        let (lx, ly) = self.pointer.left_hand();
        match self.chooser {
            Chooser::Left => (lx, ly),
            Chooser::Right => (-lx, -ly),
        }
    }
}
