use alloc::vec;
use alloc::vec::Vec;

use crate::colour::Colour;
use crate::direction::{DirectionState, Position};
use crate::grid::{ColourGrid, PixelSource};

/// Where the program counter goes next, and what it is leaving behind.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Block {
    /// The codel to try to enter. May be off the grid.
    pub next: Position,
    /// Codel count of the departed block; `None` when sliding over white.
    pub size: Option<usize>,
    /// Colour of the departed block; `None` when sliding over white.
    pub colour: Option<Colour>,
}

/// Membership grid for one flood fill. It lives as long as the interpreter
/// and is cleared at the start of every fill, so nothing leaks from one
/// step to the next.
#[derive(Debug)]
pub struct Scratch {
    width: usize,
    height: usize,
    members: Vec<bool>,
    pending: Vec<(usize, usize)>,
}

impl Scratch {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            members: vec![false; width.saturating_mul(height)],
            pending: Vec::new(),
        }
    }

    pub fn for_grid<P: PixelSource>(grid: &ColourGrid<P>) -> Self {
        Self::new(grid.width(), grid.height())
    }

    fn reset(&mut self) {
        self.members.fill(false);
        self.pending.clear();
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        y.checked_mul(self.width)?.checked_add(x)
    }

    pub fn is_member(&self, x: usize, y: usize) -> bool {
        self.index(x, y)
            .and_then(|i| self.members.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Marks the cell, returning `true` if it was not already marked.
    fn mark(&mut self, x: usize, y: usize) -> bool {
        let Some(slot) = self.index(x, y).and_then(|i| self.members.get_mut(i)) else {
            return false;
        };
        let fresh = !*slot;
        *slot = true;
        fresh
    }
}

/// Finds the block under the program counter and the codel it exits to.
pub struct BlockLocator<'g, 's, P> {
    grid: &'g ColourGrid<P>,
    scratch: &'s mut Scratch,
}

impl<'g, 's, P: PixelSource> BlockLocator<'g, 's, P> {
    pub fn new(grid: &'g ColourGrid<P>, scratch: &'s mut Scratch) -> Self {
        Self { grid, scratch }
    }

    pub fn locate(&mut self, position: Position, direction: DirectionState) -> Block {
        match self.grid.colour_at(position) {
            None | Some(Colour::White) => Block {
                next: self.slide(position, direction),
                size: None,
                colour: None,
            },
            Some(colour) => {
                let size = self.fill(position, colour);
                let edge = self.furthest_edge(position, direction);
                let exit = self.exit_codel(edge, direction);
                Block {
                    next: exit.step(direction.pointer),
                    size: Some(size),
                    colour: Some(colour),
                }
            }
        }
    }

    /// Moves along the direction pointer until the colour is not white.
    /// Starting off the grid, stays put.
    fn slide(&self, position: Position, direction: DirectionState) -> Position {
        let mut current = position;
        while self.grid.colour_at(current) == Some(Colour::White) {
            current = current.step(direction.pointer);
        }
        current
    }

    /// Flood fills the 4-connected region of `colour` containing `start`
    /// and returns its codel count.
    pub fn fill(&mut self, start: Position, colour: Colour) -> usize {
        self.scratch.reset();
        let Some(origin) = self.grid.cell(start) else {
            return 0;
        };

        let mut count = 0usize;
        self.scratch.mark(origin.0, origin.1);
        self.scratch.pending.push(origin);
        while let Some((x, y)) = self.scratch.pending.pop() {
            count = count.saturating_add(1);
            let neighbours = [
                x.checked_add(1).map(|nx| (nx, y)),
                x.checked_sub(1).map(|nx| (nx, y)),
                y.checked_add(1).map(|ny| (x, ny)),
                y.checked_sub(1).map(|ny| (x, ny)),
            ];
            for (nx, ny) in neighbours.into_iter().flatten() {
                if !self.same_colour(nx, ny, colour) {
                    continue;
                }
                if self.scratch.mark(nx, ny) {
                    self.scratch.pending.push((nx, ny));
                }
            }
        }
        count
    }

    fn same_colour(&self, x: usize, y: usize, colour: Colour) -> bool {
        let (Ok(x), Ok(y)) = (isize::try_from(x), isize::try_from(y)) else {
            return false;
        };
        self.grid.colour_at(Position::new(x, y)) == Some(colour)
    }

    /// The first line perpendicular to the direction pointer, scanning
    /// outward from `position`, that holds no member of the block.
    fn furthest_edge(&self, position: Position, direction: DirectionState) -> isize {
        let (dx, dy) = direction.pointer.vector();
        let (mut coordinate, step) = if direction.pointer.is_horizontal() {
            (position.x, dx)
        } else {
            (position.y, dy)
        };
        while self.line_has_member(coordinate, direction) {
            coordinate = coordinate.wrapping_add(step);
        }
        coordinate
    }

    fn line_has_member(&self, coordinate: isize, direction: DirectionState) -> bool {
        let Ok(line) = usize::try_from(coordinate) else {
            return false;
        };
        if direction.pointer.is_horizontal() {
            line < self.grid.width() && (0..self.grid.height()).any(|y| self.scratch.is_member(line, y))
        } else {
            line < self.grid.height() && (0..self.grid.width()).any(|x| self.scratch.is_member(x, line))
        }
    }

    /// Among the members on the line just inside `edge`, the one furthest
    /// toward the side the codel chooser prefers.
    fn exit_codel(&self, edge: isize, direction: DirectionState) -> Position {
        let (dx, dy) = direction.pointer.vector();
        let (sx, sy) = direction.preferred_side();
        let horizontal = direction.pointer.is_horizontal();
        let inside = if horizontal {
            edge.wrapping_sub(dx)
        } else {
            edge.wrapping_sub(dy)
        };
        let span = if horizontal {
            self.grid.height()
        } else {
            self.grid.width()
        };

        let members = (0..span).filter_map(|along| {
            let along = isize::try_from(along).ok()?;
            let position = if horizontal {
                Position::new(inside, along)
            } else {
                Position::new(along, inside)
            };
            let (x, y) = self.grid.cell(position)?;
            self.scratch.is_member(x, y).then_some(position)
        });

        // The fill always leaves at least one member on this line.
        members
            .max_by_key(|p| p.x.wrapping_mul(sx).wrapping_add(p.y.wrapping_mul(sy)))
            .unwrap_or(if horizontal {
                Position::new(inside, 0)
            } else {
                Position::new(0, inside)
            })
    }
}
