use core::fmt::Write;

use heapless::Vec;
use tracing::trace;

use crate::direction::{DirectionState, Position};
use crate::ops::Op;
use crate::{MachineError, STACK_CAPACITY, Word};

/// The bounded value stack. Stored bottom first; [`Stack::iter`] walks it
/// from the top down.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Stack {
    words: Vec<Word, STACK_CAPACITY>,
}

impl Stack {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn push(&mut self, value: Word) -> Result<(), MachineError> {
        self.words
            .push(value)
            .map_err(|_| MachineError::StackOverflow)
    }

    pub fn pop(&mut self) -> Result<Word, MachineError> {
        self.words.pop().ok_or(MachineError::StackUnderflow)
    }

    /// Pops the top two values as `(top, below)`.
    fn pop2(&mut self) -> Result<(Word, Word), MachineError> {
        self.require(2)?;
        let top = self.pop()?;
        let below = self.pop()?;
        Ok((top, below))
    }

    fn require(&self, count: usize) -> Result<(), MachineError> {
        if self.words.len() < count {
            return Err(MachineError::StackUnderflow);
        }
        Ok(())
    }

    /// The value `depth` places below the top, `0` being the top.
    pub fn peek(&self, depth: usize) -> Option<Word> {
        let index = self.words.len().checked_sub(depth)?.checked_sub(1)?;
        self.words.get(index).copied()
    }

    /// Walks the stack from the top down.
    pub fn iter(&self) -> impl Iterator<Item = Word> + '_ {
        self.words.iter().rev().copied()
    }

    /// Bottom first.
    pub fn as_slice(&self) -> &[Word] {
        self.words.as_slice()
    }

    /// Rotates the top `depth` values `turns` times. One positive turn buries
    /// the top value `depth` deep; one negative turn brings the value at
    /// `depth` to the top.
    fn roll(&mut self, depth: usize, turns: Word) {
        let Some(start) = self.words.len().checked_sub(depth) else {
            return;
        };
        let Some(window) = self.words.get_mut(start..) else {
            return;
        };
        let Ok(span) = Word::try_from(depth) else {
            return;
        };
        if span == 0 {
            return;
        }
        let Ok(turns) = usize::try_from(turns.rem_euclid(span)) else {
            return;
        };
        window.rotate_right(turns);
    }
}

/// Everything a run mutates apart from the failure counter: where the
/// program counter is, which way it faces, the stack and the unread input.
#[derive(Debug, Clone)]
pub struct Machine<'i> {
    pub position: Position,
    pub direction: DirectionState,
    pub stack: Stack,
    input: &'i str,
}

impl<'i> Machine<'i> {
    pub fn new(input: &'i str) -> Self {
        Self {
            position: Position::default(),
            direction: DirectionState::default(),
            stack: Stack::new(),
            input,
        }
    }

    /// Input not yet consumed by the read instructions.
    pub fn remaining_input(&self) -> &'i str {
        self.input
    }

    /// Runs one instruction. `block_size` is the codel count of the block
    /// being left, which `Push` uses as its operand.
    pub fn execute<W: Write>(
        &mut self,
        op: Op,
        block_size: usize,
        out: &mut W,
    ) -> Result<(), MachineError> {
        trace!(?op, block_size, depth = self.stack.len(), "execute");
        match op {
            Op::Push => {
                let value = Word::try_from(block_size).unwrap_or(Word::MAX);
                self.stack.push(value)?;
            }
            Op::Pop => {
                self.stack.pop()?;
            }
            Op::Add => {
                let (x, y) = self.stack.pop2()?;
                self.stack.push(y.wrapping_add(x))?;
            }
            Op::Subtract => {
                let (x, y) = self.stack.pop2()?;
                self.stack.push(y.wrapping_sub(x))?;
            }
            Op::Multiply => {
                let (x, y) = self.stack.pop2()?;
                self.stack.push(y.wrapping_mul(x))?;
            }
            Op::Divide => {
                let (x, y) = self.stack.pop2()?;
                if x == 0 {
                    self.stack.push(y)?;
                    self.stack.push(x)?;
                } else {
                    self.stack.push(y.wrapping_div(x))?;
                }
            }
            Op::Mod => {
                let (x, y) = self.stack.pop2()?;
                if x == 0 {
                    self.stack.push(y)?;
                    self.stack.push(x)?;
                } else {
                    self.stack.push(floor_mod(y, x))?;
                }
            }
            Op::Not => {
                let value = self.stack.pop()?;
                self.stack.push(Word::from(value == 0))?;
            }
            Op::Greater => {
                let (x, y) = self.stack.pop2()?;
                self.stack.push(Word::from(y > x))?;
            }
            Op::Pointer => {
                let turns = self.stack.pop()?.rem_euclid(4);
                for _ in 0..turns {
                    self.direction = self.direction.rotated();
                }
            }
            Op::Switch => {
                if self.stack.pop()?.rem_euclid(2) == 1 {
                    self.direction = self.direction.toggled();
                }
            }
            Op::Duplicate => {
                self.stack.require(1)?;
                let value = self.stack.pop()?;
                self.stack.push(value)?;
                self.stack.push(value)?;
            }
            Op::Roll => self.roll()?,
            Op::InNumber => {
                if let Some(value) = self.read_number() {
                    self.stack.push(value)?;
                }
            }
            Op::InChar => {
                if let Some(ch) = self.read_char() {
                    self.stack.push(Word::from(u32::from(ch)))?;
                }
            }
            Op::OutNumber => {
                let value = self.stack.pop()?;
                write!(out, "{value}")?;
            }
            Op::OutChar => {
                let value = self.stack.pop()?;
                let ch = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                out.write_char(ch)?;
            }
        }
        Ok(())
    }

    /// `num` is on top, `depth` beneath it.
    fn roll(&mut self) -> Result<(), MachineError> {
        let (num, depth) = self.stack.pop2()?;
        if depth < 0 {
            self.stack.push(depth)?;
            self.stack.push(num)?;
            return Ok(());
        }
        if num == 0 || depth < 2 {
            return Ok(());
        }
        let depth = usize::try_from(depth)
            .unwrap_or(usize::MAX)
            .min(self.stack.len());
        self.stack.roll(depth, num);
        Ok(())
    }

    fn read_char(&mut self) -> Option<char> {
        let mut chars = self.input.chars();
        let ch = chars.next()?;
        self.input = chars.as_str();
        Some(ch)
    }

    /// Reads a run of decimal digits, skipping one whitespace character in
    /// front of it. Leaves the input alone when no digits follow.
    fn read_number(&mut self) -> Option<Word> {
        let mut chars = self.input.chars();
        let first = chars.next()?;
        let rest = chars.as_str();
        let text = if first.is_whitespace() && rest.starts_with(|c: char| c.is_ascii_digit()) {
            rest
        } else {
            self.input
        };

        let end = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        if end == 0 {
            return None;
        }
        let (digits, tail) = text.split_at(end);
        let value = digits.bytes().fold(0, |acc: Word, digit| {
            acc.saturating_mul(10)
                .saturating_add(Word::from(digit.wrapping_sub(b'0')))
        });
        self.input = tail;
        Some(value)
    }
}

/// Remainder whose sign follows the divisor.
fn floor_mod(dividend: Word, divisor: Word) -> Word {
    let rem = dividend.wrapping_rem(divisor);
    if rem != 0 && (rem < 0) != (divisor < 0) {
        rem.wrapping_add(divisor)
    } else {
        rem
    }
}
