use core::fmt::Write;

use tracing::{debug, trace};

use crate::block::{BlockLocator, Scratch};
use crate::colour::Colour;
use crate::grid::{ColourGrid, PixelSource};
use crate::machine::Machine;
use crate::ops::Op;
use crate::MachineError;

/// Consecutive movement failures after which a run ends.
pub const MAX_FAILURES: u8 = 8;

/// Limits a host may put around a run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct RunConfig {
    /// Stop after this many steps even if the program has not halted.
    pub max_steps: Option<u64>,
}

/// What one navigation step did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Step {
    /// The program counter entered a new codel. `op` is the instruction that
    /// ran, if the transition carried one.
    Moved { op: Option<Op> },
    /// The way ahead was black or off the grid; the direction state was
    /// adjusted instead.
    Blocked { failures: u8 },
    /// The program has ended.
    Halted,
}

/// How a run that did not fail came to an end.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    /// The program could not move eight times in a row.
    Halted { steps: u64 },
    /// The host's step limit ran out first.
    StepLimit { steps: u64 },
}

pub struct Interpreter<'g, 'i, P> {
    grid: &'g ColourGrid<P>,
    machine: Machine<'i>,
    scratch: Scratch,
    failures: u8,
    steps: u64,
    config: RunConfig,
}

impl<'g, 'i, P: PixelSource> Interpreter<'g, 'i, P> {
    pub fn new(grid: &'g ColourGrid<P>, input: &'i str) -> Self {
        Self::with_config(grid, input, RunConfig::default())
    }

    pub fn with_config(grid: &'g ColourGrid<P>, input: &'i str, config: RunConfig) -> Self {
        Self {
            grid,
            machine: Machine::new(input),
            scratch: Scratch::for_grid(grid),
            failures: 0,
            steps: 0,
            config,
        }
    }

    pub fn machine(&self) -> &Machine<'i> {
        &self.machine
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.failures >= MAX_FAILURES
    }

    /// Advances the program counter by one block.
    pub fn step<W: Write>(&mut self, out: &mut W) -> Result<Step, MachineError> {
        if self.is_halted() {
            return Ok(Step::Halted);
        }
        self.steps = self.steps.saturating_add(1);

        let block = BlockLocator::new(self.grid, &mut self.scratch)
            .locate(self.machine.position, self.machine.direction);
        trace!(
            position = ?self.machine.position,
            direction = ?self.machine.direction,
            next = ?block.next,
            "step"
        );

        let entered = match self.grid.colour_at(block.next) {
            None | Some(Colour::Black) => return Ok(self.blocked()),
            Some(colour) => colour,
        };

        self.failures = 0;
        self.machine.position = block.next;

        let op = match (block.colour, block.size) {
            (Some(departed), Some(size)) if !entered.is_white() => {
                Op::from_transition(departed, entered).map(|op| (op, size))
            }
            _ => None,
        };
        if let Some((op, size)) = op {
            self.machine.execute(op, size, out)?;
        }
        Ok(Step::Moved {
            op: op.map(|(op, _)| op),
        })
    }

    fn blocked(&mut self) -> Step {
        self.failures = self.failures.saturating_add(1);
        if self.failures % 2 == 0 {
            self.machine.direction = self.machine.direction.rotated();
        } else {
            self.machine.direction = self.machine.direction.toggled();
        }
        if self.is_halted() {
            debug!(steps = self.steps, "halting after repeated movement failures");
            return Step::Halted;
        }
        Step::Blocked {
            failures: self.failures,
        }
    }

    /// Steps until the program halts or the configured step limit runs out.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<Outcome, MachineError> {
        loop {
            if let Some(limit) = self.config.max_steps {
                if self.steps >= limit {
                    debug!(steps = self.steps, "step limit reached");
                    return Ok(Outcome::StepLimit { steps: self.steps });
                }
            }
            if self.step(out)? == Step::Halted {
                return Ok(Outcome::Halted { steps: self.steps });
            }
        }
    }
}
