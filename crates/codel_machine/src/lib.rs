#![no_std]

#![cfg_attr(
    not(test),
    deny(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing,
        clippy::string_slice,
        clippy::panicking_unwrap,
        clippy::out_of_bounds_indexing,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
    )
)]
#![cfg_attr(not(test), warn(clippy::missing_panics_doc))]

//! This crate implements the virtual machine for image programs.
//!
//! A program is a raster image. The image is read through a [`PixelSource`]
//! and wrapped in a [`ColourGrid`], which works out how many pixels make up
//! one logical pixel (a codel) so that nothing downstream has to think about
//! pixels again.
//!
//! Execution walks the grid block by block. A block is a maximal region of
//! codels that share one colour. Leaving one block for another executes the
//! instruction selected by the hue and lightness difference of the two
//! colours. The machine itself is a plain stack machine with a stack of at
//! most [`STACK_CAPACITY`] signed words, a direction pointer and a codel
//! chooser.
//!
//! ```text
//!     let grid = ColourGrid::new(raster);
//!     let mut interpreter = Interpreter::new(&grid, "input text");
//!     let mut output = String::new();
//!     interpreter.run(&mut output)?;
//! ```
//!
//! The [`painter`] module goes the other way and renders literal text into
//! a program image that prints it.

extern crate alloc;

use thiserror_no_std::Error;

pub mod block;
pub mod colour;
pub mod direction;
pub mod grid;
pub mod interpreter;
pub mod machine;
pub mod ops;
pub mod painter;

pub use block::{Block, BlockLocator, Scratch};
pub use colour::{Colour, Rgba};
pub use direction::{Chooser, Direction, DirectionState, Position};
pub use grid::{ColourGrid, PixelSink, PixelSource, Raster};
pub use interpreter::{Interpreter, Outcome, RunConfig, Step};
pub use machine::{Machine, Stack};
pub use ops::Op;

/// Stack values are signed 64 bit words. Arithmetic wraps on overflow.
pub type Word = i64;

/// The most values the stack may hold at once.
pub const STACK_CAPACITY: usize = 100;

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum MachineError {
    #[error("stack overflow")]
    StackOverflow,
    #[error("stack underflow")]
    StackUnderflow,
    /// The output sink refused a write. This comes from the host, never
    /// from the program.
    #[error("the output sink rejected a write")]
    Output,
}

impl From<core::fmt::Error> for MachineError {
    fn from(_: core::fmt::Error) -> Self {
        MachineError::Output
    }
}
