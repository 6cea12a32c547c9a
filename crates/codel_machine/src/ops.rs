use variant_count::VariantCount;

use crate::colour::Colour;

#[derive(VariantCount, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Op {
    Push,
    Pop,
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    Not,
    Greater,
    Pointer,
    Switch,
    Duplicate,
    Roll,
    InNumber,
    InChar,
    OutNumber,
    OutChar,
}

/// Rows are hue steps of 60 degrees, columns are lightness steps. The
/// (0, 0) slot is a transition between two blocks of the same colour and
/// does nothing.
const DISPATCH: [[Option<Op>; 3]; 6] = [
    [None, Some(Op::Push), Some(Op::Pop)],
    [Some(Op::Add), Some(Op::Subtract), Some(Op::Multiply)],
    [Some(Op::Divide), Some(Op::Mod), Some(Op::Not)],
    [Some(Op::Greater), Some(Op::Pointer), Some(Op::Switch)],
    [Some(Op::Duplicate), Some(Op::Roll), Some(Op::InNumber)],
    [Some(Op::InChar), Some(Op::OutNumber), Some(Op::OutChar)],
];

impl Op {
    /// Looks up an instruction by hue change in degrees and lightness
    /// change in buckets. Both are reduced into range first.
    pub fn from_deltas(hue_delta: i32, lightness_delta: i32) -> Option<Op> {
        let hue_step = usize::try_from(hue_delta.rem_euclid(360) / 60).ok()?;
        let lightness_step = usize::try_from(lightness_delta.rem_euclid(3)).ok()?;
        DISPATCH.get(hue_step)?.get(lightness_step).copied().flatten()
    }

    /// The instruction for leaving a block of `departed` colour for one of
    /// `entered` colour. Hue is measured entered minus departed, lightness
    /// departed minus entered. Only transitions between two standard colours
    /// carry an instruction.
    pub fn from_transition(departed: Colour, entered: Colour) -> Option<Op> {
        let (
            Colour::Standard { hue: from_hue, lightness: from_light },
            Colour::Standard { hue: to_hue, lightness: to_light },
        ) = (departed, entered)
        else {
            return None;
        };
        let hue_delta = i32::from(to_hue) - i32::from(from_hue);
        let lightness_delta = i32::from(from_light) - i32::from(to_light);
        Op::from_deltas(hue_delta, lightness_delta)
    }

    /// Every instruction, in table order.
    pub fn all() -> impl Iterator<Item = Op> {
        DISPATCH.into_iter().flatten().flatten()
    }
}
