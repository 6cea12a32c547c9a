/// A raw pixel value laid out as `0xRRGGBBAA`.
pub type Rgba = u32;

pub const BLACK: Rgba = 0x0000_00ff;
pub const WHITE: Rgba = 0xffff_ffff;

/// The six hues in the order the dispatch table walks them.
pub const HUES: [u16; 6] = [0, 60, 120, 180, 240, 300];

/// Lightness buckets as produced by [`Colour::from_raw`]. Pale colours land
/// in the highest bucket, deep colours in the lowest.
pub const PALE: u8 = 2;
pub const NORMAL: u8 = 1;
pub const DEEP: u8 = 0;

/// Every raw value that counts as a standard colour. Anything else except
/// [`BLACK`] reads as white, even when its hue and lightness would round to
/// one of these.
pub const STANDARD_PALETTE: [Rgba; 18] = [
    // pale
    0xffc0_c0ff, 0xffff_c0ff, 0xc0ff_c0ff, 0xc0ff_ffff, 0xc0c0_ffff, 0xffc0_ffff,
    // normal
    0xff00_00ff, 0xffff_00ff, 0x00ff_00ff, 0x00ff_ffff, 0x0000_ffff, 0xff00_ffff,
    // deep
    0xc000_00ff, 0xc0c0_00ff, 0x00c0_00ff, 0x00c0_c0ff, 0x0000_c0ff, 0xc000_c0ff,
];

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Colour {
    Black,
    White,
    Standard { hue: u16, lightness: u8 },
}

impl Colour {
    pub fn from_raw(raw: Rgba) -> Self {
        if raw == BLACK {
            return Colour::Black;
        }
        if !STANDARD_PALETTE.contains(&raw) {
            return Colour::White;
        }
        let (hue, lightness) = hue_and_lightness(raw);
        Colour::Standard { hue, lightness }
    }

    /// Looks up the standard colour with the given hue and lightness bucket.
    /// Returns `None` for combinations outside the palette.
    pub fn standard(hue: u16, lightness: u8) -> Option<Self> {
        let colour = Colour::Standard { hue, lightness };
        STANDARD_PALETTE
            .iter()
            .any(|raw| Colour::from_raw(*raw) == colour)
            .then_some(colour)
    }

    /// The canonical raw encoding of this colour.
    pub fn to_raw(self) -> Rgba {
        match self {
            Colour::Black => BLACK,
            Colour::White => WHITE,
            Colour::Standard { .. } => STANDARD_PALETTE
                .iter()
                .copied()
                .find(|raw| Colour::from_raw(*raw) == self)
                .unwrap_or(WHITE),
        }
    }

    pub fn is_white(self) -> bool {
        self == Colour::White
    }

    pub fn is_black(self) -> bool {
        self == Colour::Black
    }

    pub fn hue(self) -> Option<u16> {
        match self {
            Colour::Standard { hue, .. } => Some(hue),
            _ => None,
        }
    }

    pub fn lightness(self) -> Option<u8> {
        match self {
            Colour::Standard { lightness, .. } => Some(lightness),
            _ => None,
        }
    }
}

/// HSV hue in whole degrees (truncated) and the lightness bucket obtained
/// by comparing value against saturation.
fn hue_and_lightness(raw: Rgba) -> (u16, u8) {
    let channel = |shift: u32| f64::from((raw >> shift) & 0xff) / 255.0;
    let r = channel(24);
    let g = channel(16);
    let b = channel(8);

    let value = r.max(g).max(b);
    let chroma = value - r.min(g).min(b);
    let saturation = if value == 0.0 { 0.0 } else { chroma / value };

    let hue = if chroma == 0.0 {
        0.0
    } else if value == r {
        60.0 * floor_rem((g - b) / chroma, 6.0)
    } else if value == g {
        60.0 * ((b - r) / chroma + 2.0)
    } else {
        60.0 * ((r - g) / chroma + 4.0)
    };

    let lightness = if value > saturation {
        PALE
    } else if value < saturation {
        DEEP
    } else {
        NORMAL
    };

    // Truncation toward zero is the rounding rule; the result is in [0, 360).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let hue = floor_rem(hue, 360.0) as u16;
    (hue, lightness)
}

fn floor_rem(value: f64, modulus: f64) -> f64 {
    let rem = value % modulus;
    if rem < 0.0 { rem + modulus } else { rem }
}
