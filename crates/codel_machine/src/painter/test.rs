use super::*;
use crate::{ColourGrid, Interpreter, MachineError, Outcome};

extern crate std;
use alloc::string::String;

fn run(raster: Raster) -> Result<(String, Outcome), MachineError> {
    let grid = ColourGrid::new(raster);
    let mut interpreter = Interpreter::new(&grid, "");
    let mut out = String::new();
    let outcome = interpreter.run(&mut out)?;
    Ok((out, outcome))
}

#[test]
fn test_painting_prints_its_text() -> Result<(), MachineError> {
    for text in ["Hi", "A", "Hello, world!\n", "tab\tand\u{3a9}"] {
        let raster = Painter::new(text).paint().unwrap();
        let (out, outcome) = run(raster)?;
        assert_eq!(out, text);
        assert!(matches!(outcome, Outcome::Halted { .. }), "{text:?}: {outcome:?}");
    }
    Ok(())
}

#[test]
fn test_hue_cycle_wraps_for_long_text() -> Result<(), MachineError> {
    let text = "abcdefghijklmnop";
    let (out, _) = run(Painter::new(text).paint().unwrap())?;
    assert_eq!(out, text);
    Ok(())
}

#[test]
fn test_layout_for_two_characters() {
    let codels = Painter::new("Hi").layout().unwrap();
    // 'H' is 72 codels and 'i' is 105, both ten wide; 11 rows are needed.
    assert_eq!((codels.width(), codels.height()), (25, 11));
    assert_eq!(codels.pixel(0, 0), Some(0xffc0_c0ff));
    assert_eq!(codels.pixel(10, 0), Some(0xff00_00ff));
    assert_eq!(codels.pixel(10, 1), Some(BLACK));
    assert_eq!(codels.pixel(12, 0), Some(0xffc0_ffff));
    assert_eq!(codels.pixel(24, 1), Some(0xc0c0_ffff));
    assert_eq!(codels.pixel(23, 1), Some(0xc0c0_ffff));
}

#[test]
fn test_dimensions_are_coprime() {
    for text in ["Hi", "~~", "hello", "\u{1}\u{1}\u{1}"] {
        let codels = Painter::new(text).layout().unwrap();
        assert_eq!(gcd(codels.width(), codels.height()), 1, "{text:?}");
    }
}

#[test]
fn test_codel_size_scales_the_image() -> Result<(), MachineError> {
    let painter = Painter::new("Hi!").codel_size(3);
    let raster = painter.paint().unwrap();
    let codels = painter.layout().unwrap();
    assert_eq!(
        (raster.width(), raster.height()),
        (codels.width() * 3, codels.height() * 3)
    );
    assert_eq!(painter.dimensions().unwrap(), (raster.width(), raster.height()));

    let grid = ColourGrid::new(&raster);
    assert_eq!(grid.codel_size(), 3);

    let (out, _) = run(raster)?;
    assert_eq!(out, "Hi!");
    Ok(())
}

#[test]
fn test_rejects_unpaintable_text() {
    assert_eq!(Painter::new("").paint().unwrap_err(), PaintError::EmptyText);
    assert_eq!(
        Painter::new("a\0").paint().unwrap_err(),
        PaintError::UnpaintableChar('\0')
    );
    assert_eq!(
        Painter::new("\u{2000}").paint().unwrap_err(),
        PaintError::UnpaintableChar('\u{2000}')
    );
    assert_eq!(
        Painter::new("ok").codel_size(0).paint().unwrap_err(),
        PaintError::ZeroCodelSize
    );
}

#[test]
fn test_paint_into_small_sink_fails() {
    let mut sink = Raster::new(4, 4, BLACK).unwrap();
    assert_eq!(
        Painter::new("Hi").paint_into(&mut sink).unwrap_err(),
        PaintError::SinkTooSmall
    );
}
