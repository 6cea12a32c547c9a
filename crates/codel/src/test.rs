use super::*;

use codel_machine::PixelSource;
use image::{Rgba, RgbaImage};

#[test]
fn test_parse_run() {
    let args = Args::try_parse_from(["codel", "run", "hello.png", "--input", "5 7", "--max-steps", "900"])
        .unwrap();
    match args.command {
        Command::Run {
            image,
            interactive,
            input,
            max_steps,
        } => {
            assert_eq!(image, PathBuf::from("hello.png"));
            assert!(!interactive);
            assert_eq!(input.as_deref(), Some("5 7"));
            assert_eq!(max_steps, Some(900));
        }
        other => panic!("parsed as {other:?}"),
    }
}

#[test]
fn test_interactive_conflicts_with_input() {
    assert!(Args::try_parse_from(["codel", "run", "a.png", "-i"]).is_ok());
    assert!(Args::try_parse_from(["codel", "run", "a.png", "-i", "--input", "x"]).is_err());
}

#[test]
fn test_parse_paint_defaults() {
    let args = Args::try_parse_from(["codel", "paint", "hi"]).unwrap();
    match args.command {
        Command::Paint {
            name,
            text,
            codel_size,
        } => {
            assert_eq!(name, "hi");
            assert_eq!(text, None);
            assert_eq!(codel_size, 1);
        }
        other => panic!("parsed as {other:?}"),
    }
}

#[test]
fn test_png_paths() {
    assert!(has_png_extension(Path::new("prog.png")));
    assert!(has_png_extension(Path::new("dir/PROG.PNG")));
    assert!(!has_png_extension(Path::new("prog.gif")));
    assert!(!has_png_extension(Path::new("png")));
    assert_eq!(output_path("hello"), PathBuf::from("hello.png"));
    assert_eq!(output_path("hello.png"), PathBuf::from("hello.png"));
}

#[test]
fn test_run_rejects_other_formats() {
    let err = run(Path::new("program.gif"), "", RunConfig::default()).unwrap_err();
    assert!(err.to_string().contains("not a .png"), "{err}");
}

#[test]
fn test_image_conversion_keeps_pixels() {
    let mut image = RgbaImage::new(3, 2);
    image.put_pixel(0, 0, Rgba([0xff, 0x00, 0x00, 0xff]));
    image.put_pixel(2, 1, Rgba([0xc0, 0xc0, 0xff, 0xff]));

    let raster = picture::from_image(&image).unwrap();
    assert_eq!((raster.width(), raster.height()), (3, 2));
    assert_eq!(raster.pixel(0, 0), Some(0xff00_00ff));
    assert_eq!(raster.pixel(2, 1), Some(0xc0c0_ffff));
    assert_eq!(raster.pixel(1, 0), Some(0x0000_0000));

    let back = picture::to_image(&raster).unwrap();
    assert_eq!(back, image);
}

#[test]
fn test_painted_image_round_trips_through_png() {
    let dir = std::env::temp_dir().join(format!("codel-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("hi.png");

    let raster = Painter::new("Hi").codel_size(2).paint().unwrap();
    picture::save(&raster, &path).unwrap();
    let loaded = picture::load(&path).unwrap();
    assert_eq!(loaded, raster);

    let grid = ColourGrid::new(loaded);
    let mut out = String::new();
    Interpreter::new(&grid, "").run(&mut out).unwrap();
    assert_eq!(out, "Hi");

    std::fs::remove_dir_all(&dir).unwrap();
}

