use card_maker::*;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

const RED: Colour = Rgba([255, 0, 0, 255]);
const BLUE: Colour = Rgba([0, 0, 255, 255]);

/// 100x100px card, 1px per mm, 10px gutter
fn px_card() -> CardCanvas {
    CardCanvas::new(CanvasOptions::px(100.0, 100.0, 100.0).with_gutter(10.0)).unwrap()
}

fn red_square(size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size, size, RED)
}

#[test]
fn test_px_card_dimensions() {
    let card = CardCanvas::new(CanvasOptions::px(250.0, 400.0, 1000.0).with_gutter(4.0)).unwrap();
    assert_eq!(card.unit(), Unit::Px);
    assert_eq!(card.size_px(), (250, 400));
    assert_eq!(card.gutter_px(), 4);
    assert!((card.width_mm() - 1000.0).abs() < 1e-9);
    assert!((card.height_mm() - 1600.0).abs() < 1e-9);
    assert!((card.gutter_mm() - 16.0).abs() < 1e-9);
    assert_eq!(card.size_with_gutters_px(), (258, 408));
    assert_eq!(card.size_with_gutters(), (258.0, 408.0));
    assert_eq!(card.image().dimensions(), (250, 400));
    assert_eq!(card.image_with_gutters().dimensions(), (258, 408));
}

#[test]
fn test_mm_card_dimensions() {
    let card = CardCanvas::new(CanvasOptions::mm(50.0, 70.0, 500.0).with_gutter(2.0)).unwrap();
    assert_eq!(card.unit(), Unit::Mm);
    assert_eq!(card.size(), (50.0, 70.0));
    assert_eq!(card.size_px(), (500, 700));
    assert_eq!(card.gutter_px(), 20);
    assert_eq!(card.size_with_gutters_px(), (540, 740));
    assert!((card.width_with_gutters_mm() - 54.0).abs() < 1e-9);
    assert!((card.height_with_gutters() - 74.0).abs() < 1e-9);
}

#[test]
fn test_width_basis_errors() {
    let mut both = CanvasOptions::mm(50.0, 70.0, 500.0);
    both.width_mm = Some(50.0);
    match CardCanvas::new(both) {
        Err(CardError::Config(msg)) => assert!(msg.contains("both mm and px")),
        _ => panic!("Expected Config error"),
    }

    let mut neither = CanvasOptions::mm(50.0, 70.0, 500.0);
    neither.width_px = None;
    assert!(matches!(CardCanvas::new(neither), Err(CardError::Config(_))));

    let same = CanvasOptions {
        width: 50.0,
        height: 70.0,
        unit: Some(Unit::Px),
        width_px: Some(50.0),
        ..Default::default()
    };
    match CardCanvas::new(same) {
        Err(CardError::Config(msg)) => assert!(msg.contains("width_px")),
        _ => panic!("Expected Config error"),
    }

    assert!(matches!(
        CardCanvas::new(CanvasOptions::default()),
        Err(CardError::Config(_))
    ));
}

#[test]
fn test_conversions() {
    let card = CardCanvas::new(CanvasOptions::mm(50.0, 70.0, 500.0)).unwrap();
    assert!((card.to_px(3.0) - 30.0).abs() < 1e-9);
    assert!((card.from_px(30.0) - 3.0).abs() < 1e-9);
    assert!((card.to_mm(3.0) - 3.0).abs() < 1e-9);
    assert!((card.from_mm(3.0) - 3.0).abs() < 1e-9);
    for x in [0.5, 7.25, 49.0] {
        assert!((card.to_mm(card.from_mm(x)) - x).abs() < 1e-9);
        assert!((card.from_px(card.to_px(x)) - x).abs() < 1e-9);
    }
    assert_eq!(card.to_px_opt(None), None);
    assert_eq!(card.to_mm_opt(None), None);
    assert_eq!(card.to_px_opt(Some(1.0)), Some(10.0));
}

#[test]
fn test_text_line_spacing() {
    let mut card = CardCanvas::new(CanvasOptions::mm(50.0, 70.0, 500.0)).unwrap();
    assert!((card.text_line_spacing_mm() - 1.5).abs() < 1e-9);
    assert!((card.text_line_spacing_px() - 15.0).abs() < 1e-9);

    card.set_text_line_spacing_px(Some(30.0));
    assert!((card.text_line_spacing_mm() - 3.0).abs() < 1e-9);
    assert!((card.text_line_spacing() - 3.0).abs() < 1e-9);

    card.set_text_line_spacing_mm(Some(0.5));
    assert!((card.text_line_spacing_px() - 5.0).abs() < 1e-9);

    card.set_text_line_spacing(None);
    assert!((card.text_line_spacing_mm() - DEFAULT_TEXT_LINE_SPACING_MM).abs() < 1e-9);

    let mut px_card = px_card();
    px_card.set_text_line_spacing(Some(4.0));
    assert!((px_card.text_line_spacing_px() - 4.0).abs() < 1e-9);
    px_card.set_text_line_spacing_px(None);
    assert!((px_card.text_line_spacing_mm() - 1.5).abs() < 1e-9);
}

#[test]
fn test_paste_left_top() {
    let mut card = px_card();
    card.paste(
        red_square(10),
        ResizeRequest::default(),
        HorizontalAnchor::Left(5.0),
        VerticalAnchor::Top(7.0),
    )
    .unwrap();
    let full = card.image_with_gutters();
    assert_eq!(full.get_pixel(15, 17), &RED);
    assert_eq!(full.get_pixel(24, 26), &RED);
    assert_eq!(full.get_pixel(14, 17)[3], 0);
    assert_eq!(full.get_pixel(25, 17)[3], 0);
    assert_eq!(full.get_pixel(15, 16)[3], 0);
}

#[test]
fn test_paste_right_bottom() {
    let mut card = px_card();
    card.paste(
        red_square(10),
        ResizeRequest::default(),
        HorizontalAnchor::Right(50.0),
        VerticalAnchor::Bottom(40.0),
    )
    .unwrap();
    let full = card.image_with_gutters();
    // Right edge lands on R + gutter
    assert_eq!(full.get_pixel(59, 49), &RED);
    assert_eq!(full.get_pixel(50, 40), &RED);
    assert_eq!(full.get_pixel(60, 45)[3], 0);
    assert_eq!(full.get_pixel(55, 50)[3], 0);
}

#[test]
fn test_paste_centre_middle() {
    let mut card = px_card();
    card.paste(
        red_square(10),
        ResizeRequest::default(),
        HorizontalAnchor::Centre(30.0),
        VerticalAnchor::Middle(30.0),
    )
    .unwrap();
    let full = card.image_with_gutters();
    assert_eq!(full.get_pixel(35, 35), &RED);
    assert_eq!(full.get_pixel(44, 44), &RED);
    assert_eq!(full.get_pixel(34, 40)[3], 0);
    assert_eq!(full.get_pixel(45, 40)[3], 0);
}

#[test]
fn test_paste_centre_rounds_to_nearest_pixel() {
    let mut card = px_card();
    card.paste(
        red_square(4),
        ResizeRequest::default(),
        HorizontalAnchor::Centre(10.6),
        VerticalAnchor::Middle(10.6),
    )
    .unwrap();
    let full = card.image_with_gutters();
    // 10.6 - 2 rounds to 9, then the 10px gutter
    assert_eq!(full.get_pixel(19, 19), &RED);
    assert_eq!(full.get_pixel(22, 22), &RED);
    assert_eq!(full.get_pixel(18, 19)[3], 0);
    assert_eq!(full.get_pixel(19, 18)[3], 0);
    assert_eq!(full.get_pixel(23, 22)[3], 0);
}

#[test]
fn test_paste_resizes_to_request() {
    let mut card = px_card();
    let image = RgbaImage::from_pixel(10, 5, RED);
    card.paste(
        image,
        ResizeRequest::width(20.0),
        HorizontalAnchor::Left(0.0),
        VerticalAnchor::Top(0.0),
    )
    .unwrap();
    let full = card.image_with_gutters();
    let corner = full.get_pixel(29, 19);
    assert!(corner[0] > 250 && corner[3] > 250);
    assert_eq!(full.get_pixel(30, 15)[3], 0);
    assert_eq!(full.get_pixel(15, 20)[3], 0);
}

#[test]
fn test_paste_at_requires_one_anchor_per_axis() {
    let mut card = px_card();
    match card.paste_at(
        red_square(2),
        ResizeRequest::default(),
        Some(1.0),
        None,
        Some(2.0),
        Some(0.0),
        None,
        None,
    ) {
        Err(CardError::Config(msg)) => assert!(msg.contains("one of x_left, x_centre, x_right")),
        _ => panic!("Expected Config error"),
    }
    match card.paste_at(
        red_square(2),
        ResizeRequest::default(),
        Some(1.0),
        None,
        None,
        None,
        None,
        None,
    ) {
        Err(CardError::Config(msg)) => assert!(msg.contains("one of y_top, y_middle, y_bottom")),
        _ => panic!("Expected Config error"),
    }
    card.paste_at(
        red_square(2),
        ResizeRequest::default(),
        None,
        Some(50.0),
        None,
        None,
        None,
        Some(50.0),
    )
    .unwrap();
}

#[test]
fn test_image_crops_gutter() {
    let mut card = CardCanvas::new(
        CanvasOptions::px(100.0, 100.0, 100.0)
            .with_gutter(10.0)
            .with_colour(BLUE),
    )
    .unwrap();
    card.paste(
        red_square(10),
        ResizeRequest::default(),
        HorizontalAnchor::Left(-10.0),
        VerticalAnchor::Top(-10.0),
    )
    .unwrap();
    assert_eq!(card.image_with_gutters().get_pixel(0, 0), &RED);
    assert_eq!(card.image().get_pixel(0, 0), &BLUE);
}

#[test]
fn test_copy_is_independent() {
    let card = px_card();
    let mut copy = card.copy();
    copy.paste(
        red_square(10),
        ResizeRequest::default(),
        HorizontalAnchor::Left(0.0),
        VerticalAnchor::Top(0.0),
    )
    .unwrap();
    assert_eq!(copy.image().get_pixel(0, 0), &RED);
    assert_eq!(card.image().get_pixel(0, 0)[3], 0);
    assert_eq!(copy.size_px(), card.size_px());
}

#[test]
fn test_colour_wash_keeps_transparency() {
    let mut card = px_card();
    card.paste(
        RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255])),
        ResizeRequest::default(),
        HorizontalAnchor::Left(0.0),
        VerticalAnchor::Top(0.0),
    )
    .unwrap();
    card.colour_wash(Rgba([255, 255, 255, 255]));
    let image = card.image();
    assert_eq!(image.get_pixel(0, 0), &Rgba([127, 127, 127, 255]));
    assert_eq!(image.get_pixel(50, 50), &Rgba([0, 0, 0, 0]));
}

#[test]
fn test_load_image_from_png_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("square.png");
    RgbaImage::from_pixel(40, 20, RED).save(&path).unwrap();

    let card = px_card();
    let natural = card.load_image(path.as_path(), ResizeRequest::default()).unwrap();
    assert_eq!(natural.dimensions(), (40, 20));
    let scaled = card.load_image(path.as_path(), ResizeRequest::height(10.0)).unwrap();
    assert_eq!(scaled.dimensions(), (20, 10));
    assert_eq!(card.need_resize_px((40, 20), ResizeRequest::size(40.0, 20.0)), (false, (40, 20)));
}

#[test]
fn test_load_svg_at_target_size() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("badge.svg");
    std::fs::write(
        &path,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#ff0000"/></svg>"##,
    )
    .unwrap();

    let card = px_card();
    let image = card.load_image(path.as_path(), ResizeRequest::width(40.0)).unwrap();
    assert_eq!(image.dimensions(), (40, 20));
    assert_eq!(image.get_pixel(20, 10), &RED);

    let natural = card.load_image(path.as_path(), ResizeRequest::default()).unwrap();
    assert_eq!(natural.dimensions(), (20, 10));
}

#[test]
fn test_missing_image_file_is_an_error() {
    let card = px_card();
    let result = card.load_image("/nonexistent/card-art.png", ResizeRequest::width(5.0));
    assert!(result.is_err());
}
