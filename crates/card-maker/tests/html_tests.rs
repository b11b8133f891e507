use card_maker::*;
use image::{Rgba, RgbaImage};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

const GREEN: Colour = Rgba([0, 200, 0, 255]);

#[derive(Debug, Clone, PartialEq)]
struct RenderCall {
    html: String,
    css: String,
    size: (u32, u32),
}

/// Records each request and returns a solid green bitmap of the asked size
struct RecordingRenderer {
    calls: Rc<RefCell<Vec<RenderCall>>>,
}

impl HtmlRenderer for RecordingRenderer {
    fn render(
        &mut self,
        html: &str,
        css: &str,
        width_px: u32,
        height_px: u32,
    ) -> Result<RgbaImage> {
        self.calls.borrow_mut().push(RenderCall {
            html: html.to_string(),
            css: css.to_string(),
            size: (width_px, height_px),
        });
        Ok(RgbaImage::from_pixel(width_px, height_px, GREEN))
    }
}

/// 50x70mm card at 10px/mm with a 2mm gutter
fn card_with_renderer() -> (CardCanvas, Rc<RefCell<Vec<RenderCall>>>) {
    let mut card = CardCanvas::new(CanvasOptions::mm(50.0, 70.0, 500.0).with_gutter(2.0)).unwrap();
    let calls = Rc::new(RefCell::new(Vec::new()));
    card.set_html_renderer(Box::new(RecordingRenderer {
        calls: Rc::clone(&calls),
    }));
    (card, calls)
}

#[test]
fn test_html_default_height_and_paste() {
    let (mut card, calls) = card_with_renderer();
    card.html("<b>Rules</b>", 5.0, 10.0, 20.0, None, &HtmlStyle::default())
        .unwrap();

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].html, "<b>Rules</b>");
    // 70 + 2*2 - 10 - 2 = 62mm
    assert_eq!(calls[0].size, (200, 620));
    assert!(calls[0].css.contains("width: 200px;"));

    let full = card.image_with_gutters();
    assert_eq!(full.get_pixel(70, 120), &GREEN);
    assert_eq!(full.get_pixel(69, 120)[3], 0);
    assert_eq!(full.get_pixel(70, 119)[3], 0);
}

#[test]
fn test_html_explicit_height_and_style() {
    let (mut card, calls) = card_with_renderer();
    let style = HtmlStyle {
        h_align: Some(TextAlign::Right),
        v_align: Some(VerticalAlign::Bottom),
        font_size: Some(2.5),
        font_family: Some("Body".into()),
    };
    let mut fonts = BTreeMap::new();
    fonts.insert("Body".to_string(), PathBuf::from("/fonts/body.otf"));
    card.set_font_families(fonts);
    assert_eq!(card.font_families().len(), 1);

    card.html("<p>x</p>", 0.0, 0.0, 10.0, Some(5.0), &style)
        .unwrap();
    let calls = calls.borrow();
    assert_eq!(calls[0].size, (100, 50));
    assert!(calls[0].css.contains("@font-face { font-family: 'Body'; src: url('/fonts/body.otf'); }"));
    assert!(calls[0].css.contains("font-size: 25px;"));
    assert!(calls[0].css.contains("text-align: right;"));
    assert!(calls[0].css.contains("vertical-align: bottom;"));
}

#[test]
fn test_html_renderer_is_reused_and_not_copied() {
    let (mut card, calls) = card_with_renderer();
    card.html("a", 0.0, 0.0, 10.0, Some(10.0), &HtmlStyle::default())
        .unwrap();
    card.html("b", 0.0, 20.0, 10.0, Some(10.0), &HtmlStyle::default())
        .unwrap();
    assert_eq!(calls.borrow().len(), 2);
    assert!(card.has_html_renderer());

    let copy = card.copy();
    assert!(!copy.has_html_renderer());
    assert_eq!(copy.image_with_gutters(), card.image_with_gutters());
}

#[test]
fn test_html_empty_box_is_rejected() {
    let (mut card, calls) = card_with_renderer();
    let result = card.html("a", 0.0, 0.0, 0.0, Some(10.0), &HtmlStyle::default());
    assert!(matches!(result, Err(CardError::Config(_))));
    assert!(calls.borrow().is_empty());
}
