use super::marks::MARK_LINE_WIDTH_MM;
use super::surface::{Mirror, MmRect, PrintSurface, Segment};
use crate::types::*;
use ::image::RgbaImage;
use log::{debug, info, warn};
use printpdf::*;
use std::path::Path;

struct OpenPage {
    width_mm: f64,
    height_mm: f64,
    ops: Vec<Op>,
}

/// Print surface backed by a printpdf document
pub struct PdfSurface {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
    current: Option<OpenPage>,
    mirror_depth: usize,
}

impl PdfSurface {
    pub fn new(title: &str) -> Self {
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
            current: None,
            mirror_depth: 0,
        }
    }

    fn page(&mut self) -> Result<&mut OpenPage> {
        self.current
            .as_mut()
            .ok_or_else(|| SheetError::Pdf("Nothing can be drawn before a page is added".into()))
    }

    fn close_page(&mut self) {
        if let Some(page) = self.current.take() {
            let mut ops = page.ops;
            // Unbalanced mirrors would leak into the page's final state
            for _ in 0..self.mirror_depth {
                ops.push(Op::RestoreGraphicsState);
            }
            self.pages.push(PdfPage::new(
                Mm(page.width_mm as f32),
                Mm(page.height_mm as f32),
                ops,
            ));
        }
        self.mirror_depth = 0;
    }

    /// Serialise the document, closing the open page
    pub fn to_bytes(&mut self) -> Vec<u8> {
        self.close_page();
        self.doc.pages = self.pages.clone();

        let mut warnings = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in &warnings {
            debug!("PDF warning: {:?}", warning);
        }
        bytes
    }
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new("Cards")
    }
}

fn pt(mm: f64) -> Pt {
    Mm(mm as f32).into_pt()
}

impl PrintSurface for PdfSurface {
    fn add_page(&mut self, width_mm: f64, height_mm: f64) -> Result<()> {
        if self.mirror_depth > 0 {
            warn!("Page closed with {} open mirror(s)", self.mirror_depth);
        }
        self.close_page();

        let ops = vec![
            Op::SetOutlineColor {
                col: Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
            },
            Op::SetOutlineThickness {
                pt: pt(MARK_LINE_WIDTH_MM),
            },
        ];
        self.current = Some(OpenPage {
            width_mm,
            height_mm,
            ops,
        });
        debug!("Started page {}", self.pages.len() + 1);
        Ok(())
    }

    fn draw_image(&mut self, image: &RgbaImage, rect: MmRect) -> Result<()> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SheetError::Pdf("Cannot place an empty image".into()));
        }

        let raw = RawImage {
            pixels: RawImageData::U8(image.as_raw().clone()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGBA8,
            tag: Vec::new(),
        };
        let id = self.doc.add_image(&raw);

        let page = self.page()?;
        let page_height = page.height_mm;
        // At 72 dpi one pixel is one point
        page.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(pt(rect.x)),
                translate_y: Some(pt(page_height - rect.bottom())),
                scale_x: Some(pt(rect.width).0 / width as f32),
                scale_y: Some(pt(rect.height).0 / height as f32),
                dpi: Some(72.0),
                rotate: None,
            },
        });
        Ok(())
    }

    fn draw_line(&mut self, segment: Segment) -> Result<()> {
        let page = self.page()?;
        let page_height = page.height_mm;
        let flip_y = |y: f64| pt(page_height - y);
        let points = vec![
            LinePoint {
                p: Point {
                    x: pt(segment.from.0),
                    y: flip_y(segment.from.1),
                },
                bezier: false,
            },
            LinePoint {
                p: Point {
                    x: pt(segment.to.0),
                    y: flip_y(segment.to.1),
                },
                bezier: false,
            },
        ];
        page.ops.push(Op::DrawLine {
            line: Line {
                points,
                is_closed: false,
            },
        });
        Ok(())
    }

    fn begin_mirror(&mut self, mirror: Mirror) -> Result<()> {
        let page = self.page()?;
        let matrix = match mirror {
            Mirror::Horizontal => [-1.0, 0.0, 0.0, 1.0, pt(page.width_mm).0, 0.0],
            Mirror::Vertical => [1.0, 0.0, 0.0, -1.0, 0.0, pt(page.height_mm).0],
        };
        page.ops.push(Op::SaveGraphicsState);
        page.ops.push(Op::SetTransformationMatrix {
            matrix: CurTransMat::Raw(matrix),
        });
        self.mirror_depth += 1;
        Ok(())
    }

    fn end_mirror(&mut self) -> Result<()> {
        if self.mirror_depth == 0 {
            return Err(SheetError::Pdf("end_mirror without begin_mirror".into()));
        }
        self.page()?.ops.push(Op::RestoreGraphicsState);
        self.mirror_depth -= 1;
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    fn write(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes();
        std::fs::write(path, &bytes)?;
        info!(
            "Wrote {} page(s), {} bytes to {}",
            self.pages.len(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}
