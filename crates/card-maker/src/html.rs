//! HTML content rendered to a bitmap by an external browser

use crate::anchor::TextAlign;
use crate::types::{CardError, Result};
use image::{RgbaImage, imageops::FilterType};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Turns an HTML fragment plus a stylesheet into a bitmap of the given size
pub trait HtmlRenderer {
    fn render(&mut self, html: &str, css: &str, width_px: u32, height_px: u32)
    -> Result<RgbaImage>;
}

/// Vertical alignment keyword for the document body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn css(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        }
    }
}

/// Optional body styling for rendered HTML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlStyle {
    pub h_align: Option<TextAlign>,
    pub v_align: Option<VerticalAlign>,
    /// Font size in the card's default unit
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
}

/// Build the page stylesheet: `@font-face` rules followed by the body rule
pub fn page_css(
    width_px: u32,
    font_size_px: Option<f64>,
    style: &HtmlStyle,
    font_families: &BTreeMap<String, PathBuf>,
) -> String {
    let mut css = String::new();
    for (name, path) in font_families {
        css.push_str(&format!(
            "@font-face {{ font-family: '{}'; src: url('{}'); }}\n",
            name,
            path.display()
        ));
    }
    css.push_str("body {\n");
    css.push_str("margin: 0px;\n");
    css.push_str(&format!("width: {}px;\n", width_px));
    if let Some(size) = font_size_px {
        css.push_str(&format!("font-size: {}px;\n", size));
    }
    if let Some(family) = &style.font_family {
        css.push_str(&format!("font-family: '{}';\n", family));
    }
    if let Some(align) = style.h_align {
        css.push_str(&format!("text-align: {};\n", align.css()));
    }
    if let Some(align) = style.v_align {
        css.push_str(&format!("vertical-align: {};\n", align.css()));
    }
    css.push_str("}\n");
    css
}

/// Screenshots pages with headless Chrome/Chromium.
///
/// Pages and screenshots live in a private temporary directory that is
/// removed when the renderer is dropped.
#[derive(Debug)]
pub struct ChromeRenderer {
    browser: PathBuf,
    workdir: TempDir,
    renders: usize,
}

impl ChromeRenderer {
    pub const DEFAULT_BROWSER: &'static str = "google-chrome";

    pub fn new() -> Result<Self> {
        Self::with_browser(Self::DEFAULT_BROWSER)
    }

    pub fn with_browser(browser: impl Into<PathBuf>) -> Result<Self> {
        let workdir = TempDir::new()?;
        let browser = browser.into();
        debug!(
            "HTML renderer using {} in {}",
            browser.display(),
            workdir.path().display()
        );
        Ok(Self {
            browser,
            workdir,
            renders: 0,
        })
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }
}

impl HtmlRenderer for ChromeRenderer {
    fn render(
        &mut self,
        html: &str,
        css: &str,
        width_px: u32,
        height_px: u32,
    ) -> Result<RgbaImage> {
        self.renders += 1;
        let page = self.workdir.path().join(format!("page-{}.html", self.renders));
        let shot = self.workdir.path().join(format!("page-{}.png", self.renders));
        std::fs::write(
            &page,
            format!(
                "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><style>\n{}</style></head>\n<body>{}</body></html>\n",
                css, html
            ),
        )?;

        let output = Command::new(&self.browser)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--default-background-color=00000000")
            .arg(format!("--window-size={},{}", width_px, height_px))
            .arg(format!("--screenshot={}", shot.display()))
            .arg(format!("file://{}", page.display()))
            .output()
            .map_err(|e| {
                CardError::Html(format!("Failed to run {}: {}", self.browser.display(), e))
            })?;
        if !output.status.success() {
            return Err(CardError::Html(format!(
                "{} exited with {}: {}",
                self.browser.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let image = image::open(&shot)?.to_rgba8();
        if image.dimensions() == (width_px, height_px) {
            Ok(image)
        } else {
            Ok(image::imageops::resize(
                &image,
                width_px,
                height_px,
                FilterType::CatmullRom,
            ))
        }
    }
}
