use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("SVG error: {0}")]
    Svg(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("HTML rendering error: {0}")]
    Html(String),
}

pub type Result<T> = std::result::Result<T, CardError>;

/// RGBA colour used for fills, backgrounds and washes
pub type Colour = image::Rgba<u8>;

/// Fully transparent black, the default canvas background
pub const TRANSPARENT: Colour = image::Rgba([0, 0, 0, 0]);

/// Opaque black, the default text fill
pub const BLACK: Colour = image::Rgba([0, 0, 0, 255]);

/// Opaque white, the default contact sheet background
pub const WHITE: Colour = image::Rgba([255, 255, 255, 255]);

/// Parse a colour given as `#rgb`, `#rrggbb` or `#rrggbbaa`
pub fn parse_colour(s: &str) -> Result<Colour> {
    let hex = s.trim().trim_start_matches('#');
    let bad = || CardError::Config(format!("Invalid colour '{}'", s));
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2).ok_or_else(bad)?, 16).map_err(|_| bad());
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16).ok_or_else(bad)? as u8;
                rgb[i] = v * 17;
            }
            Ok(image::Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Ok(image::Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Ok(image::Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => Err(bad()),
    }
}
