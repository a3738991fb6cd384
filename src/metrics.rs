//! Font metrics for the standard PDF Type1 fonts.
//!
//! Widths are the advance widths from the Adobe core font AFM files, in
//! thousandths of an em, indexed by WinAnsi code point.

use serde::Serialize;

/// Anything that can measure the rendered width of a string.
pub trait TextMeasure {
    /// Width of `text` in points.
    fn text_width(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn text_width(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Standard fonts every PDF reader provides without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StandardFont {
    Courier,
    CourierBold,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name used as the PDF `BaseFont`.
    pub fn base_name(self) -> &'static str {
        match self {
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn all() -> &'static [StandardFont] {
        &[
            StandardFont::Courier,
            StandardFont::CourierBold,
            StandardFont::HelveticaBold,
        ]
    }

    pub fn is_monospaced(self) -> bool {
        matches!(self, StandardFont::Courier | StandardFont::CourierBold)
    }

    /// Advance width of one character in 1/1000 em.
    pub fn advance(self, c: char) -> u16 {
        if self.is_monospaced() {
            return COURIER_ADVANCE;
        }

        let code = c as u32;
        match code {
            0x20..=0x7E => HELVETICA_BOLD_ASCII[(code - 0x20) as usize],
            0xA0..=0xFF => HELVETICA_BOLD_LATIN1[(code - 0xA0) as usize],
            // Unmapped characters render as the placeholder.
            _ => HELVETICA_BOLD_ASCII[(u32::from('?') - 0x20) as usize],
        }
    }
}

impl std::fmt::Display for StandardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base_name())
    }
}

/// A font at a point size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSpec {
    pub font: StandardFont,
    pub size: f32,
}

impl FontSpec {
    pub const fn new(font: StandardFont, size: f32) -> Self {
        Self { font, size }
    }
}

impl TextMeasure for FontSpec {
    fn text_width(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.font.advance(c))).sum();
        units as f32 * self.size / 1000.0
    }
}

const COURIER_ADVANCE: u16 = 600;

// Helvetica-Bold, space (0x20) through asciitilde (0x7E).
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

// Helvetica-Bold, nbspace (0xA0) through ydieresis (0xFF).
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 0xF0
];
