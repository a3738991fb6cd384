//! Text preparation for the single-byte PDF text encoding.
//!
//! Page text is shown with the standard Type1 fonts under
//! `WinAnsiEncoding`, one byte per character. Everything passes through
//! [`prepare_line`] before it is measured, so widths are computed on the
//! exact characters that end up on the page.

/// Byte and character drawn in place of anything the encoding lacks.
pub const PLACEHOLDER: char = '?';

/// Characters representable in the output encoding.
///
/// This is the Latin-1 repertoire minus the C0/C1 control ranges. Tab is
/// a control character with no glyph in the standard fonts.
pub fn is_encodable(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}')
}

/// Replace every character the output encoding cannot show with [`PLACEHOLDER`].
///
/// Tabs left over after expansion become a single space.
pub fn to_encodable(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if is_encodable(c) => c,
            _ => PLACEHOLDER,
        })
        .collect()
}

/// Encode already-sanitized text to WinAnsi bytes.
///
/// For the repertoire accepted by [`is_encodable`] the WinAnsi code point
/// equals the Unicode scalar value.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if is_encodable(c) {
                c as u32 as u8
            } else {
                PLACEHOLDER as u8
            }
        })
        .collect()
}

/// Expand tabs to spaces, aligning to multiples of `width`.
///
/// A width of 0 leaves tabs untouched here; [`to_encodable`] then turns
/// each into one space.
pub fn expand_tabs(text: &str, width: usize) -> String {
    if width == 0 || !text.contains('\t') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + width);
    let mut column = 0;
    for c in text.chars() {
        if c == '\t' {
            let pad = width - column % width;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Strip trailing line terminators, expand tabs, and map into the encoding.
pub fn prepare_line(raw: &str, tab_width: usize) -> String {
    let trimmed = raw.trim_end_matches(['\n', '\r']);
    to_encodable(&expand_tabs(trimmed, tab_width))
}
