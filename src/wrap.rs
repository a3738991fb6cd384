//! Line breaking against a measured width.
//!
//! Every decision compares the measured width of a candidate string with
//! the available width, never a character count, so the same code wraps
//! correctly under proportional fonts.

use crate::metrics::TextMeasure;

/// Label placed in front of the first header line.
pub const HEADER_LABEL: &str = "File: ";

fn fits<M: TextMeasure + ?Sized>(measure: &M, text: &str, max_width: f32) -> bool {
    measure.text_width(text) <= max_width
}

/// Break `text` into pieces of at most `max_width`, one character at a time.
///
/// Concatenating the pieces gives back `text`. A single character wider
/// than `max_width` still gets a piece of its own.
pub fn char_wrap<M: TextMeasure + ?Sized>(text: &str, max_width: f32, measure: &M) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if current.chars().count() > 1 && !fits(measure, &current, max_width) {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy word wrap joining words with single spaces.
///
/// A word that is wider than `max_width` on its own is character wrapped;
/// its last piece continues to accumulate following words.
pub fn word_wrap<M: TextMeasure + ?Sized>(text: &str, max_width: f32, measure: &M) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current: Option<String> = None;

    for word in text.split_whitespace() {
        let next = match current.take() {
            None => word.to_string(),
            Some(acc) => {
                let candidate = format!("{acc} {word}");
                if fits(measure, &candidate, max_width) {
                    current = Some(candidate);
                    continue;
                }
                pieces.push(acc);
                word.to_string()
            }
        };

        if fits(measure, &next, max_width) {
            current = Some(next);
        } else {
            let mut chunks = char_wrap(&next, max_width, measure);
            current = chunks.pop();
            pieces.extend(chunks);
        }
    }

    if let Some(acc) = current {
        pieces.push(acc);
    }
    pieces
}

/// Wrap one prepared body line into the runs that will be drawn.
///
/// Returns no runs for an empty line, or for a whitespace-only line too
/// wide to draw; the caller still advances one line for those. A line
/// made of a single token, or whose first word alone is too wide, is
/// character wrapped as a whole (indentation included). Anything else is
/// word wrapped.
pub fn wrap_line<M: TextMeasure + ?Sized>(line: &str, max_width: f32, measure: &M) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    if fits(measure, line, max_width) {
        return vec![line.to_string()];
    }

    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    if words.next().is_none() || !fits(measure, first, max_width) {
        char_wrap(line, max_width, measure)
    } else {
        word_wrap(line, max_width, measure)
    }
}

/// Lay out a `File: <path>` header within `max_width`.
///
/// When the whole header does not fit, the path is split on `separator`
/// and segments are packed greedily, rejoined with the separator. Only the
/// first line carries [`HEADER_LABEL`]. When the label and the first
/// segment do not fit together, the label stands alone on the first line.
/// Stripping the label, dropping a bare label line, and joining the rest
/// with `separator` gives back `path`. A single segment wider than the
/// line is kept whole.
pub fn wrap_path<M: TextMeasure + ?Sized>(
    path: &str,
    separator: char,
    max_width: f32,
    measure: &M,
) -> Vec<String> {
    let full = format!("{HEADER_LABEL}{path}");
    if fits(measure, &full, max_width) {
        return vec![full];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for segment in path.split(separator) {
        current = Some(match current.take() {
            None => {
                if !fits(measure, &format!("{HEADER_LABEL}{segment}"), max_width) {
                    lines.push(String::new());
                }
                segment.to_string()
            }
            Some(acc) => {
                let candidate = format!("{acc}{separator}{segment}");
                let label = if lines.is_empty() { HEADER_LABEL } else { "" };
                if fits(measure, &format!("{label}{candidate}"), max_width) {
                    candidate
                } else {
                    lines.push(acc);
                    segment.to_string()
                }
            }
        });
    }

    lines.extend(current);
    if let Some(first) = lines.first_mut() {
        first.insert_str(0, HEADER_LABEL);
    }
    lines
}
