//! ATX heading discovery over the unmasked lines of a document.

use super::mask::{self, strip_indent};

/// A heading line as found in the source, before inline stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeading<'a> {
    pub level: u8,
    /// 1-indexed line number.
    pub line: u32,
    /// Heading content with the marker and any closing `#` run removed.
    pub text: &'a str,
}

/// Parse one line as an ATX heading: up to three spaces, one to six `#`,
/// then whitespace or end of line.
pub fn parse_atx(line: &str) -> Option<(u8, &str)> {
    let rest = strip_indent(line)?;
    let level = rest.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let after = &rest[level..];
    match after.as_bytes().first() {
        None => return Some((level as u8, "")),
        Some(b' ' | b'\t') => {}
        Some(_) => return None,
    }
    Some((level as u8, strip_closing_sequence(after.trim())))
}

/// Drop an optional closing run of `#`. It only counts when preceded by
/// whitespace, or when it is the whole content.
fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() {
        return "";
    }
    if without.ends_with([' ', '\t']) {
        // An escaped `\#` is literal and keeps the run attached.
        return without.trim_end();
    }
    text
}

/// All heading lines outside masked regions, in document order.
pub fn scan(text: &str) -> Vec<RawHeading<'_>> {
    mask::lines(text)
        .into_iter()
        .filter(|l| !l.masked)
        .filter_map(|l| {
            let (level, text) = parse_atx(l.text)?;
            Some(RawHeading {
                level,
                line: l.num,
                text,
            })
        })
        .collect()
}
