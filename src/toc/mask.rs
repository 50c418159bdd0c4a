//! Noise suppression. Finds the lines of a document that must never be
//! read as headings: a leading front-matter block, fenced code blocks and
//! paragraph lines that begin inside an inline code span opened on an
//! earlier line.
//!
//! Line-oriented scan via memchr, no markdown parser.

use memchr::memchr;

use super::heading::parse_atx;

/// Maximum indentation before a fence or heading marker still counts.
pub(crate) const MAX_INDENT: usize = 3;

/// One source line, without its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-indexed line number.
    pub num: u32,
    pub text: &'a str,
    /// `true` if the line lies in a region that is never scanned for headings.
    pub masked: bool,
}

/// Split `text` into lines and mark the masked ones.
pub fn lines(text: &str) -> Vec<Line<'_>> {
    let mut out = split_lines(text);
    let body_start = mask_front_matter(&mut out);
    mask_fences(&mut out[body_start..]);
    mask_code_spans(&mut out[body_start..]);
    out
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let buf = text.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;
    let mut num = 0u32;

    while pos < buf.len() {
        num += 1;
        let end = memchr(b'\n', &buf[pos..]).map_or(buf.len(), |i| pos + i);
        // `\n` is ASCII, so both boundaries are char boundaries.
        let line = text[pos..end].strip_suffix('\r').unwrap_or(&text[pos..end]);
        out.push(Line {
            num,
            text: line,
            masked: false,
        });
        pos = end + 1;
    }
    out
}

/// Mask a `---` delimited block starting on the first line. Returns the
/// index of the first body line. An unclosed block is not front-matter.
fn mask_front_matter(lines: &mut [Line<'_>]) -> usize {
    let is_delim = |l: &Line<'_>| l.text.trim_end() == "---";

    if !lines.first().is_some_and(is_delim) {
        return 0;
    }
    let Some(close) = lines.iter().skip(1).position(is_delim).map(|i| i + 1) else {
        return 0;
    };
    for line in &mut lines[..=close] {
        line.masked = true;
    }
    close + 1
}

/// An opening code fence: marker byte and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: u8,
    len: usize,
}

/// Strip up to `MAX_INDENT` leading spaces. `None` if the line is indented
/// further or starts with a tab.
pub(crate) fn strip_indent(line: &str) -> Option<&str> {
    let spaces = line.bytes().take_while(|&b| b == b' ').count();
    if spaces > MAX_INDENT || line.as_bytes().get(spaces) == Some(&b'\t') {
        return None;
    }
    Some(&line[spaces..])
}

fn opening_fence(line: &str) -> Option<Fence> {
    let rest = strip_indent(line)?;
    let marker = *rest.as_bytes().first()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let len = rest.bytes().take_while(|&b| b == marker).count();
    if len < 3 {
        return None;
    }
    // The info string of a backtick fence may not contain backticks.
    if marker == b'`' && memchr(b'`', rest[len..].as_bytes()).is_some() {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes(fence: Fence, line: &str) -> bool {
    let Some(rest) = strip_indent(line) else {
        return false;
    };
    let len = rest.bytes().take_while(|&b| b == fence.marker).count();
    len >= fence.len && rest[len..].trim().is_empty()
}

/// Mask fenced code blocks, fence lines included. An unclosed fence runs
/// to the end of the document.
fn mask_fences(lines: &mut [Line<'_>]) {
    let mut open: Option<Fence> = None;

    for line in lines {
        match open {
            Some(fence) => {
                line.masked = true;
                if closes(fence, line.text) {
                    open = None;
                }
            }
            None => {
                if let Some(fence) = opening_fence(line.text) {
                    line.masked = true;
                    open = Some(fence);
                }
            }
        }
    }
}

/// A run of backticks inside a paragraph.
#[derive(Debug, Clone, Copy)]
struct Tick {
    line: usize,
    len: usize,
    escaped: bool,
}

/// Mask lines whose start falls inside a code span that opened on an
/// earlier line. Spans never cross a blank line or a masked line, and an
/// ATX heading always ends the paragraph: it is a block of its own.
fn mask_code_spans(lines: &mut [Line<'_>]) {
    let breaks = |l: &Line<'_>| l.masked || l.text.trim().is_empty();
    let mut start = 0;
    while start < lines.len() {
        let line = &lines[start];
        if breaks(line) || parse_atx(line.text).is_some() {
            start += 1;
            continue;
        }
        let end = lines[start..]
            .iter()
            .position(|l| breaks(l) || parse_atx(l.text).is_some())
            .map_or(lines.len(), |i| start + i);
        mask_paragraph(&mut lines[start..end]);
        start = end;
    }
}

fn mask_paragraph(para: &mut [Line<'_>]) {
    let ticks = collect_ticks(para);
    let mut i = 0;

    while i < ticks.len() {
        let open = ticks[i];
        if open.escaped {
            i += 1;
            continue;
        }
        let close = ticks[i + 1..]
            .iter()
            .position(|t| t.len == open.len)
            .map(|j| i + 1 + j);
        match close {
            Some(j) => {
                for line in &mut para[open.line + 1..=ticks[j].line] {
                    line.masked = true;
                }
                i = j + 1;
            }
            None => i += 1,
        }
    }
}

fn collect_ticks(para: &[Line<'_>]) -> Vec<Tick> {
    let mut ticks = Vec::new();
    for (idx, line) in para.iter().enumerate() {
        let bytes = line.text.as_bytes();
        let mut pos = 0;
        while let Some(off) = memchr(b'`', &bytes[pos..]) {
            let at = pos + off;
            let len = bytes[at..].iter().take_while(|&&b| b == b'`').count();
            ticks.push(Tick {
                line: idx,
                len,
                escaped: at > 0 && bytes[at - 1] == b'\\',
            });
            pos = at + len;
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masked(text: &str) -> Vec<bool> {
        lines(text).iter().map(|l| l.masked).collect()
    }

    #[test]
    fn plain_text_is_unmasked() {
        assert_eq!(masked("a\nb\n"), vec![false, false]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(lines("").is_empty());
    }

    #[test]
    fn crlf_is_stripped() {
        let l = lines("## A\r\nb");
        assert_eq!(l[0].text, "## A");
        assert_eq!(l[1].num, 2);
    }

    #[test]
    fn front_matter_masked() {
        let m = masked("---\ntitle: x\n# not\n---\n## Body\n");
        assert_eq!(m, vec![true, true, true, true, false]);
    }

    #[test]
    fn unclosed_front_matter_is_not_front_matter() {
        assert_eq!(masked("---\n## A\n"), vec![false, false]);
    }

    #[test]
    fn front_matter_only_at_start() {
        assert_eq!(masked("x\n---\n## A\n---\n"), vec![false; 4]);
    }

    #[test]
    fn backtick_fence_masked_with_language() {
        let m = masked("## A\n```rust\n## B\n```\n## C\n");
        assert_eq!(m, vec![false, true, true, true, false]);
    }

    #[test]
    fn tilde_fence_masked() {
        let m = masked("~~~~\n## B\n~~~\n~~~~\n## C\n");
        // `~~~` is shorter than the opener and does not close it
        assert_eq!(m, vec![true, true, true, true, false]);
    }

    #[test]
    fn fence_needs_same_marker_to_close() {
        let m = masked("```\n~~~\n## B\n```\n");
        assert_eq!(m, vec![true, true, true, true]);
    }

    #[test]
    fn unclosed_fence_masks_rest() {
        let m = masked("## A\n```\n## B\n\n## C\n");
        assert_eq!(m, vec![false, true, true, true, true]);
    }

    #[test]
    fn over_indented_fence_is_not_a_fence() {
        assert_eq!(masked("    ```\n## B\n"), vec![false, false]);
    }

    #[test]
    fn backtick_info_with_backtick_is_not_a_fence() {
        assert_eq!(masked("``` a ` b\n## B\n"), vec![false, false]);
    }

    #[test]
    fn multi_line_code_span_masks_continuation() {
        let m = masked("use `foo\nbar` here\n## real\n");
        assert_eq!(m, vec![false, true, false]);
    }

    #[test]
    fn heading_ends_code_span_paragraph() {
        let m = masked("Use `foo\n## Real\nbar` here\n");
        assert_eq!(m, vec![false, false, false]);
    }

    #[test]
    fn ticks_in_headings_never_pair_across_lines() {
        let m = masked("## Use the ` key\n## Next ` step\n");
        assert_eq!(m, vec![false, false]);
    }

    #[test]
    fn unmatched_backtick_is_literal() {
        let m = masked("a ` b\n## real\n");
        assert_eq!(m, vec![false, false]);
    }

    #[test]
    fn code_span_ends_at_blank_line() {
        let m = masked("a `b\n\n## real `\n");
        assert_eq!(m, vec![false, false, false]);
    }

    #[test]
    fn escaped_backtick_does_not_open() {
        let m = masked("a \\`b\n## c`\n");
        assert_eq!(m, vec![false, false]);
    }

    #[test]
    fn single_line_span_does_not_mask() {
        assert_eq!(masked("## the `x` fn\n"), vec![false]);
    }
}
