//! Inline markup stripping: turns heading content into the plain text a
//! reader sees.
//!
//! Handles code spans, images, links (inline and reference), autolinks,
//! HTML/JSX tags, emphasis and strikethrough markers, backslash escapes.
//! Anything unrecognized passes through verbatim, including emphasis
//! markers that never find a partner.

use std::collections::HashMap;

/// Strip inline markup from `src` and trim surrounding whitespace.
pub fn plain_text(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    strip_into(&chars, &mut out);
    out.trim().to_string()
}

fn strip_into(chars: &[char], out: &mut String) {
    let drops = pair_delimiters(delimiter_runs(chars));
    let len = chars.len();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        match c {
            '\\' if chars.get(i + 1).is_some_and(char::is_ascii_punctuation) => {
                out.push(chars[i + 1]);
                i += 2;
            }
            '`' => {
                let run = run_len(chars, i, '`');
                match find_closing_ticks(chars, i + run, run) {
                    Some(close) => {
                        out.extend(code_span_content(&chars[i + run..close]));
                        i = close + run;
                    }
                    None => {
                        out.extend(&chars[i..i + run]);
                        i += run;
                    }
                }
            }
            '!' if chars.get(i + 1) == Some(&'[') => match link_at(chars, i + 1) {
                Some((label, end)) => {
                    strip_into(label, out);
                    i = end;
                }
                None => {
                    out.push('!');
                    i += 1;
                }
            },
            '[' => match link_at(chars, i) {
                Some((label, end)) => {
                    strip_into(label, out);
                    i = end;
                }
                None => {
                    out.push('[');
                    i += 1;
                }
            },
            '<' => match angle_at(chars, i) {
                Some((Angle::Autolink(url), end)) => {
                    out.extend(url);
                    i = end;
                }
                Some((Angle::Tag, end)) => i = end,
                None => {
                    out.push('<');
                    i += 1;
                }
            },
            '*' | '_' | '~' => {
                let run = run_len(chars, i, c);
                let keep = run - drops.get(&i).copied().unwrap_or(0);
                out.extend(&chars[i..i + keep]);
                i += run;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
}

fn run_len(chars: &[char], at: usize, c: char) -> usize {
    chars[at..].iter().take_while(|&&x| x == c).count()
}

/// Index of the next backtick run of exactly `run` at or after `from`.
fn find_closing_ticks(chars: &[char], from: usize, run: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '`' {
            let n = run_len(chars, i, '`');
            if n == run {
                return Some(i);
            }
            i += n;
        } else {
            i += 1;
        }
    }
    None
}

/// One leading and one trailing space are dropped when both are present
/// and the content is not all spaces.
fn code_span_content(inner: &[char]) -> &[char] {
    let padded = inner.len() >= 2
        && inner[0] == ' '
        && inner[inner.len() - 1] == ' '
        && inner.iter().any(|&c| c != ' ');
    if padded {
        &inner[1..inner.len() - 1]
    } else {
        inner
    }
}

/// Index of the `close` matching the `open` at `at`, honoring nesting
/// and backslash escapes.
fn matching(chars: &[char], at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = at;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// A link or image body starting at the `[` at `at`: `[label](dest)` or
/// `[label][ref]`. Returns the label and the index after the construct.
/// A bare `[label]` is left alone: without its definition it renders
/// literally.
fn link_at(chars: &[char], at: usize) -> Option<(&[char], usize)> {
    let label_end = matching(chars, at, '[', ']')?;
    let label = &chars[at + 1..label_end];
    let end = match chars.get(label_end + 1) {
        Some('(') => matching(chars, label_end + 1, '(', ')')?,
        Some('[') => matching(chars, label_end + 1, '[', ']')?,
        _ => return None,
    };
    Some((label, end + 1))
}

enum Angle<'a> {
    Autolink(&'a [char]),
    Tag,
}

fn angle_at(chars: &[char], at: usize) -> Option<(Angle<'_>, usize)> {
    let close = chars[at + 1..].iter().position(|&c| c == '>')? + at + 1;
    let inner = &chars[at + 1..close];
    let first = *inner.first()?;

    let no_space = !inner.iter().any(|c| c.is_whitespace());
    if no_space && (is_uri(inner) || is_email(inner)) {
        return Some((Angle::Autolink(inner), close + 1));
    }
    if first.is_ascii_alphabetic() || first == '/' || first == '!' {
        return Some((Angle::Tag, close + 1));
    }
    None
}

fn is_uri(inner: &[char]) -> bool {
    let Some(colon) = inner.iter().position(|&c| c == ':') else {
        return false;
    };
    (2..=32).contains(&colon)
        && inner[0].is_ascii_alphabetic()
        && inner[..colon]
            .iter()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

fn is_email(inner: &[char]) -> bool {
    match inner.iter().position(|&c| c == '@') {
        Some(at) => at > 0 && at + 1 < inner.len() && inner[at + 1..].contains(&'.'),
        None => false,
    }
}

/// A run of `*`, `_` or `~` outside code spans, links and angle brackets.
#[derive(Debug, Clone, Copy)]
struct Run {
    pos: usize,
    marker: char,
    len: usize,
    /// Markers not yet matched.
    left: usize,
    can_open: bool,
    can_close: bool,
}

/// Delimiter runs at this nesting level, in order. Link labels are paired
/// separately when they are stripped.
fn delimiter_runs(chars: &[char]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if chars.get(i + 1).is_some_and(char::is_ascii_punctuation) => i += 2,
            '`' => {
                let run = run_len(chars, i, '`');
                i = find_closing_ticks(chars, i + run, run).map_or(i + run, |close| close + run);
            }
            '!' if chars.get(i + 1) == Some(&'[') => {
                i = link_at(chars, i + 1).map_or(i + 1, |(_, end)| end);
            }
            '[' => i = link_at(chars, i).map_or(i + 1, |(_, end)| end),
            '<' => i = angle_at(chars, i).map_or(i + 1, |(_, end)| end),
            '*' | '_' | '~' => {
                let len = run_len(chars, i, c);
                let prev = i.checked_sub(1).map(|p| chars[p]);
                let next = chars.get(i + len).copied();
                let (can_open, can_close) = flanking(c, len, prev, next);
                runs.push(Run {
                    pos: i,
                    marker: c,
                    len,
                    left: len,
                    can_open,
                    can_close,
                });
                i += len;
            }
            _ => i += 1,
        }
    }
    runs
}

/// Whether a run may open and whether it may close emphasis or
/// strikethrough, from the characters on either side.
fn flanking(c: char, len: usize, prev: Option<char>, next: Option<char>) -> (bool, bool) {
    let ws = |x: Option<char>| x.map_or(true, char::is_whitespace);
    let punct = |x: Option<char>| x.is_some_and(|x| x.is_ascii_punctuation());
    let left = !ws(next) && (!punct(next) || ws(prev) || punct(prev));
    let right = !ws(prev) && (!punct(prev) || ws(next) || punct(next));
    match c {
        '*' => (left, right),
        // Intra-word underscores (snake_case) are literal.
        '_' => (left && (!right || punct(prev)), right && (!left || punct(next))),
        '~' if len == 2 => (left, right),
        _ => (false, false),
    }
}

/// Match closers to the nearest compatible opener and return, per run
/// position, how many markers are removed. Unmatched markers stay.
fn pair_delimiters(mut runs: Vec<Run>) -> HashMap<usize, usize> {
    let mut stack: Vec<usize> = Vec::new();

    for k in 0..runs.len() {
        if runs[k].can_close {
            while runs[k].left > 0 {
                let closer = runs[k];
                let Some(depth) = stack.iter().rposition(|&o| {
                    let opener = runs[o];
                    opener.marker == closer.marker
                        && opener.left > 0
                        && (closer.marker != '~' || opener.len == closer.len)
                }) else {
                    break;
                };
                let o = stack[depth];
                // Openers between the pair can no longer match.
                stack.truncate(depth + 1);
                let n = runs[o].left.min(closer.left);
                runs[o].left -= n;
                runs[k].left -= n;
                if runs[o].left == 0 {
                    stack.pop();
                }
            }
        }
        if runs[k].can_open && runs[k].left > 0 {
            stack.push(k);
        }
    }

    runs.iter()
        .filter(|r| r.left < r.len)
        .map(|r| (r.pos, r.len - r.left))
        .collect()
}
