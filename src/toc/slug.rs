//! Anchor slugs. This is the single definition of heading ids: the TOC and
//! the renderer both go through [`Slugger`], so fragments and element ids
//! cannot drift apart.

use std::collections::{HashMap, HashSet};

/// Lower-case `text`, collapse every run of characters other than letters,
/// digits and `-` into a single `-`, then trim `-` from both ends.
///
/// # Examples
///
/// ```
/// use pagetoc::toc::slug::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("API: Auth (v2)"), "api-auth-v2");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut gap = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '-' {
            if gap && !out.is_empty() {
                out.push('-');
            }
            gap = false;
            out.push(c);
        } else {
            gap = true;
        }
    }

    out.trim_matches('-').to_string()
}

/// Hands out unique slugs within one document. The first occurrence of a
/// slug is bare; later ones get the first free `-1`, `-2`, ... suffix.
#[derive(Debug, Default)]
pub struct Slugger {
    used: HashSet<String>,
    /// Next suffix to try per base slug.
    next: HashMap<String, u32>,
}

impl Slugger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique slug for `text`, recorded as used.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        if self.used.insert(base.clone()) {
            return base;
        }

        let n = self.next.entry(base.clone()).or_insert(1);
        loop {
            let candidate = format!("{base}-{n}");
            *n += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
