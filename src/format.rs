use std::fmt::Write;
use std::path::Path;

use crate::types::{HeadingAnchor, TableOfContents};

/// Header line: `# path/to/doc.mdx (N sections) [mode]`
pub fn file_header(path: &Path, count: usize, mode: &str) -> String {
    let noun = if count == 1 { "section" } else { "sections" };
    format!("# {} ({count} {noun}) [{mode}]", path.display())
}

/// Indented outline, one entry per line: `title  url`.
pub fn outline(toc: &TableOfContents) -> String {
    let mut out = String::new();
    for (depth, item) in toc.walk() {
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}- {}  {}", item.title, item.url);
    }
    out
}

/// Heading ids with their source line: `[12]   ## Title  #id`.
pub fn anchors(anchors: &[HeadingAnchor]) -> String {
    let width = anchors
        .iter()
        .map(|a| a.line)
        .max()
        .map_or(1, |n| (n.max(1).ilog10() + 1) as usize);
    let mut out = String::new();
    for a in anchors {
        let marks = "#".repeat(a.level as usize);
        let _ = writeln!(out, "[{:>width$}] {marks} {}  #{}", a.line, a.title, a.id);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc;

    #[test]
    fn header_pluralizes() {
        assert_eq!(file_header(Path::new("a.md"), 1, "toc"), "# a.md (1 section) [toc]");
        assert_eq!(file_header(Path::new("a.md"), 0, "toc"), "# a.md (0 sections) [toc]");
    }

    #[test]
    fn outline_indents_children() {
        let text = outline(&toc::build("## A\n### B\n## C\n"));
        assert_eq!(text, "- A  #a\n  - B  #b\n- C  #c\n");
    }

    #[test]
    fn anchors_align_line_numbers() {
        let raw = format!("# T\n{}## Late\n", "\n".repeat(10));
        let text = anchors(&toc::heading_anchors(&raw));
        assert_eq!(text, "[ 1] # T  #t\n[12] ## Late  #late\n");
    }

    #[test]
    fn empty_outline_is_empty() {
        assert_eq!(outline(&TableOfContents::default()), "");
        assert_eq!(anchors(&[]), "");
    }
}
