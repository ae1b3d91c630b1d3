//! Table-of-contents extraction from raw Markdown.
//!
//! The outline is read straight off the source text, not from the parsed
//! document: every ATX heading line of level 1 to 3 becomes one
//! [`OutlineEntry`], in document order, with no nesting and no
//! de-duplication. Levels 4 and deeper are left out.
//!
//! ```text
//! # Local SEO Basics            → level 1, "local-seo-basics"
//! ## Step 1: Getting Started!   → level 2, "step-1-getting-started"
//! #### Footnote-sized heading   → (not collected)
//! ```
//!
//! Headings whose id would be empty (`#` followed only by whitespace or
//! punctuation) are left out.
//!
//! Lines inside fenced code blocks are skipped. The renderer never turns them
//! into heading elements, so an outline entry for one would point nowhere.
//!
//! Heading ids come from [`slug::normalize`], the same function the render
//! pipeline uses to set `id` attributes.

use crate::slug;
use crate::types::OutlineEntry;
use regex::Regex;
use std::sync::LazyLock;

/// Deepest heading level that appears in the outline.
pub const MAX_OUTLINE_LEVEL: u8 = 3;

static ATX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").expect("valid heading regex"));

/// Parse one source line as an ATX heading.
///
/// Returns the level and the heading title with surrounding whitespace and
/// any closing `#` sequence removed. Used by both the outline scan and the
/// render pipeline so the two agree on the title they normalize.
pub(crate) fn atx_heading(line: &str) -> Option<(u8, &str)> {
    let caps = ATX_HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let title = strip_closing_sequence(caps.get(2)?.as_str().trim());
    Some((level, title))
}

/// `## Title ##` → `Title`. A `#` run only counts as closing when it is the
/// whole title or follows whitespace.
fn strip_closing_sequence(title: &str) -> &str {
    let without_hashes = title.trim_end_matches('#');
    if without_hashes.len() == title.len() {
        return title;
    }
    if without_hashes.is_empty() {
        return "";
    }
    if without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end()
    } else {
        title
    }
}

/// Tracks whether the scan is inside a fenced code block.
#[derive(Default)]
struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    /// Feed one line; returns true if the line is part of a fence (including
    /// the opening and closing marker lines).
    fn consume(&mut self, line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        let marker = if indent <= 3 {
            fence_marker(&line[indent..])
        } else {
            None
        };

        match (self.open, marker) {
            (None, Some(open)) => {
                self.open = Some(open);
                true
            }
            (Some((ch, len)), Some((close_ch, close_len)))
                if ch == close_ch
                    && close_len >= len
                    && line[indent + close_len..].trim().is_empty() =>
            {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

/// Returns the fence character and run length when `line` starts with three
/// or more backticks or tildes. A backtick fence's info string may not
/// contain a backtick; such a line is an inline code span, not a fence.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == ch).count();
    if len < 3 || (ch == '`' && line[len..].contains('`')) {
        return None;
    }
    Some((ch, len))
}

/// Extract the level 1–3 headings of a Markdown document.
pub fn extract_outline(markdown: &str) -> Vec<OutlineEntry> {
    let mut fences = FenceState::default();
    let mut entries = Vec::new();

    for line in markdown.lines() {
        if fences.consume(line) {
            continue;
        }
        let Some((level, title)) = atx_heading(line) else {
            continue;
        };
        if level > MAX_OUTLINE_LEVEL {
            continue;
        }
        let id = slug::normalize(title);
        if id.is_empty() {
            continue;
        }
        entries.push(OutlineEntry {
            id,
            title: title.to_string(),
            level,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(entries: &[OutlineEntry]) -> Vec<u8> {
        entries.iter().map(|e| e.level).collect()
    }

    fn ids(entries: &[OutlineEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn getting_started_example() {
        let outline = extract_outline("## Step 1: Getting Started!");
        assert_eq!(
            outline,
            vec![OutlineEntry {
                id: "step-1-getting-started".to_string(),
                title: "Step 1: Getting Started!".to_string(),
                level: 2,
            }]
        );
    }

    #[test]
    fn document_order_and_levels() {
        let md = "# Intro\n\nText.\n\n## Why Local SEO\n\n### Citations\n\n## Next Steps\n";
        let outline = extract_outline(md);
        assert_eq!(levels(&outline), vec![1, 2, 3, 2]);
        assert_eq!(
            ids(&outline),
            vec!["intro", "why-local-seo", "citations", "next-steps"]
        );
    }

    #[test]
    fn level_four_and_deeper_skipped() {
        let md = "## Kept\n#### Dropped\n##### Dropped too\n";
        let outline = extract_outline(md);
        assert_eq!(ids(&outline), vec!["kept"]);
    }

    #[test]
    fn requires_space_after_hashes() {
        let md = "#hashtag\n##NoSpace\n# Real\n";
        assert_eq!(ids(&extract_outline(md)), vec!["real"]);
    }

    #[test]
    fn tab_separator_accepted() {
        let outline = extract_outline("##\tTabbed");
        assert_eq!(ids(&outline), vec!["tabbed"]);
    }

    #[test]
    fn duplicate_titles_share_id() {
        let md = "# Overview\n\nBody.\n\n## Overview\n";
        let outline = extract_outline(md);
        assert_eq!(outline.len(), 2);
        assert_eq!(ids(&outline), vec!["overview", "overview"]);
        assert_eq!(levels(&outline), vec![1, 2]);
    }

    #[test]
    fn title_is_trimmed() {
        let outline = extract_outline("##   Padded title   ");
        assert_eq!(outline[0].title, "Padded title");
    }

    #[test]
    fn closing_sequence_removed() {
        let outline = extract_outline("## Pricing ##");
        assert_eq!(outline[0].title, "Pricing");
        assert_eq!(outline[0].id, "pricing");
    }

    #[test]
    fn hash_inside_word_is_not_closing() {
        let outline = extract_outline("## Learn C#");
        assert_eq!(outline[0].title, "Learn C#");
    }

    #[test]
    fn crlf_line_endings() {
        let outline = extract_outline("# One\r\n## Two\r\n");
        assert_eq!(ids(&outline), vec!["one", "two"]);
        assert_eq!(outline[1].title, "Two");
    }

    #[test]
    fn headings_in_code_fences_skipped() {
        let md = "# Real\n\n```bash\n# just a comment\n```\n\n~~~\n## also code\n~~~\n\n## After\n";
        assert_eq!(ids(&extract_outline(md)), vec!["real", "after"]);
    }

    #[test]
    fn shorter_fence_does_not_close() {
        let md = "````\n```\n# inside\n````\n# outside\n";
        assert_eq!(ids(&extract_outline(md)), vec!["outside"]);
    }

    #[test]
    fn backtick_line_with_backtick_info_is_not_a_fence() {
        let md = "``` a`b\n\n## Real Heading\n";
        assert_eq!(ids(&extract_outline(md)), vec!["real-heading"]);
    }

    #[test]
    fn tilde_fence_info_may_contain_backticks() {
        let md = "~~~ a`b\n## inside\n~~~\n## After\n";
        assert_eq!(ids(&extract_outline(md)), vec!["after"]);
    }

    #[test]
    fn empty_headings_skipped() {
        let md = "#  \n## !!!\n## Kept\n";
        assert_eq!(ids(&extract_outline(md)), vec!["kept"]);
    }

    #[test]
    fn indented_heading_not_collected() {
        let md = "    # indented code\n# Real\n";
        assert_eq!(ids(&extract_outline(md)), vec!["real"]);
    }

    #[test]
    fn pure_and_repeatable() {
        let md = "# A\n## B\n### C\n";
        assert_eq!(extract_outline(md), extract_outline(md));
    }

    #[test]
    fn empty_input() {
        assert!(extract_outline("").is_empty());
    }
}
