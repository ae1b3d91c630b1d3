//! Slug derivation shared by every part of the site that needs a URL-safe id.
//!
//! Heading ids are the important case: the outline extractor and the render
//! pipeline both call [`normalize`], so an outline entry always points at the
//! `id` attribute the renderer put on the matching heading element.
//!
//! ## The Rule
//!
//! 1. Lower-case the text.
//! 2. Drop every character outside `[a-z0-9]`, whitespace and `-`.
//! 3. Replace each run of whitespace with a single `-`.
//!
//! ```text
//! "Step 1: Getting Started!"  → "step-1-getting-started"
//! "SEO & PPC"                 → "seo-ppc"
//! "Overview"                  → "overview"
//! ```
//!
//! Nothing is trimmed after stripping, so `"Hello !"` becomes `"hello-"`.
//! Two headings with the same text share one id; see `DESIGN.md`.
//!
//! ## File Names
//!
//! Content files may carry a `NNN-` prefix to pin their order inside a
//! collection (`010-local-seo-basics.md`). [`parse_entry_name`] splits that
//! prefix from the slug part.

/// Normalize free text into a heading id / slug.
///
/// Already-normalized strings are fixed points: `normalize(normalize(x)) ==
/// normalize(x)`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
            continue;
        }
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

/// Result of parsing a content file stem like `010-local-seo-basics`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Order prefix if present (e.g. `10` from `010-local-seo-basics`).
    pub number: Option<u32>,
    /// Remainder after `NNN-`, or the whole stem when unnumbered.
    pub slug: String,
}

/// Split an optional `NNN-` ordering prefix from a file stem.
///
/// - `"010-local-seo-basics"` → number=Some(10), slug="local-seo-basics"
/// - `"ppc-vs-seo"` → number=None, slug="ppc-vs-seo"
/// - `"2024-roundup"` → number=Some(2024), slug="roundup"
/// - `"007"` → number=Some(7), slug=""
pub fn parse_entry_name(stem: &str) -> ParsedName {
    if let Some((prefix, rest)) = stem.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            slug: rest.to_string(),
        };
    }
    if let Ok(num) = stem.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            slug: String::new(),
        };
    }
    ParsedName {
        number: None,
        slug: stem.to_string(),
    }
}

/// Whether `slug` is already in normalized, URL-safe form (non-empty,
/// `[a-z0-9-]` only).
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
