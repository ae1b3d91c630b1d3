//! # Agency Site
//!
//! A static site generator for a local marketing agency's blog and guides.
//! Articles are Markdown files with TOML front matter; every article page
//! gets a heading outline with scroll-spy highlighting, social share links,
//! and a lead-capture form.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Load      content/  →  manifest.json    (Markdown + front matter → articles)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so the load stage can be inspected on
//! its own (`agency-site scan`) and the generate stage re-run from it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Stage 1: walks `blog/` and `guides/`, parses front matter, produces the manifest |
//! | [`generate`] | Stage 2: renders index, article and category pages with Maud |
//! | [`render`] | Markdown → HTML pipeline: heading ids and anchors, link routing, escaping |
//! | [`outline`] | Heading outline extracted from raw Markdown |
//! | [`slug`] | The one `normalize` function behind every heading id, plus file-name slugs |
//! | [`scroll_spy`] | Active-section state machine over a [`scroll_spy::Viewport`] |
//! | [`share`] | Twitter, LinkedIn, Facebook and email share URLs |
//! | [`lead`] | Lead form validation, the three-step wizard, and JSON submission |
//! | [`config`] | Layered `config.toml` loading, merging and validation |
//! | [`types`] | Shared types (`Article`, `OutlineEntry`, `ShareLinks`, `Category`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Normalizer for Ids
//!
//! The outline and the rendered page must agree on heading ids, or outline
//! links point nowhere. Both read the heading title off its source line with
//! the same parser and pass it through [`slug::normalize`]. Titles that
//! normalize to the same text share an id; the first matching element wins
//! in the browser.
//!
//! ## No Raw HTML
//!
//! Article bodies come from content files, not from trusted templates. Raw
//! HTML in Markdown is shown as text, and links are limited to `http`,
//! `https`, `mailto` and `tel`.
//!
//! ## Host-Agnostic Scroll-Spy
//!
//! [`scroll_spy::ScrollSpy`] holds the active-section state and talks to the
//! page through the [`scroll_spy::Viewport`] trait. The generated site ships
//! a small script implementing the same rules with `IntersectionObserver`,
//! configured with the band from `config.toml`.
//!
//! ## Config Cascading (Root → Collection)
//!
//! ```text
//! content/config.toml          ← root (overrides stock defaults)
//! content/blog/config.toml     ← blog (overrides root)
//! ```
//!
//! A collection can, for example, tag its leads with a different `source`
//! without repeating the rest of the config.

pub mod config;
pub mod content;
pub mod generate;
pub mod lead;
pub mod outline;
pub mod output;
pub mod render;
pub mod scroll_spy;
pub mod share;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
