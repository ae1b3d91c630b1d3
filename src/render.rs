//! Markdown → HTML render pipeline for article bodies.
//!
//! The pipeline is a chain of iterator adapters over `pulldown_cmark` events,
//! finished by `pulldown_cmark::html::push_html`:
//!
//! ```text
//! Parser (tables, strikethrough, task lists)
//!   → AssignHeadingIds   heading ids from the heading's source line
//!   → escape_raw_html    raw HTML becomes literal text
//!   → TextMergeStream
//!   → Autolink           bare http(s) URLs become links
//!   → LinkTargets        internal / external / blocked link markup
//!   → HeadingAnchors     id + self-link anchor on every heading
//!   → wrap_tables        tables inside a scroll container
//! ```
//!
//! ## Heading Ids
//!
//! An ATX heading's id is computed from its source line with the same
//! [`outline::atx_heading`] + [`slug::normalize`] pair the outline extractor
//! uses, so outline links and heading ids can never drift apart. Headings the
//! extractor cannot see (setext, nested in blockquotes or lists) fall back to
//! normalizing their rendered plain text.
//!
//! ## Safety
//!
//! Raw HTML is never passed through. Block and inline HTML in the source are
//! re-emitted as escaped text, and links with a scheme other than `http`,
//! `https`, `mailto` or `tel` are rendered as their plain text. All markup the
//! pipeline itself generates goes through Maud and is escaped.
//!
//! ## Failure Mode
//!
//! There is none: `pulldown_cmark` accepts any input, and anything it does
//! not recognise as a construct is rendered as literal text.

use crate::outline;
use crate::slug;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{
    CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
    html as md_html,
};
use regex::Regex;
use std::collections::VecDeque;
use std::ops::Range;
use std::sync::LazyLock;

/// Site-specific inputs to link handling.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prefix for root-relative internal links (`/` or `/sub/`).
    pub base_path: String,
    /// Canonical origin of the site (`https://example.com`). Absolute links
    /// to this origin are treated as internal.
    pub site_origin: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            site_origin: None,
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &crate::config::SiteConfig) -> Self {
        Self {
            base_path: config.site.base_path.clone(),
            site_origin: Some(config.site.base_url.trim_end_matches('/').to_string()),
        }
    }
}

/// A heading element the renderer emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeading {
    pub level: u8,
    pub id: String,
}

/// Output of [`render_article`].
#[derive(Debug, Clone)]
pub struct RenderedArticle {
    pub html: String,
    /// Every heading in document order, all levels.
    pub headings: Vec<RenderedHeading>,
}

impl RenderedArticle {
    pub fn markup(&self) -> PreEscaped<&str> {
        PreEscaped(self.html.as_str())
    }
}

/// Parser extensions: GitHub-flavored tables, strikethrough and task lists.
/// Bare URL autolinking is done by the [`Autolink`] adapter.
fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render an article body to HTML.
pub fn render_article(markdown: &str, options: &RenderOptions) -> RenderedArticle {
    let mut headings = Vec::new();
    let mut html = String::new();

    let parser = Parser::new_ext(markdown, markdown_options()).into_offset_iter();
    let events = AssignHeadingIds::new(markdown, parser).map(escape_raw_html);
    let events = Autolink::new(TextMergeStream::new(events));
    let events = LinkTargets::new(events, options);
    let events = HeadingAnchors::new(events, &mut headings).flat_map(wrap_tables);
    md_html::push_html(&mut html, events);

    RenderedArticle { html, headings }
}

// ============================================================================
// Heading ids
// ============================================================================

/// Sets `id` on ATX headings from their source line.
struct AssignHeadingIds<'a, I> {
    source: &'a str,
    inner: I,
}

impl<'a, I> AssignHeadingIds<'a, I> {
    fn new(source: &'a str, inner: I) -> Self {
        Self { source, inner }
    }
}

impl<'a, I> Iterator for AssignHeadingIds<'a, I>
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let (event, range) = self.inner.next()?;
        match event {
            Event::Start(Tag::Heading {
                level,
                id: None,
                classes,
                attrs,
            }) => {
                let id = self
                    .source
                    .get(range)
                    .and_then(|src| src.lines().next())
                    .and_then(|line| outline::atx_heading(line.trim_start_matches(' ')))
                    .map(|(_, title)| CowStr::from(slug::normalize(title)));
                Some(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }))
            }
            other => Some(other),
        }
    }
}

/// Raw HTML from the source is shown, never interpreted.
fn escape_raw_html(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

// ============================================================================
// Autolinking
// ============================================================================

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>]+").expect("valid url regex"));

/// Trailing characters that end a sentence rather than a URL.
fn trim_url_end(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let candidate = &url[..end];
        let Some(last) = candidate.chars().last() else {
            break;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '*' | '_' | '~' => true,
            ')' => candidate.matches(')').count() > candidate.matches('(').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}

/// Turns bare `http(s)://` URLs in text into links.
///
/// Text inside existing links, images and code blocks is left alone.
struct Autolink<'a, I> {
    inner: I,
    pending: VecDeque<Event<'a>>,
    link_depth: usize,
    in_code_block: bool,
}

impl<'a, I> Autolink<'a, I> {
    fn new(inner: I) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            link_depth: 0,
            in_code_block: false,
        }
    }

    fn split(&mut self, text: CowStr<'a>) -> Event<'a> {
        let mut last = 0;
        for m in BARE_URL.find_iter(&text) {
            let url = trim_url_end(m.as_str());
            if url.len() <= "https://".len() {
                continue;
            }
            if m.start() > last {
                self.pending
                    .push_back(Event::Text(text[last..m.start()].to_string().into()));
            }
            let url = url.to_string();
            self.pending.push_back(Event::Start(Tag::Link {
                link_type: LinkType::Autolink,
                dest_url: url.clone().into(),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            }));
            last = m.start() + url.len();
            self.pending.push_back(Event::Text(url.into()));
            self.pending.push_back(Event::End(TagEnd::Link));
        }
        if last == 0 {
            return Event::Text(text);
        }
        if last < text.len() {
            self.pending
                .push_back(Event::Text(text[last..].to_string().into()));
        }
        self.pending
            .pop_front()
            .unwrap_or_else(|| Event::Text(CowStr::Borrowed("")))
    }
}

impl<'a, I> Iterator for Autolink<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        let event = self.inner.next()?;
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => self.link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => {
                self.link_depth = self.link_depth.saturating_sub(1)
            }
            Event::Start(Tag::CodeBlock(_)) => self.in_code_block = true,
            Event::End(TagEnd::CodeBlock) => self.in_code_block = false,
            _ => {}
        }
        match event {
            Event::Text(text) if self.link_depth == 0 && !self.in_code_block => {
                Some(self.split(text))
            }
            other => Some(other),
        }
    }
}

// ============================================================================
// Link targets
// ============================================================================

/// How a link destination is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `#section` on the same page.
    Fragment(String),
    /// Page on this site; followed with in-site navigation.
    Internal(String),
    /// Another site; opened as an ordinary external link.
    External(String),
    /// `mailto:` or `tel:`.
    Contact(String),
    /// Disallowed scheme (`javascript:`, `data:`, ...); rendered as text.
    Blocked,
}

/// Returns the lower-cased URL scheme, if the destination has one.
fn url_scheme(dest: &str) -> Option<String> {
    let colon = dest.find(':')?;
    let head = &dest[..colon];
    let is_scheme = !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme || dest[..colon].contains(['/', '?', '#']) {
        return None;
    }
    Some(head.to_ascii_lowercase())
}

/// Classify a link destination against the site's base path and origin.
pub fn classify_link(dest: &str, options: &RenderOptions) -> LinkTarget {
    let dest = dest.trim();

    if dest.starts_with('#') {
        return LinkTarget::Fragment(dest.to_string());
    }
    if let Some(origin) = options.site_origin.as_deref()
        && !origin.is_empty()
        && let Some(rest) = dest.strip_prefix(origin)
        && (rest.is_empty() || rest.starts_with(['/', '?', '#']))
    {
        return LinkTarget::Internal(dest.to_string());
    }
    if dest.starts_with("//") {
        return LinkTarget::External(dest.to_string());
    }
    match url_scheme(dest).as_deref() {
        Some("http" | "https") => LinkTarget::External(dest.to_string()),
        Some("mailto" | "tel") => LinkTarget::Contact(dest.to_string()),
        Some(_) => LinkTarget::Blocked,
        None => match dest.strip_prefix('/') {
            Some(rest) => LinkTarget::Internal(format!("{}{}", options.base_path, rest)),
            None => LinkTarget::Internal(dest.to_string()),
        },
    }
}

fn link_markup(target: &LinkTarget, title: &str, inner: &str) -> Markup {
    let title = (!title.is_empty()).then_some(title);
    html! {
        @match target {
            LinkTarget::Fragment(href) | LinkTarget::Contact(href) => {
                a href=(href) title=[title] { (PreEscaped(inner)) }
            }
            LinkTarget::Internal(href) => {
                a href=(href) title=[title] data-nav="internal" { (PreEscaped(inner)) }
            }
            LinkTarget::External(href) => {
                a href=(href) title=[title] rel="noopener noreferrer" target="_blank" {
                    (PreEscaped(inner))
                }
            }
            LinkTarget::Blocked => { (PreEscaped(inner)) }
        }
    }
}

/// Renders each link as one inline HTML event with target-specific markup.
struct LinkTargets<'a, 'o, I> {
    inner: I,
    options: &'o RenderOptions,
    _marker: std::marker::PhantomData<Event<'a>>,
}

impl<'a, 'o, I> LinkTargets<'a, 'o, I> {
    fn new(inner: I, options: &'o RenderOptions) -> Self {
        Self {
            inner,
            options,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<'a, I> Iterator for LinkTargets<'a, '_, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let (link_type, dest_url, title) = match self.inner.next()? {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            }) => (link_type, dest_url, title),
            other => return Some(other),
        };

        let body: Vec<Event<'a>> = self
            .inner
            .by_ref()
            .take_while(|e| !matches!(e, Event::End(TagEnd::Link)))
            .collect();
        let mut inner_html = String::new();
        md_html::push_html(&mut inner_html, body.into_iter());

        let target = if link_type == LinkType::Email {
            LinkTarget::Contact(format!("mailto:{dest_url}"))
        } else {
            classify_link(&dest_url, self.options)
        };
        let markup = link_markup(&target, &title, &inner_html);
        Some(Event::InlineHtml(markup.into_string().into()))
    }
}

// ============================================================================
// Headings
// ============================================================================

fn heading_markup(level: HeadingLevel, id: Option<&str>, content: Markup) -> Markup {
    match level {
        HeadingLevel::H1 => html! { h1 id=[id] { (content) } },
        HeadingLevel::H2 => html! { h2 id=[id] { (content) } },
        HeadingLevel::H3 => html! { h3 id=[id] { (content) } },
        HeadingLevel::H4 => html! { h4 id=[id] { (content) } },
        HeadingLevel::H5 => html! { h5 id=[id] { (content) } },
        HeadingLevel::H6 => html! { h6 id=[id] { (content) } },
    }
}

/// Gives every heading an id and a self-link anchor. A heading whose id
/// normalizes to nothing gets neither.
///
/// The heading text is wrapped in the anchor unless it already contains a
/// link, in which case a `#` anchor is prepended instead (anchors cannot
/// nest).
struct HeadingAnchors<'a, 'h, I> {
    inner: I,
    headings: &'h mut Vec<RenderedHeading>,
    _marker: std::marker::PhantomData<Event<'a>>,
}

impl<'a, 'h, I> HeadingAnchors<'a, 'h, I> {
    fn new(inner: I, headings: &'h mut Vec<RenderedHeading>) -> Self {
        Self {
            inner,
            headings,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<'a, I> Iterator for HeadingAnchors<'a, '_, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let (level, id) = match self.inner.next()? {
            Event::Start(Tag::Heading { level, id, .. }) => (level, id),
            other => return Some(other),
        };

        let mut body = Vec::new();
        let mut plain_text = String::new();
        let mut contains_link = false;
        for inner in self.inner.by_ref() {
            match &inner {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(text) | Event::Code(text) => plain_text.push_str(text),
                // Only links reach this stage as inline HTML.
                Event::InlineHtml(_) => contains_link = true,
                _ => {}
            }
            body.push(inner);
        }

        let id = match id {
            Some(id) => id.to_string(),
            None => slug::normalize(plain_text.trim()),
        };
        let mut inner_html = String::new();
        md_html::push_html(&mut inner_html, body.into_iter());

        let href = format!("#{id}");
        let content = if id.is_empty() {
            PreEscaped(inner_html)
        } else if contains_link {
            html! {
                a.heading-anchor href=(href) aria-hidden="true" { "#" }
                " "
                (PreEscaped(inner_html))
            }
        } else {
            html! { a.heading-anchor href=(href) { (PreEscaped(inner_html)) } }
        };

        self.headings.push(RenderedHeading {
            level: level as u8,
            id: id.clone(),
        });
        let markup = heading_markup(level, (!id.is_empty()).then_some(id.as_str()), content);
        Some(Event::Html(format!("{}\n", markup.into_string()).into()))
    }
}

// ============================================================================
// Tables
// ============================================================================

fn wrap_tables(event: Event<'_>) -> Vec<Event<'_>> {
    match event {
        Event::Start(Tag::Table(_)) => vec![
            Event::Html(CowStr::Borrowed("<div class=\"table-scroll\">\n")),
            event,
        ],
        Event::End(TagEnd::Table) => {
            vec![event, Event::Html(CowStr::Borrowed("</div>\n"))]
        }
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::extract_outline;

    fn render(md: &str) -> String {
        render_article(md, &RenderOptions::default()).html
    }

    #[test]
    fn heading_gets_id_and_self_link() {
        let html = render("## Step 1: Getting Started!");
        assert!(html.contains(r#"<h2 id="step-1-getting-started">"#));
        assert!(html.contains(
            r##"<a class="heading-anchor" href="#step-1-getting-started">Step 1: Getting Started!</a>"##
        ));
    }

    #[test]
    fn empty_heading_has_no_id_or_anchor() {
        let rendered = render_article("#  \n\n## !!!\n", &RenderOptions::default());
        assert!(rendered.html.contains("<h1></h1>"));
        assert!(rendered.html.contains("<h2>!!!</h2>"));
        assert!(!rendered.html.contains(r#"id="""#));
        assert!(!rendered.html.contains(r##"href="#""##));
    }

    #[test]
    fn backtick_line_with_backtick_info_renders_heading() {
        let md = "``` a`b\n\n## Real Heading\n";
        let rendered = render_article(md, &RenderOptions::default());
        let outline = extract_outline(md);
        assert_eq!(outline.len(), 1);
        assert_eq!(
            rendered.headings,
            vec![RenderedHeading {
                level: 2,
                id: outline[0].id.clone(),
            }]
        );
    }

    #[test]
    fn heading_ids_match_outline() {
        let md = "# Local SEO *Basics*\n\n\
                  Intro text.\n\n\
                  ## Step 1: Claim `Google Business Profile`!\n\n\
                  ### Reviews & Ratings\n\n\
                  ## Overview\n\n\
                  # Overview\n\n\
                  ## Pricing ##\n";
        let rendered = render_article(md, &RenderOptions::default());
        let outline = extract_outline(md);

        let rendered_ids: Vec<(u8, &str)> = rendered
            .headings
            .iter()
            .filter(|h| h.level <= 3)
            .map(|h| (h.level, h.id.as_str()))
            .collect();
        let outline_ids: Vec<(u8, &str)> =
            outline.iter().map(|e| (e.level, e.id.as_str())).collect();
        assert_eq!(rendered_ids, outline_ids);
    }

    #[test]
    fn deeper_headings_still_get_ids() {
        let rendered = render_article("#### Fine Print", &RenderOptions::default());
        assert_eq!(
            rendered.headings,
            vec![RenderedHeading {
                level: 4,
                id: "fine-print".to_string()
            }]
        );
        assert!(rendered.html.contains(r#"<h4 id="fine-print">"#));
    }

    #[test]
    fn setext_heading_uses_text() {
        let rendered = render_article("Ad Spend\n========\n", &RenderOptions::default());
        assert_eq!(rendered.headings[0].id, "ad-spend");
        assert_eq!(rendered.headings[0].level, 1);
    }

    #[test]
    fn heading_in_code_block_is_not_a_heading() {
        let rendered = render_article("```\n# not a heading\n```\n", &RenderOptions::default());
        assert!(rendered.headings.is_empty());
        assert!(rendered.html.contains("# not a heading"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render("<script>alert('x')</script>\n\nHello <b>there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn javascript_links_rendered_as_text() {
        let html = render("[click me](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click me"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn external_link_opens_externally() {
        let html = render("See [Google](https://google.com/search).");
        assert!(html.contains(
            r#"<a href="https://google.com/search" rel="noopener noreferrer" target="_blank">Google</a>"#
        ));
    }

    #[test]
    fn root_relative_link_uses_base_path() {
        let options = RenderOptions {
            base_path: "/agency/".to_string(),
            site_origin: None,
        };
        let html = render_article("[Pricing](/services/pricing/)", &options).html;
        assert!(html.contains(r#"<a href="/agency/services/pricing/" data-nav="internal">"#));
    }

    #[test]
    fn same_origin_absolute_link_is_internal() {
        let options = RenderOptions {
            base_path: "/".to_string(),
            site_origin: Some("https://example.com".to_string()),
        };
        let html = render_article("[Contact](https://example.com/contact/)", &options).html;
        assert!(html.contains(r#"href="https://example.com/contact/" data-nav="internal""#));
        assert!(!html.contains("noopener"));
    }

    #[test]
    fn lookalike_origin_is_external() {
        let options = RenderOptions {
            base_path: "/".to_string(),
            site_origin: Some("https://example.com".to_string()),
        };
        let target = classify_link("https://example.com.evil.test/", &options);
        assert!(matches!(target, LinkTarget::External(_)));
    }

    #[test]
    fn fragment_link_kept() {
        let html = render("[Jump](#pricing)");
        assert!(html.contains(r##"<a href="#pricing">Jump</a>"##));
    }

    #[test]
    fn mailto_and_tel_are_contact_links() {
        let options = RenderOptions::default();
        assert_eq!(
            classify_link("mailto:hi@example.com", &options),
            LinkTarget::Contact("mailto:hi@example.com".to_string())
        );
        assert_eq!(
            classify_link("tel:+15551234567", &options),
            LinkTarget::Contact("tel:+15551234567".to_string())
        );
    }

    #[test]
    fn relative_path_with_colon_after_slash_is_internal() {
        let target = classify_link("guides/a:b", &RenderOptions::default());
        assert_eq!(target, LinkTarget::Internal("guides/a:b".to_string()));
    }

    #[test]
    fn bare_url_autolinked() {
        let html = render("Visit https://example.org/tools.");
        assert!(html.contains(r#"<a href="https://example.org/tools" rel="noopener noreferrer" target="_blank">https://example.org/tools</a>."#));
    }

    #[test]
    fn url_with_underscore_autolinked_whole() {
        let html = render("Docs at https://example.org/a_b_c here");
        assert!(html.contains(r#"href="https://example.org/a_b_c""#));
    }

    #[test]
    fn url_inside_code_not_autolinked() {
        let html = render("`https://example.org`\n\n```\nhttps://example.org\n```\n");
        assert!(!html.contains("<a "));
    }

    #[test]
    fn balanced_parens_kept_in_url() {
        assert_eq!(
            trim_url_end("https://en.wikipedia.org/wiki/SEO_(marketing)"),
            "https://en.wikipedia.org/wiki/SEO_(marketing)"
        );
        assert_eq!(trim_url_end("https://x.org/a)."), "https://x.org/a");
    }

    #[test]
    fn heading_with_link_prepends_anchor() {
        let html = render("## See [our pricing](/pricing/)");
        assert!(html.contains(r#"aria-hidden="true">#</a>"#));
        assert!(html.contains(r#"<a href="/pricing/" data-nav="internal">our pricing</a>"#));
    }

    #[test]
    fn tables_wrapped() {
        let md = "| Plan | Price |\n|------|-------|\n| Basic | $99 |\n";
        let html = render(md);
        assert!(html.contains(r#"<div class="table-scroll">"#));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>$99</td>"));
    }

    #[test]
    fn gfm_extensions_enabled() {
        let html = render("~~old price~~\n\n- [x] done\n");
        assert!(html.contains("<del>old price</del>"));
        assert!(html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn block_elements_render() {
        let md = "> Quote\n\n1. one\n2. two\n\n- a\n\n```rust\nfn main() {}\n```\n\nUse `code`.";
        let html = render(md);
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("<ol>"));
        assert!(html.contains("<ul>"));
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn malformed_markdown_degrades_to_text() {
        let html = render("[unclosed link](\n\n**bold without end\n\n| not | a table");
        assert!(html.contains("[unclosed link]("));
        assert!(html.contains("**bold without end"));
    }

    #[test]
    fn heading_link_syntax_counts_toward_id() {
        // Ids come from the raw heading line, link destination included.
        let md = "## See [pricing](/pricing/)";
        let rendered = render_article(md, &RenderOptions::default());
        assert_eq!(rendered.headings[0].id, "see-pricingpricing");
        assert_eq!(extract_outline(md)[0].id, rendered.headings[0].id);
    }

    #[test]
    fn heading_text_is_escaped() {
        let html = render("## Tips & <Tricks>");
        assert!(html.contains("Tips &amp; &lt;Tricks&gt;"));
    }
}
