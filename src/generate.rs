//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the content manifest and writes the
//! final static site.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): blog posts, guides and categories
//! - **Article pages** (`/{blog|guides}/{slug}/index.html`): rendered body,
//!   outline, share links and lead form
//! - **Category pages** (`/category/{id}/index.html`): articles in one category
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── style.css
//! ├── scroll-spy.js
//! ├── lead-form.js
//! ├── blog/
//! │   └── local-seo-basics/
//! │       └── index.html
//! ├── guides/
//! │   └── google-business-profile/
//! │       └── index.html
//! └── category/
//!     └── local-seo/
//!         └── index.html
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and written next to the pages:
//! - `static/style.css`: base styles
//! - `static/scroll-spy.js`: outline highlighting, configured from the
//!   `data-root-margin` attribute of the article element
//! - `static/lead-form.js`: lead form wizard and JSON submission, using the
//!   field rules rendered into the form
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Everything interpolated into a template is escaped; the only pre-escaped
//! content is the article body produced by [`render`](crate::render).

use crate::config::{SiteConfig, SiteSection};
use crate::content::{Collection, Manifest};
use crate::lead::{EMAIL_PATTERN, FAILURE_MESSAGE, Field, Step};
use crate::outline;
use crate::render::{self, RenderOptions, RenderedArticle};
use crate::share;
use crate::types::{Article, ArticleKind, Category, OutlineEntry};
use maud::{DOCTYPE, Markup, html};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS: &str = include_str!("../static/style.css");
const SCROLL_SPY_JS: &str = include_str!("../static/scroll-spy.js");
const LEAD_FORM_JS: &str = include_str!("../static/lead-form.js");

/// One page written by [`generate`].
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPage {
    /// Site-relative directory of the page (`""` for the index).
    pub path: String,
    pub title: String,
    /// Outline entries on the page (article pages only).
    pub outline_len: usize,
}

/// Everything [`generate`] wrote, for CLI reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub pages: Vec<GeneratedPage>,
    pub output_dir: String,
}

/// Read a manifest written by `scan` and generate the site from it.
pub fn generate_from_file(
    manifest_path: &Path,
    output_dir: &Path,
) -> Result<SiteSummary, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate(&manifest, output_dir)
}

pub fn generate(manifest: &Manifest, output_dir: &Path) -> Result<SiteSummary, GenerateError> {
    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join("style.css"), CSS)?;
    fs::write(output_dir.join("scroll-spy.js"), SCROLL_SPY_JS)?;
    fs::write(output_dir.join("lead-form.js"), LEAD_FORM_JS)?;

    let site = &manifest.config.site;
    let categories = manifest.categories();
    let mut pages = Vec::new();

    let index_html = render_index(manifest, &categories);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;
    pages.push(GeneratedPage {
        path: String::new(),
        title: site.title.clone(),
        outline_len: 0,
    });

    for collection in &manifest.collections {
        for article in &collection.articles {
            let (markup, outline_len) = build_article_page(article, collection);
            let page_dir = output_dir.join(article.kind.dir_name()).join(&article.slug);
            fs::create_dir_all(&page_dir)?;
            fs::write(page_dir.join("index.html"), markup.into_string())?;
            debug!(path = %article.path(), "wrote article page");
            pages.push(GeneratedPage {
                path: article.path(),
                title: article.title.clone(),
                outline_len,
            });
        }
    }

    for category in &categories {
        let page_dir = output_dir.join("category").join(&category.id);
        fs::create_dir_all(&page_dir)?;
        let markup = render_category_page(category, manifest);
        fs::write(page_dir.join("index.html"), markup.into_string())?;
        pages.push(GeneratedPage {
            path: category.path(),
            title: category.name.clone(),
            outline_len: 0,
        });
    }

    info!(pages = pages.len(), output = %output_dir.display(), "site generated");
    Ok(SiteSummary {
        pages,
        output_dir: output_dir.display().to_string(),
    })
}

fn build_article_page(article: &Article, collection: &Collection) -> (Markup, usize) {
    let config = &collection.config;
    let rendered = render::render_article(&article.content, &RenderOptions::from_config(config));
    let outline = outline::extract_outline(&article.content);
    if let Some(missing) = outline_mismatch(&outline, &rendered) {
        warn!(
            article = %article.source_path,
            id = missing,
            "outline entry has no matching heading"
        );
    }
    let outline_len = outline.len();
    (
        render_article_page(article, config, &rendered, &outline),
        outline_len,
    )
}

/// First outline id with no heading of the same level and id in the
/// rendered body.
fn outline_mismatch<'a>(outline: &'a [OutlineEntry], rendered: &RenderedArticle) -> Option<&'a str> {
    outline
        .iter()
        .find(|entry| {
            !rendered
                .headings
                .iter()
                .any(|h| h.level == entry.level && h.id == entry.id)
        })
        .map(|entry| entry.id.as_str())
}

// ============================================================================
// Layout
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, site: &SiteSection, content: Markup) -> Markup {
    let page_title = if title == site.title {
        title.to_string()
    } else {
        format!("{title} | {}", site.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                link rel="stylesheet" href=(site.href("style.css"));
            }
            body {
                (site_header(site))
                (content)
                footer.site-footer {
                    p { (site.title) " · " (site.tagline) }
                }
            }
        }
    }
}

/// Renders the site header with the home link and collection links
fn site_header(site: &SiteSection) -> Markup {
    html! {
        header.site-header {
            a.brand href=(site.href("")) { (site.title) }
            nav.site-nav aria-label="Main" {
                a href={ (site.href("")) "#" (ArticleKind::Blog.dir_name()) } { (ArticleKind::Blog.label()) }
                a href={ (site.href("")) "#" (ArticleKind::Guide.dir_name()) } { (ArticleKind::Guide.label()) }
            }
        }
    }
}

fn article_card(article: &Article, site: &SiteSection) -> Markup {
    html! {
        li.article-card {
            a href=(site.href(&article.path())) { (article.title) }
            p.meta {
                time datetime=(article.publish_date.format("%Y-%m-%d")) {
                    (article.publish_date.format("%B %-d, %Y"))
                }
                " · "
                a.category href=(site.href(&category_path(&article.category))) { (article.category) }
            }
            p.excerpt { (article.excerpt) }
        }
    }
}

fn category_path(name: &str) -> String {
    format!("category/{}/", crate::slug::normalize(name))
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page with one section per collection
fn render_index(manifest: &Manifest, categories: &[Category]) -> Markup {
    let site = &manifest.config.site;
    let content = html! {
        main.index-page {
            h1 { (site.title) }
            p.tagline { (site.tagline) }
            @for collection in &manifest.collections {
                @if !collection.articles.is_empty() {
                    section.collection id=(collection.kind.dir_name()) {
                        h2 { (collection.kind.label()) }
                        ol.article-list {
                            @for article in &collection.articles {
                                (article_card(article, site))
                            }
                        }
                    }
                }
            }
            @if !categories.is_empty() {
                section.categories {
                    h2 { "Categories" }
                    ul {
                        @for category in categories {
                            li {
                                a href=(site.href(&category.path())) { (category.name) }
                                " (" (category.article_paths.len()) ")"
                            }
                        }
                    }
                }
            }
        }
    };
    base_document(&site.title, site, content)
}

/// Renders a category listing page
fn render_category_page(category: &Category, manifest: &Manifest) -> Markup {
    let site = &manifest.config.site;
    let articles: Vec<&Article> = manifest
        .articles()
        .filter(|a| category.article_paths.contains(&a.path()))
        .collect();
    let content = html! {
        main.category-page {
            h1 { (category.name) }
            ol.article-list {
                @for article in articles {
                    (article_card(article, site))
                }
            }
        }
    };
    base_document(&category.name, site, content)
}

/// Renders the outline sidebar. Entries are indented by level and carry the
/// heading id the scroll-spy script looks up.
pub fn render_outline(outline: &[OutlineEntry]) -> Markup {
    html! {
        nav.toc aria-label="On this page" {
            p.toc-title { "On this page" }
            ol {
                @for entry in outline {
                    li class={ "toc-level-" (entry.level) } {
                        a href={ "#" (entry.id) } data-toc-id=(entry.id) { (entry.title) }
                    }
                }
            }
        }
    }
}

fn render_share_links(article: &Article, canonical_url: &str) -> Markup {
    let links = share::article_share_links(article, canonical_url);
    html! {
        section.share aria-label="Share this article" {
            h2 { "Share" }
            ul {
                li { a href=(links.twitter) target="_blank" rel="noopener noreferrer" { "Twitter" } }
                li { a href=(links.linkedin) target="_blank" rel="noopener noreferrer" { "LinkedIn" } }
                li { a href=(links.facebook) target="_blank" rel="noopener noreferrer" { "Facebook" } }
                li { a href=(links.email) { "Email" } }
            }
        }
    }
}

fn render_input(field: Field) -> Markup {
    let id = format!("lead-{}", field.key());
    let error_id = format!("{id}-error");
    let minlength = field.min_chars();
    html! {
        div.field data-field=(field.key()) data-min-chars=[minlength] data-message=(field.message()) {
            label for=(id) { (field.label()) }
            @match field {
                Field::Email => {
                    input id=(id) name=(field.key()) type="email" required autocomplete="email"
                        aria-describedby=(error_id) data-pattern=(EMAIL_PATTERN);
                }
                Field::Phone => {
                    input id=(id) name=(field.key()) type="tel" required minlength=[minlength]
                        autocomplete="tel" aria-describedby=(error_id);
                }
                Field::MarketingChallenge => {
                    textarea id=(id) name=(field.key()) required minlength=[minlength] rows="4"
                        aria-describedby=(error_id) {}
                }
                _ => {
                    input id=(id) name=(field.key()) type="text" required minlength=[minlength]
                        aria-describedby=(error_id);
                }
            }
            p.field-error id=(error_id) hidden {}
        }
    }
}

fn step_legend(step: Step) -> Markup {
    html! { legend { "Step " (step.number()) " of " (Step::COUNT) } }
}

/// Renders the lead form.
///
/// `lead-form.js` turns it into the three-step wizard and sends the fields
/// as JSON with `source`, `page` and a timestamp. The success and error
/// panes stay hidden until the endpoint answers.
pub fn render_lead_form(config: &SiteConfig, page: &str) -> Markup {
    html! {
        section.lead-form data-lead-form data-timeout-secs=(config.forms.timeout_secs) {
            h2 { "Get a free marketing audit" }
            form method="post" action=(config.forms.endpoint) novalidate {
                input type="hidden" name="source" value=(config.forms.source);
                input type="hidden" name="page" value=(page);
                @for step in [Step::Contact, Step::Business] {
                    fieldset data-step=(step.number()) {
                        (step_legend(step))
                        @for field in step.fields() {
                            (render_input(*field))
                        }
                        div.step-nav {
                            @if step.previous().is_some() {
                                button type="button" data-action="back" { "Back" }
                            }
                            button type="button" data-action="next" { "Next" }
                        }
                    }
                }
                fieldset data-step=(Step::Review.number()) {
                    (step_legend(Step::Review))
                    dl.lead-review {
                        @for field in Field::ALL {
                            dt { (field.label()) }
                            dd data-review=(field.key()) {}
                        }
                    }
                    div.step-nav {
                        button type="button" data-action="back" { "Back" }
                        button type="submit" { "Send" }
                    }
                }
            }
            div.lead-status.lead-success role="status" data-state="succeeded" hidden {
                p { "Thanks! We received your request and will be in touch within one business day." }
            }
            div.lead-status.lead-error role="alert" data-state="failed" hidden {
                p { (FAILURE_MESSAGE) }
            }
        }
    }
}

/// Renders an article page: header, outline, body, share links, lead form.
pub fn render_article_page(
    article: &Article,
    config: &SiteConfig,
    rendered: &RenderedArticle,
    outline: &[OutlineEntry],
) -> Markup {
    let site = &config.site;
    let page = site.href(&article.path());
    let canonical_url = site.canonical_url(&article.path());
    let content = html! {
        main.article-page {
            article.article
                data-scroll-spy
                data-root-margin=(config.scroll_spy.root_margin()) {
                header.article-header {
                    p.kind { (article.kind.label()) }
                    h1 { (article.title) }
                    p.meta {
                        "By " (article.author) " · "
                        time datetime=(article.publish_date.format("%Y-%m-%d")) {
                            (article.publish_date.format("%B %-d, %Y"))
                        }
                        " · "
                        a.category href=(site.href(&category_path(&article.category))) { (article.category) }
                    }
                    @if !article.tags.is_empty() {
                        ul.tags {
                            @for tag in &article.tags {
                                li { (tag) }
                            }
                        }
                    }
                }
                @if !outline.is_empty() {
                    aside.article-outline {
                        (render_outline(outline))
                    }
                }
                div.article-body {
                    (rendered.markup())
                }
                (render_share_links(article, &canonical_url))
            }
            (render_lead_form(config, &page))
        }
        script src=(site.href("scroll-spy.js")) defer {}
        script src=(site.href("lead-form.js")) defer {}
    };
    base_document(&article.title, site, content)
}

// ============================================================================
// Tests
// ============================================================================
