//! Scroll-spy: which outline entry is "active" while a reader scrolls.
//!
//! The controller watches the heading elements of one article through a
//! [`Viewport`] and keeps a single piece of state, the active section:
//!
//! ```text
//!              heading X enters the band
//!   None ──────────────────────────────────▶ Section(X)
//!                                             │   ▲
//!                                             └───┘ heading Y enters the band,
//!                                                   or the reader clicks Y
//! ```
//!
//! There is no terminal state; the controller lives as long as the article
//! view that owns it.
//!
//! ## Trigger Band
//!
//! A heading becomes active when it starts intersecting the band between 20%
//! and 80% of the viewport height ([`TriggerBand::default`]). Only the
//! transition into the band counts. When several headings enter in the same
//! callback, the last one reported wins.
//!
//! ## Observation Lifetime
//!
//! Observed elements are registered with the viewport in [`ScrollSpy::attach`]
//! and unregistered when the outline is replaced, on [`ScrollSpy::detach`],
//! and when the controller is dropped. Dropping covers every exit path,
//! early returns and panics included.
//!
//! The generated site ships `scroll-spy.js`, which implements the same rules
//! with the browser's `IntersectionObserver` using
//! [`TriggerBand::root_margin`].

use crate::types::OutlineEntry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Vertical band of the viewport, as fractions of its height from the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriggerBand {
    #[serde(rename = "band_top")]
    pub top: f64,
    #[serde(rename = "band_bottom")]
    pub bottom: f64,
}

impl Default for TriggerBand {
    fn default() -> Self {
        Self {
            top: 0.2,
            bottom: 0.8,
        }
    }
}

/// `0.2` → `20`, `1.0 - 0.8` → `20` (not `19.999999999999996`).
fn percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

impl TriggerBand {
    /// Band edges in viewport pixels.
    pub fn edges(&self, viewport_height: f64) -> (f64, f64) {
        (self.top * viewport_height, self.bottom * viewport_height)
    }

    /// Whether an element overlaps the band.
    pub fn intersects(&self, element: Bounds, viewport_height: f64) -> bool {
        let (band_top, band_bottom) = self.edges(viewport_height);
        element.top < band_bottom && element.bottom > band_top
    }

    /// The band as an `IntersectionObserver` `rootMargin`.
    pub fn root_margin(&self) -> String {
        format!(
            "-{}% 0px -{}% 0px",
            percent(self.top),
            percent(1.0 - self.bottom)
        )
    }
}

/// An element's vertical extent relative to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
}

/// The document an article is displayed in.
pub trait Viewport {
    /// Visible height in pixels.
    fn height(&self) -> f64;

    /// Current bounds of the element with `id`, if it exists.
    fn bounds_of(&self, id: &str) -> Option<Bounds>;

    /// Start watching the element with `id`. Returns false if it is missing.
    fn observe(&mut self, id: &str) -> bool {
        self.bounds_of(id).is_some()
    }

    /// Stop watching the element with `id` and drop any reference to it.
    fn unobserve(&mut self, _id: &str) {}

    /// Smoothly scroll the element's top to the top of the viewport.
    /// Returns false, without scrolling, if the element is missing.
    fn scroll_to(&mut self, id: &str) -> bool;
}

impl<V: Viewport + ?Sized> Viewport for &mut V {
    fn height(&self) -> f64 {
        (**self).height()
    }

    fn bounds_of(&self, id: &str) -> Option<Bounds> {
        (**self).bounds_of(id)
    }

    fn observe(&mut self, id: &str) -> bool {
        (**self).observe(id)
    }

    fn unobserve(&mut self, id: &str) {
        (**self).unobserve(id)
    }

    fn scroll_to(&mut self, id: &str) -> bool {
        (**self).scroll_to(id)
    }
}

/// The active-section state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    None,
    Section(String),
}

/// One intersection change, as an observer callback would report it.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionRecord {
    pub id: String,
    pub is_intersecting: bool,
}

#[derive(Debug)]
struct Target {
    id: String,
    /// `None` until the first callback, which reports every target.
    intersecting: Option<bool>,
}

/// Scroll-spy controller for one article view.
pub struct ScrollSpy<V: Viewport> {
    viewport: V,
    band: TriggerBand,
    targets: Vec<Target>,
    active: ActiveSection,
}

impl<V: Viewport> ScrollSpy<V> {
    pub fn new(viewport: V, band: TriggerBand) -> Self {
        Self {
            viewport,
            band,
            targets: Vec::new(),
            active: ActiveSection::None,
        }
    }

    /// Observe the headings of `outline`, releasing anything observed before.
    ///
    /// A new outline means a new article, so the active section resets.
    /// Entries that share an id share one element and are observed once;
    /// entries whose element is missing are skipped.
    pub fn attach(&mut self, outline: &[OutlineEntry]) {
        self.detach();
        for entry in outline {
            if self.targets.iter().any(|t| t.id == entry.id) {
                continue;
            }
            if self.viewport.observe(&entry.id) {
                self.targets.push(Target {
                    id: entry.id.clone(),
                    intersecting: None,
                });
            }
        }
        self.active = ActiveSection::None;
        debug!(observed = self.targets.len(), "scroll-spy attached");
    }

    /// Release every observed element.
    pub fn detach(&mut self) {
        if self.targets.is_empty() {
            return;
        }
        for target in self.targets.drain(..) {
            self.viewport.unobserve(&target.id);
        }
        debug!("scroll-spy detached");
    }

    pub fn is_observing(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn observed_ids(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.id.as_str())
    }

    pub fn active(&self) -> &ActiveSection {
        &self.active
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.active {
            ActiveSection::None => None,
            ActiveSection::Section(id) => Some(id.as_str()),
        }
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// Intersection changes since the last call, in outline order.
    ///
    /// Targets whose element has disappeared are reported as not
    /// intersecting.
    pub fn take_records(&mut self) -> Vec<IntersectionRecord> {
        let height = self.viewport.height();
        let mut records = Vec::new();
        for target in &mut self.targets {
            let now = self
                .viewport
                .bounds_of(&target.id)
                .is_some_and(|b| self.band.intersects(b, height));
            if target.intersecting != Some(now) {
                target.intersecting = Some(now);
                records.push(IntersectionRecord {
                    id: target.id.clone(),
                    is_intersecting: now,
                });
            }
        }
        records
    }

    /// Run one observer callback: every heading that entered the band sets
    /// the active section, the last one winning. Returns the active id.
    pub fn on_intersection(&mut self) -> Option<&str> {
        for record in self.take_records() {
            if record.is_intersecting {
                self.active = ActiveSection::Section(record.id);
            }
        }
        self.active_id()
    }

    /// Outline click: scroll to the heading and make it active right away.
    ///
    /// A missing heading is a no-op and returns false.
    pub fn scroll_to(&mut self, id: &str) -> bool {
        if !self.viewport.scroll_to(id) {
            debug!(id, "scroll target missing");
            return false;
        }
        self.active = ActiveSection::Section(id.to_string());
        true
    }
}

impl<V: Viewport> Drop for ScrollSpy<V> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// A scrolling page of stacked elements.
    struct Page {
        height: f64,
        scroll_y: f64,
        /// (id, document top, element height)
        elements: Vec<(String, f64, f64)>,
        observed: BTreeSet<String>,
        scrolls: Vec<String>,
    }

    impl Page {
        fn new(elements: &[(&str, f64)]) -> Self {
            Self {
                height: 1000.0,
                scroll_y: 0.0,
                elements: elements
                    .iter()
                    .map(|(id, top)| (id.to_string(), *top, 40.0))
                    .collect(),
                observed: BTreeSet::new(),
                scrolls: Vec::new(),
            }
        }

        fn scroll(&mut self, y: f64) {
            self.scroll_y = y;
        }
    }

    impl Viewport for Page {
        fn height(&self) -> f64 {
            self.height
        }

        fn bounds_of(&self, id: &str) -> Option<Bounds> {
            self.elements
                .iter()
                .find(|(el, _, _)| el == id)
                .map(|(_, top, h)| Bounds {
                    top: top - self.scroll_y,
                    bottom: top + h - self.scroll_y,
                })
        }

        fn observe(&mut self, id: &str) -> bool {
            if self.bounds_of(id).is_none() {
                return false;
            }
            self.observed.insert(id.to_string());
            true
        }

        fn unobserve(&mut self, id: &str) {
            self.observed.remove(id);
        }

        fn scroll_to(&mut self, id: &str) -> bool {
            let Some(top) = self.elements.iter().find(|(el, _, _)| el == id).map(|e| e.1)
            else {
                return false;
            };
            self.scroll_y = top;
            self.scrolls.push(id.to_string());
            true
        }
    }

    fn entry(id: &str, level: u8) -> OutlineEntry {
        OutlineEntry {
            id: id.to_string(),
            title: id.to_string(),
            level,
        }
    }

    fn outline() -> Vec<OutlineEntry> {
        vec![entry("a", 2), entry("b", 2), entry("c", 2)]
    }

    #[test]
    fn default_band_is_middle_sixty_percent() {
        let band = TriggerBand::default();
        assert_eq!(band.edges(1000.0), (200.0, 800.0));
        assert_eq!(band.root_margin(), "-20% 0px -20% 0px");
    }

    #[test]
    fn custom_band_root_margin() {
        let band = TriggerBand {
            top: 0.1,
            bottom: 0.5,
        };
        assert_eq!(band.root_margin(), "-10% 0px -50% 0px");
    }

    #[test]
    fn band_edges_are_exclusive() {
        let band = TriggerBand::default();
        let touching_top = Bounds {
            top: 150.0,
            bottom: 200.0,
        };
        let overlapping = Bounds {
            top: 150.0,
            bottom: 201.0,
        };
        assert!(!band.intersects(touching_top, 1000.0));
        assert!(band.intersects(overlapping, 1000.0));
    }

    #[test]
    fn starts_with_no_active_section() {
        let mut page = Page::new(&[("a", 0.0)]);
        let spy = ScrollSpy::new(&mut page, TriggerBand::default());
        assert_eq!(spy.active(), &ActiveSection::None);
        assert_eq!(spy.active_id(), None);
    }

    #[test]
    fn heading_in_middle_band_becomes_active() {
        // A above the viewport, B in the middle, C below the fold.
        let mut page = Page::new(&[("a", 100.0), ("b", 1000.0), ("c", 2000.0)]);
        page.scroll(500.0);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&outline());

        assert_eq!(spy.on_intersection(), Some("b"));
    }

    #[test]
    fn last_reported_entry_wins() {
        let mut page = Page::new(&[("a", 300.0), ("b", 500.0), ("c", 2000.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&outline());

        assert_eq!(spy.on_intersection(), Some("b"));
    }

    #[test]
    fn only_transitions_change_state() {
        let mut page = Page::new(&[("a", 500.0), ("b", 3000.0), ("c", 6000.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&outline());
        assert_eq!(spy.on_intersection(), Some("a"));

        // A stays in the band; a click on C moves the highlight.
        assert!(spy.scroll_to("c"));
        assert_eq!(spy.active_id(), Some("c"));

        // C is now at the top edge (outside the band); A scrolled away.
        let records = spy.take_records();
        assert_eq!(
            records,
            vec![IntersectionRecord {
                id: "a".to_string(),
                is_intersecting: false,
            }]
        );
        assert_eq!(spy.on_intersection(), Some("c"));
    }

    #[test]
    fn leaving_the_band_keeps_last_active() {
        let mut page = Page::new(&[("a", 500.0), ("b", 5000.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&[entry("a", 1), entry("b", 2)]);
        assert_eq!(spy.on_intersection(), Some("a"));

        // Nothing in the band any more: the highlight stays on A.
        spy.viewport_mut().scroll(2000.0);
        assert_eq!(spy.on_intersection(), Some("a"));
    }

    #[test]
    fn click_sets_active_before_observer() {
        let mut page = Page::new(&[("a", 0.0), ("b", 1500.0), ("c", 3000.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&outline());

        assert!(spy.scroll_to("b"));
        assert_eq!(spy.active_id(), Some("b"));
        assert_eq!(spy.viewport().scrolls, vec!["b".to_string()]);
    }

    #[test]
    fn click_on_missing_target_is_noop() {
        let mut page = Page::new(&[("a", 500.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&[entry("a", 1), entry("gone", 2)]);
        spy.on_intersection();

        assert!(!spy.scroll_to("gone"));
        assert_eq!(spy.active_id(), Some("a"));
        assert!(spy.viewport().scrolls.is_empty());
    }

    #[test]
    fn missing_elements_not_observed() {
        let mut page = Page::new(&[("a", 0.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&[entry("a", 1), entry("missing", 2)]);
        assert_eq!(spy.observed_ids().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn duplicate_ids_observed_once() {
        let mut page = Page::new(&[("overview", 500.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&[entry("overview", 1), entry("overview", 2)]);
        assert_eq!(spy.observed_ids().count(), 1);
    }

    #[test]
    fn reattach_releases_previous_outline() {
        let mut page = Page::new(&[("a", 500.0), ("b", 1500.0), ("x", 2500.0)]);
        {
            let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
            spy.attach(&[entry("a", 1), entry("b", 2)]);
            spy.on_intersection();
            assert_eq!(spy.active_id(), Some("a"));

            spy.attach(&[entry("x", 1)]);
            assert_eq!(spy.active_id(), None);
            assert_eq!(spy.observed_ids().collect::<Vec<_>>(), vec!["x"]);
            let observed: Vec<&str> = spy.viewport().observed.iter().map(String::as_str).collect();
            assert_eq!(observed, vec!["x"]);
        }
    }

    #[test]
    fn detach_releases_everything() {
        let mut page = Page::new(&[("a", 0.0), ("b", 100.0)]);
        let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
        spy.attach(&outline());
        spy.detach();
        assert!(!spy.is_observing());
        assert!(spy.viewport().observed.is_empty());
    }

    #[test]
    fn drop_releases_observed_elements() {
        let mut page = Page::new(&[("a", 0.0), ("b", 100.0), ("c", 200.0)]);
        {
            let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
            spy.attach(&outline());
        }
        assert!(page.observed.is_empty());
    }

    #[test]
    fn drop_releases_on_panic() {
        let mut page = Page::new(&[("a", 0.0)]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut spy = ScrollSpy::new(&mut page, TriggerBand::default());
            spy.attach(&[entry("a", 1)]);
            panic!("view torn down");
        }));
        assert!(result.is_err());
        assert!(page.observed.is_empty());
    }

    #[test]
    fn two_views_are_independent() {
        let mut first = Page::new(&[("a", 500.0)]);
        let mut second = Page::new(&[("b", 500.0)]);
        let mut spy_one = ScrollSpy::new(&mut first, TriggerBand::default());
        let mut spy_two = ScrollSpy::new(&mut second, TriggerBand::default());
        spy_one.attach(&[entry("a", 1)]);
        spy_two.attach(&[entry("b", 1)]);

        assert_eq!(spy_one.on_intersection(), Some("a"));
        assert_eq!(spy_two.active_id(), None);
    }
}
