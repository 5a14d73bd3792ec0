//! Document snapshots built from HTML.
//!
//! [`PageSnapshot`] is an owned, `Send` copy of everything the auditor reads
//! from a page. It is built either field by field or by parsing markup with
//! [`PageSnapshot::from_html`]. Parsing happens once; the parsed tree is
//! dropped before the snapshot is returned, so snapshots can cross task
//! boundaries freely.

use scraper::{ElementRef, Html, Selector};

use crate::audit::{ButtonElement, DocumentSnapshot, ImageElement, LinkElement};
use crate::error::AuditError;

/// Elements whose text is never visible on the page.
const HIDDEN_TEXT_PARENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Owned snapshot of one rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical_href: Option<String>,
    /// Heading counts, index 0 holds `<h1>`.
    pub headings: [usize; 6],
    pub images: Vec<ImageElement>,
    pub links: Vec<LinkElement>,
    pub buttons: Vec<ButtonElement>,
    pub structured_data_blocks: usize,
    pub body_text: String,
}

fn selector(css: &str) -> Result<Selector, AuditError> {
    Selector::parse(css).map_err(|e| AuditError::Selector {
        selector: css.to_owned(),
        reason: format!("{e:?}"),
    })
}

fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn dimension(el: &ElementRef<'_>, attr: &str) -> Option<u32> {
    el.value().attr(attr)?.trim().trim_end_matches("px").parse().ok()
}

impl PageSnapshot {
    /// Parse an HTML document into a snapshot.
    ///
    /// Malformed markup is tolerated the way browsers tolerate it; only
    /// internal selector failures are reported.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Selector`] if a built-in selector fails to parse.
    pub fn from_html(markup: &str) -> Result<Self, AuditError> {
        let document = Html::parse_document(markup);

        let first_text = |css: &str| -> Result<Option<String>, AuditError> {
            Ok(document.select(&selector(css)?).next().map(|el| element_text(&el)))
        };
        let first_attr = |css: &str, attr: &str| -> Result<Option<String>, AuditError> {
            Ok(document
                .select(&selector(css)?)
                .next()
                .and_then(|el| el.value().attr(attr))
                .map(str::to_owned))
        };

        let title = first_text("title")?;
        let meta_description = first_attr("meta[name=\"description\"]", "content")?;
        let canonical_href = first_attr("link[rel=\"canonical\"]", "href")?;

        let mut headings = [0usize; 6];
        for (index, count) in headings.iter_mut().enumerate() {
            *count = document.select(&selector(&format!("h{}", index + 1))?).count();
        }

        let images = document
            .select(&selector("img")?)
            .map(|el| ImageElement {
                src: el.value().attr("src").map(str::to_owned),
                alt: el.value().attr("alt").map(str::to_owned),
                width: dimension(&el, "width"),
                height: dimension(&el, "height"),
            })
            .collect();

        let links = document
            .select(&selector("a")?)
            .map(|el| LinkElement {
                href: el.value().attr("href").map(str::to_owned),
                text: element_text(&el),
            })
            .collect();

        let buttons = document
            .select(&selector("button")?)
            .map(|el| ButtonElement {
                text: element_text(&el),
            })
            .collect();

        let structured_data_blocks = document
            .select(&selector("script[type=\"application/ld+json\"]")?)
            .count();

        let body_text = document
            .select(&selector("body")?)
            .next()
            .map(|body| visible_text(&body))
            .unwrap_or_default();

        Ok(Self {
            title,
            meta_description,
            canonical_href,
            headings,
            images,
            links,
            buttons,
            structured_data_blocks,
            body_text,
        })
    }
}

/// Text under `root`, skipping script-like containers.
fn visible_text(root: &ElementRef<'_>) -> String {
    let chunks: Vec<&str> = root
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent()?;
            let hidden = parent
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_PARENTS.contains(&el.name()));
            (!hidden).then_some(&**text)
        })
        .collect();
    collapse_whitespace(&chunks.join(" "))
}

impl DocumentSnapshot for PageSnapshot {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn meta_description(&self) -> Option<&str> {
        self.meta_description.as_deref()
    }

    fn canonical_href(&self) -> Option<&str> {
        self.canonical_href.as_deref()
    }

    fn heading_count(&self, level: u8) -> usize {
        usize::from(level)
            .checked_sub(1)
            .and_then(|i| self.headings.get(i))
            .copied()
            .unwrap_or(0)
    }

    fn images(&self) -> &[ImageElement] {
        &self.images
    }

    fn links(&self) -> &[LinkElement] {
        &self.links
    }

    fn buttons(&self) -> &[ButtonElement] {
        &self.buttons
    }

    fn structured_data_blocks(&self) -> usize {
        self.structured_data_blocks
    }

    fn body_text(&self) -> &str {
        &self.body_text
    }
}
