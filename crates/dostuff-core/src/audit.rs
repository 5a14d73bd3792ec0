//! SEO and accessibility content auditor.
//!
//! [`scan`] walks a [`DocumentSnapshot`] through a fixed checklist and
//! returns every omission it finds as an [`AuditFinding`]. The scan has no
//! side effects and reads nothing but the snapshot, so scanning the same
//! snapshot twice yields equal results. Missing elements never abort a scan;
//! a check either produces findings or stays silent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Titles outside this character range are reported.
pub const TITLE_LENGTH: std::ops::RangeInclusive<usize> = 10..=60;
/// Meta descriptions outside this character range are reported.
pub const DESCRIPTION_LENGTH: std::ops::RangeInclusive<usize> = 50..=160;
/// Images wider than this are considered oversized.
pub const MAX_IMAGE_WIDTH: u32 = 1920;
/// Images taller than this are considered oversized.
pub const MAX_IMAGE_HEIGHT: u32 = 1080;

pub const CATEGORY_META: &str = "Meta Tags";
pub const CATEGORY_HEADINGS: &str = "Heading Structure";
pub const CATEGORY_IMAGES: &str = "Image Optimization";
pub const CATEGORY_LINKS: &str = "Links";
pub const CATEGORY_PERFORMANCE: &str = "Performance";
pub const CATEGORY_ACCESSIBILITY: &str = "Accessibility";
pub const CATEGORY_STRUCTURED_DATA: &str = "Structured Data";

/// Severity of a finding, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Points deducted from the SEO score per finding of this severity.
    #[must_use]
    pub const fn penalty(self) -> i64 {
        match self {
            Self::Info => 1,
            Self::Warning => 5,
            Self::Error => 10,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(AuditError::UnknownSeverity { name: s.to_owned() }),
        }
    }
}

/// One reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub severity: Severity,
    pub message: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl AuditFinding {
    fn new(severity: Severity, category: &str, message: impl Into<String>, fix: &str) -> Self {
        Self {
            severity,
            message: message.into(),
            category: category.to_owned(),
            fix: Some(fix.to_owned()),
        }
    }
}

/// An `<img>` element as seen by the auditor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageElement {
    pub src: Option<String>,
    pub alt: Option<String>,
    /// Intrinsic pixel width, when known.
    pub width: Option<u32>,
    /// Intrinsic pixel height, when known.
    pub height: Option<u32>,
}

impl ImageElement {
    fn is_oversized(&self) -> bool {
        self.width.is_some_and(|w| w > MAX_IMAGE_WIDTH)
            || self.height.is_some_and(|h| h > MAX_IMAGE_HEIGHT)
    }

    /// Whether `src` loads over http(s) once resolved against the page.
    /// Relative and protocol-relative references do; `data:`, `blob:` and
    /// other schemes do not.
    fn is_web_source(src: &str) -> bool {
        let src = src.trim();
        let scheme = src
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .filter(|scheme| {
                scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            });
        scheme.is_none_or(|scheme| {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        })
    }

    fn uses_modern_format(src: &str) -> bool {
        let src = src.to_ascii_lowercase();
        src.contains(".webp") || src.contains(".avif")
    }
}

/// An `<a>` element as seen by the auditor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkElement {
    pub href: Option<String>,
    /// Visible text content.
    pub text: String,
}

/// A `<button>` element as seen by the auditor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonElement {
    pub text: String,
}

/// Read-only view of a rendered document.
///
/// The auditor never touches a live page; callers hand it something that
/// implements this trait. [`PageSnapshot`](crate::html::PageSnapshot) is the
/// owned implementation used by the server and CLI.
pub trait DocumentSnapshot {
    /// Text of the `<title>` element.
    fn title(&self) -> Option<&str>;

    /// `content` of `<meta name="description">`.
    fn meta_description(&self) -> Option<&str>;

    /// `href` of `<link rel="canonical">`.
    fn canonical_href(&self) -> Option<&str>;

    /// Number of headings at `level` (1 for `<h1>`, 2 for `<h2>`, ...).
    fn heading_count(&self, level: u8) -> usize;

    fn images(&self) -> &[ImageElement];

    fn links(&self) -> &[LinkElement];

    fn buttons(&self) -> &[ButtonElement];

    /// Number of `<script type="application/ld+json">` blocks.
    fn structured_data_blocks(&self) -> usize;

    /// Visible text of the document body.
    fn body_text(&self) -> &str;
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Run the full checklist against `doc`.
#[must_use]
pub fn scan(doc: &dyn DocumentSnapshot) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    check_meta_tags(doc, &mut findings);
    check_headings(doc, &mut findings);
    check_images(doc, &mut findings);
    check_links(doc, &mut findings);
    check_image_sizes(doc, &mut findings);
    check_buttons(doc, &mut findings);
    check_structured_data(doc, &mut findings);
    tracing::debug!(findings = findings.len(), "content scan complete");
    findings
}

fn check_meta_tags(doc: &dyn DocumentSnapshot, findings: &mut Vec<AuditFinding>) {
    let title_ok = doc
        .title()
        .map(|t| t.trim().chars().count())
        .is_some_and(|len| TITLE_LENGTH.contains(&len));
    if !title_ok {
        findings.push(AuditFinding::new(
            Severity::Error,
            CATEGORY_META,
            "Page title should be between 10-60 characters",
            "Update the <title> element of the page",
        ));
    }

    let description_ok = doc
        .meta_description()
        .map(|d| d.trim().chars().count())
        .is_some_and(|len| DESCRIPTION_LENGTH.contains(&len));
    if !description_ok {
        findings.push(AuditFinding::new(
            Severity::Warning,
            CATEGORY_META,
            "Meta description should be between 50-160 characters",
            "Update the meta description of the page",
        ));
    }

    if is_blank(doc.canonical_href()) {
        findings.push(AuditFinding::new(
            Severity::Warning,
            CATEGORY_META,
            "Canonical URL is missing",
            "Add a <link rel=\"canonical\"> element",
        ));
    }
}

fn check_headings(doc: &dyn DocumentSnapshot, findings: &mut Vec<AuditFinding>) {
    if doc.heading_count(1) == 0 {
        findings.push(AuditFinding::new(
            Severity::Error,
            CATEGORY_HEADINGS,
            "No H1 heading found",
            "Add an H1 heading to the main content",
        ));
    }
    if doc.heading_count(2) == 0 {
        findings.push(AuditFinding::new(
            Severity::Warning,
            CATEGORY_HEADINGS,
            "No H2 headings found",
            "Add H2 headings to organize content",
        ));
    }
}

fn check_images(doc: &dyn DocumentSnapshot, findings: &mut Vec<AuditFinding>) {
    for (index, image) in doc.images().iter().enumerate() {
        let number = index + 1;
        if is_blank(image.alt.as_deref()) {
            findings.push(AuditFinding::new(
                Severity::Error,
                CATEGORY_IMAGES,
                format!("Image {number} is missing alt text"),
                "Add descriptive alt text to all images",
            ));
        }
        if let Some(src) = image.src.as_deref().filter(|s| !s.trim().is_empty()) {
            if ImageElement::is_web_source(src) && !ImageElement::uses_modern_format(src) {
                findings.push(AuditFinding::new(
                    Severity::Info,
                    CATEGORY_IMAGES,
                    format!("Image {number} could be optimized with WebP format"),
                    "Convert images to WebP or AVIF for better performance",
                ));
            }
        }
    }
}

fn check_links(doc: &dyn DocumentSnapshot, findings: &mut Vec<AuditFinding>) {
    for (index, link) in doc.links().iter().enumerate() {
        let number = index + 1;
        if is_blank(link.href.as_deref()) {
            findings.push(AuditFinding::new(
                Severity::Warning,
                CATEGORY_LINKS,
                format!("Link {number} has no href attribute"),
                "Add an href attribute to all links",
            ));
        }
        if link.text.trim().is_empty() {
            findings.push(AuditFinding::new(
                Severity::Warning,
                CATEGORY_LINKS,
                format!("Link {number} has no text content"),
                "Add descriptive text to all links",
            ));
        }
    }
}

fn check_image_sizes(doc: &dyn DocumentSnapshot, findings: &mut Vec<AuditFinding>) {
    let oversized = doc.images().iter().filter(|img| img.is_oversized()).count();
    if oversized > 0 {
        findings.push(AuditFinding::new(
            Severity::Warning,
            CATEGORY_PERFORMANCE,
            format!("{oversized} large images detected"),
            "Resize images for web display",
        ));
    }
}

fn check_buttons(doc: &dyn DocumentSnapshot, findings: &mut Vec<AuditFinding>) {
    for (index, button) in doc.buttons().iter().enumerate() {
        if button.text.trim().is_empty() {
            findings.push(AuditFinding::new(
                Severity::Error,
                CATEGORY_ACCESSIBILITY,
                format!("Button {} has no text content", index + 1),
                "Add descriptive text to all buttons",
            ));
        }
    }
}

fn check_structured_data(doc: &dyn DocumentSnapshot, findings: &mut Vec<AuditFinding>) {
    if doc.structured_data_blocks() == 0 {
        findings.push(AuditFinding::new(
            Severity::Warning,
            CATEGORY_STRUCTURED_DATA,
            "No structured data found",
            "Add JSON-LD structured data for better SEO",
        ));
    }
}

/// Keep the findings at or above `min`.
///
/// `Error` keeps errors only, `Warning` keeps errors and warnings, `Info`
/// keeps everything.
#[must_use]
pub fn filter_findings(findings: &[AuditFinding], min: Severity) -> Vec<AuditFinding> {
    findings
        .iter()
        .filter(|f| f.severity >= min)
        .cloned()
        .collect()
}

/// Score a set of findings: 100 minus 10 per error, 5 per warning and 1 per
/// info, clamped to `0..=100`.
#[must_use]
pub fn calculate_seo_score(findings: &[AuditFinding]) -> u8 {
    let penalty: i64 = findings.iter().map(|f| f.severity.penalty()).sum();
    let score = (100 - penalty).clamp(0, 100);
    u8::try_from(score).unwrap_or(0)
}

/// Finding totals per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl SeverityCounts {
    #[must_use]
    pub fn tally(findings: &[AuditFinding]) -> Self {
        findings.iter().fold(Self::default(), |mut acc, f| {
            match f.severity {
                Severity::Error => acc.errors += 1,
                Severity::Warning => acc.warnings += 1,
                Severity::Info => acc.info += 1,
            }
            acc
        })
    }
}

/// A scan packaged for display: score and counts cover every finding, the
/// finding list is restricted to `level`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub score: u8,
    pub level: Severity,
    pub counts: SeverityCounts,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    /// Scan `doc` and keep the findings at or above `level`.
    #[must_use]
    pub fn build(doc: &dyn DocumentSnapshot, level: Severity) -> Self {
        Self::from_findings(&scan(doc), level)
    }

    #[must_use]
    pub fn from_findings(findings: &[AuditFinding], level: Severity) -> Self {
        Self {
            score: calculate_seo_score(findings),
            level,
            counts: SeverityCounts::tally(findings),
            findings: filter_findings(findings, level),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::html::PageSnapshot;

    fn finding(severity: Severity) -> AuditFinding {
        AuditFinding {
            severity,
            message: "m".to_owned(),
            category: "c".to_owned(),
            fix: None,
        }
    }

    fn clean_page() -> PageSnapshot {
        PageSnapshot {
            title: Some("Do Stuff - Online Exam Platform".to_owned()),
            meta_description: Some(
                "Create engaging online exams and quizzes with a professional quiz builder for teachers."
                    .to_owned(),
            ),
            canonical_href: Some("https://dostuff.com/".to_owned()),
            headings: [1, 3, 0, 0, 0, 0],
            images: vec![ImageElement {
                src: Some("/assets/logo.webp".to_owned()),
                alt: Some("Do Stuff logo".to_owned()),
                width: Some(64),
                height: Some(64),
            }],
            links: vec![LinkElement {
                href: Some("/pricing".to_owned()),
                text: "Pricing".to_owned(),
            }],
            buttons: vec![ButtonElement {
                text: "Notify Me".to_owned(),
            }],
            structured_data_blocks: 2,
            body_text: "Create exams.".to_owned(),
        }
    }

    #[test]
    fn clean_document_has_no_findings() {
        assert!(scan(&clean_page()).is_empty());
    }

    #[test]
    fn image_without_alt_is_one_error_with_its_index() {
        let mut page = clean_page();
        page.images.push(ImageElement {
            src: Some("/assets/hero.avif".to_owned()),
            alt: None,
            width: None,
            height: None,
        });

        let findings = scan(&page);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].category, CATEGORY_IMAGES);
        assert_eq!(findings[0].message, "Image 2 is missing alt text");
    }

    #[test]
    fn short_title_is_meta_error() {
        let mut page = clean_page();
        page.title = Some("Short".to_owned());

        let findings = scan(&page);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].category, CATEGORY_META);
    }

    #[test]
    fn long_description_is_meta_warning() {
        let mut page = clean_page();
        page.meta_description = Some("x".repeat(200));

        let findings = scan(&page);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].category, CATEGORY_META);
        assert!(findings[0].message.contains("50-160"));
    }

    #[test]
    fn empty_document_reports_every_document_level_check() {
        let findings = scan(&PageSnapshot::default());
        let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Page title should be between 10-60 characters",
                "Meta description should be between 50-160 characters",
                "Canonical URL is missing",
                "No H1 heading found",
                "No H2 headings found",
                "No structured data found",
            ]
        );
    }

    #[test]
    fn legacy_image_format_is_info() {
        let mut page = clean_page();
        page.images[0].src = Some("https://cdn.dostuff.com/hero.PNG".to_owned());

        let findings = scan(&page);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].message, "Image 1 could be optimized with WebP format");
    }

    #[test]
    fn format_hint_only_applies_to_web_sources() {
        let mut page = clean_page();
        for src in [
            "data:image/png;base64,iVBORw0KGgo=",
            "blob:https://dostuff.com/4f1c",
            "DATA:image/gif;base64,R0lGOD",
        ] {
            page.images[0].src = Some(src.to_owned());
            assert!(scan(&page).is_empty(), "{src}");
        }
        for src in ["/hero.png", "//cdn.dostuff.com/hero.jpg", "HTTP://dostuff.com/a.png", "img/a:b.png"] {
            page.images[0].src = Some(src.to_owned());
            assert_eq!(scan(&page).len(), 1, "{src}");
        }
    }

    #[test]
    fn title_and_description_length_bounds_are_inclusive() {
        let cases = [
            (9, 51, false, true),
            (10, 50, true, true),
            (60, 160, true, true),
            (61, 161, false, false),
            (10, 49, true, false),
        ];
        for (title_len, description_len, title_ok, description_ok) in cases {
            let mut page = clean_page();
            // Surrounding whitespace is not counted.
            page.title = Some(format!("  {}  ", "t".repeat(title_len)));
            page.meta_description = Some("d".repeat(description_len));
            let messages: Vec<String> = scan(&page).into_iter().map(|f| f.message).collect();

            assert_eq!(
                !messages.iter().any(|m| m.starts_with("Page title")),
                title_ok,
                "title length {title_len}"
            );
            assert_eq!(
                !messages.iter().any(|m| m.starts_with("Meta description")),
                description_ok,
                "description length {description_len}"
            );
        }
    }

    #[test]
    fn oversized_images_are_aggregated() {
        let mut page = clean_page();
        for _ in 0..3 {
            page.images.push(ImageElement {
                src: Some("/big.webp".to_owned()),
                alt: Some("big".to_owned()),
                width: Some(4000),
                height: Some(800),
            });
        }

        let findings = scan(&page);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, CATEGORY_PERFORMANCE);
        assert_eq!(findings[0].message, "3 large images detected");
    }

    #[test]
    fn links_and_buttons_without_text() {
        let mut page = clean_page();
        page.links.push(LinkElement {
            href: None,
            text: "   ".to_owned(),
        });
        page.buttons.push(ButtonElement {
            text: String::new(),
        });

        let findings = scan(&page);
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].message, "Link 2 has no href attribute");
        assert_eq!(findings[1].message, "Link 2 has no text content");
        assert_eq!(findings[2].severity, Severity::Error);
        assert_eq!(findings[2].category, CATEGORY_ACCESSIBILITY);
    }

    #[test]
    fn repeated_scans_are_equal() {
        let mut page = clean_page();
        page.title = None;
        page.images[0].alt = None;
        assert_eq!(scan(&page), scan(&page));
    }

    #[test]
    fn score_of_nothing_is_perfect() {
        assert_eq!(calculate_seo_score(&[]), 100);
    }

    #[test]
    fn score_deducts_per_severity() {
        let findings = [
            finding(Severity::Error),
            finding(Severity::Warning),
            finding(Severity::Info),
        ];
        assert_eq!(calculate_seo_score(&findings), 84);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let findings = vec![finding(Severity::Error); 25];
        assert_eq!(calculate_seo_score(&findings), 0);
    }

    #[test]
    fn filter_levels() {
        let findings = [
            finding(Severity::Error),
            finding(Severity::Warning),
            finding(Severity::Info),
        ];
        assert_eq!(filter_findings(&findings, Severity::Error).len(), 1);
        assert_eq!(filter_findings(&findings, Severity::Warning).len(), 2);
        assert_eq!(filter_findings(&findings, Severity::Info).len(), 3);
    }

    #[test]
    fn report_scores_everything_but_lists_filtered() {
        let findings = [finding(Severity::Warning), finding(Severity::Info)];
        let report = AuditReport::from_findings(&findings, Severity::Error);
        assert_eq!(report.score, 94);
        assert!(report.findings.is_empty());
        assert_eq!(report.counts.info, 1);
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("WARNING".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn finding_serializes_without_empty_fix() {
        let json = serde_json::to_value(finding(Severity::Info)).unwrap();
        assert_eq!(json["severity"], "info");
        assert!(json.get("fix").is_none());
    }
}
