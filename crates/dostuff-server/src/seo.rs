//! SEO metadata for rendered pages.
//!
//! Per-view titles and descriptions, Open Graph and Twitter tags, and the
//! JSON-LD structured data blocks emitted into every page head.

use serde_json::{Value, json};

use dostuff_core::view::ViewState;

use crate::pages::escape_html;

/// Title and description of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub title: &'static str,
    pub description: &'static str,
    /// Human name used in the breadcrumb trail.
    pub breadcrumb: &'static str,
}

#[must_use]
pub const fn page_meta(view: ViewState) -> PageMeta {
    match view {
        ViewState::Home => PageMeta {
            title: "Do Stuff - Online Exam Platform and Quiz Builder",
            description: "Create engaging online exams and quizzes in minutes. Do Stuff is the quiz builder teachers use to make tests, share links and track results.",
            breadcrumb: "Home",
        },
        ViewState::Download => PageMeta {
            title: "Download Do Stuff - Online Assessment App",
            description: "Get the Do Stuff exam app for phones, tablets and desktops. Join the launch list and be the first to build online assessments on the go.",
            breadcrumb: "Download",
        },
        ViewState::HowItWorks => PageMeta {
            title: "How to Make an Online Quiz - Do Stuff",
            description: "Learn how to make an online quiz with Do Stuff: create an account, add questions, share the exam link and analyze student results.",
            breadcrumb: "How it Works",
        },
        ViewState::Pricing => PageMeta {
            title: "Pricing - Do Stuff Online Exam Platform",
            description: "Start free with up to 3 exams or upgrade to Pro Teacher for unlimited exams, students, question types and advanced analytics.",
            breadcrumb: "Pricing",
        },
        ViewState::Privacy => PageMeta {
            title: "Privacy Policy - Do Stuff Data Protection",
            description: "How Do Stuff collects, uses and protects your personal data when you create exams, take quizzes or contact our team.",
            breadcrumb: "Privacy Policy",
        },
        ViewState::Terms => PageMeta {
            title: "Terms of Service - Do Stuff User Agreement",
            description: "The terms and conditions that govern your use of the Do Stuff online exam platform, quiz builder and related services.",
            breadcrumb: "Terms of Service",
        },
        ViewState::Support => PageMeta {
            title: "Support Center - Do Stuff Help and Docs",
            description: "Find answers about creating exams, sharing quizzes and reading results in the Do Stuff knowledge base, or contact our support team.",
            breadcrumb: "Support",
        },
        ViewState::Contact => PageMeta {
            title: "Contact Us - Do Stuff Online Exam Platform",
            description: "Questions, partnerships or feedback? Contact the Do Stuff team by email and we will get back to you within two business days.",
            breadcrumb: "Contact",
        },
    }
}

/// Frequently asked questions, shared by the FAQ schema and the support page.
pub const FAQ: [(&str, &str); 4] = [
    (
        "How do I create an online exam?",
        "Sign up, choose your question types, add your questions, and share the exam link with your students.",
    ),
    (
        "Can I make a test for free?",
        "Yes. The free plan lets you create and share up to three exams with the basic question types.",
    ),
    (
        "What question types are available?",
        "Multiple choice, fill in the blank, translation, true or false, matching, and reading comprehension.",
    ),
    (
        "Is Do Stuff suitable for schools?",
        "Yes. Do Stuff is built for teachers, schools and institutions, with features for classroom use and student management.",
    ),
];

/// JSON-LD documents for `view`, in emission order.
#[must_use]
pub fn structured_data(view: ViewState, base_url: &str) -> Vec<Value> {
    let meta = page_meta(view);
    let page_url = format!("{base_url}{}", view.path());

    let mut blocks = vec![
        json!({
            "@context": "https://schema.org",
            "@type": "Organization",
            "name": "Do Stuff",
            "description": "The online exam platform and quiz builder for teachers and students",
            "url": base_url,
            "logo": format!("{base_url}/assets/logo.webp"),
            "contactPoint": {
                "@type": "ContactPoint",
                "contactType": "Customer Support",
                "email": "support@dostuff.com",
                "availableLanguage": ["English", "Arabic"]
            }
        }),
        json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": "Do Stuff - Online Exam Platform",
            "url": base_url
        }),
        json!({
            "@context": "https://schema.org",
            "@type": "SoftwareApplication",
            "name": "Do Stuff Exam Platform",
            "applicationCategory": "EducationalApplication",
            "operatingSystem": "Any",
            "url": base_url,
            "offers": {
                "@type": "Offer",
                "price": "0",
                "priceCurrency": "USD",
                "url": format!("{base_url}/pricing")
            },
            "featureList": [
                "Multiple Choice Questions",
                "Fill in the Blank",
                "Translation Exercises",
                "True or False",
                "Matching Questions",
                "Reading Comprehension",
                "Timer Control",
                "Custom Styling",
                "Easy Sharing",
                "Analytics Dashboard"
            ]
        }),
        json!({
            "@context": "https://schema.org",
            "@type": "BreadcrumbList",
            "itemListElement": [
                { "@type": "ListItem", "position": 1, "name": "Home", "item": format!("{base_url}/") },
                { "@type": "ListItem", "position": 2, "name": meta.breadcrumb, "item": page_url }
            ]
        }),
        json!({
            "@context": "https://schema.org",
            "@type": "Review",
            "itemReviewed": {
                "@type": "SoftwareApplication",
                "name": "Do Stuff Exam Platform",
                "applicationCategory": "EducationalApplication"
            },
            "reviewRating": { "@type": "Rating", "ratingValue": "5", "bestRating": "5" },
            "author": { "@type": "Person", "name": "Sarah Ahmed" },
            "reviewBody": "Do Stuff made creating online exams for my students quick and easy. The timer and sharing features save me hours every week."
        }),
    ];

    if view == ViewState::Home {
        let questions: Vec<Value> = FAQ
            .iter()
            .map(|(q, a)| {
                json!({
                    "@type": "Question",
                    "name": q,
                    "acceptedAnswer": { "@type": "Answer", "text": a }
                })
            })
            .collect();
        blocks.push(json!({
            "@context": "https://schema.org",
            "@type": "FAQPage",
            "mainEntity": questions
        }));
    }

    blocks
}

/// `<script type="application/ld+json">` elements for `view`.
#[must_use]
pub fn structured_data_tags(view: ViewState, base_url: &str) -> String {
    let mut out = String::new();
    for block in structured_data(view, base_url) {
        // `</` would end the script element early.
        let body = block.to_string().replace("</", "<\\/");
        out.push_str("<script type=\"application/ld+json\">");
        out.push_str(&body);
        out.push_str("</script>\n");
    }
    out
}

/// Description, canonical, Open Graph and Twitter tags for `view`.
#[must_use]
pub fn meta_tags(view: ViewState, base_url: &str) -> String {
    let meta = page_meta(view);
    let url = escape_html(&format!("{base_url}{}", view.path()));
    let title = escape_html(meta.title);
    let description = escape_html(meta.description);
    let image = escape_html(&format!("{base_url}/assets/logo.webp"));
    let og_type = if view == ViewState::Home { "website" } else { "article" };

    format!(
        "<meta name=\"description\" content=\"{description}\"/>\n\
         <link rel=\"canonical\" href=\"{url}\"/>\n\
         <meta property=\"og:title\" content=\"{title}\"/>\n\
         <meta property=\"og:description\" content=\"{description}\"/>\n\
         <meta property=\"og:type\" content=\"{og_type}\"/>\n\
         <meta property=\"og:url\" content=\"{url}\"/>\n\
         <meta property=\"og:image\" content=\"{image}\"/>\n\
         <meta property=\"og:site_name\" content=\"Do Stuff\"/>\n\
         <meta name=\"twitter:card\" content=\"summary_large_image\"/>\n\
         <meta name=\"twitter:title\" content=\"{title}\"/>\n\
         <meta name=\"twitter:description\" content=\"{description}\"/>\n\
         <meta name=\"twitter:image\" content=\"{image}\"/>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dostuff_core::audit::{DESCRIPTION_LENGTH, TITLE_LENGTH};

    #[test]
    fn every_view_has_metadata_within_audit_limits() {
        for view in ViewState::ALL {
            let meta = page_meta(view);
            assert!(
                TITLE_LENGTH.contains(&meta.title.chars().count()),
                "title of {view} is {} chars",
                meta.title.chars().count()
            );
            assert!(
                DESCRIPTION_LENGTH.contains(&meta.description.chars().count()),
                "description of {view} is {} chars",
                meta.description.chars().count()
            );
        }
    }

    #[test]
    fn faq_schema_only_on_home() {
        let home = structured_data(ViewState::Home, "https://dostuff.com");
        let pricing = structured_data(ViewState::Pricing, "https://dostuff.com");
        assert_eq!(home.len(), pricing.len() + 1);
        assert_eq!(home.last().map(|b| b["@type"].clone()), Some(json!("FAQPage")));
    }

    #[test]
    fn breadcrumb_points_at_view_url() {
        let blocks = structured_data(ViewState::Terms, "https://example.test");
        let crumb = &blocks[3];
        assert_eq!(crumb["itemListElement"][1]["item"], "https://example.test/terms");
    }

    #[test]
    fn script_bodies_cannot_close_the_element() {
        let tags = structured_data_tags(ViewState::Home, "https://x.test/</script>");
        assert_eq!(tags.matches("</script>").count(), 6);
    }
}
