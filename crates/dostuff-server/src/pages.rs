//! Server-rendered pages.
//!
//! Every view is one full HTML document: a shared head (metadata, structured
//! data, analytics, stylesheet), the navigation bar, the view's content, and
//! the footer. Navigation links go through `/navigate/{id}` so the router
//! decides the destination and scroll position.

use chrono::Datelike;

use dostuff_core::notify::NotifyStatus;
use dostuff_core::view::{RouteId, ScrollTarget, ViewState};

use crate::analytics;
use crate::config::AnalyticsConfig;
use crate::seo::{self, FAQ};

/// Contact address shown on the legal and support pages.
pub const SUPPORT_EMAIL: &str = "support@dostuff.com";

/// Escape text for use in HTML content and quoted attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders complete pages for each view.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    base_url: String,
    analytics: AnalyticsConfig,
}

impl PageRenderer {
    #[must_use]
    pub fn new(base_url: impl Into<String>, analytics: AnalyticsConfig) -> Self {
        Self {
            base_url: base_url.into(),
            analytics,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Render `view`. `notify` only affects the download page's sign-up form.
    #[must_use]
    pub fn render(&self, view: ViewState, notify: NotifyStatus) -> String {
        let mut html = String::with_capacity(24_576);
        html.push_str(&self.head(view));
        html.push_str("<body>\n");
        html.push_str(&analytics::body_snippets(&self.analytics));
        html.push_str(&navbar(view));
        html.push_str("<main>\n");
        match view {
            ViewState::Home => html.push_str(HOME_BODY),
            ViewState::Download => html.push_str(&download_body(notify)),
            ViewState::HowItWorks => html.push_str(HOW_IT_WORKS_BODY),
            ViewState::Pricing => html.push_str(&pricing_body()),
            ViewState::Privacy => html.push_str(&PRIVACY_BODY.replace("{{EMAIL}}", SUPPORT_EMAIL)),
            ViewState::Terms => html.push_str(&TERMS_BODY.replace("{{EMAIL}}", SUPPORT_EMAIL)),
            ViewState::Support => html.push_str(&support_body()),
            ViewState::Contact => html.push_str(&CONTACT_BODY.replace("{{EMAIL}}", SUPPORT_EMAIL)),
        }
        html.push_str("</main>\n");
        html.push_str(&footer());
        html.push_str("</body></html>\n");
        html
    }

    fn head(&self, view: ViewState) -> String {
        let meta = seo::page_meta(view);
        let mut head = String::with_capacity(8192);
        head.push_str(
            "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"/>\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/>\n",
        );
        head.push_str(&format!("<title>{}</title>\n", escape_html(meta.title)));
        head.push_str(&seo::meta_tags(view, &self.base_url));
        head.push_str("<link rel=\"icon\" href=\"/assets/logo.webp\" type=\"image/webp\"/>\n");
        head.push_str(&seo::structured_data_tags(view, &self.base_url));
        head.push_str(&analytics::head_snippets(&self.analytics));
        head.push_str("<style>\n");
        head.push_str(&format!(
            "html{{scroll-behavior:{}}}\n",
            ScrollTarget::Top.behavior()
        ));
        head.push_str(SITE_CSS);
        head.push_str("</style></head>\n");
        head
    }
}

// ── Shared chrome ────────────────────────────────────────────────────

/// Links shown in the navigation bar, with their labels.
const NAV_LINKS: [(RouteId, &str); 4] = [
    (RouteId::Home, "Home"),
    (RouteId::HowItWorks, "How it Works"),
    (RouteId::Features, "Features"),
    (RouteId::Pricing, "Pricing"),
];

fn navbar(current: ViewState) -> String {
    let mut nav = String::from(
        "<nav class=\"nav\" aria-label=\"Main\">\n\
         <a href=\"/navigate/home\" class=\"nav-logo\">\
         <img src=\"/assets/logo.webp\" alt=\"Do Stuff logo\" width=\"32\" height=\"32\"/>Do Stuff</a>\n\
         <div class=\"nav-links\">\n",
    );
    for (route, label) in NAV_LINKS {
        let transition = route.resolve();
        let active = transition.view == current && matches!(transition.scroll, ScrollTarget::Top);
        let class = if active { " class=\"active\"" } else { "" };
        nav.push_str(&format!(
            "<a href=\"/navigate/{}\"{class}>{label}</a>\n",
            route.id()
        ));
    }
    nav.push_str("<a href=\"/navigate/download\" class=\"nav-pill\">Get Started</a>\n</div>\n</nav>\n");
    nav
}

fn footer() -> String {
    let year = chrono::Utc::now().year();
    format!(
        "<footer class=\"footer\">\n\
         <div class=\"footer-brand\"><strong>Do Stuff</strong>\
         <p>The online exam platform for teachers and students.</p></div>\n\
         <div class=\"footer-links\">\n\
         <a href=\"/navigate/privacy\">Privacy Policy</a>\n\
         <a href=\"/navigate/terms\">Terms of Service</a>\n\
         <a href=\"/navigate/support\">Support</a>\n\
         <a href=\"/navigate/contact\">Contact Us</a>\n\
         </div>\n\
         <p class=\"footer-note\">&copy; {year} Do Stuff. All rights reserved.</p>\n\
         </footer>\n"
    )
}

const BACK_LINK: &str = "<a href=\"/navigate/home\" class=\"back-link\">Back to home</a>\n";

// ── Views ────────────────────────────────────────────────────────────

fn download_body(notify: NotifyStatus) -> String {
    let mut body = String::from(DOWNLOAD_INTRO);
    body.push_str(BACK_LINK);

    let notice = match notify {
        NotifyStatus::Subscribed => Some((
            "success",
            "You're on the list! We'll email you as soon as the apps are ready.",
        )),
        NotifyStatus::Failed => Some((
            "error",
            "Something went wrong while saving your address. Please try again.",
        )),
        NotifyStatus::Invalid => Some(("error", "Please enter a valid email address.")),
        NotifyStatus::Idle | NotifyStatus::Loading => None,
    };
    body.push_str("<div id=\"notify\" class=\"notify\">\n<h2>Get Notified When We Launch</h2>\n");
    if let Some((kind, message)) = notice {
        body.push_str(&format!(
            "<p class=\"notice {kind}\" role=\"status\">{}</p>\n",
            escape_html(message)
        ));
    }
    if notify.accepts_input() {
        body.push_str(
            "<form method=\"post\" action=\"/download/notify\" class=\"notify-form\">\n\
             <label for=\"email\">Email address</label>\n\
             <input id=\"email\" type=\"email\" name=\"email\" required placeholder=\"you@school.edu\"/>\n\
             <button type=\"submit\" class=\"btn btn-primary\">Notify Me</button>\n\
             </form>\n",
        );
    }
    body.push_str("</div>\n</section>\n");
    body
}

/// A pricing plan card.
struct Plan {
    name: &'static str,
    price: &'static str,
    tagline: &'static str,
    /// Feature lines with whether the plan includes them.
    features: &'static [(&'static str, bool)],
}

const PLANS: [Plan; 2] = [
    Plan {
        name: "Free",
        price: "$0 / month",
        tagline: "Everything you need to try online exams with your class.",
        features: &[
            ("Up to 3 exams", true),
            ("Basic question types", true),
            ("Shareable exam links", true),
            ("Unlimited students", false),
            ("Advanced analytics", false),
            ("Custom styling", false),
        ],
    },
    Plan {
        name: "Pro Teacher",
        price: "$25 / month",
        tagline: "For teachers who run exams every week.",
        features: &[
            ("Unlimited exams", true),
            ("All 10 question types", true),
            ("Shareable exam links", true),
            ("Unlimited students", true),
            ("Advanced analytics", true),
            ("Custom styling", true),
        ],
    },
];

fn pricing_body() -> String {
    let mut body = String::from(
        "<section class=\"page\">\n\
         <h1>Simple Pricing for Every Classroom</h1>\n\
         <p class=\"lead\">Start for free and upgrade when your classes grow. No credit card required.</p>\n",
    );
    body.push_str(BACK_LINK);
    body.push_str("<div class=\"grid plans\">\n");
    for plan in &PLANS {
        body.push_str(&format!(
            "<article class=\"card plan\">\n<h2>{}</h2>\n<p class=\"price\">{}</p>\n<p>{}</p>\n<ul>\n",
            plan.name,
            escape_html(plan.price),
            plan.tagline
        ));
        for &(feature, included) in plan.features {
            let class = if included { "included" } else { "excluded" };
            body.push_str(&format!("<li class=\"{class}\">{feature}</li>\n"));
        }
        body.push_str("</ul>\n<a href=\"/navigate/download\" class=\"btn btn-primary\">Get Started</a>\n</article>\n");
    }
    body.push_str(
        "</div>\n\
         <h2>Need a Plan for Your School?</h2>\n\
         <p>Institutions with many teachers can <a href=\"/navigate/contact\">contact our team</a> for volume pricing.</p>\n\
         </section>\n",
    );
    body
}

fn support_body() -> String {
    let mut body = String::from(
        "<section class=\"page\">\n\
         <h1>Support Center</h1>\n\
         <p class=\"lead\">Answers to the questions teachers and students ask most often.</p>\n",
    );
    body.push_str(BACK_LINK);
    body.push_str("<h2>Knowledge Base</h2>\n");
    for (question, answer) in FAQ {
        body.push_str(&format!(
            "<article class=\"faq\">\n<h3>{}</h3>\n<p>{}</p>\n</article>\n",
            escape_html(question),
            escape_html(answer)
        ));
    }
    body.push_str(&format!(
        "<h2>Still Need Help?</h2>\n\
         <p>Write to <a href=\"mailto:{SUPPORT_EMAIL}\">{SUPPORT_EMAIL}</a> and our team will reply within two business days.</p>\n\
         </section>\n"
    ));
    body
}

const HOME_BODY: &str = r##"<section class="hero">
<p class="eyebrow">Online Exam Platform</p>
<h1>Create Online Exams Your Students Will Love</h1>
<p>Do Stuff is the quiz builder for teachers and institutions. Build professional exams with rich question types, timers and custom styling, then share them with one link.</p>
<div class="hero-actions">
<a href="/navigate/download" class="btn btn-primary">Get Started</a>
<a href="/navigate/how-it-works" class="btn btn-outline">See How it Works</a>
</div>
</section>
<section class="partners" aria-label="Partners">
<p>Trusted by educators at</p>
<ul><li>Dreamure</li><li>SWITCH.WIN</li><li>Sphere</li><li>PinSpace</li><li>Visionix</li></ul>
</section>
<section id="features" class="features">
<h2>Powerful Teacher Tools</h2>
<div class="grid">
<article class="card"><h3>Timer Control</h3><p>Set exam duration and auto-submit to keep testing fair.</p></article>
<article class="card"><h3>Custom Styling</h3><p>Pick colors and themes that match your school or subject.</p></article>
<article class="card"><h3>Easy Sharing</h3><p>Generate exam links that students open with one click.</p></article>
<article class="card"><h3>Analytics</h3><p>Track student performance with clear dashboards.</p></article>
</div>
<h2>Question Types</h2>
<ul class="question-types">
<li><strong>Multiple Choice</strong> Pick the correct answer from a list.</li>
<li><strong>Fill in the Blank</strong> Type the missing word or phrase.</li>
<li><strong>Translation</strong> Translate sentences from Arabic to English.</li>
<li><strong>True or False</strong> Judge simple statements.</li>
<li><strong>Matching</strong> Connect items from two columns.</li>
<li><strong>Reading Comprehension</strong> Answer questions about a paragraph.</li>
</ul>
</section>
<section class="paths">
<h2>Choose Your Path</h2>
<div class="grid">
<article class="card"><h3>I'm a Teacher</h3><p>Build exams, share them with your class and review results as they come in.</p><a href="/navigate/download" class="btn btn-primary">Start as Teacher</a></article>
<article class="card"><h3>I'm a Student</h3><p>Open the exam link your teacher shared. No sign up needed.</p><a href="/navigate/how-it-works" class="btn btn-outline">Join as Student</a></article>
</div>
</section>
"##;

const DOWNLOAD_INTRO: &str = r##"<section class="page">
<h1>Get the Do Stuff App</h1>
<p class="lead">Our apps are on the way. The web dashboard already lets you build and share exams from any browser.</p>
<h2>Coming Soon to Every Device</h2>
<ul class="checklist">
<li>iOS and Android apps for taking exams anywhere</li>
<li>A desktop app for building exams offline</li>
<li>Sync between every device you use</li>
</ul>
"##;

const HOW_IT_WORKS_BODY: &str = r##"<section class="page">
<h1>How to Make an Online Quiz</h1>
<p class="lead">From a blank page to graded results in four steps.</p>
<a href="/navigate/home" class="back-link">Back to home</a>
<ol class="steps">
<li><h2>Create Your Account</h2><p>Sign up as a teacher in under a minute. The free plan needs no card.</p></li>
<li><h2>Build the Exam</h2><p>Add questions, choose the question types, set a timer and style the exam for your class.</p></li>
<li><h2>Share the Link</h2><p>Send one link to your students. They open it in any browser without an account.</p></li>
<li><h2>Review Results</h2><p>Scores arrive as students submit. See which questions were hard and who needs help.</p></li>
</ol>
<p><a href="/navigate/pricing" class="btn btn-outline">Compare Plans</a> <a href="/navigate/download" class="btn btn-primary">Get Started</a></p>
</section>
"##;

const PRIVACY_BODY: &str = r##"<section class="page legal">
<h1>Privacy Policy</h1>
<p class="updated">Last updated: January 1, 2025</p>
<a href="/navigate/home" class="back-link">Back to home</a>
<p>This policy describes how Do Stuff collects, uses and discloses your information when you use the service, and tells you about your privacy rights.</p>
<h2>Types of Data Collected</h2>
<p>We collect the email address and name you give us when you create an account or join the launch list, along with usage data such as pages visited and exam activity.</p>
<h2>Use of Your Personal Data</h2>
<p>We use your data to provide and maintain the service, to manage your account, and to contact you about updates you asked for.</p>
<h2>Retention of Your Personal Data</h2>
<p>We keep personal data only as long as needed for the purposes in this policy, or as required by law.</p>
<h2>Security of Your Personal Data</h2>
<p>We use commercially reasonable means to protect your data, but no method of transmission over the internet is completely secure.</p>
<h2>Contact Us</h2>
<p>Questions about this policy can be sent to <a href="mailto:{{EMAIL}}">{{EMAIL}}</a>.</p>
</section>
"##;

const TERMS_BODY: &str = r##"<section class="page legal">
<h1>Terms of Service</h1>
<p class="updated">Last updated: January 1, 2025</p>
<a href="/navigate/home" class="back-link">Back to home</a>
<p>These terms govern your use of Do Stuff. By accessing the service you agree to be bound by them.</p>
<h2>Accounts</h2>
<p>You are responsible for keeping your account credentials safe and for all activity under your account.</p>
<h2>Acceptable Use</h2>
<p>You may not use the service to distribute unlawful content or to disrupt other users and their exams.</p>
<h2>Termination</h2>
<p>We may suspend access immediately, without prior notice, if you breach these terms.</p>
<h2>Limitation of Liability</h2>
<p>The service is provided as is. Our liability is limited to the amount you paid for the service in the last twelve months.</p>
<h2>Contact Us</h2>
<p>Questions about these terms can be sent to <a href="mailto:{{EMAIL}}">{{EMAIL}}</a>.</p>
</section>
"##;

const CONTACT_BODY: &str = r##"<section class="page">
<h1>Contact Us</h1>
<p class="lead">We read every message and reply within two business days.</p>
<a href="/navigate/home" class="back-link">Back to home</a>
<h2>Email Us</h2>
<p>Reach the team at <a href="mailto:{{EMAIL}}">{{EMAIL}}</a> for questions, feedback or account help.</p>
<h2>Partnerships</h2>
<p>Schools and publishers who want to work with us can use the same address with the subject line Partnership.</p>
</section>
"##;

const SITE_CSS: &str = r##"*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{--bg:#F7F8FC;--text:#1B1E2E;--muted:#5B6178;--primary:#4F46E5;--card:#FFFFFF;--border:#E3E6F0;--font:'Inter',-apple-system,sans-serif}
body{font-family:var(--font);background:var(--bg);color:var(--text);line-height:1.6;-webkit-font-smoothing:antialiased}
a{color:var(--primary);text-decoration:none}
.nav{display:flex;align-items:center;justify-content:space-between;max-width:1100px;margin:0 auto;padding:20px 24px}
.nav-logo{display:flex;align-items:center;gap:10px;font-size:20px;font-weight:800;color:var(--text)}
.nav-links{display:flex;align-items:center;gap:6px}
.nav-links a{color:var(--muted);font-size:14px;font-weight:600;padding:8px 14px;border-radius:50px}
.nav-links a.active,.nav-links a:hover{color:var(--text);background:rgba(79,70,229,.08)}
.nav-links .nav-pill{background:var(--primary);color:#fff}
.btn{display:inline-flex;align-items:center;justify-content:center;padding:12px 26px;border-radius:50px;font-size:14px;font-weight:700;border:none;cursor:pointer}
.btn-primary{background:var(--primary);color:#fff}
.btn-outline{background:transparent;color:var(--text);border:1.5px solid var(--border)}
.hero{text-align:center;max-width:820px;margin:0 auto;padding:100px 24px 60px}
.hero h1{font-size:56px;line-height:1.08;letter-spacing:-2px;margin:12px 0 20px}
.hero p{font-size:18px;color:var(--muted);margin-bottom:32px}
.hero-actions{display:flex;gap:12px;justify-content:center}
.eyebrow{text-transform:uppercase;font-size:12px;font-weight:700;letter-spacing:2px;color:var(--primary)}
.partners{text-align:center;color:var(--muted);padding:24px}
.partners ul{display:flex;gap:32px;justify-content:center;list-style:none;font-weight:700;margin-top:8px}
.features,.paths,.page{max-width:1100px;margin:0 auto;padding:48px 24px}
.page{max-width:820px}
.page h2{margin:32px 0 12px}
.lead{font-size:18px;color:var(--muted);margin:12px 0 20px}
.back-link{display:inline-block;margin-bottom:16px;font-size:14px}
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(220px,1fr));gap:18px;margin:20px 0}
.card{background:var(--card);border:1px solid var(--border);border-radius:18px;padding:28px}
.card h3{margin-bottom:8px}
.question-types{list-style:none;display:grid;grid-template-columns:repeat(2,1fr);gap:12px}
.question-types strong{display:block}
.steps{padding-left:20px}
.price{font-size:28px;font-weight:800}
.plan ul{list-style:none;margin:16px 0 24px}
.plan .excluded{color:var(--muted);text-decoration:line-through}
.notify-form{display:flex;gap:10px;flex-wrap:wrap;align-items:center}
.notify-form input{flex:1;min-width:220px;padding:12px 16px;border:1px solid var(--border);border-radius:50px}
.notice{padding:12px 16px;border-radius:12px;margin-bottom:12px}
.notice.success{background:#E8F8EE;color:#17663A}
.notice.error{background:#FDECEC;color:#9B1C1C}
.footer{border-top:1px solid var(--border);max-width:1100px;margin:40px auto 0;padding:28px 24px;display:flex;flex-wrap:wrap;justify-content:space-between;gap:16px;font-size:13px;color:var(--muted)}
.footer-links{display:flex;gap:16px}
@media(max-width:768px){.hero h1{font-size:34px}.nav-links{display:none}.question-types{grid-template-columns:1fr}}
"##;
