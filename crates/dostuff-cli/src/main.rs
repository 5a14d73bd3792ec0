//! `dostuff` CLI: content audit and readability tooling for HTML pages.
//!
//! Runs the same auditor the site uses against any HTML file or URL, measures
//! readability and keyword density, and prints the site's navigation table.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use dostuff_core::audit::{AuditFinding, AuditReport, Severity};
use dostuff_core::html::PageSnapshot;
use dostuff_core::readability::{
    KeywordReport, ReadabilityReport, analyze_keywords, analyze_readability,
};
use dostuff_core::view::{Navigator, RouteId, ScrollTarget, ScrollTiming, Transition};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI structure ────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "dostuff",
    version,
    about = "Do Stuff CLI: audit pages for SEO issues and measure readability",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         DOSTUFF_AUDIT_LEVEL          Default audit level (default: warning)\n  \
         DOSTUFF_FETCH_TIMEOUT_SECS   Timeout for fetching URLs (default: 15)\n\n\
         {DIM}Examples:{RESET}\n  \
         dostuff audit public/index.html\n  \
         dostuff audit https://dostuff.com --level info --json\n  \
         dostuff readability page.html --keywords exam,quiz\n  \
         dostuff navigate features"
    ),
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the SEO content audit against an HTML file or URL.
    Audit {
        /// Path to an HTML file, or an http(s) URL.
        source: String,
        /// Minimum severity to show: error, warning or info.
        #[arg(long, env = "DOSTUFF_AUDIT_LEVEL", default_value = "warning")]
        level: Severity,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        /// Exit with an error when any shown finding remains.
        #[arg(long)]
        strict: bool,
        /// Timeout in seconds when SOURCE is a URL.
        #[arg(long, env = "DOSTUFF_FETCH_TIMEOUT_SECS", default_value = "15")]
        timeout: u64,
    },
    /// Measure readability and keyword density of a text or HTML file.
    Readability {
        /// Path to a plain-text or HTML file.
        file: PathBuf,
        /// Comma-separated keywords to count.
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the navigation table.
    Routes {
        /// Print the table as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Resolve a navigation id to its view and scroll target.
    Navigate {
        /// Navigation id (e.g. `features`, `pricing`).
        id: String,
    },
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("failed to format JSON: {e}"),
    }
}

fn severity_badge(severity: Severity) -> String {
    let color = match severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
        Severity::Info => CYAN,
    };
    format!("{color}{BOLD}{:<7}{RESET}", severity.as_str())
}

fn score_color(score: u8) -> &'static str {
    match score {
        90..=100 => GREEN,
        60..=89 => YELLOW,
        _ => RED,
    }
}

fn print_finding(finding: &AuditFinding) {
    println!(
        "  {} {DIM}[{}]{RESET} {}",
        severity_badge(finding.severity),
        finding.category,
        finding.message
    );
    if let Some(fix) = finding.fix.as_deref() {
        println!("          {DIM}→ {fix}{RESET}");
    }
}

fn print_audit_report(source: &str, report: &AuditReport) {
    header("🔎", "Content Audit");
    kv_line("Source", source);
    let color = score_color(report.score);
    kv_line("SEO Score", &format!("{color}{BOLD}{}{RESET}/100", report.score));
    kv_line(
        "Findings",
        &format!(
            "{RED}{} errors{RESET}, {YELLOW}{} warnings{RESET}, {CYAN}{} info{RESET}",
            report.counts.errors, report.counts.warnings, report.counts.info
        ),
    );
    kv_line("Level", report.level.as_str());
    println!();

    if report.findings.is_empty() {
        success(&format!("No issues at level {}", report.level));
    } else {
        for finding in &report.findings {
            print_finding(finding);
        }
    }
    println!();
}

fn print_transition(id: &str, transition: &Transition) {
    let scroll = match transition.scroll {
        ScrollTarget::Top => "top".to_owned(),
        ScrollTarget::Anchor(anchor) => format!("#{anchor}"),
    };
    let timing = match transition.scroll.timing() {
        ScrollTiming::Immediate => "immediate",
        ScrollTiming::AfterRender => "after render",
    };
    println!(
        "  {CYAN}{id:<14}{RESET} {WHITE}{:<14}{RESET} {:<10} {DIM}{timing:<13}{RESET} {}",
        transition.view.id(),
        scroll,
        transition.location()
    );
}

// ── Input ────────────────────────────────────────────────────────────

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")?;
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to fetch {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        bail!("{url} returned {status}");
    }
    resp.text().await.context("failed to read response body")
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// HTML files are reduced to their visible body text; anything else is
/// taken as-is.
fn prose_of(path: &Path, contents: &str) -> Result<String> {
    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        || contents.trim_start().starts_with('<');
    if is_html {
        Ok(PageSnapshot::from_html(contents)?.body_text)
    } else {
        Ok(contents.to_owned())
    }
}

// ── Command dispatch ─────────────────────────────────────────────────

#[derive(Serialize)]
struct ReadabilityOutput {
    readability: ReadabilityReport,
    keywords: KeywordReport,
}

#[derive(Serialize)]
struct RouteRow {
    id: &'static str,
    #[serde(flatten)]
    transition: Transition,
    location: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Audit {
            source,
            level,
            json,
            strict,
            timeout,
        } => {
            let markup = if is_url(&source) {
                fetch(&source, Duration::from_secs(timeout)).await?
            } else {
                read_file(Path::new(&source))?
            };
            let snapshot = PageSnapshot::from_html(&markup)?;
            let report = AuditReport::build(&snapshot, level);

            if json {
                print_json(&serde_json::to_value(&report)?);
            } else {
                print_audit_report(&source, &report);
            }

            if strict && !report.findings.is_empty() {
                bail!(
                    "{} finding(s) at or above {level} remain",
                    report.findings.len()
                );
            }
        }

        Commands::Readability {
            file,
            keywords,
            json,
        } => {
            let contents = read_file(&file)?;
            let text = prose_of(&file, &contents)?;
            let output = ReadabilityOutput {
                readability: analyze_readability(&text),
                keywords: analyze_keywords(&text, keywords.as_slice()),
            };

            if json {
                print_json(&serde_json::to_value(&output)?);
            } else {
                let r = &output.readability;
                header("📖", "Readability");
                kv_line("File", &file.display().to_string());
                kv_line("Sentences", &r.sentences.to_string());
                kv_line("Words", &r.words.to_string());
                kv_line("Syllables", &r.syllables.to_string());
                kv_line("Avg sentence length", &r.avg_sentence_length.to_string());
                kv_line("Avg syllables/word", &r.avg_syllables_per_word.to_string());
                match (r.flesch_score, r.readability) {
                    (Some(score), Some(label)) => {
                        kv_line("Flesch score", &format!("{score} ({label})"));
                    }
                    _ => kv_line("Flesch score", "n/a (no text)"),
                }
                if !keywords.is_empty() {
                    println!();
                    header("🔑", "Keywords");
                    for (keyword, count) in &output.keywords.keyword_density {
                        kv_line(keyword, &count.to_string());
                    }
                    kv_line(
                        "Density",
                        &format!("{}%", output.keywords.keyword_percentage),
                    );
                }
                println!();
            }
        }

        Commands::Routes { json } => {
            if json {
                let rows: Vec<RouteRow> = RouteId::ALL
                    .into_iter()
                    .map(|route| {
                        let transition = route.resolve();
                        RouteRow {
                            id: route.id(),
                            transition,
                            location: transition.location(),
                        }
                    })
                    .collect();
                print_json(&serde_json::to_value(&rows)?);
            } else {
                header("🧭", "Navigation");
                println!(
                    "  {DIM}{:<14} {:<14} {:<10} {:<13} {}{RESET}",
                    "ID", "VIEW", "SCROLL", "TIMING", "LOCATION"
                );
                for route in RouteId::ALL {
                    print_transition(route.id(), &route.resolve());
                }
                println!();
            }
        }

        Commands::Navigate { id } => {
            let mut navigator = Navigator::new();
            let transition = navigator.navigate_id(&id)?;
            print_transition(&id, &transition);
        }
    }

    Ok(())
}
