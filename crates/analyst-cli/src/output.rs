//! Output formatting for the CLI.

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use analyst_session::markdown::{Block, Document, ListMarker, Span};
use analyst_session::view::{PageView, ReportBody, SourceLink, SourceList, BUSY_TEXT};
use analyst_session::SubmitRejected;
use colored::*;
use std::borrow::Cow;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a rendered page.
    pub fn format_page(&self, page: &PageView) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(page)?),
            OutputFormat::Text => Ok(self.format_page_text(page)),
            OutputFormat::Quiet => Ok(self.format_page_quiet(page)),
        }
    }

    fn format_page_text(&self, page: &PageView) -> String {
        let mut out = String::new();
        out.push_str(&self.styled(page.report.heading, |s| s.bold()));
        out.push('\n');

        match &page.report.body {
            ReportBody::Placeholder { document } => {
                out.push_str(&self.styled(&document.plain_text(), |s| s.dimmed().italic()));
            }
            ReportBody::Pending => {
                let busy = page.busy.as_ref().map_or(BUSY_TEXT, |b| b.text);
                out.push_str(&self.colorize(busy, "cyan"));
            }
            ReportBody::Narrative { document } => {
                out.push_str(&self.format_document(document));
            }
            ReportBody::Error { message } => {
                out.push_str(&self.colorize(&strip_controls(message), "red"));
            }
        }

        if let Some(sources) = &page.sources {
            out.push_str("\n\n");
            out.push_str(&self.format_sources(sources));
        }

        out
    }

    fn format_page_quiet(&self, page: &PageView) -> String {
        match &page.report.body {
            ReportBody::Narrative { document } => {
                strip_controls(&document.plain_text()).into_owned()
            }
            ReportBody::Error { message } => strip_controls(message).into_owned(),
            ReportBody::Placeholder { .. } | ReportBody::Pending => String::new(),
        }
    }

    /// Format a rendered narrative as terminal text.
    pub fn format_document(&self, document: &Document) -> String {
        let mut out = String::new();
        let mut previous_was_item = false;

        for (i, block) in document.blocks.iter().enumerate() {
            let is_item = matches!(block, Block::ListItem { .. });
            if i > 0 {
                // List items stay on consecutive lines
                out.push_str(if is_item && previous_was_item { "\n" } else { "\n\n" });
            }
            previous_was_item = is_item;

            match block {
                Block::Paragraph { spans } => out.push_str(&self.format_spans(spans)),
                Block::Heading { spans, .. } => {
                    let text: String = spans.iter().map(|s| strip_controls(&s.text)).collect();
                    out.push_str(&self.styled(&text, |s| s.bold().underline()));
                }
                Block::ListItem {
                    depth,
                    marker,
                    spans,
                } => {
                    out.push_str(&"  ".repeat(*depth));
                    match marker {
                        ListMarker::Bullet => out.push_str("• "),
                        ListMarker::Ordered(n) => out.push_str(&format!("{}. ", n)),
                    }
                    out.push_str(&self.format_spans(spans));
                }
                Block::Quote { spans } => {
                    out.push_str(&self.styled("│ ", |s| s.dimmed()));
                    out.push_str(&self.format_spans(spans));
                }
                Block::CodeBlock { code, .. } => {
                    let lines: Vec<String> = code
                        .trim_end_matches('\n')
                        .lines()
                        .map(|line| {
                            format!("    {}", self.styled(&strip_controls(line), |s| s.cyan()))
                        })
                        .collect();
                    out.push_str(&lines.join("\n"));
                }
                Block::Rule => out.push_str(&self.styled(&"─".repeat(40), |s| s.dimmed())),
            }
        }

        out
    }

    fn format_spans(&self, spans: &[Span]) -> String {
        spans.iter().map(|span| self.format_span(span)).collect()
    }

    fn format_span(&self, span: &Span) -> String {
        let text = self.styled(&strip_controls(&span.text), |mut s| {
            if span.style.bold {
                s = s.bold();
            }
            if span.style.italic {
                s = s.italic();
            }
            if span.style.code {
                s = s.cyan();
            }
            if span.link.is_some() {
                s = s.underline();
            }
            s
        });

        match &span.link {
            Some(href) => self.hyperlink(href, &text),
            None => text,
        }
    }

    /// Format the labeled source list.
    pub fn format_sources(&self, sources: &SourceList) -> String {
        let mut lines = vec![self.styled(sources.label, |s| s.bold())];
        for (i, link) in sources.links.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, self.format_source_link(link)));
        }
        lines.join("\n")
    }

    fn format_source_link(&self, link: &SourceLink) -> String {
        if self.color_enabled {
            let label = strip_controls(&link.label).blue().underline().to_string();
            return self.hyperlink(&link.href, &label);
        }

        let label = strip_controls(&link.label);
        let href = strip_controls(&link.href);
        if label == href {
            href.into_owned()
        } else {
            format!("{} <{}>", label, href)
        }
    }

    /// Wrap `label` in an OSC 8 hyperlink to `href`.
    ///
    /// Terminals open these in the browser and leave the session in place.
    /// Without color, or when `href` carries control characters that could
    /// end the sequence early, the label is left as is.
    pub fn hyperlink(&self, href: &str, label: &str) -> String {
        if !self.color_enabled || href.chars().any(char::is_control) {
            return label.to_string();
        }
        format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", href, label)
    }

    /// One frame of the busy indicator.
    pub fn spinner_frame(&self, tick: usize) -> String {
        let frame = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
        self.colorize(&format!("{} {}", frame, BUSY_TEXT), "cyan")
    }

    /// Format profiles as a table.
    pub fn format_profiles(&self, config: &Config) -> String {
        if config.profiles.is_empty() {
            return self.colorize("No profiles configured.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["", "Profile", "Endpoint"]);

        for (name, profile) in &config.profiles {
            let marker = if name == config.profile_in_use() { "*" } else { "" };
            builder.push_record([marker, name.as_str(), profile.endpoint_url.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a rejected submission.
    pub fn rejected(&self, rejection: &SubmitRejected) -> String {
        self.warning(rejection.notice())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Apply a style if color is enabled.
    fn styled(&self, text: &str, style: impl FnOnce(ColoredString) -> ColoredString) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        style(text.normal()).to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Drop control characters other than newline and tab
///
/// Endpoint text goes through this before reaching the terminal, so it cannot
/// carry escape sequences of its own.
fn strip_controls(text: &str) -> Cow<'_, str> {
    let keep = |c: char| !c.is_control() || c == '\n' || c == '\t';
    if text.chars().all(keep) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| keep(c)).collect())
    }
}
