//! Formatted-text renderer: Markdown narrative in, styled document out.
//!
//! [`render`] is a pure function. Raw HTML in the narrative is dropped rather
//! than passed through.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use std::mem;

/// Inline styling for a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpanStyle {
    /// Strong emphasis
    pub bold: bool,
    /// Emphasis
    pub italic: bool,
    /// Inline code
    pub code: bool,
}

/// A run of text with uniform styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// The text
    pub text: String,
    /// How it is styled
    pub style: SpanStyle,
    /// Link target when the run is inside a link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Span {
    /// Unstyled text
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::default(),
            link: None,
        }
    }
}

/// Bullet or number in front of a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMarker {
    /// Unordered item
    Bullet,
    /// Ordered item with its number
    Ordered(u64),
}

/// A block-level element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Body text
    Paragraph {
        /// Inline content
        spans: Vec<Span>,
    },
    /// Section heading, level 1 through 6
    Heading {
        /// Heading level
        level: u8,
        /// Inline content
        spans: Vec<Span>,
    },
    /// One list item; nested lists have a larger depth
    ListItem {
        /// Nesting depth, 0 for a top-level list
        depth: usize,
        /// Bullet or number
        marker: ListMarker,
        /// Inline content
        spans: Vec<Span>,
    },
    /// Quoted text
    Quote {
        /// Inline content
        spans: Vec<Span>,
    },
    /// Preformatted code
    CodeBlock {
        /// Info string of a fenced block
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        /// Code text, newlines preserved
        code: String,
    },
    /// Thematic break
    Rule,
}

/// A rendered narrative
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Document {
    /// Blocks in reading order
    pub blocks: Vec<Block>,
}

impl Document {
    /// True when nothing renders
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All spans, in order, across every block
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Paragraph { spans }
            | Block::Heading { spans, .. }
            | Block::ListItem { spans, .. }
            | Block::Quote { spans } => spans.as_slice(),
            Block::CodeBlock { .. } | Block::Rule => &[][..],
        })
    }

    /// Text with all styling removed, one block per line
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph { spans }
                | Block::Heading { spans, .. }
                | Block::ListItem { spans, .. }
                | Block::Quote { spans } => spans.iter().map(|s| s.text.as_str()).collect(),
                Block::CodeBlock { code, .. } => code.trim_end_matches('\n').to_string(),
                Block::Rule => String::new(),
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Render Markdown into a [`Document`]
///
/// # Examples
///
/// ```
/// use analyst_session::markdown::{render, Block};
///
/// let doc = render("**Strong** quarter");
/// match &doc.blocks[0] {
///     Block::Paragraph { spans } => {
///         assert_eq!(spans[0].text, "Strong");
///         assert!(spans[0].style.bold);
///         assert_eq!(spans[1].text, " quarter");
///     }
///     other => panic!("unexpected block {:?}", other),
/// }
/// ```
pub fn render(markdown: &str) -> Document {
    let mut builder = DocumentBuilder::default();
    for event in Parser::new_ext(markdown, Options::empty()) {
        builder.handle(event);
    }
    builder.finish()
}

#[derive(Default)]
struct DocumentBuilder {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    bold: u32,
    italic: u32,
    link: Option<String>,
    heading: Option<u8>,
    /// One entry per open list; `Some(n)` is the next number of an ordered list
    lists: Vec<Option<u64>>,
    item_marker: Option<ListMarker>,
    quote_depth: usize,
    code: Option<(Option<String>, String)>,
}

impl DocumentBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text, false);
                }
            }
            Event::Code(text) => self.push_text(&text, true),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " }, false)
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.flush(),
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(level as u8);
            }
            Tag::BlockQuote { .. } => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.trim().to_string())
                    }
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let number = *next;
                        *next += 1;
                        ListMarker::Ordered(number)
                    }
                    _ => ListMarker::Bullet,
                };
                self.item_marker = Some(marker);
            }
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            Tag::Link { dest_url, .. } => self.link = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush(),
            TagEnd::Heading { .. } => {
                let spans = mem::take(&mut self.spans);
                if let Some(level) = self.heading.take() {
                    if !spans.is_empty() {
                        self.blocks.push(Block::Heading { level, spans });
                    }
                }
            }
            TagEnd::BlockQuote { .. } => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    self.blocks.push(Block::CodeBlock { language, code });
                }
            }
            TagEnd::List { .. } => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Item => {
                self.flush();
                self.item_marker = None;
            }
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Link => self.link = None,
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        if text.is_empty() {
            return;
        }
        let style = SpanStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            code,
        };

        // Adjacent runs with identical styling are merged
        if let Some(last) = self.spans.last_mut() {
            if last.style == style && last.link == self.link {
                last.text.push_str(text);
                return;
            }
        }

        self.spans.push(Span {
            text: text.to_string(),
            style,
            link: self.link.clone(),
        });
    }

    /// Close the current run of inline content as a block
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = mem::take(&mut self.spans);

        let block = if let Some(marker) = self.item_marker.take() {
            Block::ListItem {
                depth: self.lists.len().saturating_sub(1),
                marker,
                spans,
            }
        } else if self.quote_depth > 0 {
            Block::Quote { spans }
        } else {
            Block::Paragraph { spans }
        };
        self.blocks.push(block);
    }

    fn finish(mut self) -> Document {
        self.flush();
        Document {
            blocks: self.blocks,
        }
    }
}
