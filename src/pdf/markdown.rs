//! Markdown to block structure.
//!
//! Flattens the CommonMark event stream into the handful of block kinds the
//! page layout understands. Inline formatting is dropped; the text survives.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Bullet used for unordered list items.
const BULLET: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    /// Body text. `indent` counts enclosing block quotes and list levels.
    Paragraph {
        text: String,
        indent: usize,
    },
    ListItem {
        depth: usize,
        marker: String,
        text: String,
    },
    Code {
        lines: Vec<String>,
        indent: usize,
    },
    Rule,
}

/// Parse a markdown document into layout blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.push(event);
    }
    builder.finish()
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    text: String,
    code: Option<String>,
    /// Next ordinal for each open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    /// Marker of a list item whose first line has not been emitted yet.
    pending_marker: Option<String>,
    quote_depth: usize,
}

impl BlockBuilder {
    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.code.as_mut() {
                Some(code) => code.push_str(&text),
                None => self.text.push_str(&text),
            },
            Event::Code(code) => self.text.push_str(&code),
            Event::SoftBreak => self.text.push(' '),
            Event::HardBreak => self.text.push('\n'),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                self.text.push_str(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } | Tag::Paragraph => self.flush(),
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}.", n);
                        *n += 1;
                        marker
                    }
                    _ => BULLET.to_string(),
                };
                self.pending_marker = Some(marker);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.code = Some(String::new());
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(level) => {
                let text = std::mem::take(&mut self.text);
                self.blocks.push(Block::Heading {
                    level: level as u8,
                    text: text.trim().to_string(),
                });
            }
            TagEnd::Paragraph => self.flush(),
            // An item holding only a heading or code block never used its marker.
            TagEnd::Item => {
                self.flush();
                self.pending_marker = None;
            }
            TagEnd::List(_) => {
                self.flush();
                self.pending_marker = None;
                self.lists.pop();
            }
            TagEnd::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                self.blocks.push(Block::Code {
                    lines: code.lines().map(str::to_string).collect(),
                    indent: self.quote_depth + self.lists.len(),
                });
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Emit buffered inline text as a paragraph or list item.
    fn flush(&mut self) {
        let text = std::mem::take(&mut self.text);
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let block = match self.pending_marker.take() {
            Some(marker) => Block::ListItem {
                depth: self.lists.len(),
                marker,
                text: text.to_string(),
            },
            None => Block::Paragraph {
                text: text.to_string(),
                indent: self.quote_depth + self.lists.len(),
            },
        };
        self.blocks.push(block);
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}
