//! Page layout: word wrapping and pagination.
//!
//! Works in millimetres with the origin at the bottom-left corner of the
//! page, matching PDF user space. Text widths are estimated from per-glyph
//! advance widths of the standard Helvetica and Courier fonts, so wrapping is
//! deterministic and needs no font files.

use super::markdown::Block;

/// Millimetres per typographic point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Baseline-to-baseline distance as a multiple of font size.
const LINE_SPACING: f32 = 1.4;

/// Horizontal indent per list level or block quote, in millimetres.
const INDENT_MM: f32 = 6.0;

/// Heading sizes relative to body text, indexed by level - 1.
const HEADING_SCALE: [f32; 6] = [2.0, 1.6, 1.35, 1.15, 1.0, 0.9];

/// Code blocks are set slightly smaller than body text.
const CODE_SCALE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Mono,
}

impl FontStyle {
    /// Advance width of `c` in em units.
    fn char_em(self, c: char) -> f32 {
        match self {
            FontStyle::Mono => 0.6,
            FontStyle::Regular => helvetica_em(c),
            // Bold glyphs run roughly 6% wider
            FontStyle::Bold => helvetica_em(c) * 1.06,
        }
    }

    pub fn text_width_mm(self, text: &str, size_pt: f32) -> f32 {
        text.chars().map(|c| self.char_em(c)).sum::<f32>() * size_pt * PT_TO_MM
    }
}

fn helvetica_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' => 0.222,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'f' | 't' | 'I' | '/' | '[' | ']' | '(' | ')' => 0.278,
        'r' | '-' | '"' => 0.333,
        'm' | 'M' => 0.833,
        'W' => 0.944,
        'w' => 0.722,
        'A'..='Z' => 0.667,
        '0'..='9' | 'a'..='z' => 0.556,
        _ => 0.584,
    }
}

/// Geometry and type size for laying out pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub font_size_pt: f32,
}

impl LayoutOptions {
    fn content_width(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    fn top(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }
}

/// A run of text placed on a page. `y_mm` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub style: FontStyle,
}

/// A horizontal rule from `x_start_mm` to `x_end_mm` at height `y_mm`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x_start_mm: f32,
    pub x_end_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<Line>,
    pub rules: Vec<Rule>,
}

/// Lay out every section; each section begins on a fresh page.
///
/// Always returns at least one page per section, so an empty document still
/// produces a valid (blank) page.
pub fn layout(sections: &[Vec<Block>], options: &LayoutOptions) -> Vec<Page> {
    let mut writer = PageWriter::new(*options);
    for (index, blocks) in sections.iter().enumerate() {
        if index > 0 {
            writer.new_page();
        }
        for block in blocks {
            writer.block(block);
        }
    }
    writer.finish()
}

/// Greedy word wrap of `text` to `max_width_mm`.
///
/// Newlines in `text` force a break. A single word wider than the line is
/// split across lines at character boundaries.
pub fn wrap(text: &str, max_width_mm: f32, size_pt: f32, style: FontStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if style.text_width_mm(&candidate, size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if style.text_width_mm(word, size_pt) <= max_width_mm {
                current = word.to_string();
            } else {
                let mut pieces = split_long(word, max_width_mm, size_pt, style);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }
    lines
}

fn split_long(word: &str, max_width_mm: f32, size_pt: f32, style: FontStyle) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;
    for c in word.chars() {
        let w = style.char_em(c) * size_pt * PT_TO_MM;
        if width + w > max_width_mm && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

struct PageWriter {
    options: LayoutOptions,
    pages: Vec<Page>,
    current: Page,
    /// Distance already consumed below the top margin.
    cursor_mm: f32,
}

impl PageWriter {
    fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            pages: Vec::new(),
            current: Page::default(),
            cursor_mm: 0.0,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor_mm = 0.0;
    }

    fn content_height(&self) -> f32 {
        self.options.page_height_mm - 2.0 * self.options.margin_mm
    }

    fn line_height(size_pt: f32) -> f32 {
        size_pt * LINE_SPACING * PT_TO_MM
    }

    /// Vertical gap, dropped at the top of a page.
    fn space(&mut self, mm: f32) {
        if self.cursor_mm > 0.0 {
            self.cursor_mm += mm;
        }
    }

    /// Move to a new page unless `height` still fits on this one.
    fn reserve(&mut self, height: f32) {
        if self.cursor_mm > 0.0 && self.cursor_mm + height > self.content_height() {
            self.new_page();
        }
    }

    fn place(&mut self, text: String, x_mm: f32, size_pt: f32, style: FontStyle) {
        let height = Self::line_height(size_pt);
        self.reserve(height);
        let y_mm = self.options.top() - self.cursor_mm - size_pt * PT_TO_MM;
        self.current.lines.push(Line {
            text,
            x_mm,
            y_mm,
            size_pt,
            style,
        });
        self.cursor_mm += height;
    }

    fn text_block(&mut self, text: &str, indent_mm: f32, size_pt: f32, style: FontStyle) {
        let x = self.options.margin_mm + indent_mm;
        let width = self.options.content_width() - indent_mm;
        for line in wrap(text, width, size_pt, style) {
            self.place(line, x, size_pt, style);
        }
    }

    fn block(&mut self, block: &Block) {
        let base = self.options.font_size_pt;
        let body_gap = Self::line_height(base) * 0.5;

        match block {
            Block::Heading { level, text } => {
                let index = usize::from((*level).clamp(1, 6) - 1);
                let size = base * HEADING_SCALE[index];
                self.space(Self::line_height(size) * 0.6);
                // Keep a heading together with the first line after it
                self.reserve(Self::line_height(size) + Self::line_height(base));
                self.text_block(text, 0.0, size, FontStyle::Bold);
                self.space(body_gap * 0.5);
            }
            Block::Paragraph { text, indent } => {
                self.text_block(text, *indent as f32 * INDENT_MM, base, FontStyle::Regular);
                self.space(body_gap);
            }
            Block::ListItem {
                depth,
                marker,
                text,
            } => {
                let marker_x = self.options.margin_mm + depth.saturating_sub(1) as f32 * INDENT_MM;
                let text_indent = depth.saturating_sub(1) as f32 * INDENT_MM + INDENT_MM;
                let width = self.options.content_width() - text_indent;
                let lines = wrap(text, width, base, FontStyle::Regular);

                self.reserve(Self::line_height(base));
                self.current.lines.push(Line {
                    text: marker.clone(),
                    x_mm: marker_x,
                    y_mm: self.options.top() - self.cursor_mm - base * PT_TO_MM,
                    size_pt: base,
                    style: FontStyle::Regular,
                });
                for line in lines {
                    self.place(line, self.options.margin_mm + text_indent, base, FontStyle::Regular);
                }
                self.space(body_gap * 0.4);
            }
            Block::Code { lines, indent } => {
                let size = base * CODE_SCALE;
                let indent_mm = *indent as f32 * INDENT_MM + INDENT_MM * 0.5;
                let x = self.options.margin_mm + indent_mm;
                let width = self.options.content_width() - indent_mm;
                for line in lines {
                    // Code keeps its own line breaks; only overlong lines are split
                    let pieces = if FontStyle::Mono.text_width_mm(line, size) <= width {
                        vec![line.clone()]
                    } else {
                        split_long(line, width, size, FontStyle::Mono)
                    };
                    for piece in pieces {
                        self.place(piece, x, size, FontStyle::Mono);
                    }
                }
                self.space(body_gap);
            }
            Block::Rule => {
                let height = Self::line_height(base);
                self.reserve(height);
                let y_mm = self.options.top() - self.cursor_mm - height * 0.5;
                self.current.rules.push(Rule {
                    x_start_mm: self.options.margin_mm,
                    x_end_mm: self.options.page_width_mm - self.options.margin_mm,
                    y_mm,
                });
                self.cursor_mm += height;
            }
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}
