//! PDF emission via `printpdf` using the standard built-in fonts.

use printpdf::{BuiltinFont, IndirectFontRef, Line as PathLine, Mm, PdfDocument, Point};

use super::layout::{FontStyle, Page};
use super::PdfError;

const LAYER_NAME: &str = "Content";

/// Render laid-out pages to PDF bytes.
pub fn render(
    pages: &[Page],
    title: &str,
    width_mm: f32,
    height_mm: f32,
) -> Result<Vec<u8>, PdfError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(width_mm), Mm(height_mm), LAYER_NAME);

    let regular = builtin(&doc, BuiltinFont::Helvetica)?;
    let bold = builtin(&doc, BuiltinFont::HelveticaBold)?;
    let mono = builtin(&doc, BuiltinFont::Courier)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(width_mm), Mm(height_mm), LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let font = match line.style {
                FontStyle::Regular => &regular,
                FontStyle::Bold => &bold,
                FontStyle::Mono => &mono,
            };
            layer.use_text(
                to_builtin_charset(&line.text),
                line.size_pt,
                Mm(line.x_mm),
                Mm(line.y_mm),
                font,
            );
        }

        for rule in &page.rules {
            layer.add_line(PathLine {
                points: vec![
                    (Point::new(Mm(rule.x_start_mm), Mm(rule.y_mm)), false),
                    (Point::new(Mm(rule.x_end_mm), Mm(rule.y_mm)), false),
                ],
                is_closed: false,
            });
        }
    }

    doc.save_to_bytes()
        .map_err(|e| PdfError::Render(e.to_string()))
}

fn builtin(
    doc: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, PdfError> {
    doc.add_builtin_font(font)
        .map_err(|e| PdfError::Render(e.to_string()))
}

/// Map text onto the ASCII subset every built-in font can show.
///
/// Typographic punctuation is folded to its ASCII look-alike; anything else
/// outside ASCII becomes `?`.
pub fn to_builtin_charset(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{25CF}' | '\u{25E6}' => out.push('*'),
            '\u{2026}' => out.push_str("..."),
            '\t' | '\u{00A0}' | '\u{2002}'..='\u{200A}' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
