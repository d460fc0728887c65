//! Markdown to PDF conversion.
//!
//! A [`MarkdownPdf`] collects one or more [`Section`]s and writes them to a
//! single PDF, each section starting on a new page. Parsing is delegated to
//! `pulldown-cmark` and PDF output to `printpdf`; this module only maps the
//! markdown structure onto pages.

pub mod layout;
pub mod markdown;
pub mod render;

use std::path::{Path, PathBuf};

use crate::config::{PageSize, PdfConfig};

use self::layout::LayoutOptions;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No sections to convert")]
    NoSections,

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// Where a section's markdown comes from.
#[derive(Debug, Clone)]
pub enum SectionSource {
    File(PathBuf),
    Text(String),
}

/// One markdown document inside the output PDF.
#[derive(Debug, Clone)]
pub struct Section {
    pub source: SectionSource,
}

impl Section {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: SectionSource::File(path.into()),
        }
    }

    pub fn from_text(markdown: impl Into<String>) -> Self {
        Self {
            source: SectionSource::Text(markdown.into()),
        }
    }

    fn read(&self) -> Result<String, PdfError> {
        match &self.source {
            SectionSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| PdfError::Read {
                    path: path.clone(),
                    source,
                })
            }
            SectionSource::Text(text) => Ok(text.clone()),
        }
    }
}

/// Page and type settings for a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    pub page_size: PageSize,
    pub margin_mm: f32,
    pub font_size: f32,
    pub title: String,
}

impl Default for PdfOptions {
    fn default() -> Self {
        PdfOptions::from(&PdfConfig::default())
    }
}

impl From<&PdfConfig> for PdfOptions {
    fn from(config: &PdfConfig) -> Self {
        let title = config.title.clone().unwrap_or_else(|| {
            Path::new(&config.input)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| config.input.clone())
        });
        Self {
            page_size: config.page_size,
            margin_mm: config.margin_mm,
            font_size: config.font_size,
            title,
        }
    }
}

impl PdfOptions {
    fn layout_options(&self) -> LayoutOptions {
        let (page_width_mm, page_height_mm) = self.page_size.dimensions_mm();
        LayoutOptions {
            page_width_mm,
            page_height_mm,
            margin_mm: self.margin_mm,
            font_size_pt: self.font_size,
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Markdown to PDF converter.
#[derive(Debug, Clone, Default)]
pub struct MarkdownPdf {
    options: PdfOptions,
    sections: Vec<Section>,
}

impl MarkdownPdf {
    pub fn new(options: PdfOptions) -> Self {
        Self {
            options,
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// Read, lay out and render every section.
    pub fn render(&self) -> Result<RenderedPdf, PdfError> {
        if self.sections.is_empty() {
            return Err(PdfError::NoSections);
        }

        let sections = self
            .sections
            .iter()
            .map(|section| section.read().map(|text| markdown::parse(&text)))
            .collect::<Result<Vec<_>, _>>()?;

        let layout_options = self.options.layout_options();
        let pages = layout::layout(&sections, &layout_options);
        tracing::debug!(
            sections = sections.len(),
            pages = pages.len(),
            "Laid out document"
        );

        let bytes = render::render(
            &pages,
            &self.options.title,
            layout_options.page_width_mm,
            layout_options.page_height_mm,
        )?;
        Ok(RenderedPdf {
            bytes,
            pages: pages.len(),
        })
    }

    /// Render and write the PDF to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<RenderedPdf, PdfError> {
        let path = path.as_ref();
        let rendered = self.render()?;
        std::fs::write(path, &rendered.bytes).map_err(|source| PdfError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(rendered)
    }
}

/// Convert a single markdown file to a PDF file.
pub fn convert(
    input: &Path,
    output: &Path,
    options: PdfOptions,
) -> Result<RenderedPdf, PdfError> {
    tracing::info!(input = %input.display(), "Converting markdown to PDF");

    let mut pdf = MarkdownPdf::new(options);
    pdf.add_section(Section::from_file(input));
    let rendered = pdf.save(output)?;

    tracing::info!(
        output = %output.display(),
        pages = rendered.pages,
        bytes = rendered.bytes.len(),
        "PDF created successfully"
    );
    Ok(rendered)
}
