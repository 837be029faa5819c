//! PDF renderer: translates a [`LayoutDocument`] into `genpdf` elements.
//!
//! Rows become fixed-height bands holding a [`TableLayout`] weighted by the
//! column spans, text becomes a styled [`Paragraph`] (or a single-line
//! [`Text`] when it may run past its column), and images are scaled into
//! their column. Text is set in an embedded TrueType family, so any
//! character the font covers prints as written.

mod elements;
mod fonts;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use genpdf::elements::{Break, Image, LinearLayout, Paragraph, TableLayout, Text};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Document, Element, Margins, Scale, SimplePageDecorator, Size};
use image::GenericImageView;

use crate::core::{FiskalError, FontConfig};
use crate::layout::{
    Align, Block, FontStyle, GRID_COLUMNS, ImageBlock, LayoutDocument, LayoutRenderer, Node, Row,
    Table, TextStyle,
};
use elements::{Band, Rule};

pub use fonts::load_font_family;

/// Line height of table cells as a multiple of the font size.
const LEADING: f32 = 1.2;

/// Padding above table cell text, in mm.
const CELL_PADDING: f32 = 1.0;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Resolution `genpdf` assumes for images without an explicit DPI.
const IMAGE_DPI: f32 = 300.0;

fn pdf_err(e: impl std::fmt::Display) -> FiskalError {
    FiskalError::Render(format!("PDF: {e}"))
}

/// Renders layout trees to PDF bytes.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    fonts: FontFamily<FontData>,
    /// Document title stored in the PDF metadata.
    pub title: Option<String>,
}

impl PdfRenderer {
    pub fn new(fonts: FontFamily<FontData>) -> Self {
        Self { fonts, title: None }
    }

    /// Load the font family named by `config`.
    pub fn from_config(config: &FontConfig) -> Result<Self, FiskalError> {
        Ok(Self::new(load_font_family(config)?))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl LayoutRenderer for PdfRenderer {
    fn render(&self, document: &LayoutDocument) -> Result<Vec<u8>, FiskalError> {
        let page = document.page;
        let (width, height) = page.dimensions();

        let mut doc = Document::new(self.fonts.clone());
        if let Some(title) = &self.title {
            doc.set_title(title.as_str());
        }
        doc.set_paper_size(Size::new(f64::from(width), f64::from(height)));

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(Margins::trbl(
            f64::from(page.margin_top),
            f64::from(page.margin_right),
            f64::from(page.margin_bottom),
            f64::from(page.margin_left),
        ));
        doc.set_page_decorator(decorator);

        let content_width = page.content_width();
        for node in &document.nodes {
            match node {
                Node::Row(row) => doc.push(row_element(row, content_width)?),
                Node::Line { spacing } => doc.push(Rule::new(*spacing)),
                Node::Table(table) => doc.push(table_element(table)?),
            }
        }

        let mut output = Vec::new();
        doc.render(&mut output).map_err(pdf_err)?;
        Ok(output)
    }
}

fn style_of(text: &TextStyle) -> Style {
    let style = Style::new().with_font_size(text.size.round().clamp(1.0, 255.0) as u8);
    match text.style {
        FontStyle::Bold => style.bold(),
        FontStyle::Normal => style,
    }
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

fn text_element(text: &str, style: &TextStyle) -> Box<dyn Element> {
    if style.extrapolate && style.align == Align::Left {
        Box::new(Text::new(text).styled(style_of(style)))
    } else {
        Box::new(
            Paragraph::new(text)
                .aligned(alignment(style.align))
                .styled(style_of(style)),
        )
    }
}

/// A row on the 12-unit grid, `width` mm wide.
fn row_element(row: &Row, width: f32) -> Result<Band, FiskalError> {
    if row.columns.is_empty() {
        return Ok(Band::new(row.height, Box::new(Break::new(0.0))));
    }

    let used: u8 = row.columns.iter().map(|c| c.span).sum();
    let mut weights: Vec<usize> = row.columns.iter().map(|c| usize::from(c.span)).collect();
    let mut cells: Vec<Box<dyn Element>> = Vec::with_capacity(weights.len() + 1);
    let unit = width / f32::from(GRID_COLUMNS);
    for col in &row.columns {
        let col_width = unit * f32::from(col.span);
        let cell: Box<dyn Element> = match &col.block {
            None => Box::new(Break::new(0.0)),
            Some(Block::Text { text, style }) => text_element(text, style),
            Some(Block::Image(img)) => Box::new(image_element(img, col_width, row.height)?),
            Some(Block::Stack(rows)) => {
                let mut stack = LinearLayout::vertical();
                for r in rows {
                    stack.push(row_element(r, col_width)?);
                }
                Box::new(stack)
            }
        };
        cells.push(cell);
    }
    if used < GRID_COLUMNS {
        weights.push(usize::from(GRID_COLUMNS - used));
        cells.push(Box::new(Break::new(0.0)));
    }

    let mut layout = TableLayout::new(weights);
    layout.push_row(cells).map_err(pdf_err)?;
    Ok(Band::new(row.height, Box::new(layout)))
}

/// Decode the image and scale it to `percent` of the column, keeping the
/// aspect ratio and staying inside the row.
fn image_element(img: &ImageBlock, width: f32, height: f32) -> Result<Image, FiskalError> {
    let bytes = STANDARD
        .decode(img.base64.as_bytes())
        .map_err(|e| FiskalError::Render(format!("image base64: {e}")))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| FiskalError::Render(format!("image decode: {e}")))?;
    let (px_w, px_h) = decoded.dimensions();
    let (px_w, px_h) = (px_w.max(1) as f32, px_h.max(1) as f32);

    let share = img.percent.clamp(0.0, 100.0) / 100.0;
    let aspect = px_h / px_w;
    let mut w = width * share;
    if w * aspect > height * share {
        w = height * share / aspect;
    }
    let natural = px_w / IMAGE_DPI * 25.4;
    let scale = f64::from(w / natural);

    // genpdf rejects images with an alpha channel
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    let element = Image::from_dynamic_image(rgb)
        .map_err(pdf_err)?
        .with_scale(Scale::new(scale, scale));
    Ok(if img.center {
        element.with_alignment(Alignment::Center)
    } else {
        element
    })
}

fn cell_height(size: f32) -> f32 {
    size * LEADING * MM_PER_PT + 2.0 * CELL_PADDING
}

fn cells_row(cells: &[String], grid: &[usize], style: &TextStyle) -> Result<TableLayout, FiskalError> {
    let mut layout = TableLayout::new(grid.to_vec());
    let mut row = layout.row();
    for cell in cells {
        row.push_element(
            Paragraph::new(cell.as_str())
                .aligned(alignment(style.align))
                .styled(style_of(style))
                .padded(Margins::trbl(f64::from(CELL_PADDING), 0.0, 0.0, 0.0)),
        );
    }
    row.push().map_err(pdf_err)?;
    Ok(layout)
}

fn table_element(table: &Table) -> Result<LinearLayout, FiskalError> {
    let grid: Vec<usize> = table.grid.iter().map(|g| usize::from(*g)).collect();
    let header_style = TextStyle {
        size: table.header_size,
        align: table.align,
        style: FontStyle::Normal,
        extrapolate: false,
    };
    let content_style = TextStyle {
        size: table.content_size,
        ..header_style
    };

    let mut layout = LinearLayout::vertical();
    layout.push(Band::new(
        cell_height(table.header_size) + table.header_gap,
        Box::new(cells_row(&table.header, &grid, &header_style)?),
    ));
    for (i, row) in table.rows.iter().enumerate() {
        let mut band = Band::new(
            cell_height(table.content_size),
            Box::new(cells_row(row, &grid, &content_style)?),
        );
        if let Some(bg) = table.alternate_background.filter(|_| i % 2 == 0) {
            band = band.filled(Color::Rgb(bg.red, bg.green, bg.blue));
        }
        layout.push(band);
    }
    Ok(layout)
}

/// Render `document` with `renderer` and write it to `path`.
///
/// The file is flushed before returning. On failure the file may be
/// missing or incomplete.
pub fn write_document<R>(renderer: &R, document: &LayoutDocument, path: &Path) -> Result<(), FiskalError>
where
    R: LayoutRenderer + ?Sized,
{
    let bytes = renderer.render(document)?;
    let io_err = |e: std::io::Error| FiskalError::Render(format!("{}: {e}", path.display()));

    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    out.write_all(&bytes).map_err(io_err)?;
    out.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote document");
    Ok(())
}
