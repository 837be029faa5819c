//! Layout tree handed to a page renderer.
//!
//! A [`LayoutDocument`] is an ordered list of [`Node`]s: rows of columns on
//! a 12-unit grid, horizontal rules, and tables. Blocks hold pre-formatted
//! strings only; no block performs I/O.
//!
//! The tree is built with [`DocumentBuilder`], which appends nodes in
//! emission order.

mod invoice;
mod summary;

pub use invoice::{TemplateVariant, assemble_invoice, line_table};
pub use summary::{ExemptionSummary, assemble_exemption_summary};

/// Width of the column grid.
pub const GRID_COLUMNS: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Page size, orientation and margins, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub orientation: Orientation,
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
}

impl PageSetup {
    /// A4 portrait with the receipt margins.
    pub fn a4_portrait() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            orientation: Orientation::Portrait,
            margin_left: 10.0,
            margin_top: 15.0,
            margin_right: 10.0,
            margin_bottom: 20.0,
        }
    }

    /// Page width and height after applying the orientation.
    pub fn dimensions(&self) -> (f32, f32) {
        match self.orientation {
            Orientation::Portrait => (self.width, self.height),
            Orientation::Landscape => (self.height, self.width),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.dimensions().0 - self.margin_left - self.margin_right
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
}

/// Text attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    pub align: Align,
    pub style: FontStyle,
    /// Let text run past the column instead of wrapping.
    pub extrapolate: bool,
}

impl TextStyle {
    pub const TITLE: Self = Self {
        size: 20.0,
        align: Align::Left,
        style: FontStyle::Bold,
        extrapolate: false,
    };
    pub const BODY: Self = Self {
        size: 8.0,
        align: Align::Left,
        style: FontStyle::Normal,
        extrapolate: true,
    };
    pub const BODY_RIGHT: Self = Self {
        align: Align::Right,
        ..Self::BODY
    };
    pub const CAPTION: Self = Self {
        style: FontStyle::Bold,
        ..Self::BODY
    };
    pub const CAPTION_RIGHT: Self = Self {
        align: Align::Right,
        ..Self::CAPTION
    };
    /// Body text that wraps inside its column.
    pub const BODY_WRAP: Self = Self {
        extrapolate: false,
        ..Self::BODY
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const WHITE: Self = Self {
        red: 255,
        green: 255,
        blue: 255,
    };
    pub const ALTERNATE_ROW: Self = Self {
        red: 200,
        green: 200,
        blue: 200,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
}

/// An image carried as base64 text.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub base64: String,
    pub format: ImageFormat,
    /// Share of the column to fill, 0–100.
    pub percent: f32,
    pub center: bool,
}

/// Leaf content of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text { text: String, style: TextStyle },
    Image(ImageBlock),
    /// Rows laid out inside the column, on their own 12-unit grid.
    Stack(Vec<Row>),
}

/// A column spanning `span` grid units. An empty column is blank space.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub span: u8,
    pub block: Option<Block>,
}

impl Column {
    pub fn text(span: u8, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            span,
            block: Some(Block::Text {
                text: text.into(),
                style,
            }),
        }
    }

    pub fn space(span: u8) -> Self {
        Self { span, block: None }
    }

    pub fn image(span: u8, image: ImageBlock) -> Self {
        Self {
            span,
            block: Some(Block::Image(image)),
        }
    }

    pub fn stack(span: u8, rows: Vec<Row>) -> Self {
        Self {
            span,
            block: Some(Block::Stack(rows)),
        }
    }

    /// Text content, if this is a text column.
    pub fn as_text(&self) -> Option<&str> {
        match &self.block {
            Some(Block::Text { text, .. }) => Some(text),
            _ => None,
        }
    }
}

/// A horizontal band of fixed height (mm).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub height: f32,
    pub columns: Vec<Column>,
}

impl Row {
    pub fn new(height: f32, columns: Vec<Column>) -> Self {
        Self { height, columns }
    }

    pub fn empty(height: f32) -> Self {
        Self::new(height, Vec::new())
    }

    /// All text in the row, depth first.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for col in &self.columns {
            match &col.block {
                Some(Block::Text { text, .. }) => out.push(text.as_str()),
                Some(Block::Stack(rows)) => {
                    for r in rows {
                        out.extend(r.texts());
                    }
                }
                _ => {}
            }
        }
        out
    }
}

/// A header row plus a matrix of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Relative column widths; they sum to [`GRID_COLUMNS`].
    pub grid: Vec<u8>,
    pub header_size: f32,
    pub content_size: f32,
    pub align: Align,
    pub alternate_background: Option<Rgb>,
    /// Gap between header and first row, in mm.
    pub header_gap: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Row(Row),
    /// Horizontal rule centred in a band of the given height.
    Line { spacing: f32 },
    Table(Table),
}

/// Complete layout for one output file.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDocument {
    pub page: PageSetup,
    pub background: Rgb,
    pub nodes: Vec<Node>,
}

impl LayoutDocument {
    /// Every text string in emission order, table cells included.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for node in &self.nodes {
            match node {
                Node::Row(row) => out.extend(row.texts()),
                Node::Table(t) => {
                    out.extend(t.header.iter().map(String::as_str));
                    for r in &t.rows {
                        out.extend(r.iter().map(String::as_str));
                    }
                }
                Node::Line { .. } => {}
            }
        }
        out
    }

    /// The first table in the document.
    pub fn table(&self) -> Option<&Table> {
        self.nodes.iter().find_map(|n| match n {
            Node::Table(t) => Some(t),
            _ => None,
        })
    }

    /// The first image in the document, searching stacks.
    pub fn image(&self) -> Option<&ImageBlock> {
        fn in_row(row: &Row) -> Option<&ImageBlock> {
            row.columns.iter().find_map(|c| match &c.block {
                Some(Block::Image(img)) => Some(img),
                Some(Block::Stack(rows)) => rows.iter().find_map(in_row),
                _ => None,
            })
        }
        self.nodes.iter().find_map(|n| match n {
            Node::Row(r) => in_row(r),
            _ => None,
        })
    }
}

/// A page-layout engine that turns a layout tree into output bytes.
pub trait LayoutRenderer {
    fn render(&self, document: &LayoutDocument) -> Result<Vec<u8>, crate::core::FiskalError>;
}

/// Appends layout nodes in order.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: LayoutDocument,
}

impl DocumentBuilder {
    pub fn new(page: PageSetup) -> Self {
        Self {
            document: LayoutDocument {
                page,
                background: Rgb::WHITE,
                nodes: Vec::new(),
            },
        }
    }

    pub fn row(&mut self, height: f32, columns: Vec<Column>) -> &mut Self {
        self.document.nodes.push(Node::Row(Row::new(height, columns)));
        self
    }

    /// Blank vertical space.
    pub fn spacer(&mut self, height: f32) -> &mut Self {
        self.row(height, Vec::new())
    }

    pub fn line(&mut self, spacing: f32) -> &mut Self {
        self.document.nodes.push(Node::Line { spacing });
        self
    }

    pub fn table(&mut self, table: Table) -> &mut Self {
        self.document.nodes.push(Node::Table(table));
        self
    }

    pub fn build(self) -> LayoutDocument {
        self.document
    }
}

/// Two half-width text columns.
pub(crate) fn halves(left: String, right: String, style: TextStyle) -> Vec<Column> {
    vec![Column::text(6, left, style), Column::text(6, right, style)]
}

/// `label value` joined by a single space.
pub(crate) fn labelled(label: &str, value: &str) -> String {
    format!("{label} {value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_order() {
        let mut b = DocumentBuilder::new(PageSetup::a4_portrait());
        b.row(4.0, vec![Column::text(12, "first", TextStyle::BODY)])
            .line(2.0)
            .spacer(3.0)
            .row(
                4.0,
                vec![Column::stack(
                    12,
                    vec![Row::new(4.0, vec![Column::text(6, "nested", TextStyle::BODY)])],
                )],
            );
        let doc = b.build();
        assert_eq!(doc.nodes.len(), 4);
        assert_eq!(doc.texts(), vec!["first", "nested"]);
        assert!(matches!(doc.nodes[1], Node::Line { spacing } if spacing == 2.0));
    }

    #[test]
    fn a4_content_width() {
        let page = PageSetup::a4_portrait();
        assert_eq!(page.content_width(), 190.0);
        let landscape = PageSetup {
            orientation: Orientation::Landscape,
            ..page
        };
        assert_eq!(landscape.dimensions(), (297.0, 210.0));
    }

    #[test]
    fn style_presets() {
        assert_eq!(TextStyle::CAPTION_RIGHT.style, FontStyle::Bold);
        assert_eq!(TextStyle::CAPTION_RIGHT.align, Align::Right);
        assert!(!TextStyle::TITLE.extrapolate);
    }
}
