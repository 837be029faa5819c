//! Fixed-height elements that `genpdf` does not ship.

use genpdf::error::Error;
use genpdf::render::Area;
use genpdf::style::{Color, LineStyle, Style};
use genpdf::{Context, Element, Mm, Position, RenderResult, Size};

/// Wraps an element in a band at least `height` mm tall, optionally filled.
///
/// The band moves to the next page as a whole when the remaining area is
/// shorter than `height`.
pub(super) struct Band {
    height: f64,
    fill: Option<Color>,
    content: Box<dyn Element>,
}

impl Band {
    pub(super) fn new(height: f32, content: Box<dyn Element>) -> Self {
        Self {
            height: f64::from(height),
            fill: None,
            content,
        }
    }

    pub(super) fn filled(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

impl Element for Band {
    fn render(&mut self, context: &Context, area: Area<'_>, style: Style) -> Result<RenderResult, Error> {
        let height = Mm::from(self.height);
        if area.size().height < height {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        if let Some(color) = self.fill {
            // a line as thick as the band is a filled rectangle
            let middle = Mm::from(self.height / 2.0);
            area.draw_line(
                vec![Position::new(Mm::from(0.0), middle), Position::new(area.size().width, middle)],
                LineStyle::new().with_thickness(height).with_color(color),
            );
        }

        let width = area.size().width;
        let mut result = self.content.render(context, area, style)?;
        result.size = Size::new(width, if result.size.height < height { height } else { result.size.height });
        Ok(result)
    }
}

/// A horizontal rule centred in a band of `spacing` mm.
pub(super) struct Rule {
    spacing: f64,
}

impl Rule {
    pub(super) fn new(spacing: f32) -> Self {
        Self {
            spacing: f64::from(spacing),
        }
    }
}

impl Element for Rule {
    fn render(&mut self, _context: &Context, area: Area<'_>, _style: Style) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let spacing = Mm::from(self.spacing);
        if area.size().height < spacing {
            result.has_more = true;
            return Ok(result);
        }
        let width = area.size().width;
        let middle = Mm::from(self.spacing / 2.0);
        area.draw_line(
            vec![Position::new(Mm::from(0.0), middle), Position::new(width, middle)],
            LineStyle::new().with_thickness(Mm::from(0.2)),
        );
        result.size = Size::new(width, spacing);
        Ok(result)
    }
}
