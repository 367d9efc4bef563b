use crate::{colours, Colour, Rect, Renderer, Size};
use serde::{Deserialize, Serialize};

/// Stroke pattern of a [`Pen`]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dash {
    #[default]
    Solid,
    /// 5 on, 2 off
    Dash,
    /// 5 on, 2 off, 1 on, 2 off
    DashDot,
    /// 1 on, 1 off
    Dot,
    /// Any other on/off pattern, in millimetres
    Custom(Vec<f32>),
}

impl Dash {
    /// The on/off lengths of the pattern; empty for a solid line
    pub fn pattern(&self) -> &[f32] {
        match self {
            Dash::Solid => &[],
            Dash::Dash => &[5.0, 2.0],
            Dash::DashDot => &[5.0, 2.0, 1.0, 2.0],
            Dash::Dot => &[1.0, 1.0],
            Dash::Custom(pattern) => pattern,
        }
    }
}

/// How a line is stroked. A pen with zero extent draws nothing and takes no room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    /// Stroke width in millimetres
    pub extent: f32,
    pub colour: Colour,
    pub dash: Dash,
}

impl Default for Pen {
    fn default() -> Self {
        Pen::none()
    }
}

impl Pen {
    pub fn new(extent: f32, colour: Colour) -> Pen {
        Pen {
            extent,
            colour,
            dash: Dash::Solid,
        }
    }

    /// A solid black pen of the given width
    pub fn solid(extent: f32) -> Pen {
        Pen::new(extent, colours::BLACK)
    }

    /// The invisible pen
    pub fn none() -> Pen {
        Pen::solid(0.0)
    }

    pub fn dashed(mut self, dash: Dash) -> Pen {
        self.dash = dash;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.extent != 0.0
    }
}

/// Four independently styled edges around a rectangle
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub top: Pen,
    pub right: Pen,
    pub bottom: Pen,
    pub left: Pen,
}

impl Border {
    /// The same pen on every edge
    pub fn all(pen: Pen) -> Border {
        Border {
            top: pen.clone(),
            right: pen.clone(),
            bottom: pen.clone(),
            left: pen,
        }
    }

    /// `size` grown by the width of every edge
    pub fn add_to(&self, size: Size) -> Size {
        Size::new(
            size.width + self.left.extent + self.right.extent,
            size.height + self.top.extent + self.bottom.extent,
        )
    }

    /// `rect` shrunk by the width of every edge
    pub fn inner_rect(&self, rect: Rect) -> Rect {
        rect.with_margins(
            self.top.extent,
            self.right.extent,
            self.bottom.extent,
            self.left.extent,
        )
    }

    /// Stroke every visible edge just inside `rect`
    pub fn draw(&self, r: &mut Renderer<'_>, rect: Rect) {
        if self.top.is_visible() {
            let y = rect.top + self.top.extent / 2.0;
            r.line(rect.left, y, rect.right, y, &self.top);
        }
        if self.right.is_visible() {
            let x = rect.right - self.right.extent / 2.0;
            r.line(x, rect.top, x, rect.bottom, &self.right);
        }
        if self.bottom.is_visible() {
            let y = rect.bottom - self.bottom.extent / 2.0;
            r.line(rect.left, y, rect.right, y, &self.bottom);
        }
        if self.left.is_visible() {
            let x = rect.left + self.left.extent / 2.0;
            r.line(x, rect.top, x, rect.bottom, &self.left);
        }
    }
}
