use serde::{Deserialize, Serialize};

/// Tolerance used for every geometric comparison. Layout arithmetic accumulates
/// floating point error, so two coordinates closer than this are the same.
pub const EPSILON: f32 = 0.001;

/// Horizontal alignment of a frame (or its content) within the space it is given
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Justified text; positioned like [`HAlign::Left`]
    Justify,
}

/// Vertical alignment of a frame (or its content) within the space it is given
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A width and a height, in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Size {
        Size { width, height }
    }
}

/// An axis-aligned rectangle in page coordinates (millimetres, origin at the
/// top-left corner of the paper, y growing downwards)
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Rect {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A rect of the given size with its top-left corner at `(left, top)`
    pub fn from_origin(left: f32, top: f32, size: Size) -> Rect {
        Rect::new(left, top, left + size.width, top + size.height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// A rect is empty when it has (almost) no area in either direction
    pub fn is_empty(&self) -> bool {
        self.width() <= EPSILON && self.height() <= EPSILON
    }

    /// Shrink the rect by the given margins, in CSS order
    pub fn with_margins(&self, top: f32, right: f32, bottom: f32, left: f32) -> Rect {
        Rect {
            left: self.left + left,
            top: self.top + top,
            right: self.right - right,
            bottom: self.bottom - bottom,
        }
    }

    /// Position a rect of `size` inside `self` according to the alignment. The
    /// result is clipped so it never extends past the right or bottom edge of
    /// `self`; it may still start before the left/top edge when `size` is
    /// larger than `self` and the alignment is not left/top.
    pub fn aligned(&self, size: Size, h_align: HAlign, v_align: VAlign) -> Rect {
        let left = match h_align {
            HAlign::Left | HAlign::Justify => self.left,
            HAlign::Right => self.right - size.width,
            HAlign::Center => self.left + (self.width() - size.width) / 2.0,
        };
        let top = match v_align {
            VAlign::Top => self.top,
            VAlign::Bottom => self.bottom - size.height,
            VAlign::Middle => self.top + (self.height() - size.height) / 2.0,
        };

        self.clip(Rect::from_origin(left, top, size))
    }

    /// Pull the right and bottom edges of `rect` back inside `self`
    pub fn clip(&self, rect: Rect) -> Rect {
        Rect {
            right: rect.right.min(self.right),
            bottom: rect.bottom.min(self.bottom),
            ..rect
        }
    }

    pub fn size_fits(&self, size: Size) -> bool {
        self.width_fits(size.width) && self.height_fits(size.height)
    }

    pub fn width_fits(&self, width: f32) -> bool {
        width - self.width() <= EPSILON
    }

    pub fn height_fits(&self, height: f32) -> bool {
        height - self.height() <= EPSILON
    }

    /// Equality within [`EPSILON`] on every edge
    pub fn approx_eq(&self, other: &Rect) -> bool {
        (self.left - other.left).abs() <= EPSILON
            && (self.top - other.top).abs() <= EPSILON
            && (self.right - other.right).abs() <= EPSILON
            && (self.bottom - other.bottom).abs() <= EPSILON
    }
}

/// Outcome of sizing a frame against a rect
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SizeState {
    /// The size the frame's content needs, before margins
    pub required_size: Size,
    /// Whether the frame could be placed, at least partially
    pub fits: bool,
    /// Whether content is left over for subsequent space
    pub continued: bool,
}

impl SizeState {
    /// A frame that fits completely in `size`
    pub fn complete(size: Size) -> SizeState {
        SizeState {
            required_size: size,
            fits: true,
            continued: false,
        }
    }

    /// A frame that does not fit at all and must move to the next page
    pub fn deferred() -> SizeState {
        SizeState {
            required_size: Size::ZERO,
            fits: false,
            continued: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_right_and_bottom() {
        let outer = Rect::new(10.0, 10.0, 110.0, 60.0);
        let inner = outer.aligned(Size::new(20.0, 10.0), HAlign::Right, VAlign::Bottom);
        assert!(inner.approx_eq(&Rect::new(90.0, 50.0, 110.0, 60.0)));
    }

    #[test]
    fn aligned_centre_is_clipped_to_the_outer_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 20.0);
        let inner = outer.aligned(Size::new(120.0, 10.0), HAlign::Left, VAlign::Middle);
        assert_eq!(inner.right, 100.0);
        assert_eq!(inner.top, 5.0);
        assert_eq!(inner.bottom, 15.0);
    }

    #[test]
    fn fits_tolerates_rounding() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.size_fits(Size::new(10.0005, 10.0)));
        assert!(!rect.width_fits(10.01));
    }

    #[test]
    fn empty_needs_both_dimensions_collapsed() {
        assert!(Rect::new(5.0, 5.0, 5.0, 5.0).is_empty());
        assert!(!Rect::new(0.0, 5.0, 100.0, 5.0).is_empty());
    }
}
