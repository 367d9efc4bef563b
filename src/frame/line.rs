use super::{Direction, FrameBase};
use crate::{HAlign, Pen, Rect, Renderer, Size, SizeState, VAlign};

/// A horizontal or vertical rule.
///
/// The line spans its rect unless it has a `length`; the alignment of the
/// frame decides where across (and, with a length, along) the rect it runs.
#[derive(Debug, Default, Clone)]
pub struct LineFrame {
    pub direction: Direction,
    pub pen: Pen,
    /// Zero spans the whole rect
    pub length: f32,

    from: (f32, f32),
    to: (f32, f32),
}

impl LineFrame {
    pub fn new(direction: Direction, pen: Pen) -> LineFrame {
        LineFrame {
            direction,
            pen,
            ..LineFrame::default()
        }
    }

    pub fn horizontal(pen: Pen) -> LineFrame {
        LineFrame::new(Direction::Horizontal, pen)
    }

    pub fn vertical(pen: Pen) -> LineFrame {
        LineFrame::new(Direction::Vertical, pen)
    }

    pub fn length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    /// The end points from the last layout
    pub fn points(&self) -> ((f32, f32), (f32, f32)) {
        (self.from, self.to)
    }

    pub(super) fn set_points(&mut self, base: &FrameBase, rect: Rect) {
        let half = self.pen.extent / 2.0;
        let length = self.length;
        let (x1, y1, x2, y2) = match self.direction {
            Direction::Horizontal => {
                let y = match base.v_align {
                    VAlign::Top => rect.top + half,
                    VAlign::Middle => (rect.top + rect.bottom) / 2.0,
                    VAlign::Bottom => rect.bottom - half,
                };
                let x = match base.h_align {
                    _ if length == 0.0 => rect.left,
                    HAlign::Left | HAlign::Justify => rect.left,
                    HAlign::Center => rect.left + (rect.width() - length) / 2.0,
                    HAlign::Right => rect.right - length,
                };
                let end = if length == 0.0 { rect.right } else { x + length };
                (x, y, end, y)
            }
            Direction::Vertical => {
                let x = match base.h_align {
                    HAlign::Left | HAlign::Justify => rect.left + half,
                    HAlign::Center => (rect.left + rect.right) / 2.0,
                    HAlign::Right => rect.right - half,
                };
                let y = match base.v_align {
                    _ if length == 0.0 => rect.top,
                    VAlign::Top => rect.top,
                    VAlign::Middle => rect.top + (rect.height() - length) / 2.0,
                    VAlign::Bottom => rect.bottom - length,
                };
                let end = if length == 0.0 { rect.bottom } else { y + length };
                (x, y, x, end)
            }
        };

        self.from = (x1.max(rect.left), y1.max(rect.top));
        self.to = (x2.min(rect.right), y2.min(rect.bottom));
    }

    /// The room the line takes: its length along, the pen width across
    pub(super) fn extent_size(&self) -> Size {
        let ((x1, y1), (x2, y2)) = (self.from, self.to);
        match self.direction {
            Direction::Horizontal => Size::new(x2 - x1, self.pen.extent),
            Direction::Vertical => Size::new(self.pen.extent, y2 - y1),
        }
    }

    pub(super) fn calc_size(&mut self, base: &FrameBase, rect: Rect) -> SizeState {
        self.set_points(base, rect);
        let ((x1, y1), (x2, y2)) = (self.from, self.to);
        let fits = match self.direction {
            Direction::Horizontal => y1 == y2,
            Direction::Vertical => x1 == x2,
        };
        SizeState {
            required_size: self.extent_size(),
            fits,
            continued: false,
        }
    }

    pub(super) fn print(&self, r: &mut Renderer<'_>) {
        let ((x1, y1), (x2, y2)) = (self.from, self.to);
        r.line(x1, y1, x2, y2, &self.pen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_the_rect_by_default() {
        let mut line = LineFrame::horizontal(Pen::solid(1.0));
        let state = line.calc_size(&FrameBase::default(), Rect::new(10.0, 20.0, 110.0, 50.0));
        assert!(state.fits);
        assert_eq!(line.points(), ((10.0, 20.5), (110.0, 20.5)));
        assert_eq!(state.required_size, Size::new(100.0, 1.0));
    }

    #[test]
    fn fixed_length_follows_alignment() {
        let mut base = FrameBase::default();
        base.align(HAlign::Right, VAlign::Bottom);
        let mut line = LineFrame::vertical(Pen::solid(2.0)).length(30.0);
        let state = line.calc_size(&base, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(line.points(), ((99.0, 70.0), (99.0, 100.0)));
        assert_eq!(state.required_size, Size::new(2.0, 30.0));
    }

    #[test]
    fn longer_than_the_rect_is_clamped() {
        let mut base = FrameBase::default();
        base.align(HAlign::Center, VAlign::Top);
        let mut line = LineFrame::horizontal(Pen::solid(0.2)).length(150.0);
        let state = line.calc_size(&base, Rect::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(line.points().0 .0, 0.0);
        assert_eq!(line.points().1 .0, 100.0);
        assert_eq!(state.required_size.width, 100.0);
    }
}
