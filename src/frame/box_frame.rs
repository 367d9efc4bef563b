use super::{Children, Extent, FrameBase, FrameId, FrameKind, FrameTree};
use crate::layout::Margins;
use crate::{colours, Border, Colour, Rect, Renderer, ReportError, Size, SizeState};

/// A single child wrapped in padding, a border and a background.
///
/// From the outside in: the frame margins, the border, the padding, then the
/// child. The width and height either follow the child or are fixed; a
/// percentage is taken of the parent's sizing bounds once and kept for the
/// rest of the output.
#[derive(Debug, Clone)]
pub struct BoxFrame {
    pub width: Extent,
    pub height: Extent,
    pub border: Border,
    pub padding: Margins,
    /// White means no fill
    pub background: Colour,
    pub(crate) children: Children,

    width_to_use: f32,
    height_to_use: f32,
    border_rect: Rect,
    padding_rect: Rect,
    content_rect: Rect,
}

impl Default for BoxFrame {
    fn default() -> Self {
        BoxFrame {
            width: Extent::Auto,
            height: Extent::Auto,
            border: Border::default(),
            padding: Margins::default(),
            background: colours::WHITE,
            children: Children::default(),
            width_to_use: 0.0,
            height_to_use: 0.0,
            border_rect: Rect::default(),
            padding_rect: Rect::default(),
            content_rect: Rect::default(),
        }
    }
}

impl BoxFrame {
    pub fn new() -> BoxFrame {
        BoxFrame::default()
    }

    /// A box of the given outer size
    pub fn sized<W: Into<Extent>, H: Into<Extent>>(width: W, height: H) -> BoxFrame {
        BoxFrame {
            width: width.into(),
            height: height.into(),
            ..BoxFrame::new()
        }
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn padding(mut self, padding: Margins) -> Self {
        self.padding = padding;
        self
    }

    pub fn background(mut self, colour: Colour) -> Self {
        self.background = colour;
        self
    }

    /// The resolved outer width, zero until the box has been measured with
    /// a fixed or percentage width
    pub fn width_to_use(&self) -> f32 {
        self.width_to_use
    }

    pub fn height_to_use(&self) -> f32 {
        self.height_to_use
    }

    pub fn border_rect(&self) -> Rect {
        self.border_rect
    }

    pub fn content_rect(&self) -> Rect {
        self.content_rect
    }

    /// The largest rect the child may use
    fn max_content_rect(&self, base: &FrameBase, rect: Rect, parent: Option<Rect>) -> Rect {
        let b = &self.border;
        let p = &self.padding;
        let m = &base.margins;

        let mut content = rect;
        content.left += b.left.extent + p.left;
        content.top += b.top.extent + p.top;

        if self.width.is_auto() {
            content.right -= b.right.extent + p.right;
        } else {
            let frame_width = parent.map_or(content.width(), |bounds| bounds.width());
            content.right = content.left + self.width.resolve(frame_width)
                - m.left
                - m.right
                - b.left.extent
                - b.right.extent
                - p.left
                - p.right;
        }

        if self.height.is_auto() {
            content.bottom -= b.bottom.extent + p.bottom;
        } else {
            let frame_height = parent.map_or(content.height(), |bounds| bounds.height());
            content.bottom = content.top + self.height.resolve(frame_height)
                - m.top
                - m.bottom
                - b.top.extent
                - b.bottom.extent
                - p.top
                - p.bottom;
        }
        content
    }

    /// The outer size of the box around `content`, resolving fixed and
    /// percentage extents on first use
    fn border_size(
        &mut self,
        base: &FrameBase,
        rect: Rect,
        content: Size,
        parent: Option<Rect>,
    ) -> Size {
        let b = &self.border;
        let p = &self.padding;
        let m = &base.margins;
        let mut size = rect.size();

        if self.width.is_auto() {
            size.width = content.width + p.left + p.right + b.left.extent + b.right.extent;
        } else {
            if self.width_to_use == 0.0 {
                let frame_width = parent.map_or(rect.width(), |bounds| bounds.width());
                self.width_to_use = self.width.resolve(frame_width);
            }
            size.width = self.width_to_use - m.left - m.right;
        }

        if self.height.is_auto() {
            size.height = content.height + p.top + p.bottom + b.top.extent + b.bottom.extent;
        } else {
            if self.height_to_use == 0.0 {
                let frame_height = parent.map_or(rect.height(), |bounds| bounds.height());
                self.height_to_use = self.height.resolve(frame_height);
            }
            size.height = self.height_to_use - m.top - m.bottom;
        }
        size
    }

    /// Place the border, padding and content rects inside `rect`; returns the
    /// unclipped outer size
    fn layout(
        &mut self,
        base: &FrameBase,
        rect: Rect,
        content: Size,
        parent: Option<Rect>,
    ) -> Size {
        let size = self.border_size(base, rect, content, parent);
        self.border_rect = rect.aligned(size, base.h_align, base.v_align);
        self.padding_rect = self.border.inner_rect(self.border_rect);
        let p = &self.padding;
        self.content_rect = self.padding_rect.with_margins(p.top, p.right, p.bottom, p.left);
        size
    }
}

impl FrameTree {
    fn parent_bounds(&self, id: FrameId) -> Option<Rect> {
        self[id].base.parent.map(|parent| self[parent].base.sizing_bounds)
    }

    fn box_parts(&mut self, id: FrameId) -> Option<(&FrameBase, &mut BoxFrame)> {
        let frame = &mut self[id];
        match &mut frame.kind {
            FrameKind::Box(b) => Some((&frame.base, b)),
            _ => None,
        }
    }

    pub(super) fn calc_box(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> Result<SizeState, ReportError> {
        let parent = self.parent_bounds(id);
        let Some((base, boxed)) = self.box_parts(id) else {
            return Ok(SizeState::complete(Size::ZERO));
        };
        let content_rect = boxed.max_content_rect(base, rect, parent);
        let child = boxed.children.current_frame();

        let mut state = SizeState::complete(Size::ZERO);
        let mut content = Size::ZERO;
        if let Some(child) = child {
            self.calc_size(child, r, content_rect)?;
            let child = &self[child].base;
            content = child.size;
            state.fits = child.fits;
            state.continued = child.continued;
        }

        if let Some((base, boxed)) = self.box_parts(id) {
            let size = boxed.layout(base, rect, content, parent);
            state.required_size = boxed.border_rect.size();
            if !rect.height_fits(size.height) {
                state.fits = false;
                state.continued = true;
            }
        }
        Ok(state)
    }

    pub(super) fn box_rect_changed(&mut self, id: FrameId, new: Rect) -> SizeState {
        let parent = self.parent_bounds(id);
        let content = self
            .children(id)
            .first()
            .map_or(Size::ZERO, |&child| self[child].base.size);
        if let Some((base, boxed)) = self.box_parts(id) {
            boxed.layout(base, new, content, parent);
            return SizeState {
                required_size: boxed.border_rect.size(),
                ..base.state()
            };
        }
        self[id].base.state()
    }

    pub(super) fn print_box(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
    ) -> Result<(), ReportError> {
        let Some((_, boxed)) = self.box_parts(id) else {
            return Ok(());
        };
        boxed.border.draw(r, boxed.border_rect);
        if !boxed.background.is_white() {
            r.fill_rect(boxed.padding_rect, boxed.background);
        }
        let content_rect = boxed.content_rect;
        let child = boxed.children.current_frame();

        if let Some(child) = child {
            self.print(child, r, content_rect)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pen, PageFormat, RecordingBackend, SerialFrame, TextFrame, TextStyle};

    #[test]
    fn percentage_width_is_taken_of_the_parent() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let column = tree.insert(SerialFrame::vertical());
        let half = tree
            .add(column, BoxFrame::sized(Extent::Percent(50.0), Extent::Auto))
            .unwrap();
        tree.add(half, TextFrame::new("text", TextStyle::default()))
            .unwrap();

        let rect = Rect::new(10.0, 0.0, 110.0, 100.0);
        for _ in 0..3 {
            tree.calc_size(column, &mut r, rect).unwrap();
            let FrameKind::Box(boxed) = &tree[half].kind else {
                panic!("not a box");
            };
            assert!((boxed.width_to_use() - 50.0).abs() < crate::EPSILON);
            assert_eq!(tree.base(half).size().width, 50.0);
            tree.reset_size(column, true);
        }
    }

    #[test]
    fn border_and_padding_wrap_the_content() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let boxed = tree.insert(
            BoxFrame::new()
                .border(Border::all(Pen::solid(1.0)))
                .padding(Margins::all(2.0)),
        );
        tree.add(boxed, TextFrame::new("abcde", TextStyle::default()))
            .unwrap();

        tree.print(boxed, &mut r, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        drop(r);

        // 10 x 5 of text, 2mm padding and 1mm border on every side
        assert_eq!(tree.base(boxed).size(), Size::new(16.0, 11.0));
        let texts = backend.texts();
        assert_eq!(texts[0].1, Rect::new(3.0, 3.0, 13.0, 8.0));
        let lines = backend
            .ops()
            .iter()
            .filter(|op| matches!(op, crate::Op::Line { .. }))
            .count();
        assert_eq!(lines, 4);
    }

    #[test]
    fn a_box_taller_than_the_space_does_not_fit() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let boxed = tree.insert(BoxFrame::sized(Extent::Auto, 120.0));
        tree.calc_size(boxed, &mut r, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        assert!(!tree.base(boxed).fits());
        assert!(tree.base(boxed).continued());
    }
}
