use super::{Children, FrameId, FrameKind, FrameTree};
use crate::{Rect, Renderer, ReportError, Size, SizeState};

/// Children placed at a fixed position on the page instead of in the flow.
///
/// A normal fixed frame must sit inside the printable area and cannot reach
/// back above content that was already laid out on the page; if the flow is
/// past its anchor it waits for the next page. An overlay may be placed
/// anywhere on the paper and never holds up the page.
#[derive(Debug, Default, Clone)]
pub struct FixedFrame {
    /// Millimetres from the left edge of the paper
    pub offset_left: f32,
    /// Millimetres from the top edge of the paper
    pub offset_top: f32,
    pub overlay: bool,
    pub(crate) children: Children,
}

impl FixedFrame {
    pub fn new(offset_left: f32, offset_top: f32) -> FixedFrame {
        FixedFrame {
            offset_left,
            offset_top,
            ..FixedFrame::default()
        }
    }

    pub fn overlay(offset_left: f32, offset_top: f32) -> FixedFrame {
        FixedFrame {
            overlay: true,
            ..FixedFrame::new(offset_left, offset_top)
        }
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    /// The rect the children are laid out in
    fn anchored(&self, r: &Renderer<'_>, rect: Rect) -> Rect {
        let mut rect = Rect {
            left: self.offset_left,
            top: self.offset_top,
            ..rect
        };
        if self.overlay {
            let paper = r.paper_size();
            rect.right = paper.width;
            rect.bottom = paper.height;
        }
        rect
    }
}

impl FrameTree {
    fn fixed_parts(&self, id: FrameId) -> Option<&FixedFrame> {
        match &self[id].kind {
            FrameKind::Fixed(fixed) => Some(fixed),
            _ => None,
        }
    }

    pub(super) fn calc_fixed(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        for_rect: Rect,
    ) -> Result<SizeState, ReportError> {
        let mut state = SizeState::complete(Size::ZERO);
        let Some(fixed) = self.fixed_parts(id) else {
            return Ok(state);
        };
        let (left, top, overlay) = (fixed.offset_left, fixed.offset_top, fixed.overlay);

        let children = self.children(id).to_vec();
        if !children.is_empty() {
            if !overlay {
                let bounds = r.page_bounds();
                if left < bounds.left
                    || left > bounds.right
                    || top < bounds.top
                    || top > bounds.bottom
                {
                    return Err(ReportError::OutsidePrintableArea { left, top });
                }
                if top < for_rect.top || left < for_rect.left {
                    state.fits = false;
                    return Ok(state);
                }
            }

            let rect = self
                .fixed_parts(id)
                .map_or(for_rect, |fixed| fixed.anchored(r, for_rect));
            for child in children {
                self.calc_size(child, r, rect)?;
                let base = &self[child].base;
                state.required_size.height = state.required_size.height.max(base.size.height);
                state.required_size.width = state.required_size.width.max(base.size.width);
                if base.continued && !overlay {
                    state.continued = true;
                }
            }
        }

        // the bounding box reaches from the flow position to the anchor
        let required = &mut state.required_size;
        required.height = required.height.max(top + required.height - for_rect.top);
        required.width = required.width.max(left + required.width - for_rect.left);
        Ok(state)
    }

    pub(super) fn print_fixed(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        in_rect: Rect,
    ) -> Result<(), ReportError> {
        let Some(fixed) = self.fixed_parts(id) else {
            return Ok(());
        };
        let overlay = fixed.overlay;
        let rect = Rect {
            left: fixed.offset_left,
            top: fixed.offset_top,
            ..in_rect
        };

        let mut continued = false;
        for child in self.children(id).to_vec() {
            self.calc_size(child, r, rect)?;
            self.print(child, r, rect)?;
            if self[child].base.continued && !overlay {
                continued = true;
            }
        }
        if continued {
            self[id].base.continued = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxFrame, PageFormat, RecordingBackend, SerialFrame, TextFrame, TextStyle};

    fn setup() -> (FrameTree, FrameId, FrameId) {
        let mut tree = FrameTree::new();
        let column = tree.insert(SerialFrame::vertical());
        let fixed = tree.add(column, FixedFrame::new(50.0, 100.0)).unwrap();
        tree.add(fixed, TextFrame::new("anchored", TextStyle::default()))
            .unwrap();
        (tree, column, fixed)
    }

    #[test]
    fn anchors_outside_the_printable_area_fail() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let fixed = tree.insert(FixedFrame::new(5.0, 100.0));
        tree.add(fixed, TextFrame::new("x", TextStyle::default()))
            .unwrap();
        let bounds = r.page_bounds();
        let result = tree.calc_size(fixed, &mut r, bounds);
        assert!(matches!(
            result,
            Err(ReportError::OutsidePrintableArea { left, .. }) if left == 5.0
        ));
    }

    #[test]
    fn waits_for_the_next_page_when_the_flow_has_passed() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let (mut tree, _, fixed) = setup();
        let below_anchor = Rect::new(20.0, 150.0, 200.0, 287.0);
        tree.calc_size(fixed, &mut r, below_anchor).unwrap();
        assert!(!tree.base(fixed).fits());
    }

    #[test]
    fn only_an_anchor_above_the_flow_defers() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let fixed = tree.insert(FixedFrame::new(50.0, 100.0));
        tree.add(fixed, BoxFrame::sized(20.0, 300.0)).unwrap();
        let bounds = r.page_bounds();
        tree.calc_size(fixed, &mut r, bounds).unwrap();

        // the box is too tall for the page, the anchor itself is fine
        assert!(tree.base(fixed).fits());
        assert!(tree.base(fixed).continued());
    }

    #[test]
    fn prints_at_the_anchor_and_covers_it() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let (mut tree, column, fixed) = setup();
        let bounds = r.page_bounds();
        tree.print(column, &mut r, bounds).unwrap();
        drop(r);

        // "anchored" is 16 x 5 and sits 90mm below the flow position
        assert_eq!(tree.base(fixed).size().height, 95.0);
        let texts = backend.texts();
        assert_eq!(texts[0].1, Rect::new(50.0, 100.0, 66.0, 105.0));
    }
}
