use super::{Children, FrameId, FrameKind, FrameTree};
use crate::{Rect, Renderer, ReportError, Size, SizeState};
use serde::{Deserialize, Serialize};

/// The pages a [`PageFrame`] shows its children on
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnPage {
    #[default]
    All,
    Odd,
    Even,
    AllButFirst,
    /// Only the given 1-based page
    Page(usize),
}

impl OnPage {
    pub fn includes(self, page: usize) -> bool {
        match self {
            OnPage::All => true,
            OnPage::Odd => page % 2 == 1,
            OnPage::Even => page % 2 == 0,
            OnPage::AllButFirst => page != 1,
            OnPage::Page(n) => page == n,
        }
    }
}

/// Lays all of its children over each other, but only on some pages. Mostly
/// useful in headers and footers, e.g. for a different first page.
///
/// A page frame claims the full width of its rect unless told otherwise.
#[derive(Debug, Default, Clone)]
pub struct PageFrame {
    pub on_page: OnPage,
    pub(crate) children: Children,
}

impl PageFrame {
    pub fn new(on_page: OnPage) -> PageFrame {
        PageFrame {
            on_page,
            children: Children::default(),
        }
    }

    pub fn children(&self) -> &Children {
        &self.children
    }
}

impl FrameTree {
    fn shown_on_current_page(&self, id: FrameId, r: &Renderer<'_>) -> bool {
        match &self[id].kind {
            FrameKind::Page(page) => page.on_page.includes(r.current_page()),
            _ => false,
        }
    }

    pub(super) fn calc_page(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> Result<SizeState, ReportError> {
        let children = self.children(id).to_vec();
        // nothing to place on this page: take no room and let the flow go on
        if children.is_empty() || !self.shown_on_current_page(id, r) {
            return Ok(SizeState::complete(Size::ZERO));
        }

        let mut state = SizeState::default();
        for child in children {
            self.calc_size(child, r, rect)?;
            let base = &self[child].base;
            state.required_size.width = state.required_size.width.max(base.size.width);
            state.required_size.height = state.required_size.height.max(base.size.height);
            state.continued |= base.continued;
            state.fits |= base.fits;
        }
        Ok(state)
    }

    pub(super) fn print_page(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        in_rect: Rect,
    ) -> Result<(), ReportError> {
        if !self.shown_on_current_page(id, r) {
            return Ok(());
        }
        let base = &self[id].base;
        let mut rect = in_rect;
        if !base.use_full_width {
            rect.right = rect.left + base.required_size.width;
        }

        let mut continued = false;
        for child in self.children(id).to_vec() {
            self.print(child, r, rect)?;
            continued |= self[child].base.continued;
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
    use crate::{PageFormat, RecordingBackend, TextFrame, TextStyle};

    #[test]
    fn predicates() {
        assert!(OnPage::All.includes(1));
        assert!(OnPage::Odd.includes(3));
        assert!(!OnPage::Odd.includes(4));
        assert!(OnPage::Even.includes(4));
        assert!(!OnPage::AllButFirst.includes(1));
        assert!(OnPage::AllButFirst.includes(2));
        assert!(OnPage::Page(2).includes(2));
        assert!(!OnPage::Page(2).includes(3));
    }

    #[test]
    fn only_prints_on_matching_pages() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let even = tree.insert(PageFrame::new(OnPage::Even));
        let text = tree
            .add(even, TextFrame::new("even", TextStyle::default()))
            .unwrap();
        assert!(tree.base(even).use_full_width);

        let bounds = r.page_bounds();
        tree.calc_size(even, &mut r, bounds).unwrap();
        assert!(tree.base(even).fits());
        assert!(!tree.base(even).continued());
        assert_eq!(tree.base(even).size().height, 0.0);
        tree.print(even, &mut r, bounds).unwrap();

        r.add_page();
        tree.reset(even);
        tree.print(even, &mut r, bounds).unwrap();
        assert_eq!(tree.base(text).size().height, 5.0);
        drop(r);

        let pages = backend.pages();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_empty());
        assert_eq!(pages[1].len(), 1);
    }

    #[test]
    fn an_empty_page_frame_always_fits() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let first = tree.insert(PageFrame::new(OnPage::Page(5)));
        let bounds = r.page_bounds();
        tree.calc_size(first, &mut r, bounds).unwrap();
        assert!(tree.base(first).fits());
    }
}
