use crate::{PageFormat, Rect, Renderer, Size, SizeState};

/// Ends the page it is placed on. The pages after it use `format`.
///
/// On the page it triggers on, a break claims all the space it is offered so
/// nothing else follows it there; afterwards it takes no room at all.
#[derive(Debug, Default, Clone)]
pub struct BreakFrame {
    pub format: PageFormat,

    first_time: bool,
    page: usize,
}

impl BreakFrame {
    pub fn new(format: PageFormat) -> BreakFrame {
        BreakFrame {
            format,
            first_time: true,
            page: 0,
        }
    }

    pub(super) fn begin_print(&mut self) {
        self.first_time = true;
    }

    pub(super) fn calc_size(&mut self, r: &mut Renderer<'_>, rect: Rect) -> SizeState {
        let page = r.current_page();
        let mut state = SizeState {
            fits: true,
            ..SizeState::default()
        };

        if self.first_time {
            self.first_time = false;
            self.page = page;
            r.set_page_format(page + 1, self.format.clone());
            state.continued = true;
            state.required_size = rect.size();
        } else if page == self.page {
            state.continued = true;
            state.required_size = rect.size();
        } else {
            state.required_size = Size::ZERO;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameTree, Orientation, RecordingBackend, SerialFrame, TextFrame, TextStyle};

    #[test]
    fn breaks_the_page_and_switches_format() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let column = tree.insert(SerialFrame::vertical());
        tree.add(column, TextFrame::new("before", TextStyle::default()))
            .unwrap();
        tree.add(
            column,
            BreakFrame::new(PageFormat::new("A4", Orientation::Landscape)),
        )
        .unwrap();
        tree.add(column, TextFrame::new("after", TextStyle::default()))
            .unwrap();

        let bounds = r.page_bounds();
        tree.print(column, &mut r, bounds).unwrap();
        assert!(tree.base(column).continued());

        r.add_page();
        assert_eq!(r.paper_size(), Size::new(297.0, 210.0));
        let bounds = r.page_bounds();
        tree.print(column, &mut r, bounds).unwrap();
        assert!(!tree.base(column).continued());
        drop(r);

        let pages = backend.pages();
        assert_eq!(pages.len(), 2);
        let texts = backend.texts();
        assert_eq!(texts[0].0, "before");
        assert_eq!(texts[1].0, "after");
        assert_eq!(texts[1].1.top, 10.0);
    }
}
