use crate::renderer::PageCounting;
use crate::{
    Backend, FrameId, FrameKind, FrameTree, PageFormat, Renderer, ReportError, SerialFrame, VAlign,
};
use std::io::Write;

/// Consecutive pages the body may defer all of its content before the run
/// is abandoned
const MAX_BLANK_PAGES: usize = 3;

/// A complete report: a header and a footer repeated on every page, and a
/// body flowed across as many pages as it needs.
///
/// All three are vertical [`SerialFrame`]s in [`Report::tree`].
///
/// ```
/// use report_gen::{RecordingBackend, Report, TextFrame, TextStyle};
///
/// let mut report = Report::default();
/// report.count_pages = true;
/// report
///     .add_to_footer(TextFrame::new("[VAR_PAGE]/[VAR_TOTAL_PAGES]", TextStyle::default()))
///     .unwrap();
/// report
///     .add_to_body(TextFrame::new("Hello", TextStyle::default()))
///     .unwrap();
///
/// let mut backend = RecordingBackend::new();
/// assert_eq!(report.render(&mut backend).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct Report {
    pub tree: FrameTree,
    /// Format of every page a break does not change
    pub page_format: PageFormat,
    /// Lay the report out twice so `[VAR_TOTAL_PAGES]` is known from the
    /// first page on
    pub count_pages: bool,
    /// Clamp on the header's height; zero for none
    pub header_max_height: f32,
    /// Clamp on the footer's height; zero for none
    pub footer_max_height: f32,

    header: FrameId,
    footer: FrameId,
    body: FrameId,
}

impl Default for Report {
    fn default() -> Self {
        Report::new(PageFormat::default())
    }
}

impl Report {
    pub fn new(page_format: PageFormat) -> Report {
        let mut tree = FrameTree::new();
        let header = tree.insert(SerialFrame::vertical());
        let footer = tree.insert(SerialFrame::vertical());
        let body = tree.insert(SerialFrame::vertical());
        tree.base_mut(footer).v_align = VAlign::Bottom;

        Report {
            tree,
            page_format,
            count_pages: false,
            header_max_height: 0.0,
            footer_max_height: 0.0,
            header,
            footer,
            body,
        }
    }

    pub fn header(&self) -> FrameId {
        self.header
    }

    pub fn footer(&self) -> FrameId {
        self.footer
    }

    pub fn body(&self) -> FrameId {
        self.body
    }

    pub fn add_to_header<K: Into<FrameKind>>(&mut self, kind: K) -> Result<FrameId, ReportError> {
        self.tree.add(self.header, kind)
    }

    pub fn add_to_footer<K: Into<FrameKind>>(&mut self, kind: K) -> Result<FrameId, ReportError> {
        self.tree.add(self.footer, kind)
    }

    pub fn add_to_body<K: Into<FrameKind>>(&mut self, kind: K) -> Result<FrameId, ReportError> {
        self.tree.add(self.body, kind)
    }

    /// True when a frame of the header, footer or body is its own ancestor
    pub fn has_cycle(&self) -> bool {
        [self.header, self.footer, self.body]
            .into_iter()
            .any(|root| self.tree.has_cycle(root))
    }

    /// Lay the report out onto `backend` without serializing it, returning
    /// the number of pages
    pub fn render(&mut self, backend: &mut dyn Backend) -> Result<usize, ReportError> {
        if self.has_cycle() {
            return Err(ReportError::Cycle);
        }

        let mut r = Renderer::new(backend, self.page_format.clone());
        if self.count_pages {
            r.set_counting(PageCounting::Counting);
            let pages = self.run_pass(&mut r)?;
            log::debug!("counted {} pages", pages);
            r.set_counting(PageCounting::Counted);
        }
        let pages = self.run_pass(&mut r)?;
        log::debug!("rendered {} pages", pages);
        Ok(pages)
    }

    /// Lay the report out and have `backend` write the result to `w`
    pub fn output<W: Write>(
        &mut self,
        backend: &mut dyn Backend,
        mut w: W,
    ) -> Result<usize, ReportError> {
        let pages = self.render(backend)?;
        backend.finish(&mut w)?;
        Ok(pages)
    }

    fn reset(&mut self) {
        for root in [self.header, self.footer, self.body] {
            self.tree.reset(root);
        }
    }

    fn run_pass(&mut self, r: &mut Renderer<'_>) -> Result<usize, ReportError> {
        log::debug!("starting pass {:?}", r.counting());
        r.clear_page_formats();
        r.new_document();
        self.reset();

        let mut blank_pages = 0;
        loop {
            let (more_pages, progressed) = self.print_a_page(r)?;
            log::debug!(
                "page {} done, more pages: {}",
                r.current_page(),
                more_pages
            );
            if !more_pages {
                break;
            }

            if progressed {
                blank_pages = 0;
            } else {
                blank_pages += 1;
                if blank_pages >= MAX_BLANK_PAGES {
                    return Err(ReportError::Stalled {
                        page: r.current_page(),
                    });
                }
            }
            r.add_page();
        }
        Ok(r.current_page())
    }

    /// Print header, footer and as much body as fits on the current page.
    /// Returns whether the body continues and whether any of it was placed.
    fn print_a_page(&mut self, r: &mut Renderer<'_>) -> Result<(bool, bool), ReportError> {
        let mut page_bounds = r.page_bounds();

        if !self.tree.children(self.header).is_empty() {
            let mut bounds = page_bounds;
            if self.header_max_height > 0.0 {
                bounds.bottom = bounds.top + self.header_max_height;
            }
            self.tree.print(self.header, r, bounds)?;
            page_bounds.top += self.tree.base(self.header).size().height;
            self.tree.reset(self.header);
        }

        if !self.tree.children(self.footer).is_empty() {
            let mut bounds = page_bounds;
            if self.footer_max_height > 0.0 {
                bounds.top = bounds.bottom - self.footer_max_height;
            }
            self.tree.calc_size(self.footer, r, bounds)?;
            let base = self.tree.base(self.footer);
            let height = base.size().height;
            let bounds = bounds.aligned(base.size(), base.h_align, base.v_align);
            self.tree.print(self.footer, r, bounds)?;
            page_bounds.bottom -= height;
            self.tree.reset(self.footer);
        }

        if self.tree.children(self.body).is_empty() {
            return Ok((false, true));
        }
        self.tree.print(self.body, r, page_bounds)?;
        let base = self.tree.base(self.body);
        Ok((base.continued(), base.fits()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingBackend, TextFrame, TextStyle};

    fn text(s: &str) -> TextFrame {
        TextFrame::new(s, TextStyle::default())
    }

    #[test]
    fn total_pages_are_known_on_the_first_page() {
        let mut report = Report::default();
        report.count_pages = true;
        report
            .add_to_header(text("Page [VAR_PAGE] of [VAR_TOTAL_PAGES]"))
            .unwrap();
        report
            .add_to_body(text(&vec!["line"; 150].join("\n")))
            .unwrap();

        let mut backend = RecordingBackend::new();
        let pages = report.render(&mut backend).unwrap();
        assert_eq!(pages, 3);
        assert_eq!(backend.page_count(), 3);

        let texts = backend.texts();
        assert_eq!(texts[0].0, "Page 1 of 3");
        let last_header = texts
            .iter()
            .filter(|(text, _)| text.starts_with("Page"))
            .last()
            .map(|(text, _)| *text);
        assert_eq!(last_header, Some("Page 3 of 3"));
    }

    #[test]
    fn without_counting_the_total_grows() {
        let mut report = Report::default();
        report
            .add_to_header(text("[VAR_PAGE]/[VAR_TOTAL_PAGES]"))
            .unwrap();
        report
            .add_to_body(text(&vec!["line"; 100].join("\n")))
            .unwrap();

        let mut backend = RecordingBackend::new();
        report.render(&mut backend).unwrap();
        assert_eq!(backend.texts()[0].0, "1/1");
    }

    #[test]
    fn footers_sit_at_the_bottom_and_shrink_the_body() {
        let mut report = Report::default();
        report.add_to_footer(text("footer")).unwrap();
        let body = report.add_to_body(text("body")).unwrap();

        let mut backend = RecordingBackend::new();
        report.render(&mut backend).unwrap();

        let texts = backend.texts();
        let footer = texts.iter().find(|(t, _)| *t == "footer").unwrap().1;
        // A4 is 297 tall with a 10 bottom margin
        assert_eq!(footer.bottom, 287.0);
        assert_eq!(footer.top, 282.0);
        assert_eq!(report.tree.base(body).sizing_bounds().bottom, 282.0);
    }

    #[test]
    fn header_height_can_be_clamped() {
        let mut report = Report::default();
        report.header_max_height = 7.0;
        report.add_to_header(text("a\nb\nc")).unwrap();
        report.add_to_body(text("body")).unwrap();

        let mut backend = RecordingBackend::new();
        report.render(&mut backend).unwrap();

        let body = backend.texts().into_iter().find(|(t, _)| *t == "body").unwrap();
        // only the first line of the header fits in 7mm
        assert_eq!(body.1.top, 15.0);
    }

    #[test]
    fn content_that_never_fits_stalls() {
        let mut report = Report::default();
        let mut wide = text("x");
        wide.min_width = 500.0;
        report.add_to_body(wide).unwrap();

        let mut backend = RecordingBackend::new();
        assert!(matches!(
            report.render(&mut backend),
            Err(ReportError::Stalled { page: 3 })
        ));
    }

    #[test]
    fn cycles_are_refused_before_output() {
        let mut report = Report::default();
        let inner = report.add_to_body(SerialFrame::vertical()).unwrap();
        let body = report.body();
        report.tree.attach(inner, body).unwrap();

        let mut backend = RecordingBackend::new();
        assert!(matches!(
            report.render(&mut backend),
            Err(ReportError::Cycle)
        ));
        assert!(backend.ops().is_empty());
    }
}
