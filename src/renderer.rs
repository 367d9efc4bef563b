//! The seam between the layout core and whatever produces marks on paper.
//!
//! Frames never talk to a [`Backend`] directly. They go through a [`Renderer`],
//! which owns page numbering, per-page formats and the silent counting pass,
//! so that a backend only has to measure, draw and serialize.

use crate::layout::{wrap_lines, widest_line};
use crate::{Colour, HAlign, PageFormat, Pen, Rect, ReportError, Size, TextStyle, VAlign};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Placeholder replaced by the current page number
pub const VAR_PAGE: &str = "[VAR_PAGE]";
/// Placeholder replaced by the total number of pages
pub const VAR_TOTAL_PAGES: &str = "[VAR_TOTAL_PAGES]";

/// Something that can measure text and draw a report's pages.
///
/// All coordinates are millimetres from the top-left corner of the paper.
pub trait Backend {
    /// Height of a single line of text set in `style`
    fn line_height(&mut self, style: &TextStyle) -> f32;

    /// Width of `text` set on one line in `style`
    fn text_width(&mut self, style: &TextStyle, text: &str) -> f32;

    /// Width of a single character; the basis of line wrapping
    fn char_width(&mut self, style: &TextStyle, ch: char) -> f32 {
        let mut buf = [0u8; 4];
        self.text_width(style, ch.encode_utf8(&mut buf))
    }

    /// Size of a block of text. With a `max_width` the text is wrapped to it
    /// and the block is exactly that wide; without one only explicit newlines
    /// break lines and the block is as wide as its widest line.
    fn text_size(&mut self, style: &TextStyle, text: &str, max_width: Option<f32>) -> Size {
        let line_height = self.line_height(style);
        match max_width {
            Some(max_width) => {
                let lines = wrap_lines(text, max_width, |ch| self.char_width(style, ch)).len();
                Size::new(max_width, lines as f32 * line_height)
            }
            None => {
                let lines = if text.is_empty() { 0 } else { text.split('\n').count() };
                let width = widest_line(text, |ch| self.char_width(style, ch));
                Size::new(width, lines as f32 * line_height)
            }
        }
    }

    /// Pixel dimensions of the image stored at `path`
    fn image_size(&mut self, path: &Path) -> Result<(u32, u32), ReportError>;

    /// Start a fresh document, discarding anything drawn so far
    fn begin_document(&mut self);

    /// Start a new page of the given paper size; subsequent drawing lands on it
    fn add_page(&mut self, paper: Size);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, pen: &Pen);

    fn fill_rect(&mut self, rect: Rect, colour: Colour);

    /// Draw `text`, wrapped to `layout`, aligned within it
    fn text_block(
        &mut self,
        text: &str,
        style: &TextStyle,
        layout: Rect,
        h_align: HAlign,
        v_align: VAlign,
        colour: Colour,
    );

    /// Draw the image at `path` stretched into `rect`
    fn image(&mut self, path: &Path, rect: Rect) -> Result<(), ReportError>;

    /// Draw `text` encoded as a barcode of the named symbology
    fn barcode(&mut self, text: &str, symbology: &str, rect: Rect);

    /// Serialize the finished document
    fn finish(&mut self, out: &mut dyn Write) -> Result<(), ReportError>;
}

/// Where the renderer is in the two-pass page counting scheme
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PageCounting {
    /// Single pass; the total grows as pages are added
    #[default]
    NotCounting,
    /// The silent pass: pages are counted, nothing reaches the backend
    Counting,
    /// The real pass after counting; the total is final
    Counted,
}

/// The layout core's view of a [`Backend`]
pub struct Renderer<'b> {
    backend: &'b mut dyn Backend,
    formats: BTreeMap<usize, PageFormat>,
    current_page: usize,
    total_pages: usize,
    counting: PageCounting,
}

impl<'b> Renderer<'b> {
    /// A renderer whose pages all use `format` until told otherwise
    pub fn new(backend: &'b mut dyn Backend, format: PageFormat) -> Renderer<'b> {
        let mut formats = BTreeMap::new();
        formats.insert(0, format);
        Renderer {
            backend,
            formats,
            current_page: 0,
            total_pages: 0,
            counting: PageCounting::NotCounting,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn counting(&self) -> PageCounting {
        self.counting
    }

    pub(crate) fn set_counting(&mut self, counting: PageCounting) {
        self.counting = counting;
    }

    /// True while drawing is suppressed
    pub fn is_silent(&self) -> bool {
        self.counting == PageCounting::Counting
    }

    /// The format in effect for `page`: the override with the highest start
    /// page not after `page`
    pub fn page_format(&self, page: usize) -> &PageFormat {
        self.formats
            .range(..=page)
            .next_back()
            .map(|(_, format)| format)
            .unwrap_or_else(|| &self.formats[&0])
    }

    /// Use `format` from page `from_page` onwards
    pub fn set_page_format(&mut self, from_page: usize, format: PageFormat) {
        self.formats.insert(from_page, format);
    }

    /// Drop every per-page override, keeping the document's base format
    pub(crate) fn clear_page_formats(&mut self) {
        self.formats.retain(|&page, _| page == 0);
    }

    /// Printable bounds of the current page
    pub fn page_bounds(&self) -> Rect {
        self.page_bounds_of(self.current_page)
    }

    pub fn page_bounds_of(&self, page: usize) -> Rect {
        self.page_format(page).printable_bounds(page)
    }

    /// Paper size of the current page
    pub fn paper_size(&self) -> Size {
        self.page_format(self.current_page).paper_size()
    }

    pub fn new_document(&mut self) {
        self.current_page = 0;
        if self.counting != PageCounting::Counted {
            self.total_pages = 0;
        }
        if !self.is_silent() {
            self.backend.begin_document();
        }
        self.add_page();
    }

    pub fn add_page(&mut self) {
        self.current_page += 1;
        if self.counting != PageCounting::Counted {
            self.total_pages += 1;
        }
        if !self.is_silent() {
            let paper = self.paper_size();
            self.backend.add_page(paper);
        }
    }

    /// Substitute the page placeholders in `text`
    pub fn replace_page_vars<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.contains(VAR_PAGE) && !text.contains(VAR_TOTAL_PAGES) {
            return Cow::Borrowed(text);
        }
        Cow::Owned(
            text.replace(VAR_PAGE, &self.current_page.to_string())
                .replace(VAR_TOTAL_PAGES, &self.total_pages.to_string()),
        )
    }

    /// How many bytes of `source` produce the first `printed` bytes of its
    /// substituted form. A placeholder is consumed whole once any of its
    /// value is.
    pub fn source_len(&self, source: &str, printed: usize) -> usize {
        let vars = [
            (VAR_PAGE, self.current_page.to_string()),
            (VAR_TOTAL_PAGES, self.total_pages.to_string()),
        ];
        let mut src = 0;
        let mut out = 0;
        while out < printed && src < source.len() {
            let rest = &source[src..];
            match vars.iter().find(|(token, _)| rest.starts_with(token)) {
                Some((token, value)) => {
                    src += token.len();
                    out += value.len();
                }
                None => {
                    let len = rest.chars().next().map_or(1, char::len_utf8);
                    src += len;
                    out += len;
                }
            }
        }
        src
    }

    pub fn line_height(&mut self, style: &TextStyle) -> f32 {
        self.backend.line_height(style)
    }

    pub fn text_width(&mut self, style: &TextStyle, text: &str) -> f32 {
        self.backend.text_width(style, text)
    }

    pub fn text_size(&mut self, style: &TextStyle, text: &str, max_width: Option<f32>) -> Size {
        self.backend.text_size(style, text, max_width)
    }

    pub fn image_size(&mut self, path: &Path) -> Result<(u32, u32), ReportError> {
        self.backend.image_size(path)
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, pen: &Pen) {
        if !self.is_silent() && pen.is_visible() {
            self.backend.line(x1, y1, x2, y2, pen);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        if !self.is_silent() {
            self.backend.fill_rect(rect, colour);
        }
    }

    pub fn text_block(
        &mut self,
        text: &str,
        style: &TextStyle,
        layout: Rect,
        h_align: HAlign,
        v_align: VAlign,
        colour: Colour,
    ) {
        if !self.is_silent() {
            self.backend
                .text_block(text, style, layout, h_align, v_align, colour);
        }
    }

    pub fn image(&mut self, path: &Path, rect: Rect) -> Result<(), ReportError> {
        if self.is_silent() {
            return Ok(());
        }
        self.backend.image(path, rect)
    }

    pub fn barcode(&mut self, text: &str, symbology: &str, rect: Rect) {
        if !self.is_silent() {
            self.backend.barcode(text, symbology, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Margins, RecordingBackend};

    #[test]
    fn formats_apply_from_their_page_onwards() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());

        let mut wide = PageFormat::default();
        wide.margins(Margins::all(5.0));
        r.set_page_format(3, wide);

        assert_eq!(r.page_bounds_of(1).left, 20.0);
        assert_eq!(r.page_bounds_of(2).left, 20.0);
        assert_eq!(r.page_bounds_of(3).left, 5.0);
        assert_eq!(r.page_bounds_of(7).left, 5.0);
    }

    #[test]
    fn page_variables() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();
        r.add_page();

        assert_eq!(
            r.replace_page_vars("Page [VAR_PAGE] of [VAR_TOTAL_PAGES]"),
            "Page 2 of 2"
        );
        assert!(matches!(r.replace_page_vars("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn source_len_maps_through_placeholders() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let source = "p[VAR_PAGE] rest";
        assert_eq!(r.replace_page_vars(source), "p1 rest");
        assert_eq!(r.source_len(source, 1), 1);
        assert_eq!(r.source_len(source, 2), 11);
        assert_eq!(r.source_len(source, 7), source.len());
    }

    #[test]
    fn silent_pass_reaches_no_backend() {
        let mut backend = RecordingBackend::new();
        {
            let mut r = Renderer::new(&mut backend, PageFormat::default());
            r.set_counting(PageCounting::Counting);
            r.new_document();
            r.add_page();
            r.line(0.0, 0.0, 10.0, 0.0, &Pen::solid(1.0));
            assert_eq!(r.total_pages(), 2);
        }
        assert!(backend.ops().is_empty());
    }

    #[test]
    fn counted_total_is_frozen() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.set_counting(PageCounting::Counting);
        r.new_document();
        r.add_page();
        r.add_page();

        r.set_counting(PageCounting::Counted);
        r.new_document();
        assert_eq!(r.current_page(), 1);
        assert_eq!(r.total_pages(), 3);
    }
}
