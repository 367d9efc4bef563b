use super::FrameBase;
use crate::{Colour, HAlign, Rect, Renderer, Size, SizeState, TextStyle, VAlign, EPSILON};

/// Characters after which a line may be broken when trimming text
const BREAK_CHARS: &str = " .:;,=|+-/*@#[]{}<>()$\\%&?!\r\n\t";

fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}

fn is_break_char(ch: char) -> bool {
    BREAK_CHARS.contains(ch)
}

/// Whether `text` fits the available space. A zero `height` means only the
/// width of a single line matters; otherwise the text is wrapped to `width`
/// and its height compared.
fn text_fits(r: &mut Renderer<'_>, style: &TextStyle, text: &str, width: f32, height: f32) -> bool {
    if height == 0.0 {
        round_to(r.text_width(style, text), 2) <= round_to(width, 2)
    } else {
        round_to(r.text_size(style, text, Some(width)).height, 2) <= round_to(height, 2)
    }
}

/// The longest prefix of `text` that fits the available space, cut back to
/// the last word boundary if that leaves anything.
///
/// Text that is not wrapped is never trimmed; a negative `height` leaves no
/// room for anything.
pub(crate) fn trim_text<'t>(
    r: &mut Renderer<'_>,
    text: &'t str,
    style: &TextStyle,
    wrap: bool,
    width: f32,
    height: f32,
) -> &'t str {
    if text.is_empty() || !wrap {
        return text;
    }
    if height < 0.0 {
        return "";
    }
    if text_fits(r, style, text, width, height) {
        return text;
    }

    // every char boundary; the empty prefix always fits, the whole text does not
    let ends: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let (mut lo, mut hi) = (0, ends.len() - 1);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if text_fits(r, style, &text[..ends[mid]], width, height) {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let cut = &text[..ends[lo]];
    let at_boundary = text[cut.len()..].starts_with(is_break_char);
    let word_end = if at_boundary {
        Some(cut.len())
    } else {
        cut.char_indices()
            .rev()
            .find(|&(_, ch)| is_break_char(ch))
            .map(|(i, ch)| i + ch.len_utf8())
    };

    match word_end.map(|end| cut[..end].trim_end()) {
        Some(words) if !words.is_empty() => words,
        _ => cut,
    }
}

/// Drop characters from the end of `line` until it is no wider than `width`
fn cut_line<'t>(r: &mut Renderer<'_>, style: &TextStyle, line: &'t str, width: f32) -> &'t str {
    let mut line = line;
    while !line.is_empty() && r.text_width(style, line) - width > EPSILON {
        let mut chars = line.chars();
        chars.next_back();
        line = chars.as_str();
    }
    line
}

/// A run of styled text.
///
/// Wrapped text that does not fit is split at a word boundary and continues
/// in the next space it is offered, typically on the next page. Text that is
/// not wrapped is truncated instead. The placeholders
/// [`VAR_PAGE`](crate::VAR_PAGE) and [`VAR_TOTAL_PAGES`](crate::VAR_TOTAL_PAGES)
/// are substituted when the text is laid out.
#[derive(Debug, Clone)]
pub struct TextFrame {
    pub text: String,
    pub style: TextStyle,
    /// Narrower space than this is not used at all
    pub min_width: f32,
    pub wrap: bool,
    /// Overrides the style's text colour
    pub text_colour: Option<Colour>,

    /// Byte offset into `text` of the first character not yet printed
    char_index: usize,
    /// What is left of `text`, leading whitespace dropped and placeholders
    /// substituted
    to_print: String,
    /// Bytes of `to_print` that fit the last sizing
    fitted: usize,
    /// Whitespace dropped from the front of the remaining source
    skipped: usize,
    /// The lines of `to_print` were cut to width
    cut_lines: bool,
    layout: Rect,
}

impl TextFrame {
    pub fn new<S: Into<String>>(text: S, style: TextStyle) -> TextFrame {
        TextFrame {
            text: text.into(),
            style,
            min_width: 1.0,
            wrap: true,
            text_colour: None,
            char_index: 0,
            to_print: String::new(),
            fitted: 0,
            skipped: 0,
            cut_lines: false,
            layout: Rect::default(),
        }
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn min_width(mut self, min_width: f32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.text_colour = Some(colour);
        self
    }

    /// Byte offset of the first character not printed yet
    pub fn char_index(&self) -> usize {
        self.char_index
    }

    /// Where the text was placed by the last sizing
    pub fn layout(&self) -> Rect {
        self.layout
    }

    pub(super) fn begin_print(&mut self) {
        self.char_index = 0;
    }

    fn prepare(&mut self, r: &Renderer<'_>) {
        let rest = self.text.get(self.char_index..).unwrap_or_default();
        let trimmed = if self.char_index > 0 {
            rest.trim_start()
        } else {
            rest
        };
        self.skipped = rest.len() - trimmed.len();
        self.to_print = r.replace_page_vars(trimmed).into_owned();
    }

    pub(super) fn calc_size(
        &mut self,
        base: &FrameBase,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> SizeState {
        self.layout = rect;
        let line_height = r.line_height(&self.style);
        if round_to(rect.height(), 3) < round_to(line_height, 3)
            || round_to(rect.width(), 3) < round_to(self.min_width, 3)
        {
            return SizeState::deferred();
        }

        self.prepare(r);
        self.set_text_size(base, r, rect, line_height)
    }

    fn set_text_size(
        &mut self,
        base: &FrameBase,
        r: &mut Renderer<'_>,
        rect: Rect,
        line_height: f32,
    ) -> SizeState {
        let mut state = SizeState {
            fits: true,
            ..SizeState::default()
        };
        self.fitted = self.to_print.len();
        self.cut_lines = false;
        let mut truncated = false;

        let width_limit = if base.h_align == HAlign::Right || !self.wrap {
            None
        } else if base.use_full_width || base.max_width > 0.0 {
            Some(rect.width())
        } else {
            None
        };
        let mut required = r.text_size(&self.style, &self.to_print, width_limit);

        if !rect.width_fits(required.width) {
            if !self.wrap && self.to_print.contains('\n') {
                let cut = self
                    .to_print
                    .split('\n')
                    .map(|line| cut_line(r, &self.style, line, rect.width()))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.to_print = cut;
                self.fitted = self.to_print.len();
                self.cut_lines = true;
                required.width = rect.width();
            } else {
                let trimmed = trim_text(
                    r,
                    &self.to_print,
                    &self.style,
                    self.wrap,
                    rect.width(),
                    rect.height(),
                );
                self.fitted = trimmed.len();
                if self.wrap {
                    required = r.text_size(&self.style, trimmed, Some(rect.width()));
                } else {
                    required.width = rect.width();
                    truncated = self.fitted < self.to_print.len();
                }
            }
        }

        if !rect.height_fits(required.height) {
            let trimmed = trim_text(
                r,
                &self.to_print,
                &self.style,
                self.wrap,
                rect.width(),
                rect.height(),
            );
            self.fitted = trimmed.len();
            required.height = r.text_size(&self.style, trimmed, Some(rect.width())).height;
            if self.fitted < self.to_print.len() && !self.wrap {
                truncated = true;
            }
        }

        if required.height == 0.0 {
            required.height = line_height;
        }

        if self.fitted < self.to_print.len() {
            if base.keep_together {
                self.fitted = 0;
                return SizeState::deferred();
            }
            if !truncated {
                state.continued = true;
            }
        }

        self.layout = rect.aligned(required, base.h_align, base.v_align);
        state.required_size = self.layout.size();
        state
    }

    pub(super) fn print(&mut self, base: &FrameBase, r: &mut Renderer<'_>, in_rect: Rect) {
        let background = self.style.background;
        if !background.is_white() {
            let mut rect = self.layout;
            if base.use_full_width {
                rect.left = in_rect.left;
                rect.right = in_rect.right;
            }
            if base.use_full_height {
                rect.top = in_rect.top;
                rect.bottom = in_rect.bottom;
            }
            r.fill_rect(rect, background);
        }

        let colour = self.text_colour.unwrap_or(self.style.text_colour);
        let printed = self.to_print.get(..self.fitted).unwrap_or_default();
        r.text_block(printed, &self.style, self.layout, base.h_align, base.v_align, colour);

        let consumed = if self.cut_lines {
            self.text.len() - self.char_index
        } else {
            let source = self
                .text
                .get(self.char_index + self.skipped..)
                .unwrap_or_default();
            self.skipped + r.source_len(source, self.fitted)
        };
        self.char_index = (self.char_index + consumed).min(self.text.len());
    }

    /// Whether the text has to be measured again to be printed into `new`
    /// after being measured in `old`. It keeps its layout if the corner it is
    /// aligned to stays put and there is still room for it.
    pub(super) fn needs_resize(&self, base: &FrameBase, old: Rect, new: Rect) -> bool {
        if base.h_align == HAlign::Center || base.v_align == VAlign::Middle {
            return true;
        }
        let corner = |rect: Rect| {
            let x = if base.h_align == HAlign::Right {
                rect.right
            } else {
                rect.left
            };
            let y = if base.v_align == VAlign::Bottom {
                rect.bottom
            } else {
                rect.top
            };
            (x, y)
        };
        let ((x1, y1), (x2, y2)) = (corner(old), corner(new));
        let same_corner = (x1 - x2).abs() <= EPSILON && (y1 - y2).abs() <= EPSILON;
        !(same_corner && new.size_fits(base.required_size))
    }
}

/// Size of `text` in `style` as a frame would measure it, for callers that
/// lay text out themselves
pub(crate) fn measure(
    r: &mut Renderer<'_>,
    style: &TextStyle,
    text: &str,
    width: Option<f32>,
) -> Size {
    let mut size = r.text_size(style, text, width);
    if size.height == 0.0 {
        size.height = r.line_height(style);
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameTree, PageFormat, RecordingBackend, ReportError};

    fn renderer(backend: &mut RecordingBackend) -> Renderer<'_> {
        let mut r = Renderer::new(backend, PageFormat::default());
        r.new_document();
        r
    }

    #[test]
    fn trims_back_to_the_last_word() {
        let mut backend = RecordingBackend::new();
        let mut r = renderer(&mut backend);
        let style = TextStyle::default();

        assert_eq!(trim_text(&mut r, "hello world foo", &style, true, 20.0, 0.0), "hello");
        assert_eq!(trim_text(&mut r, "aaa bbb ccc ddd", &style, true, 14.0, 5.0), "aaa bbb");
        assert_eq!(trim_text(&mut r, "ab/cdefgh", &style, true, 10.0, 0.0), "ab/");
    }

    #[test]
    fn trimming_keeps_a_cut_word_rather_than_nothing() {
        let mut backend = RecordingBackend::new();
        let mut r = renderer(&mut backend);
        let style = TextStyle::default();

        assert_eq!(trim_text(&mut r, "abcdefghij", &style, true, 8.0, 0.0), "abcd");
        assert_eq!(trim_text(&mut r, "abcdefghij", &style, false, 8.0, 0.0), "abcdefghij");
        assert_eq!(trim_text(&mut r, "abc", &style, true, 8.0, -1.0), "");
    }

    #[test]
    fn continues_where_it_left_off() {
        let mut backend = RecordingBackend::new();
        let mut r = renderer(&mut backend);

        let mut tree = FrameTree::new();
        let text = tree.insert(TextFrame::new("aaaa bbbb cccc dddd", TextStyle::default()));
        tree.base_mut(text).full_width(true);

        // five characters a line, two lines a page
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        tree.print(text, &mut r, rect).unwrap();
        assert!(tree.base(text).continued());
        tree.print(text, &mut r, rect).unwrap();
        assert!(!tree.base(text).continued());
        drop(r);

        let texts: Vec<&str> = backend.texts().into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn keep_together_text_fails_on_a_full_page() {
        let mut backend = RecordingBackend::new();
        let mut r = renderer(&mut backend);

        let mut tree = FrameTree::new();
        let text = tree.insert(TextFrame::new(vec!["line"; 100].join("\n"), TextStyle::default()));
        tree.base_mut(text).keep_together(true);

        let bounds = r.page_bounds();
        let result = tree.calc_size(text, &mut r, bounds);
        assert!(matches!(result, Err(ReportError::KeepTogether)));
    }

    #[test]
    fn too_narrow_space_is_not_used() {
        let mut backend = RecordingBackend::new();
        let mut r = renderer(&mut backend);

        let mut text = TextFrame::new("x", TextStyle::default()).min_width(4.0);
        let state = text.calc_size(&FrameBase::default(), &mut r, Rect::new(0.0, 0.0, 3.0, 50.0));
        assert!(!state.fits);

        let state = text.calc_size(&FrameBase::default(), &mut r, Rect::new(0.0, 0.0, 4.0, 50.0));
        assert!(state.fits);
        assert_eq!(state.required_size, Size::new(2.0, 5.0));
    }

    #[test]
    fn unwrapped_lines_are_cut_to_width() {
        let mut backend = RecordingBackend::new();
        let mut r = renderer(&mut backend);

        let mut tree = FrameTree::new();
        let source = "abcdef\nxy";
        let text = tree.insert(TextFrame::new(source, TextStyle::default()).wrap(false));
        tree.print(text, &mut r, Rect::new(0.0, 0.0, 6.0, 50.0)).unwrap();
        assert!(!tree.base(text).continued());
        let crate::FrameKind::Text(frame) = &tree[text].kind else {
            panic!("not text");
        };
        assert_eq!(frame.char_index(), source.len());
        drop(r);

        assert_eq!(backend.texts()[0].0, "abc\nxy");
    }

    #[test]
    fn page_numbers_are_substituted() {
        let mut backend = RecordingBackend::new();
        let mut r = renderer(&mut backend);

        let mut tree = FrameTree::new();
        let text = tree.insert(TextFrame::new(
            "Page [VAR_PAGE] of [VAR_TOTAL_PAGES]",
            TextStyle::default(),
        ));
        let bounds = r.page_bounds();
        tree.print(text, &mut r, bounds).unwrap();
        drop(r);

        assert_eq!(backend.texts()[0].0, "Page 1 of 1");
    }

    #[test]
    fn moving_the_aligned_corner_forces_a_resize() {
        let text = TextFrame::new("x", TextStyle::default());
        let mut base = FrameBase::default();
        base.required_size = Size::new(2.0, 5.0);
        let old = Rect::new(0.0, 0.0, 100.0, 100.0);

        assert!(!text.needs_resize(&base, old, Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert!(text.needs_resize(&base, old, Rect::new(0.0, 10.0, 100.0, 100.0)));

        base.align(HAlign::Right, VAlign::Top);
        assert!(text.needs_resize(&base, old, Rect::new(0.0, 0.0, 50.0, 100.0)));
        base.align(HAlign::Center, VAlign::Top);
        assert!(text.needs_resize(&base, old, old));
    }
}
