use crate::{Backend, Colour, HAlign, Pen, Rect, ReportError, Size, TextStyle, VAlign};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One call made to a [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    BeginDocument,
    AddPage(Size),
    Line {
        from: (f32, f32),
        to: (f32, f32),
        pen: Pen,
    },
    FillRect {
        rect: Rect,
        colour: Colour,
    },
    Text {
        text: String,
        rect: Rect,
        h_align: HAlign,
        v_align: VAlign,
        colour: Colour,
    },
    Image {
        path: PathBuf,
        rect: Rect,
    },
    Barcode {
        text: String,
        symbology: String,
        rect: Rect,
    },
}

/// A backend with fixed-pitch metrics that keeps a display list instead of
/// drawing. Every character is `char_width` wide and every line
/// `line_height` tall, whatever the style, which makes layouts easy to
/// predict.
///
/// ```
/// use report_gen::{Backend, RecordingBackend, TextStyle};
///
/// let mut backend = RecordingBackend::new();
/// let size = backend.text_size(&TextStyle::default(), "hello world", Some(12.0));
/// assert_eq!(size.height, 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    pub char_width: f32,
    pub line_height: f32,
    /// Pixel sizes reported for image paths; unknown paths are missing files
    pub images: Vec<(PathBuf, (u32, u32))>,
    ops: Vec<Op>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        RecordingBackend {
            char_width: 2.0,
            line_height: 5.0,
            images: Vec::new(),
            ops: Vec::new(),
        }
    }
}

impl RecordingBackend {
    pub fn new() -> RecordingBackend {
        RecordingBackend::default()
    }

    /// Pretend an image with the given pixel size lives at `path`
    pub fn with_image<P: AsRef<Path>>(mut self, path: P, size: (u32, u32)) -> Self {
        self.images.push((path.as_ref().to_path_buf(), size));
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of pages added since the last document was started
    pub fn page_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::AddPage(_)))
            .count()
    }

    /// The display list split by page; operations before the first page are
    /// dropped
    pub fn pages(&self) -> Vec<&[Op]> {
        let mut pages = Vec::new();
        let mut start = None;
        for (i, op) in self.ops.iter().enumerate() {
            if let Op::AddPage(_) = op {
                if let Some(s) = start {
                    pages.push(&self.ops[s..i]);
                }
                start = Some(i + 1);
            }
        }
        if let Some(s) = start {
            pages.push(&self.ops[s..]);
        }
        pages
    }

    /// Every text block drawn, in order, with its layout rect
    pub fn texts(&self) -> Vec<(&str, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, rect, .. } => Some((text.as_str(), *rect)),
                _ => None,
            })
            .collect()
    }
}

impl Backend for RecordingBackend {
    fn line_height(&mut self, _style: &TextStyle) -> f32 {
        self.line_height
    }

    fn text_width(&mut self, _style: &TextStyle, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn char_width(&mut self, _style: &TextStyle, _ch: char) -> f32 {
        self.char_width
    }

    fn image_size(&mut self, path: &Path) -> Result<(u32, u32), ReportError> {
        self.images
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, size)| *size)
            .ok_or_else(|| ReportError::ImageMissing(path.to_path_buf()))
    }

    fn begin_document(&mut self) {
        self.ops.clear();
        self.ops.push(Op::BeginDocument);
    }

    fn add_page(&mut self, paper: Size) {
        self.ops.push(Op::AddPage(paper));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, pen: &Pen) {
        self.ops.push(Op::Line {
            from: (x1, y1),
            to: (x2, y2),
            pen: pen.clone(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        self.ops.push(Op::FillRect { rect, colour });
    }

    fn text_block(
        &mut self,
        text: &str,
        _style: &TextStyle,
        layout: Rect,
        h_align: HAlign,
        v_align: VAlign,
        colour: Colour,
    ) {
        self.ops.push(Op::Text {
            text: text.to_string(),
            rect: layout,
            h_align,
            v_align,
            colour,
        });
    }

    fn image(&mut self, path: &Path, rect: Rect) -> Result<(), ReportError> {
        self.image_size(path)?;
        self.ops.push(Op::Image {
            path: path.to_path_buf(),
            rect,
        });
        Ok(())
    }

    fn barcode(&mut self, text: &str, symbology: &str, rect: Rect) {
        self.ops.push(Op::Barcode {
            text: text.to_string(),
            symbology: symbology.to_string(),
            rect,
        });
    }

    fn finish(&mut self, out: &mut dyn Write) -> Result<(), ReportError> {
        for op in &self.ops {
            writeln!(out, "{op:?}")?;
        }
        Ok(())
    }
}
