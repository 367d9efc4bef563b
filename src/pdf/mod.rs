//! A [`Backend`] that writes PDF.
//!
//! Text is measured with the metrics of the faces registered through
//! [`PdfBackend::add_font`]. A style whose family has no registered face is
//! set in one of the Helvetica faces built into every PDF viewer.

mod font;
mod image;
mod info;
mod refs;

pub use self::font::Font;
pub use self::image::Image;
pub use self::info::DocumentInfo;

use self::font::Builtin;
use self::refs::{ObjectReferences, RefType};
use crate::layout::wrap_lines;
use crate::{
    Backend, Colour, HAlign, Mm, Pen, Pt, Rect, ReportError, Size, TextStyle, VAlign, EPSILON,
};
use id_arena::{Arena, Id};
use pdf_writer::{Content, Finish, Name, Pdf, Ref, Str};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The face a style ends up being set in
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Face {
    Embedded(Id<Font>),
    Builtin(Builtin),
}

impl Face {
    fn resource_name(self) -> String {
        match self {
            Face::Embedded(id) => format!("F{}", id.index()),
            Face::Builtin(builtin) => format!("H{}", builtin.index()),
        }
    }
}

struct PdfPage {
    /// Paper size in points
    width: f32,
    height: f32,
    content: Content,
    /// Operators of content already flushed by [`PdfPage::seal`]
    sealed: Vec<u8>,
    faces: Vec<Face>,
    images: Vec<Id<Image>>,
}

impl PdfPage {
    fn new(paper: Size) -> PdfPage {
        PdfPage {
            width: pt(paper.width),
            height: pt(paper.height),
            content: Content::new(),
            sealed: Vec::new(),
            faces: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Move everything drawn so far into the finished stream
    fn seal(&mut self) {
        let content = std::mem::replace(&mut self.content, Content::new());
        self.sealed.extend_from_slice(&content.finish());
    }

    fn x(&self, x: f32) -> f32 {
        pt(x)
    }

    /// Page y axes point up from the bottom edge
    fn y(&self, y: f32) -> f32 {
        self.height - pt(y)
    }

    fn uses_face(&mut self, face: Face) {
        if !self.faces.contains(&face) {
            self.faces.push(face);
        }
    }

    fn uses_image(&mut self, image: Id<Image>) {
        if !self.images.contains(&image) {
            self.images.push(image);
        }
    }

    fn write(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) {
        let page_id = refs.get_or_gen(RefType::Page(index));
        let content_id = refs.gen(RefType::ContentForPage(index));
        let tree_id = refs.get_or_gen(RefType::PageTree);

        let font_refs: Vec<(String, Ref)> = self
            .faces
            .iter()
            .map(|&face| {
                let ref_type = match face {
                    Face::Embedded(id) => RefType::Font(id.index()),
                    Face::Builtin(builtin) => RefType::Builtin(builtin.index()),
                };
                (face.resource_name(), refs.get_or_gen(ref_type))
            })
            .collect();
        let image_refs: Vec<(String, Ref)> = self
            .images
            .iter()
            .map(|id| {
                (
                    format!("I{}", id.index()),
                    refs.get_or_gen(RefType::Image(id.index())),
                )
            })
            .collect();

        let mut pdf_page = writer.page(page_id);
        pdf_page.media_box(pdf_writer::Rect::new(0.0, 0.0, self.width, self.height));
        pdf_page.parent(tree_id);
        pdf_page.contents(content_id);

        let mut resources = pdf_page.resources();
        let mut fonts = resources.fonts();
        for (name, id) in &font_refs {
            fonts.pair(Name(name.as_bytes()), *id);
        }
        fonts.finish();
        let mut x_objects = resources.x_objects();
        for (name, id) in &image_refs {
            x_objects.pair(Name(name.as_bytes()), *id);
        }
        x_objects.finish();
        resources.finish();
        pdf_page.finish();

        writer.stream(content_id, &self.sealed);
    }
}

fn pt(mm: f32) -> f32 {
    Pt::from(Mm(mm)).0
}

fn set_fill(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_fill_gray(g),
    };
}

fn set_stroke(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_stroke_gray(g),
    };
}

/// Lays reports out with real font metrics and serializes them as PDF.
///
/// ```
/// use report_gen::{PdfBackend, Report, TextFrame, TextStyle};
///
/// let mut report = Report::default();
/// report
///     .add_to_body(TextFrame::new("Hello", TextStyle::default()))
///     .unwrap();
///
/// let mut backend = PdfBackend::new();
/// backend.info.title("Greeting");
/// let mut pdf = Vec::new();
/// report.output(&mut backend, &mut pdf).unwrap();
/// assert!(pdf.starts_with(b"%PDF-"));
/// ```
pub struct PdfBackend {
    pub info: DocumentInfo,
    fonts: Arena<Font>,
    images: Arena<Image>,
    image_ids: Vec<(PathBuf, Id<Image>)>,
    pages: Vec<PdfPage>,
    /// Families already reported as missing
    warned: HashSet<String>,
}

impl Default for PdfBackend {
    fn default() -> Self {
        PdfBackend::new()
    }
}

impl PdfBackend {
    pub fn new() -> PdfBackend {
        PdfBackend {
            info: DocumentInfo::new(),
            fonts: Arena::new(),
            images: Arena::new(),
            image_ids: Vec::new(),
            pages: Vec::new(),
            warned: HashSet::new(),
        }
    }

    /// Make a face available to styles naming its family. The first face
    /// added stands in for families nothing was registered for.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        log::debug!(
            "registered font {} (bold: {}, italic: {})",
            font.family(),
            font.is_bold(),
            font.is_italic()
        );
        self.fonts.alloc(font)
    }

    pub fn load_font<P: AsRef<Path>>(&mut self, path: P) -> Result<Id<Font>, ReportError> {
        let font = Font::from_file(path)?;
        Ok(self.add_font(font))
    }

    pub fn font(&self, id: Id<Font>) -> Option<&Font> {
        self.fonts.get(id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pick the face for `style`: an exact match, then the same family in
    /// another weight or slant, then built-in Helvetica for its own family,
    /// and finally the default face.
    fn face(&mut self, style: &TextStyle) -> Face {
        let family = style.font_family.as_str();
        let mut same_family = None;
        for (id, font) in self.fonts.iter() {
            if !font.family().eq_ignore_ascii_case(family) {
                continue;
            }
            if font.is_bold() == style.bold && font.is_italic() == style.italic {
                return Face::Embedded(id);
            }
            same_family.get_or_insert(id);
        }
        if let Some(id) = same_family {
            return Face::Embedded(id);
        }

        let builtin = Face::Builtin(Builtin::for_style(style.bold, style.italic));
        if family.eq_ignore_ascii_case("helvetica") {
            return builtin;
        }
        if self.warned.insert(family.to_string()) {
            log::warn!("no font registered for family `{family}`, using the default face");
        }
        match self.fonts.iter().next() {
            Some((id, _)) => Face::Embedded(id),
            None => builtin,
        }
    }

    fn ascent(&self, face: Face, size: Pt) -> f32 {
        match face {
            Face::Embedded(id) => self.fonts.get(id).map_or(0.0, |font| font.ascent(size).0),
            Face::Builtin(builtin) => builtin.ascent(size).0,
        }
    }

    fn advance(&self, face: Face, ch: char, size: Pt) -> f32 {
        match face {
            Face::Embedded(id) => self.fonts.get(id).map_or(0.0, |font| font.advance(ch, size).0),
            Face::Builtin(builtin) => builtin.advance(ch, size).0,
        }
    }

    fn encode(&mut self, face: Face, text: &str) -> Vec<u8> {
        match face {
            Face::Embedded(id) => self
                .fonts
                .get_mut(id)
                .map(|font| font.encode(text))
                .unwrap_or_default(),
            Face::Builtin(builtin) => builtin.encode(text),
        }
    }

    fn image_id(&mut self, path: &Path) -> Result<Id<Image>, ReportError> {
        if let Some((_, id)) = self.image_ids.iter().find(|(known, _)| known == path) {
            return Ok(*id);
        }
        let image = Image::load(path)?;
        log::debug!(
            "loaded image {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        let id = self.images.alloc(image);
        self.image_ids.push((path.to_path_buf(), id));
        Ok(id)
    }

    /// Draw one line of `text` with its top-left corner at `(x, y)`
    fn show_line(&mut self, face: Face, style: &TextStyle, text: &str, x: f32, y: f32, width: f32) {
        let size = Pt(style.size);
        let baseline = y + self.ascent(face, size);
        let bytes = self.encode(face, text);
        let Some(page) = self.pages.last_mut() else {
            return;
        };
        page.uses_face(face);

        let (px, py) = (page.x(x), page.y(baseline));
        let content = &mut page.content;
        content.begin_text();
        content.set_font(Name(face.resource_name().as_bytes()), style.size);
        content.next_line(px, py);
        content.show(Str(&bytes));
        content.end_text();

        if style.underline {
            let underline_y = page.y(baseline + Mm::from(size * 0.1).0);
            let content = &mut page.content;
            content.set_line_width(style.size * 0.05);
            content.move_to(px, underline_y);
            content.line_to(px + pt(width), underline_y);
            content.stroke();
        }
    }
}

impl Backend for PdfBackend {
    fn line_height(&mut self, style: &TextStyle) -> f32 {
        let size = Pt(style.size);
        match self.face(style) {
            Face::Embedded(id) => self.fonts.get(id).map_or(0.0, |font| font.line_height(size).0),
            Face::Builtin(builtin) => builtin.line_height(size).0,
        }
    }

    fn text_width(&mut self, style: &TextStyle, text: &str) -> f32 {
        let face = self.face(style);
        let size = Pt(style.size);
        text.chars().map(|ch| self.advance(face, ch, size)).sum()
    }

    fn char_width(&mut self, style: &TextStyle, ch: char) -> f32 {
        let face = self.face(style);
        self.advance(face, ch, Pt(style.size))
    }

    fn image_size(&mut self, path: &Path) -> Result<(u32, u32), ReportError> {
        let id = self.image_id(path)?;
        Ok(self
            .images
            .get(id)
            .map_or((0, 0), |image| (image.width, image.height)))
    }

    fn begin_document(&mut self) {
        self.pages.clear();
        for (_, font) in self.fonts.iter_mut() {
            font.forget_used();
        }
    }

    fn add_page(&mut self, paper: Size) {
        self.pages.push(PdfPage::new(paper));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, pen: &Pen) {
        let Some(page) = self.pages.last_mut() else {
            return;
        };
        let (px1, py1, px2, py2) = (page.x(x1), page.y(y1), page.x(x2), page.y(y2));
        let content = &mut page.content;
        content.save_state();
        content.set_line_width(pt(pen.extent));
        set_stroke(content, pen.colour);
        let pattern = pen.dash.pattern();
        if !pattern.is_empty() {
            content.set_dash_pattern(pattern.iter().map(|&len| pt(len)), 0.0);
        }
        content.move_to(px1, py1);
        content.line_to(px2, py2);
        content.stroke();
        content.restore_state();
    }

    fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        let Some(page) = self.pages.last_mut() else {
            return;
        };
        let (x, y) = (page.x(rect.left), page.y(rect.bottom));
        let content = &mut page.content;
        content.save_state();
        set_fill(content, colour);
        content.rect(x, y, pt(rect.width()), pt(rect.height()));
        content.fill_nonzero();
        content.restore_state();
    }

    fn text_block(
        &mut self,
        text: &str,
        style: &TextStyle,
        layout: Rect,
        h_align: HAlign,
        v_align: VAlign,
        colour: Colour,
    ) {
        let face = self.face(style);
        let size = Pt(style.size);
        let line_height = self.line_height(style);
        let lines = wrap_lines(text, layout.width(), |ch| self.advance(face, ch, size));

        let block_height = lines.len() as f32 * line_height;
        let mut y = match v_align {
            VAlign::Top => layout.top,
            VAlign::Middle => layout.top + (layout.height() - block_height) / 2.0,
            VAlign::Bottom => layout.bottom - block_height,
        };

        if let Some(page) = self.pages.last_mut() {
            page.content.save_state();
            set_fill(&mut page.content, colour);
            set_stroke(&mut page.content, colour);
        }
        for (i, line) in lines.iter().enumerate() {
            if i > 0 && y + line_height > layout.bottom + EPSILON {
                break;
            }
            let width: f32 = line.chars().map(|ch| self.advance(face, ch, size)).sum();
            let x = match h_align {
                HAlign::Left | HAlign::Justify => layout.left,
                HAlign::Center => layout.left + (layout.width() - width) / 2.0,
                HAlign::Right => layout.right - width,
            };
            self.show_line(face, style, line, x, y, width);
            y += line_height;
        }
        if let Some(page) = self.pages.last_mut() {
            page.content.restore_state();
        }
    }

    fn image(&mut self, path: &Path, rect: Rect) -> Result<(), ReportError> {
        let id = self.image_id(path)?;
        let Some(page) = self.pages.last_mut() else {
            return Ok(());
        };
        page.uses_image(id);

        let (x, y) = (page.x(rect.left), page.y(rect.bottom));
        let name = format!("I{}", id.index());
        let content = &mut page.content;
        content.save_state();
        content.transform([pt(rect.width()), 0.0, 0.0, pt(rect.height()), x, y]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();
        Ok(())
    }

    /// Symbols are not generated; the encoded text is set in the rectangle
    /// instead, as large as the rectangle allows
    fn barcode(&mut self, text: &str, symbology: &str, rect: Rect) {
        log::trace!("{symbology} barcode drawn as text");
        let style = TextStyle {
            size: (Pt::from(Mm(rect.height())).0 * 0.8).clamp(4.0, 12.0),
            ..TextStyle::default()
        };
        self.text_block(
            text,
            &style,
            rect,
            HAlign::Center,
            VAlign::Middle,
            crate::colours::BLACK,
        );
    }

    fn finish(&mut self, out: &mut dyn Write) -> Result<(), ReportError> {
        let mut refs = ObjectReferences::new();
        let mut writer = Pdf::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let tree_id = refs.gen(RefType::PageTree);
        let page_ids: Vec<Ref> = (0..self.pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        self.info.write(&mut refs, &mut writer);
        writer
            .pages(tree_id)
            .count(page_ids.len() as i32)
            .kids(page_ids);

        for (index, page) in self.pages.iter_mut().enumerate() {
            page.seal();
            page.write(&mut refs, index, &mut writer);
        }

        let mut builtins_written = Vec::new();
        let mut fonts_written = Vec::new();
        for face in self.pages.iter().flat_map(|page| page.faces.iter().copied()) {
            match face {
                Face::Embedded(id) if !fonts_written.contains(&id) => {
                    if let Some(font) = self.fonts.get(id) {
                        font.write(&mut refs, id.index(), &mut writer);
                    }
                    fonts_written.push(id);
                }
                Face::Builtin(builtin) if !builtins_written.contains(&builtin) => {
                    builtin.write(&mut refs, &mut writer);
                    builtins_written.push(builtin);
                }
                _ => {}
            }
        }

        let mut images_written = Vec::new();
        for id in self.pages.iter().flat_map(|page| page.images.iter().copied()) {
            if images_written.contains(&id) {
                continue;
            }
            if let Some(image) = self.images.get(id) {
                image.write(&mut refs, id.index(), &mut writer);
            }
            images_written.push(id);
        }

        writer.catalog(catalog_id).pages(tree_id);

        log::debug!("writing {} pages of PDF", self.pages.len());
        out.write_all(writer.finish().as_slice())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colours, Margins, PageFormat, Report, TableFrame, TextFrame};

    fn style(size: f32) -> TextStyle {
        TextStyle {
            size,
            ..TextStyle::default()
        }
    }

    #[test]
    fn helvetica_is_measured_without_registered_fonts() {
        let mut backend = PdfBackend::new();
        let width = backend.text_width(&style(10.0), "Hello");
        assert!((width - Mm::from(Pt(22.78)).0).abs() < 0.001);

        let line_height = backend.line_height(&style(10.0));
        assert!((line_height - Mm::from(Pt(11.56)).0).abs() < 0.001);
    }

    #[test]
    fn unknown_families_fall_back() {
        let mut backend = PdfBackend::new();
        let unknown = TextStyle {
            font_family: "Nonexistent".to_string(),
            ..style(10.0)
        };
        assert_eq!(
            backend.text_width(&unknown, "Hello"),
            backend.text_width(&style(10.0), "Hello")
        );
    }

    #[test]
    fn missing_images_are_reported() {
        let mut backend = PdfBackend::new();
        let path = Path::new("definitely/not/here.png");
        assert!(matches!(
            backend.image_size(path),
            Err(ReportError::ImageMissing(missing)) if missing == path
        ));
    }

    #[test]
    fn undecodable_images_are_invalid() {
        let path = std::env::temp_dir().join("report-gen-not-an-image.png");
        std::fs::write(&path, b"plain text").unwrap();

        let mut backend = PdfBackend::new();
        let result = backend.image_size(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ReportError::ImageInvalid { .. })));
    }

    #[test]
    fn images_with_alpha_carry_a_mask() {
        let path = std::env::temp_dir().join("report-gen-alpha.png");
        ::image::RgbaImage::from_pixel(4, 2, ::image::Rgba([255, 0, 0, 128]))
            .save(&path)
            .unwrap();

        let mut backend = PdfBackend::new();
        assert_eq!(backend.image_size(&path).unwrap(), (4, 2));

        backend.begin_document();
        backend.add_page(Size::new(210.0, 297.0));
        backend
            .image(&path, Rect::new(10.0, 10.0, 50.0, 30.0))
            .unwrap();
        let mut pdf = Vec::new();
        Backend::finish(&mut backend, &mut pdf).unwrap();
        std::fs::remove_file(&path).ok();

        let pdf = String::from_utf8_lossy(&pdf);
        assert!(pdf.contains("/SMask"));
        assert!(pdf.contains("/I0"));
    }

    #[test]
    fn reports_become_pdf() {
        let mut format = PageFormat::default();
        format.margins(Margins::all(15.0));
        let mut report = Report::new(format);
        report.count_pages = true;
        report
            .add_to_footer(TextFrame::new(
                "Page [VAR_PAGE] of [VAR_TOTAL_PAGES]",
                style(8.0),
            ))
            .unwrap();

        let mut table = TableFrame::new();
        table.add_column("item", "Item", 60.0, HAlign::Left, 0.0);
        table.add_column("qty", "Qty", 20.0, HAlign::Right, 0.0);
        for i in 0..120 {
            table.add_row(
                crate::TableRow::detail()
                    .cell("item", format!("Item {i}"))
                    .cell("qty", i),
            );
        }
        report.add_to_body(table).unwrap();

        let mut backend = PdfBackend::new();
        backend.info.title("Stock").author("Warehouse");
        let mut pdf = Vec::new();
        let pages = report.output(&mut backend, &mut pdf).unwrap();

        assert!(pages > 1);
        assert_eq!(backend.page_count(), pages);
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/Helvetica-Bold"));
        assert!(text.contains("(Stock)"));
    }

    #[test]
    fn drawing_before_the_first_page_is_ignored() {
        let mut backend = PdfBackend::new();
        backend.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), colours::BLACK);
        backend.line(0.0, 0.0, 1.0, 1.0, &Pen::solid(0.2));
        assert_eq!(backend.page_count(), 0);
    }
}
