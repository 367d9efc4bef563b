use super::refs::{ObjectReferences, RefType};
use crate::{Mm, Pt, ReportError};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A TrueType or OpenType face embedded in the document.
///
/// The whole font file is embedded; widths and the ToUnicode map only
/// cover the glyphs the report actually drew.
pub struct Font {
    face: OwnedFace,
    family: String,
    bold: bool,
    italic: bool,
    /// Glyphs drawn so far, with the character each one stands for
    used: BTreeMap<u16, char>,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family)
            .field("bold", &self.bold)
            .field("italic", &self.italic)
            .finish()
    }
}

impl Font {
    /// Parse a font from raw bytes
    pub fn load(bytes: Vec<u8>) -> Result<Font, ReportError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        let parsed = face.as_face_ref();
        let bold = parsed.is_bold() || parsed.weight().to_number() >= 600;
        let italic = parsed.is_italic() || parsed.is_oblique();

        let mut font = Font {
            face,
            family: String::new(),
            bold,
            italic,
            used: BTreeMap::new(),
        };
        font.family = font
            .name_entry(owned_ttf_parser::name_id::TYPOGRAPHIC_FAMILY)
            .or_else(|| font.name_entry(owned_ttf_parser::name_id::FAMILY))
            .unwrap_or_else(|| font.name());
        Ok(font)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Font, ReportError> {
        Font::load(std::fs::read(path)?)
    }

    fn face_ref(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Full name of the face, or its PostScript name when it has none
    pub fn name(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
            .or_else(|| self.name_entry(owned_ttf_parser::name_id::POST_SCRIPT_NAME))
            .unwrap_or_else(|| "Unnamed".to_string())
    }

    /// The family styles refer to this face by
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Register the face under a different family name
    pub fn with_family<S: ToString>(mut self, family: S) -> Font {
        self.family = family.to_string();
        self
    }

    fn scaling(&self, size: Pt) -> f32 {
        size.0 / self.face_ref().units_per_em() as f32
    }

    /// Distance from the top of a line to its baseline
    pub fn ascent(&self, size: Pt) -> Mm {
        Pt(self.face_ref().ascender() as f32 * self.scaling(size)).into()
    }

    /// Distance between the baselines of two lines
    pub fn line_height(&self, size: Pt) -> Mm {
        let face = self.face_ref();
        let units = face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32;
        Pt(units * self.scaling(size)).into()
    }

    fn glyph(&self, ch: char) -> GlyphId {
        let face = self.face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .unwrap_or(GlyphId(0))
    }

    pub fn advance(&self, ch: char, size: Pt) -> Mm {
        let advance = self
            .face_ref()
            .glyph_hor_advance(self.glyph(ch))
            .unwrap_or_default();
        Pt(advance as f32 * self.scaling(size)).into()
    }

    /// Two-byte glyph ids of `text` for an Identity-H font, remembering
    /// which glyphs were used
    pub(super) fn encode(&mut self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let gid = self.glyph(ch).0;
            self.used.entry(gid).or_insert(ch);
            bytes.extend_from_slice(&gid.to_be_bytes());
        }
        bytes
    }

    pub(super) fn forget_used(&mut self) {
        self.used.clear();
    }

    /// Glyph advances in thousandths of an em, the unit PDF widths use
    fn pdf_width(&self, gid: u16) -> f32 {
        let face = self.face_ref();
        let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or_default();
        advance as f32 * 1000.0 / face.units_per_em() as f32
    }

    fn write_cid(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) -> Ref {
        let descriptor = self.write_descriptor(refs, index, writer);
        let id = refs.gen(RefType::CidFont(index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor);
        cid_font.default_width(self.pdf_width(0));

        // runs of consecutive glyph ids share one entry
        let mut widths = cid_font.widths();
        let mut run: Option<(u16, Vec<f32>)> = None;
        for &gid in self.used.keys() {
            let width = self.pdf_width(gid);
            if let Some((start, run_widths)) = &mut run {
                if *start as usize + run_widths.len() == gid as usize {
                    run_widths.push(width);
                    continue;
                }
            }
            if let Some((start, run_widths)) = run.replace((gid, vec![width])) {
                widths.consecutive(start, run_widths);
            }
        }
        if let Some((start, run_widths)) = run {
            widths.consecutive(start, run_widths);
        }
        widths.finish();

        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));
        id
    }

    fn write_descriptor(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) -> Ref {
        let data = refs.gen(RefType::FontData(index));
        let bytes = self.face.as_slice();
        writer
            .stream(data, bytes)
            .pair(Name(b"Length1"), bytes.len() as i32);

        let face = self.face_ref();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let bbox = face.global_bounding_box();

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if self.italic {
            flags.insert(FontFlags::ITALIC);
        }

        let id = refs.gen(RefType::FontDescriptor(index));
        let name = format!("F{index}");
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.as_bytes()));
        descriptor.family(Str(self.family.as_bytes()));
        descriptor.weight(face.weight().to_number());
        descriptor.flags(flags);
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(if self.italic { -12.0 } else { 0.0 });
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(face.ascender() as f32 * scaling),
        );
        descriptor.stem_v(if self.bold { 120.0 } else { 80.0 });
        descriptor.font_file2(data);
        id
    }

    fn write_to_unicode(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::ToUnicode(index));

        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );

        // bfchar blocks hold at most 100 entries
        let used: Vec<(u16, char)> = self.used.iter().map(|(&gid, &ch)| (gid, ch)).collect();
        for block in used.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", block.len()));
            for (gid, ch) in block {
                let utf16: String = ch
                    .encode_utf16(&mut [0; 2])
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04x}> <{utf16}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            cmap.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);
        id
    }

    /// Write the face as a Type0 font with an Identity-H encoding
    pub(super) fn write(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) {
        let font_id = refs.get_or_gen(RefType::Font(index));
        let cid_font = self.write_cid(refs, index, writer);
        let to_unicode = self.write_to_unicode(refs, index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font);
        font.to_unicode(to_unicode);
    }
}

/// The Helvetica faces every PDF viewer carries. Used when a style names a
/// family nobody registered a face for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Builtin {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

/// Helvetica advances of the printable ASCII range, in thousandths of an em
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_ASCENT: f32 = 0.718;
const HELVETICA_LINE_HEIGHT: f32 = 1.156;

impl Builtin {
    pub fn for_style(bold: bool, italic: bool) -> Builtin {
        match (bold, italic) {
            (false, false) => Builtin::Regular,
            (true, false) => Builtin::Bold,
            (false, true) => Builtin::Oblique,
            (true, true) => Builtin::BoldOblique,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    fn base_font(self) -> &'static [u8] {
        match self {
            Builtin::Regular => b"Helvetica",
            Builtin::Bold => b"Helvetica-Bold",
            Builtin::Oblique => b"Helvetica-Oblique",
            Builtin::BoldOblique => b"Helvetica-BoldOblique",
        }
    }

    pub fn ascent(self, size: Pt) -> Mm {
        Pt(size.0 * HELVETICA_ASCENT).into()
    }

    pub fn line_height(self, size: Pt) -> Mm {
        Pt(size.0 * HELVETICA_LINE_HEIGHT).into()
    }

    pub fn advance(self, ch: char, size: Pt) -> Mm {
        let code = ch as usize;
        let width = if (0x20..0x7f).contains(&code) {
            HELVETICA_WIDTHS[code - 0x20]
        } else {
            556
        };
        Pt(width as f32 * size.0 / 1000.0).into()
    }

    /// WinAnsi bytes of `text`; characters outside Latin-1 become `?`
    pub fn encode(self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| match ch as u32 {
                code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
                _ => b'?',
            })
            .collect()
    }

    pub fn write(self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.get_or_gen(RefType::Builtin(self.index()));
        writer
            .type1_font(id)
            .base_font(Name(self.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_not_a_font() {
        assert!(matches!(
            Font::load(vec![0; 16]),
            Err(ReportError::FaceParsingError(_))
        ));
    }

    #[test]
    fn builtin_metrics_follow_helvetica() {
        let width: f32 = "Hello"
            .chars()
            .map(|ch| Builtin::Regular.advance(ch, Pt(10.0)).0)
            .sum();
        let expected: Mm = Pt(22.78).into();
        assert!((width - expected.0).abs() < 0.001);
    }

    #[test]
    fn builtin_encoding_replaces_what_winansi_lacks() {
        assert_eq!(Builtin::Bold.encode("é€x"), vec![0xe9, b'?', b'x']);
        assert_eq!(Builtin::for_style(true, true), Builtin::BoldOblique);
    }
}
