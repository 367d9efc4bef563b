use super::image::scaled_rect;
use super::FrameBase;
use crate::{Rect, Renderer, Size, SizeState};

/// A barcode of the given symbology. Its nominal size sets its proportions
/// and is also the largest it will be drawn.
#[derive(Debug, Clone)]
pub struct BarcodeFrame {
    pub text: String,
    /// Name of the symbology, e.g. `C128` or `QRCODE`, as the backend
    /// understands it
    pub symbology: String,
    pub width: f32,
    pub height: f32,

    barcode_rect: Rect,
}

impl BarcodeFrame {
    pub fn new<T: Into<String>, S: Into<String>>(
        text: T,
        symbology: S,
        width: f32,
        height: f32,
    ) -> BarcodeFrame {
        BarcodeFrame {
            text: text.into(),
            symbology: symbology.into(),
            width,
            height,
            barcode_rect: Rect::default(),
        }
    }

    pub fn barcode_rect(&self) -> Rect {
        self.barcode_rect
    }

    pub(super) fn calc_size(&mut self, base: &FrameBase, rect: Rect) -> SizeState {
        let natural = Size::new(self.width, self.height);
        self.barcode_rect = scaled_rect(natural, true, rect, base.h_align, base.v_align);
        let size = self.barcode_rect.size();
        SizeState {
            required_size: size,
            fits: rect.size_fits(size),
            continued: false,
        }
    }

    pub(super) fn print(&self, r: &mut Renderer<'_>) {
        if !self.text.is_empty() {
            r.barcode(&self.text, &self.symbology, self.barcode_rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameTree, Op, PageFormat, RecordingBackend};

    #[test]
    fn barcodes_scale_down_to_fit() {
        let mut barcode = BarcodeFrame::new("12345", "C128", 60.0, 20.0);
        let state = barcode.calc_size(&FrameBase::default(), Rect::new(0.0, 0.0, 30.0, 100.0));
        assert_eq!(state.required_size, Size::new(30.0, 10.0));
    }

    #[test]
    fn nominal_size_clamps_the_frame() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let barcode = tree.insert(BarcodeFrame::new("12345", "C128", 60.0, 20.0));
        assert_eq!(tree.base(barcode).max_width, 60.0);
        let bounds = r.page_bounds();
        tree.print(barcode, &mut r, bounds).unwrap();
        drop(r);

        assert_eq!(tree.base(barcode).size(), Size::new(60.0, 20.0));
        assert!(backend.ops().contains(&Op::Barcode {
            text: "12345".to_string(),
            symbology: "C128".to_string(),
            rect: Rect::new(20.0, 10.0, 80.0, 30.0),
        }));
    }
}
