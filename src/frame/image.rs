use super::FrameBase;
use crate::{HAlign, Rect, Renderer, ReportError, Size, SizeState, VAlign};
use std::path::{Path, PathBuf};

/// Scale `natural` to fill `rect`, keeping its proportions if asked, and
/// place it according to the alignment
pub(super) fn scaled_rect(
    natural: Size,
    preserve_aspect: bool,
    rect: Rect,
    h_align: HAlign,
    v_align: VAlign,
) -> Rect {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return rect.aligned(Size::ZERO, h_align, v_align);
    }
    let mut scale_w = rect.width() / natural.width;
    let mut scale_h = rect.height() / natural.height;
    if preserve_aspect {
        let scale = scale_w.min(scale_h);
        scale_w = scale;
        scale_h = scale;
    }
    let size = Size::new(natural.width * scale_w, natural.height * scale_h);
    rect.aligned(size, h_align, v_align)
}

/// A raster image read from a file.
///
/// The image is scaled to the space it is given; clamp it with the frame's
/// maximum width and height. The file is only looked at once the report is
/// output, so a missing or broken file surfaces as an error from there.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    pub path: PathBuf,
    pub preserve_aspect: bool,

    pixels: (u32, u32),
    image_rect: Rect,
}

impl ImageFrame {
    pub fn new<P: AsRef<Path>>(path: P) -> ImageFrame {
        ImageFrame {
            path: path.as_ref().to_path_buf(),
            preserve_aspect: true,
            pixels: (0, 0),
            image_rect: Rect::default(),
        }
    }

    pub fn preserve_aspect(mut self, preserve: bool) -> Self {
        self.preserve_aspect = preserve;
        self
    }

    /// Where the image goes, from the last layout
    pub fn image_rect(&self) -> Rect {
        self.image_rect
    }

    pub(super) fn begin_print(&mut self, r: &mut Renderer<'_>) -> Result<(), ReportError> {
        if self.path.as_os_str().is_empty() {
            return Err(ReportError::ImageMissing(self.path.clone()));
        }
        self.pixels = r.image_size(&self.path)?;
        Ok(())
    }

    pub(super) fn calc_size(&mut self, base: &FrameBase, rect: Rect) -> SizeState {
        let natural = Size::new(self.pixels.0 as f32, self.pixels.1 as f32);
        self.image_rect = scaled_rect(
            natural,
            self.preserve_aspect,
            rect,
            base.h_align,
            base.v_align,
        );
        let size = self.image_rect.size();
        SizeState {
            required_size: size,
            fits: rect.size_fits(size),
            continued: false,
        }
    }

    pub(super) fn print(&self, r: &mut Renderer<'_>) -> Result<(), ReportError> {
        r.image(&self.path, self.image_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameTree, Op, PageFormat, RecordingBackend};

    #[test]
    fn images_keep_their_proportions() {
        let mut image = ImageFrame::new("logo.png");
        image.pixels = (200, 100);
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let state = image.calc_size(&FrameBase::default(), rect);
        assert_eq!(state.required_size, Size::new(50.0, 25.0));
        assert!(state.fits);

        image.preserve_aspect = false;
        let state = image.calc_size(&FrameBase::default(), rect);
        assert_eq!(state.required_size, Size::new(50.0, 50.0));
    }

    #[test]
    fn a_missing_image_fails_when_output_starts() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let image = tree.insert(ImageFrame::new("missing.png"));
        let bounds = r.page_bounds();
        assert!(matches!(
            tree.print(image, &mut r, bounds),
            Err(ReportError::ImageMissing(_))
        ));
    }

    #[test]
    fn an_image_without_a_path_is_missing() {
        let mut backend = RecordingBackend::new().with_image("", (10, 10));
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let image = tree.insert(ImageFrame::new(""));
        let bounds = r.page_bounds();
        assert!(matches!(
            tree.calc_size(image, &mut r, bounds),
            Err(ReportError::ImageMissing(path)) if path.as_os_str().is_empty()
        ));
    }

    #[test]
    fn images_are_clamped_and_aligned() {
        let mut backend = RecordingBackend::new().with_image("logo.png", (400, 200));
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let image = tree.insert(ImageFrame::new("logo.png"));
        tree.base_mut(image)
            .max_size(40.0, 0.0)
            .align(HAlign::Right, VAlign::Top);
        tree.print(image, &mut r, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        drop(r);

        let images: Vec<&Op> = backend
            .ops()
            .iter()
            .filter(|op| matches!(op, Op::Image { .. }))
            .collect();
        assert_eq!(
            images,
            vec![&Op::Image {
                path: PathBuf::from("logo.png"),
                rect: Rect::new(60.0, 0.0, 100.0, 20.0),
            }]
        );
    }
}
