use super::refs::{ObjectReferences, RefType};
use crate::ReportError;
use image::{ColorType, DynamicImage, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::fmt;
use std::path::{Path, PathBuf};

enum Pixels {
    /// A baseline JPEG the PDF can carry as it is
    Jpeg { bytes: Vec<u8>, grey: bool },
    Decoded(DynamicImage),
}

/// A raster image loaded from disk, ready to embed
pub struct Image {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pixels: Pixels,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Image {
    /// Load and decode the image at `path`. A file that is not there is
    /// [`ReportError::ImageMissing`]; one that does not decode is
    /// [`ReportError::ImageInvalid`].
    pub fn load(path: &Path) -> Result<Image, ReportError> {
        if !path.is_file() {
            return Err(ReportError::ImageMissing(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        let invalid = |source| ReportError::ImageInvalid {
            path: path.to_path_buf(),
            source,
        };

        let is_tga = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"));
        let format = if is_tga {
            ImageFormat::Tga
        } else {
            image::guess_format(&data).map_err(invalid)?
        };
        let decoded = image::load_from_memory_with_format(&data, format).map_err(invalid)?;
        let (width, height) = (decoded.width(), decoded.height());

        let pixels = match (format, decoded.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => Pixels::Jpeg {
                bytes: data,
                grey: false,
            },
            (ImageFormat::Jpeg, ColorType::L8) => Pixels::Jpeg {
                bytes: data,
                grey: true,
            },
            _ => Pixels::Decoded(decoded),
        };

        Ok(Image {
            path: path.to_path_buf(),
            width,
            height,
            pixels,
        })
    }

    pub(super) fn write(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) {
        let id = refs.get_or_gen(RefType::Image(index));
        let level = CompressionLevel::DefaultLevel as u8;

        match &self.pixels {
            Pixels::Jpeg { bytes, grey } => {
                let mut image = writer.image_xobject(id, bytes);
                image.filter(Filter::DctDecode);
                image.width(self.width as i32);
                image.height(self.height as i32);
                if *grey {
                    image.color_space().device_gray();
                } else {
                    image.color_space().device_rgb();
                }
                image.bits_per_component(8);
            }
            Pixels::Decoded(decoded) => {
                let mask = decoded.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });
                let rgb = compress_to_vec_zlib(decoded.to_rgb8().as_raw(), level);
                let mask_id = mask.as_ref().map(|_| refs.gen(RefType::ImageMask(index)));

                let mut image = writer.image_xobject(id, &rgb);
                image.filter(Filter::FlateDecode);
                image.width(self.width as i32);
                image.height(self.height as i32);
                image.color_space().device_rgb();
                image.bits_per_component(8);
                if let Some(mask_id) = mask_id {
                    image.s_mask(mask_id);
                }
                image.finish();

                if let (Some(mask_id), Some(mask)) = (mask_id, mask) {
                    let mut s_mask = writer.image_xobject(mask_id, &mask);
                    s_mask.filter(Filter::FlateDecode);
                    s_mask.width(self.width as i32);
                    s_mask.height(self.height as i32);
                    s_mask.color_space().device_gray();
                    s_mask.bits_per_component(8);
                }
            }
        }
    }
}
