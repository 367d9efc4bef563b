use std::path::PathBuf;
use thiserror::Error;

/// All errors that the crate can generate. Every layout error is fatal for the
/// output run it occurs in; rebuild or reset the report before trying again.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("endless recursion loop in the report structure")]
    /// A frame is its own ancestor
    Cycle,

    #[error("frame is too big to be kept together on one page")]
    /// A keep-together frame does not fit even on an otherwise empty page
    KeepTogether,

    #[error("no space left for another frame")]
    /// A frame was asked to lay out into a degenerate rectangle
    NoSpace,

    #[error("fixed position ({left:.2}, {top:.2}) lies outside the printable area")]
    /// A non-overlay fixed-position frame is anchored outside the page bounds
    OutsidePrintableArea { left: f32, top: f32 },

    #[error("page {page} and the pages before it could not place any content")]
    /// The body kept deferring its content to the next page
    Stalled { page: usize },

    #[error("only containers can hold other frames")]
    /// A child was attached to a leaf frame
    NotAContainer,

    #[error("image file `{0}` does not exist")]
    /// An image frame points at a missing file
    ImageMissing(PathBuf),

    #[error("image file `{path}` is not a valid image")]
    /// An image frame points at something that cannot be decoded
    ImageInvalid {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to encode or decode an image
    Image(#[from] image::ImageError),
}
