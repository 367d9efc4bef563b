//! Low-level layout helpers shared by the frames and the backends.
//!
//! - [`Margins`](crate::layout::Margins) describe clear space around frames and pages,
//!   including mirrored margins for bound documents.
//! - [`wrap_lines`](crate::layout::wrap_lines) breaks text into lines for a given width
//!   using any per-character width measure, which is how every backend answers
//!   "how tall is this text block".

mod margins;
mod text;

pub use margins::*;
pub use text::*;
