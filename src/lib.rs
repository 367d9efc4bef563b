//! Banded report layout: a tree of frames flowed across pages.
//!
//! A [`Report`] owns a header, a footer and a body, each a vertical
//! [`SerialFrame`] in a [`FrameTree`]. Text, tables, boxes, lines, images and
//! the other frames are added to them, and [`Report::render`] lays the tree
//! out page after page onto a [`Backend`]: [`RecordingBackend`] for tests and
//! previews, [`PdfBackend`] for documents.
//!
//! ```
//! use report_gen::{HAlign, RecordingBackend, Report, TableFrame, TableRow, TextFrame, TextStyle};
//!
//! let mut report = Report::default();
//! report
//!     .add_to_header(TextFrame::new("Stock list", TextStyle::default()))
//!     .unwrap();
//!
//! let mut table = TableFrame::new();
//! table.add_column("item", "Item", 60.0, HAlign::Left, 0.0);
//! table.add_column("qty", "Qty", 20.0, HAlign::Right, 0.0);
//! table.add_row(TableRow::detail().cell("item", "Bolts").cell("qty", 120));
//! report.add_to_body(table).unwrap();
//!
//! let mut backend = RecordingBackend::new();
//! assert_eq!(report.render(&mut backend).unwrap(), 1);
//! ```

mod colour;
pub use colour::*;

mod error;
pub use error::*;

mod frame;
pub use frame::*;

/// Utility functions and structures to lay out text and margins
pub mod layout;
pub use layout::Margins;

mod page_format;
pub use page_format::*;

/// Paper sizes, in points
pub mod pagesize;

mod pdf;
pub use pdf::*;

mod pen;
pub use pen::*;

mod recording;
pub use recording::*;

mod rect;
pub use rect::*;

mod renderer;
pub use renderer::*;

mod report;
pub use report::*;

mod style;
pub use style::*;

mod units;
pub use units::*;

/// The PDF writer [`PdfBackend`] serializes with
pub use pdf_writer;
