//! Units of length used throughout the crate.
//!
//! Frames are laid out in millimetres (plain `f32`s inside [`Rect`](crate::Rect)
//! and [`Size`](crate::Size)), font sizes are given in points, and the PDF
//! backend speaks points. These newtypes make the conversions explicit.
//!
//! ```
//! use report_gen::{Mm, Pt, In};
//!
//! let a4_width: Mm = Pt(595.28).into();
//! assert!((a4_width.0 - 210.0).abs() < 0.01);
//!
//! let inch: Pt = In(1.0).into();
//! assert_eq!(inch, Pt(72.0));
//! ```

use derive_more::{Add, AddAssign, Display, From, Into, MulAssign, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;

/// PostScript points, 1/72 of an inch
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    MulAssign,
    Sum,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// Millimetres, the unit frames are laid out in
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    MulAssign,
    Sum,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

/// Inches
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}in")]
pub struct In(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Pt {
        Pt(mm.0 * PT_PER_INCH / MM_PER_INCH)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Mm {
        Mm(pt.0 * MM_PER_INCH / PT_PER_INCH)
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Pt {
        Pt(inches.0 * PT_PER_INCH)
    }
}

impl From<In> for Mm {
    fn from(inches: In) -> Mm {
        Mm(inches.0 * MM_PER_INCH)
    }
}

impl std::ops::Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl std::ops::Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

impl std::ops::Mul<f32> for Mm {
    type Output = Mm;

    fn mul(self, rhs: f32) -> Mm {
        Mm(self.0 * rhs)
    }
}

impl Mm {
    /// Round to two decimals, the precision paper sizes are reported in
    pub fn rounded(self) -> Mm {
        Mm((self.0 * 100.0).round() / 100.0)
    }
}
