//! Paper sizes for the page formats a report can use.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.
//! Use the [`PageOrientation`](crate::pagesize::PageOrientation) trait to convert between
//! portrait and landscape, and [`by_name`](crate::pagesize::by_name) to look a size up by
//! the name a [`PageFormat`](crate::PageFormat) stores.
//!
//! # Available Sizes
//!
//! ## North American
//! `LETTER`, `HALF_LETTER`, `JUNIOR_LEGAL`, `LEGAL`, `TABLOID`, `LEDGER`
//!
//! ## ANSI
//! `ANSI_A` through `ANSI_E`
//!
//! ## ISO A-Series
//! `A0` through `A6`
//!
//! ## Traditional
//! `FOLIO`, `QUARTO`, `OCTAVO`
//!
//! # Example
//!
//! ```
//! use report_gen::pagesize::{self, PageOrientation, A4};
//!
//! assert_eq!(pagesize::by_name("a4"), Some(A4));
//!
//! let landscape = pagesize::in_millimetres(A4.landscape());
//! assert_eq!(landscape.width, 297.0);
//! ```

use crate::units::*;
use crate::Size;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// north american sizes
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const JUNIOR_LEGAL: PageSize = (Pt(5.0 * 72.0), Pt(8.0 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(13.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));
pub const LEDGER: PageSize = (Pt(17.0 * 72.0), Pt(11.0 * 72.0));

// ansi sizes
pub const ANSI_A: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const ANSI_B: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));
pub const ANSI_C: PageSize = (Pt(17.0 * 72.0), Pt(22.0 * 72.0));
pub const ANSI_D: PageSize = (Pt(22.0 * 72.0), Pt(34.0 * 72.0));
pub const ANSI_E: PageSize = (Pt(34.0 * 72.0), Pt(44.0 * 72.0));

// traditional sizes
pub const FOLIO: PageSize = (Pt(12.0 * 72.0), Pt(19.0 * 72.0));
pub const QUARTO: PageSize = (Pt(9.5 * 72.0), Pt(12.0 * 72.0));
pub const OCTAVO: PageSize = (Pt(6.0 * 72.0), Pt(9.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A0: PageSize = (Pt(841.0 * 72.0 / 25.4), Pt(1189.0 * 72.0 / 25.4));
pub const A1: PageSize = (Pt(594.0 * 72.0 / 25.4), Pt(841.0 * 72.0 / 25.4));
pub const A2: PageSize = (Pt(420.0 * 72.0 / 25.4), Pt(594.0 * 72.0 / 25.4));
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

/// Look up a paper size by its conventional name, ignoring case and
/// separators (`"A4"`, `"letter"`, `"half-letter"`, `"ANSI_C"` …)
pub fn by_name(name: &str) -> Option<PageSize> {
    let key: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let size = match key.as_str() {
        "LETTER" => LETTER,
        "HALFLETTER" => HALF_LETTER,
        "JUNIORLEGAL" => JUNIOR_LEGAL,
        "LEGAL" => LEGAL,
        "TABLOID" => TABLOID,
        "LEDGER" => LEDGER,
        "ANSIA" => ANSI_A,
        "ANSIB" => ANSI_B,
        "ANSIC" => ANSI_C,
        "ANSID" => ANSI_D,
        "ANSIE" => ANSI_E,
        "FOLIO" => FOLIO,
        "QUARTO" => QUARTO,
        "OCTAVO" => OCTAVO,
        "A0" => A0,
        "A1" => A1,
        "A2" => A2,
        "A3" => A3,
        "A4" => A4,
        "A5" => A5,
        "A6" => A6,
        _ => return None,
    };
    Some(size)
}

/// Convert a paper size to millimetres, rounded to two decimals
pub fn in_millimetres(size: PageSize) -> Size {
    let width: Mm = size.0.into();
    let height: Mm = size.1.into();
    Size::new(width.rounded().0, height.rounded().0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalised() {
        assert_eq!(by_name("Half Letter"), Some(HALF_LETTER));
        assert_eq!(by_name("ansi-b"), Some(ANSI_B));
        assert_eq!(by_name("B5"), None);
    }

    #[test]
    fn a4_is_210_by_297() {
        let size = in_millimetres(A4);
        assert_eq!(size, Size::new(210.0, 297.0));
    }
}
