use crate::layout::Margins;
use crate::pagesize::{self, PageOrientation};
use crate::{Rect, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Paper, orientation and margins of a run of pages
///
/// ```
/// use report_gen::{Margins, Orientation, PageFormat};
///
/// let mut format = PageFormat::default();
/// format.orientation(Orientation::Landscape).margins(Margins::all(15.0));
///
/// let bounds = format.printable_bounds(1);
/// assert_eq!(bounds.width(), 297.0 - 30.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFormat {
    /// Paper name understood by [`pagesize::by_name`]; unknown names are A4
    pub paper: String,
    pub orientation: Orientation,
    pub margins: Margins,
    /// Exchange the left and right margins on even pages
    pub mirror_margins: bool,
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat {
            paper: "A4".to_string(),
            orientation: Orientation::Portrait,
            margins: Margins::trbl(10.0, 10.0, 10.0, 20.0),
            mirror_margins: false,
        }
    }
}

impl PageFormat {
    pub fn new<S: ToString>(paper: S, orientation: Orientation) -> PageFormat {
        PageFormat {
            paper: paper.to_string(),
            orientation,
            ..PageFormat::default()
        }
    }

    pub fn paper<S: ToString>(&mut self, paper: S) -> &mut Self {
        self.paper = paper.to_string();
        self
    }

    pub fn orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    pub fn margins(&mut self, margins: Margins) -> &mut Self {
        self.margins = margins;
        self
    }

    pub fn mirror_margins(&mut self, mirror: bool) -> &mut Self {
        self.mirror_margins = mirror;
        self
    }

    /// The size of the paper in millimetres, oriented
    pub fn paper_size(&self) -> Size {
        let size = pagesize::by_name(&self.paper).unwrap_or(pagesize::A4);
        let size = match self.orientation {
            Orientation::Portrait => size.portrait(),
            Orientation::Landscape => size.landscape(),
        };
        pagesize::in_millimetres(size)
    }

    /// The area inside the margins of the (1-based) `page`
    pub fn printable_bounds(&self, page: usize) -> Rect {
        let paper = self.paper_size();
        let margins = self.margins.for_page(page, self.mirror_margins);
        Rect::new(
            margins.left,
            margins.top,
            paper.width - margins.right,
            paper.height - margins.bottom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a4_portrait() {
        let format = PageFormat::default();
        assert_eq!(format.paper_size(), Size::new(210.0, 297.0));
        assert_eq!(format.printable_bounds(1), Rect::new(20.0, 10.0, 200.0, 287.0));
    }

    #[test]
    fn mirrored_margins_swap_on_even_pages() {
        let mut format = PageFormat::default();
        format.mirror_margins(true);

        for page in 1..=6 {
            let bounds = format.printable_bounds(page);
            if page % 2 == 1 {
                assert_eq!(bounds.left, 20.0);
                assert_eq!(bounds.right, 200.0);
            } else {
                assert_eq!(bounds.left, 10.0);
                assert_eq!(bounds.right, 190.0);
            }
        }
    }

    #[test]
    fn unknown_paper_is_a4() {
        let format = PageFormat::new("Napkin", Orientation::Landscape);
        assert_eq!(format.paper_size(), Size::new(297.0, 210.0));
    }

    #[test]
    fn loads_partial_json() {
        let format: PageFormat =
            serde_json::from_str(r#"{ "paper": "letter", "mirror_margins": true }"#)
                .expect("valid page format");
        assert_eq!(format.paper_size(), Size::new(215.9, 279.4));
        assert_eq!(format.margins.left, 20.0);
        assert!(format.mirror_margins);
    }
}
