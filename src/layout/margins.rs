use serde::{Deserialize, Serialize};

/// Space kept clear around a frame or around the printable area of a page,
/// in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: f32, right: f32, bottom: f32, left: f32) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all(value: f32) -> Margins {
        Margins::trbl(value, value, value, value)
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: f32, horizontal: f32) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::default()
    }

    /// The same margins with left and right exchanged, as used on the even
    /// pages of a bound document
    pub fn mirrored(&self) -> Margins {
        Margins {
            left: self.right,
            right: self.left,
            ..*self
        }
    }

    /// The margins to use on the (1-based) `page`. With `mirror` set, even
    /// pages get left and right exchanged so the binding gutter stays inside.
    pub fn for_page(&self, page: usize, mirror: bool) -> Margins {
        if mirror && page % 2 == 0 {
            self.mirrored()
        } else {
            *self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirroring_only_touches_even_pages() {
        let margins = Margins::trbl(10.0, 10.0, 10.0, 20.0);
        assert_eq!(margins.for_page(1, true).left, 20.0);
        assert_eq!(margins.for_page(2, true).left, 10.0);
        assert_eq!(margins.for_page(2, true).right, 20.0);
        assert_eq!(margins.for_page(2, false).left, 20.0);
    }
}
