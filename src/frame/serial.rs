use super::{Children, FrameId, FrameTree};
use crate::{HAlign, Rect, Renderer, ReportError, Size, SizeState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    #[default]
    Vertical,
}

/// Lays its children out one after another, top to bottom or left to right.
/// A child that does not finish on a page is resumed on the next one without
/// laying out the earlier children again.
#[derive(Debug, Default, Clone)]
pub struct SerialFrame {
    pub direction: Direction,
    pub(crate) children: Children,
}

impl SerialFrame {
    pub fn new(direction: Direction) -> SerialFrame {
        SerialFrame {
            direction,
            children: Children::default(),
        }
    }

    pub fn vertical() -> SerialFrame {
        SerialFrame::new(Direction::Vertical)
    }

    pub fn horizontal() -> SerialFrame {
        SerialFrame::new(Direction::Horizontal)
    }

    pub fn children(&self) -> &Children {
        &self.children
    }
}

fn advance(direction: Direction, size: Size, rect: &mut Rect, required: &mut Size) {
    match direction {
        Direction::Vertical => {
            rect.top += size.height;
            required.height += size.height;
            required.width = required.width.max(size.width);
        }
        Direction::Horizontal => {
            rect.left += size.width;
            required.width += size.width;
            required.height = required.height.max(size.height);
        }
    }
}

impl FrameTree {
    /// Measure, or measure and print, the children of a serial frame from its
    /// cursor onwards. Only printing moves the cursor.
    pub(super) fn flow_children(
        &mut self,
        id: FrameId,
        direction: Direction,
        r: &mut Renderer<'_>,
        in_rect: Rect,
        size_only: bool,
    ) -> Result<SizeState, ReportError> {
        let children = self.children(id).to_vec();
        let count = children.len();
        let saved = self.cursor(id);
        let mut current = saved;
        let mut rect = in_rect;
        let mut state = SizeState::default();
        // first child in a row that did not finish
        let mut resume_at: Option<usize> = None;

        while current < count {
            let child = children[current];

            // right aligned content goes after whatever follows it
            let mut delta = 0.0;
            if direction == Direction::Horizontal && self[child].base.h_align == HAlign::Right {
                for &next in &children[current + 1..] {
                    self.calc_size(next, r, rect)?;
                    delta += self[next].base.size.width;
                }
                rect.right -= delta;
            }

            self.calc_size(child, r, rect)?;
            if !self[child].base.fits {
                let keep_together = self[child].base.keep_together;
                self.reset_size(child, keep_together);
                break;
            }

            state.fits = true;
            if !size_only {
                self.print(child, r, rect)?;
            }
            let size = self[child].base.size;
            advance(direction, size, &mut rect, &mut state.required_size);

            let continued = self[child].base.continued;
            if continued && (direction != Direction::Horizontal || current + 1 >= count) {
                if let Some(index) = resume_at {
                    current = index;
                }
                break;
            }
            if continued && resume_at.is_none() {
                resume_at = Some(current);
            }
            current += 1;
            rect.right += delta;
        }

        match resume_at {
            Some(index) => {
                state.continued = index < count;
                current = index;
            }
            None => state.continued = current < count,
        }
        if current == saved && !state.continued {
            state.fits = true;
        }
        if !size_only {
            self.set_cursor(id, current);
        }
        Ok(state)
    }
}
