//! The frame tree and the measure-then-paint protocol every frame follows.
//!
//! Frames live in a [`FrameTree`] arena and refer to each other by
//! [`FrameId`]. Each [`Frame`] pairs the state shared by all frames
//! ([`FrameBase`]) with its variant ([`FrameKind`]).
//!
//! Laying out a frame is two steps. [`FrameTree::calc_size`] measures it
//! against a rect and caches the result until the next
//! [`FrameTree::reset_size`]; [`FrameTree::print`] paints it, re-measuring
//! first if it is printed somewhere other than where it was measured.
//! Containers use the first step to look ahead before committing to the
//! second.

mod barcode;
mod box_frame;
mod break_frame;
mod fixed;
mod image;
mod line;
mod page;
mod serial;
mod table;
mod text;

pub use barcode::*;
pub use box_frame::*;
pub use break_frame::*;
pub use fixed::*;
pub use self::image::*;
pub use line::*;
pub use page::*;
pub use serial::*;
pub use table::*;
pub use text::*;

use crate::layout::Margins;
use crate::{HAlign, Rect, Renderer, ReportError, Size, SizeState, VAlign};
use derive_more::From;
use id_arena::{Arena, Id};
use serde::{Deserialize, Serialize};

pub type FrameId = Id<Frame>;

/// A length that is either derived from content, fixed, or a percentage of
/// some enclosing length
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    #[default]
    Auto,
    /// Millimetres
    Fixed(f32),
    Percent(f32),
}

impl Extent {
    /// The length this extent stands for within `whole`; zero for `Auto`
    pub fn resolve(self, whole: f32) -> f32 {
        match self {
            Extent::Auto => 0.0,
            Extent::Fixed(value) => value,
            Extent::Percent(percent) => whole * percent / 100.0,
        }
    }

    /// True when the length comes from the content
    pub fn is_auto(self) -> bool {
        match self {
            Extent::Auto => true,
            Extent::Fixed(value) | Extent::Percent(value) => value <= 0.0,
        }
    }
}

impl From<f32> for Extent {
    fn from(value: f32) -> Self {
        Extent::Fixed(value)
    }
}

/// Child list and resume cursor of a container
#[derive(Debug, Default, Clone)]
pub struct Children {
    pub(crate) frames: Vec<FrameId>,
    pub(crate) current: usize,
}

impl Children {
    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// Index of the child layout resumes from
    pub fn current(&self) -> usize {
        self.current
    }

    fn current_frame(&self) -> Option<FrameId> {
        self.frames.get(self.current).copied()
    }
}

/// Configuration and layout state shared by every frame
#[derive(Debug, Default, Clone)]
pub struct FrameBase {
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub margins: Margins,
    /// Clamp on the width offered to the frame; zero for none
    pub max_width: f32,
    /// Clamp on the height offered to the frame; zero for none
    pub max_height: f32,
    /// Claim the whole width of the offered rect
    pub use_full_width: bool,
    /// Claim the whole height of the offered rect
    pub use_full_height: bool,
    /// Never split the frame across pages
    pub keep_together: bool,

    pub(crate) parent: Option<FrameId>,
    pub(crate) started_printing: bool,
    pub(crate) sized: bool,
    pub(crate) fits: bool,
    pub(crate) continued: bool,
    pub(crate) required_size: Size,
    pub(crate) size: Size,
    pub(crate) sizing_bounds: Rect,
}

impl FrameBase {
    pub fn align(&mut self, h_align: HAlign, v_align: VAlign) -> &mut Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn margins(&mut self, margins: Margins) -> &mut Self {
        self.margins = margins;
        self
    }

    pub fn max_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    pub fn full_width(&mut self, full: bool) -> &mut Self {
        self.use_full_width = full;
        self
    }

    pub fn full_height(&mut self, full: bool) -> &mut Self {
        self.use_full_height = full;
        self
    }

    pub fn keep_together(&mut self, keep: bool) -> &mut Self {
        self.keep_together = keep;
        self
    }

    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    /// The space taken, margins included, from the last sizing
    pub fn size(&self) -> Size {
        self.size
    }

    /// The space the content needs, from the last sizing
    pub fn required_size(&self) -> Size {
        self.required_size
    }

    pub fn fits(&self) -> bool {
        self.fits
    }

    pub fn continued(&self) -> bool {
        self.continued
    }

    pub fn is_sized(&self) -> bool {
        self.sized
    }

    /// The rect the frame was last measured against, after clamps and margins
    pub fn sizing_bounds(&self) -> Rect {
        self.sizing_bounds
    }

    /// Apply the width/height clamps and the margins on the sides the frame
    /// is aligned to
    fn limit_bounds(&self, rect: Rect) -> Rect {
        let mut rect = rect;
        if self.max_width > 0.0 && rect.width() > self.max_width {
            rect = rect.aligned(
                Size::new(self.max_width, rect.height()),
                self.h_align,
                self.v_align,
            );
        }
        if self.max_height > 0.0 && rect.height() > self.max_height {
            rect = rect.aligned(
                Size::new(rect.width(), self.max_height),
                self.h_align,
                self.v_align,
            );
        }

        let m = &self.margins;
        let (left, right) = match self.h_align {
            HAlign::Left => (m.left, 0.0),
            HAlign::Center | HAlign::Justify => (m.left, m.right),
            HAlign::Right => (0.0, m.right),
        };
        let (top, bottom) = match self.v_align {
            VAlign::Top => (m.top, 0.0),
            VAlign::Middle => (m.top, m.bottom),
            VAlign::Bottom => (0.0, m.bottom),
        };
        rect.with_margins(top, right, bottom, left)
    }

    fn set_size(&mut self, required: Size, rect: Rect) {
        self.required_size = required;

        let mut size = Size::new(
            if self.use_full_width {
                rect.width()
            } else {
                required.width + self.margins.left + self.margins.right
            },
            if self.use_full_height {
                rect.height()
            } else {
                required.height + self.margins.top + self.margins.bottom
            },
        );
        if self.max_width > 0.0 {
            size.width = size.width.min(self.max_width);
        }
        if self.max_height > 0.0 {
            size.height = size.height.min(self.max_height);
        }
        size.width = size.width.min(rect.width());
        size.height = size.height.min(rect.height());
        self.size = size;
    }

    fn reset(&mut self) {
        self.started_printing = false;
        self.sized = false;
        self.fits = false;
        self.continued = false;
    }

    fn state(&self) -> SizeState {
        SizeState {
            required_size: self.required_size,
            fits: self.fits,
            continued: self.continued,
        }
    }
}

/// Every kind of frame
#[derive(Debug, From)]
pub enum FrameKind {
    Text(TextFrame),
    Box(BoxFrame),
    Serial(SerialFrame),
    Fixed(FixedFrame),
    Page(PageFrame),
    Table(TableFrame),
    Line(LineFrame),
    Image(ImageFrame),
    Barcode(BarcodeFrame),
    Break(BreakFrame),
}

impl FrameKind {
    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    pub fn children(&self) -> Option<&Children> {
        match self {
            FrameKind::Box(b) => Some(&b.children),
            FrameKind::Serial(s) => Some(&s.children),
            FrameKind::Fixed(f) => Some(&f.children),
            FrameKind::Page(p) => Some(&p.children),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            FrameKind::Box(b) => Some(&mut b.children),
            FrameKind::Serial(s) => Some(&mut s.children),
            FrameKind::Fixed(f) => Some(&mut f.children),
            FrameKind::Page(p) => Some(&mut p.children),
            _ => None,
        }
    }
}

/// One node of the tree
#[derive(Debug)]
pub struct Frame {
    pub base: FrameBase,
    pub kind: FrameKind,
}

/// Owner of every frame of a report
///
/// ```
/// use report_gen::{FrameTree, SerialFrame, TextFrame, TextStyle};
///
/// let mut tree = FrameTree::new();
/// let column = tree.insert(SerialFrame::vertical());
/// let text = tree.add(column, TextFrame::new("Hello", TextStyle::default())).unwrap();
///
/// assert_eq!(tree.children(column), &[text]);
/// assert_eq!(tree[text].base.parent(), Some(column));
/// ```
#[derive(Debug, Default)]
pub struct FrameTree {
    frames: Arena<Frame>,
}

impl std::ops::Index<FrameId> for FrameTree {
    type Output = Frame;

    fn index(&self, id: FrameId) -> &Frame {
        &self.frames[id]
    }
}

impl std::ops::IndexMut<FrameId> for FrameTree {
    fn index_mut(&mut self, id: FrameId) -> &mut Frame {
        &mut self.frames[id]
    }
}

impl FrameTree {
    pub fn new() -> FrameTree {
        FrameTree::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.len() == 0
    }

    /// Add a detached frame to the tree
    pub fn insert<K: Into<FrameKind>>(&mut self, kind: K) -> FrameId {
        let kind = kind.into();
        let mut base = FrameBase::default();
        match &kind {
            FrameKind::Page(_) => base.use_full_width = true,
            FrameKind::Barcode(barcode) => {
                base.max_width = barcode.width;
                base.max_height = barcode.height;
            }
            _ => {}
        }
        self.frames.alloc(Frame { base, kind })
    }

    /// Make `child` the last child of `parent`, returning the new number of
    /// children. A box holds one child, so attaching to a box replaces it.
    pub fn attach(&mut self, parent: FrameId, child: FrameId) -> Result<usize, ReportError> {
        let count = match &mut self.frames[parent].kind {
            FrameKind::Box(b) => {
                b.children.frames = vec![child];
                b.children.current = 0;
                1
            }
            kind => {
                let children = kind.children_mut().ok_or(ReportError::NotAContainer)?;
                children.frames.push(child);
                children.frames.len()
            }
        };
        self.frames[child].base.parent = Some(parent);
        Ok(count)
    }

    /// Insert a frame and attach it to `parent`
    pub fn add<K: Into<FrameKind>>(
        &mut self,
        parent: FrameId,
        kind: K,
    ) -> Result<FrameId, ReportError> {
        if !self.frames[parent].kind.is_container() {
            return Err(ReportError::NotAContainer);
        }
        let id = self.insert(kind);
        self.attach(parent, id)?;
        Ok(id)
    }

    pub fn get(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id)
    }

    pub fn get_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(id)
    }

    pub fn base(&self, id: FrameId) -> &FrameBase {
        &self.frames[id].base
    }

    pub fn base_mut(&mut self, id: FrameId) -> &mut FrameBase {
        &mut self.frames[id].base
    }

    /// The children of a container; empty for leaves
    pub fn children(&self, id: FrameId) -> &[FrameId] {
        self.frames[id]
            .kind
            .children()
            .map(|c| c.frames.as_slice())
            .unwrap_or(&[])
    }

    fn cursor(&self, id: FrameId) -> usize {
        self.frames[id].kind.children().map_or(0, |c| c.current)
    }

    fn set_cursor(&mut self, id: FrameId, current: usize) {
        if let Some(children) = self.frames[id].kind.children_mut() {
            children.current = current;
        }
    }

    /// True when some frame below `root` is its own ancestor
    pub fn has_cycle(&self, root: FrameId) -> bool {
        let mut path = vec![root];
        self.cycle_below(root, &mut path)
    }

    fn cycle_below(&self, id: FrameId, path: &mut Vec<FrameId>) -> bool {
        for &child in self.children(id) {
            if path.contains(&child) {
                return true;
            }
            path.push(child);
            if self.cycle_below(child, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Measure a frame against `rect`. Does nothing while the frame is
    /// still sized from an earlier call.
    pub fn calc_size(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> Result<(), ReportError> {
        self.begin_print(id, r)?;
        if self.frames[id].base.sized {
            return Ok(());
        }

        let bounds = self.frames[id].base.limit_bounds(rect);
        self.frames[id].base.sizing_bounds = bounds;
        let state = self.do_calc_size(id, r, bounds)?;

        let page_bounds = r.page_bounds();
        let base = &mut self.frames[id].base;
        base.set_size(state.required_size, rect);
        if base.keep_together && state.continued {
            base.fits = false;
            if page_bounds.approx_eq(&rect) {
                return Err(ReportError::KeepTogether);
            }
        } else {
            base.fits = state.fits;
            if !base.fits && (rect.is_empty() || rect.width() <= 0.0) {
                return Err(ReportError::NoSpace);
            }
        }
        base.continued = state.continued;
        base.sized = true;

        log::trace!(
            "sized {:?} in {:?}: {:?}, fits {}, continued {}",
            id,
            bounds,
            base.size,
            base.fits,
            base.continued
        );
        Ok(())
    }

    /// Paint a frame into `rect` and clear its sizing cache
    pub fn print(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> Result<(), ReportError> {
        let base = &self.frames[id].base;
        let printing_bounds = base.limit_bounds(rect);
        if base.sized && !printing_bounds.approx_eq(&base.sizing_bounds) {
            let old = base.sizing_bounds;
            let state = self.rect_changed(id, old, printing_bounds);
            let base = &mut self.frames[id].base;
            base.set_size(state.required_size, rect);
            base.fits = state.fits;
            base.continued = state.continued;
        }

        self.calc_size(id, r, rect)?;
        if self.frames[id].base.fits {
            self.do_print(id, r, printing_bounds)?;
        }

        let keep_together = self.frames[id].base.keep_together;
        self.reset_size(id, keep_together);
        Ok(())
    }

    /// Forget everything from the current output pass, for this frame and
    /// all of its descendants
    pub fn reset(&mut self, id: FrameId) {
        let frame = &mut self.frames[id];
        frame.base.reset();
        if let FrameKind::Table(table) = &mut frame.kind {
            table.reset();
        }

        let children = self.children(id).to_vec();
        for child in children {
            self.reset(child);
        }
    }

    /// Forget the cached sizing of a frame. Containers pass this on to every
    /// child when `keep_together` is set, otherwise to the active child only.
    pub fn reset_size(&mut self, id: FrameId, keep_together: bool) {
        self.frames[id].base.sized = false;

        if keep_together {
            let children = self.children(id).to_vec();
            for child in children {
                self.reset_size(child, true);
            }
        } else if let Some(child) = self.frames[id]
            .kind
            .children()
            .and_then(Children::current_frame)
        {
            self.reset_size(child, false);
        }
    }

    fn begin_print(&mut self, id: FrameId, r: &mut Renderer<'_>) -> Result<(), ReportError> {
        if self.frames[id].base.started_printing {
            return Ok(());
        }
        match &mut self.frames[id].kind {
            FrameKind::Text(text) => text.begin_print(),
            FrameKind::Serial(serial) => serial.children.current = 0,
            FrameKind::Table(table) => table.begin_print(),
            FrameKind::Image(image) => image.begin_print(r)?,
            FrameKind::Break(marker) => marker.begin_print(),
            _ => {}
        }
        self.frames[id].base.started_printing = true;
        Ok(())
    }

    fn do_calc_size(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> Result<SizeState, ReportError> {
        let frame = &mut self.frames[id];
        let base = &frame.base;
        match &mut frame.kind {
            FrameKind::Text(text) => Ok(text.calc_size(base, r, rect)),
            FrameKind::Table(table) => Ok(table.calc_size(base, r, rect)),
            FrameKind::Line(line) => Ok(line.calc_size(base, rect)),
            FrameKind::Image(image) => Ok(image.calc_size(base, rect)),
            FrameKind::Barcode(barcode) => Ok(barcode.calc_size(base, rect)),
            FrameKind::Break(marker) => Ok(marker.calc_size(r, rect)),
            FrameKind::Serial(serial) => {
                let direction = serial.direction;
                self.flow_children(id, direction, r, rect, true)
            }
            FrameKind::Box(_) => self.calc_box(id, r, rect),
            FrameKind::Fixed(_) => self.calc_fixed(id, r, rect),
            FrameKind::Page(_) => self.calc_page(id, r, rect),
        }
    }

    fn do_print(
        &mut self,
        id: FrameId,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> Result<(), ReportError> {
        let frame = &mut self.frames[id];
        let base = &frame.base;
        match &mut frame.kind {
            FrameKind::Text(text) => text.print(base, r, rect),
            FrameKind::Table(table) => table.print(base, r, rect),
            FrameKind::Line(line) => line.print(r),
            FrameKind::Image(image) => image.print(r)?,
            FrameKind::Barcode(barcode) => barcode.print(r),
            FrameKind::Break(_) => {}
            FrameKind::Serial(serial) => {
                let direction = serial.direction;
                let mut rect = rect;
                if !base.use_full_width {
                    rect.right = rect.left + base.required_size.width;
                }
                if !base.use_full_height {
                    rect.bottom = rect.top + base.required_size.height;
                }
                self.flow_children(id, direction, r, rect, false)?;
            }
            FrameKind::Box(_) => self.print_box(id, r)?,
            FrameKind::Fixed(_) => self.print_fixed(id, r, rect)?,
            FrameKind::Page(_) => self.print_page(id, r, rect)?,
        }
        Ok(())
    }

    /// Refresh the sizing of a frame measured against `old` that is about to
    /// be printed into `new`
    fn rect_changed(&mut self, id: FrameId, old: Rect, new: Rect) -> SizeState {
        let frame = &mut self.frames[id];
        let base = &frame.base;
        match &mut frame.kind {
            FrameKind::Text(text) => {
                if text.needs_resize(base, old, new) {
                    let keep_together = base.keep_together;
                    let state = base.state();
                    self.reset_size(id, keep_together);
                    return state;
                }
            }
            FrameKind::Line(line) => {
                line.set_points(base, new);
                return SizeState {
                    required_size: line.extent_size(),
                    ..base.state()
                };
            }
            FrameKind::Image(image) => return image.calc_size(base, new),
            FrameKind::Barcode(barcode) => return barcode.calc_size(base, new),
            FrameKind::Box(_) => return self.box_rect_changed(id, new),
            _ => {}
        }
        self.frames[id].base.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PageFormat, RecordingBackend, TextStyle};

    fn paragraph(lines: usize) -> TextFrame {
        let text = vec!["line"; lines].join("\n");
        TextFrame::new(text, TextStyle::default())
    }

    #[test]
    fn leaves_cannot_hold_children() {
        let mut tree = FrameTree::new();
        let text = tree.insert(paragraph(1));
        let other = tree.insert(paragraph(1));
        assert!(matches!(
            tree.attach(text, other),
            Err(ReportError::NotAContainer)
        ));
    }

    #[test]
    fn a_box_holds_one_child() {
        let mut tree = FrameTree::new();
        let boxed = tree.insert(BoxFrame::new());
        tree.add(boxed, paragraph(1)).unwrap();
        let second = tree.add(boxed, paragraph(2)).unwrap();
        assert_eq!(tree.children(boxed), &[second]);
    }

    #[test]
    fn cycles_are_found_but_shared_subtrees_are_not_cycles() {
        let mut tree = FrameTree::new();
        let root = tree.insert(SerialFrame::vertical());
        let a = tree.add(root, SerialFrame::vertical()).unwrap();
        let b = tree.add(root, SerialFrame::vertical()).unwrap();
        let shared = tree.add(a, paragraph(1)).unwrap();
        tree.attach(b, shared).unwrap();
        assert!(!tree.has_cycle(root));

        tree.attach(b, root).unwrap();
        assert!(tree.has_cycle(root));
    }

    #[test]
    fn calc_size_is_idempotent() {
        let mut backend = RecordingBackend::new();
        let mut r = Renderer::new(&mut backend, PageFormat::default());
        r.new_document();

        let mut tree = FrameTree::new();
        let text = tree.insert(paragraph(3));
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);

        tree.calc_size(text, &mut r, rect).unwrap();
        let first = (tree.base(text).size(), tree.base(text).state());
        tree.calc_size(text, &mut r, rect).unwrap();
        let second = (tree.base(text).size(), tree.base(text).state());

        assert_eq!(first, second);
        assert_eq!(first.0, Size::new(8.0, 15.0));
    }

    #[test]
    fn margins_follow_alignment() {
        let mut base = FrameBase::default();
        base.margins(Margins::all(5.0));
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(base.limit_bounds(rect), Rect::new(5.0, 5.0, 100.0, 100.0));

        base.align(HAlign::Center, VAlign::Bottom);
        assert_eq!(base.limit_bounds(rect), Rect::new(5.0, 0.0, 95.0, 95.0));
    }

    #[test]
    fn size_is_clamped_to_the_rect() {
        let mut base = FrameBase::default();
        base.margins(Margins::all(2.0)).max_size(50.0, 0.0);
        base.set_size(Size::new(80.0, 10.0), Rect::new(0.0, 0.0, 100.0, 12.0));
        assert_eq!(base.size(), Size::new(50.0, 12.0));
    }
}
