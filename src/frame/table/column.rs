use super::{RowType, TableRow};
use crate::frame::text::measure;
use crate::layout::Margins;
use crate::{Extent, HAlign, Pen, Rect, Renderer, Size, TextStyle, VAlign};

/// A column of a [`TableFrame`](super::TableFrame)
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Key of the column's cells in each [`TableRow`]
    pub name: String,
    pub title: String,
    /// Fixed, or a percentage of the table's width
    pub width: Extent,
    /// Shrink to the widest cell
    pub size_to_contents: bool,
    /// Shrink to the title
    pub size_to_header: bool,
    /// Start a new sub-row after this column
    pub line_break: bool,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub padding: Margins,
    /// Rule drawn along the right edge when the table shows column lines
    pub right_pen: Pen,
    pub header_style: TextStyle,
    pub detail_style: TextStyle,
    pub alternating_style: TextStyle,
    pub subtotal_style: TextStyle,
    pub total_style: TextStyle,

    pub(super) width_to_use: f32,
    /// A sub-row break the table had to insert to fit its width
    pub(super) wrapped: bool,
}

impl TableColumn {
    pub(super) fn new(
        name: String,
        title: String,
        width: Extent,
        styles: &TableStyles,
    ) -> TableColumn {
        TableColumn {
            name,
            title,
            width,
            size_to_contents: false,
            size_to_header: false,
            line_break: false,
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            padding: Margins::trbl(0.1, 0.5, 0.1, 0.5),
            right_pen: Pen::none(),
            header_style: styles.header.clone(),
            detail_style: styles.detail.clone(),
            alternating_style: styles.alternating.clone(),
            subtotal_style: styles.subtotal.clone(),
            total_style: styles.total.clone(),
            width_to_use: 0.0,
            wrapped: false,
        }
    }

    pub fn size_to_contents(&mut self, size: bool) -> &mut Self {
        self.size_to_contents = size;
        self
    }

    pub fn size_to_header(&mut self, size: bool) -> &mut Self {
        self.size_to_header = size;
        self
    }

    pub fn line_break(&mut self, line_break: bool) -> &mut Self {
        self.line_break = line_break;
        self
    }

    pub fn v_align(&mut self, v_align: VAlign) -> &mut Self {
        self.v_align = v_align;
        self
    }

    pub fn right_pen(&mut self, pen: Pen) -> &mut Self {
        self.right_pen = pen;
        self
    }

    /// The width the column is laid out with
    pub fn width_to_use(&self) -> f32 {
        self.width_to_use
    }

    /// Whether a sub-row ends after this column
    pub fn ends_sub_row(&self) -> bool {
        self.line_break || self.wrapped
    }

    pub(super) fn calc_width(&mut self, table_width: f32) {
        self.width_to_use = self.width.resolve(table_width);
    }

    fn side_padding(&self) -> f32 {
        self.padding.left + self.padding.right + self.right_pen.extent
    }

    /// Shrink the resolved width to the widest title or cell, if asked to
    pub(super) fn size_to_content(&mut self, r: &mut Renderer<'_>, rows: &[TableRow]) {
        if !self.size_to_contents && !self.size_to_header {
            return;
        }

        let mut used: f32 = 0.0;
        if self.size_to_header {
            used = r.text_size(&self.header_style, &self.title, None).width;
        }
        if self.size_to_contents {
            for (i, row) in rows.iter().enumerate() {
                let style = self.style_for(Some(row), i % 2 != 0);
                used = used.max(r.text_size(style, row.text(&self.name), None).width);
            }
        }
        if used > 0.0 {
            let used = used + self.side_padding();
            if used < self.width_to_use {
                self.width_to_use = used;
            }
        }
    }

    /// The style of this column's cell in `row`, or of its title when there
    /// is no row
    pub(super) fn style_for(&self, row: Option<&TableRow>, alternating: bool) -> &TextStyle {
        match row.map(|row| row.row_type) {
            None | Some(RowType::Header) => &self.header_style,
            Some(RowType::SubTotal) => &self.subtotal_style,
            Some(RowType::Total) => &self.total_style,
            Some(RowType::Detail) if alternating => &self.alternating_style,
            Some(RowType::Detail) => &self.detail_style,
        }
    }

    /// The space a cell of `width` needs for `text`, padding included and
    /// no taller than `max_height`
    pub(super) fn cell_size(
        &self,
        r: &mut Renderer<'_>,
        text: &str,
        style: &TextStyle,
        width: f32,
        max_height: f32,
    ) -> Size {
        let inner_width = width - self.side_padding();
        let mut size = measure(r, style, text, Some(inner_width));
        size.width += self.side_padding();
        size.height += self.padding.top + self.padding.bottom;
        size.height = size.height.min(max_height);
        size
    }

    pub(super) fn paint_cell(
        &self,
        r: &mut Renderer<'_>,
        text: &str,
        style: &TextStyle,
        rect: Rect,
        h_align: HAlign,
        v_align: VAlign,
    ) {
        if !style.background.is_white() {
            r.fill_rect(rect, style.background);
        }
        let p = &self.padding;
        let inner = rect.with_margins(p.top, p.right + self.right_pen.extent, p.bottom, p.left);
        if !text.is_empty() {
            r.text_block(text, style, inner, h_align, v_align, style.text_colour);
        }
    }

    pub(super) fn draw_right_line(&self, r: &mut Renderer<'_>, x: f32, y: f32, height: f32) {
        if self.right_pen.is_visible() {
            let x = x - self.right_pen.extent;
            r.line(x, y, x, y + height, &self.right_pen);
        }
    }
}

/// The styles new columns start out with
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyles {
    pub header: TextStyle,
    pub detail: TextStyle,
    /// Every other detail row
    pub alternating: TextStyle,
    pub subtotal: TextStyle,
    pub total: TextStyle,
}
