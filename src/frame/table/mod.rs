//! Tables: typed rows laid out under named columns, split across pages row
//! by row.
//!
//! Column widths are resolved once per output pass, the first time the table
//! is measured. Columns that do not fit beside each other wrap onto extra
//! sub-rows, so one logical row may take several lines of cells. Each page
//! then gets a header (unless suppressed) followed by as many rows as fit.

mod column;
mod row;

pub use column::*;
pub use row::*;

use super::FrameBase;
use crate::{
    styles, Border, Extent, HAlign, Pen, Rect, Renderer, Size, SizeState, StyleSheet, TextStyle,
    EPSILON,
};
use std::collections::HashMap;

/// Row index standing for the row of column titles
const HEADER_ROW: isize = -1;

/// A row that fits nowhere is forced through when it stalls this close to
/// the top of the paper
const STALL_TOP_LIMIT: f32 = 40.0;

/// A table of [`TableRow`]s under [`TableColumn`]s.
///
/// ```
/// use report_gen::{HAlign, TableFrame, TableRow};
///
/// let mut table = TableFrame::new();
/// table.add_column("item", "Item", 60.0, HAlign::Left, 0.0);
/// table
///     .add_column("amount", "Amount", 20.0, HAlign::Right, 0.0)
///     .size_to_contents(true);
/// table.add_row(TableRow::detail().cell("item", "Coffee").cell("amount", "3.50"));
/// assert_eq!(table.rows.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TableFrame {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,

    /// Rows that must land on a page together before the table splits; zero
    /// turns the policy off
    pub min_data_rows_fit: usize,
    /// Print the titles on every page, rather than once before the first row
    pub repeat_header: bool,
    pub suppress_header: bool,
    pub min_header_row_height: f32,
    pub max_header_row_height: f32,
    pub min_detail_row_height: f32,
    pub max_detail_row_height: f32,
    /// Extra space below subtotal rows
    pub margin_bottom_subtotal: f32,
    /// Extra space below every row but the header
    pub inter_row_space: f32,
    /// Draw each column's right pen down the whole table. Only tables that
    /// lay out on a single sub-row get them.
    pub column_lines: bool,
    pub pen_header_bottom: Pen,
    pub pen_total_top: Pen,
    pub pen_row: Pen,
    pub border: Border,

    /// Styles given to columns as they are added
    pub header_style: TextStyle,
    pub detail_style: TextStyle,
    /// Style of every other detail row; the detail style when unset
    pub alternating_style: Option<TextStyle>,
    pub subtotal_style: TextStyle,
    pub total_style: TextStyle,

    row_index: isize,
    data_rows_fit: usize,
    width: f32,
    num_sub_rows: usize,
    sub_row_heights: HashMap<(isize, usize), f32>,
    header_size_init: bool,
    height_for_page: f32,
    row_heights: Vec<f32>,
    header_row_height: f32,
    stalled_at: Option<f32>,
}

impl Default for TableFrame {
    fn default() -> Self {
        TableFrame::new()
    }
}

impl TableFrame {
    /// A table styled from the default style sheet
    pub fn new() -> TableFrame {
        TableFrame::with_styles(&StyleSheet::default())
    }

    /// A table whose row styles come from the `Table*` rules of `sheet`
    pub fn with_styles(sheet: &StyleSheet) -> TableFrame {
        TableFrame {
            columns: Vec::new(),
            rows: Vec::new(),
            min_data_rows_fit: 1,
            repeat_header: true,
            suppress_header: false,
            min_header_row_height: 0.0,
            max_header_row_height: 100.0,
            min_detail_row_height: 0.0,
            max_detail_row_height: 100.0,
            margin_bottom_subtotal: 1.0,
            inter_row_space: 0.0,
            column_lines: false,
            pen_header_bottom: Pen::solid(0.2),
            pen_total_top: Pen::solid(0.2),
            pen_row: Pen::none(),
            border: Border::default(),
            header_style: sheet.resolve(styles::TABLE_HEADER),
            detail_style: sheet.resolve(styles::TABLE_ROW),
            alternating_style: None,
            subtotal_style: sheet.resolve(styles::TABLE_SUBTOTAL),
            total_style: sheet.resolve(styles::TABLE_TOTAL),
            row_index: 0,
            data_rows_fit: 0,
            width: 0.0,
            num_sub_rows: 1,
            sub_row_heights: HashMap::new(),
            header_size_init: false,
            height_for_page: 0.0,
            row_heights: Vec::new(),
            header_row_height: 0.0,
            stalled_at: None,
        }
    }

    /// Append a column. `width` is in millimetres or an [`Extent::Percent`]
    /// of the table's width; `margin_right` widens the cell's right padding.
    pub fn add_column<N: ToString, T: ToString, W: Into<Extent>>(
        &mut self,
        name: N,
        title: T,
        width: W,
        h_align: HAlign,
        margin_right: f32,
    ) -> &mut TableColumn {
        let styles = TableStyles {
            header: self.header_style.clone(),
            detail: self.detail_style.clone(),
            alternating: self
                .alternating_style
                .clone()
                .unwrap_or_else(|| self.detail_style.clone()),
            subtotal: self.subtotal_style.clone(),
            total: self.total_style.clone(),
        };
        let mut column =
            TableColumn::new(name.to_string(), title.to_string(), width.into(), &styles);
        column.h_align = h_align;
        column.padding.right += margin_right;

        self.columns.push(column);
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    /// Append a row, returning the new number of rows
    pub fn add_row(&mut self, row: TableRow) -> usize {
        self.rows.push(row);
        self.rows.len()
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut TableColumn> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Width the columns take, from the last sizing
    pub fn width(&self) -> f32 {
        self.width
    }

    /// How many lines of cells one row takes
    pub fn num_sub_rows(&self) -> usize {
        self.num_sub_rows
    }

    /// Total width of the columns on each sub-row
    pub fn sub_row_widths(&self) -> Vec<f32> {
        let mut widths = vec![0.0];
        let last = self.columns.len().saturating_sub(1);
        for (i, column) in self.columns.iter().enumerate() {
            if let Some(width) = widths.last_mut() {
                *width += column.width_to_use;
            }
            if column.ends_sub_row() && i < last {
                widths.push(0.0);
            }
        }
        widths
    }

    /// Rows laid out on the current page by the last sizing
    pub fn data_rows_fit(&self) -> usize {
        self.data_rows_fit
    }

    pub(crate) fn reset(&mut self) {
        self.header_size_init = false;
        self.stalled_at = None;
    }

    pub(crate) fn begin_print(&mut self) {
        self.row_index = if self.suppress_header || self.repeat_header {
            0
        } else {
            HEADER_ROW
        };
        self.data_rows_fit = 0;
    }

    /// Resolve every column's width against `width` and break the columns
    /// into sub-rows that each fit within it
    fn check_for_sub_rows(&mut self, r: &mut Renderer<'_>, width: f32) {
        for column in self.columns.iter_mut() {
            column.calc_width(width);
            column.wrapped = false;
            column.size_to_content(r, &self.rows);
        }

        self.num_sub_rows = 1;
        self.width = 0.0;
        let mut cols_width = 0.0;
        let count = self.columns.len();
        for i in 0..count {
            cols_width += self.columns[i].width_to_use;
            if i + 1 == count {
                break;
            }

            let next = self.columns[i + 1].width_to_use;
            let column = &mut self.columns[i];
            if column.line_break || cols_width + next > width + EPSILON {
                column.wrapped = !column.line_break;
                self.num_sub_rows += 1;
                self.width = self.width.max(cols_width);
                cols_width = 0.0;
            }
        }
        self.width = self.width.max(cols_width);
    }

    /// Scale the columns of each sub-row by a common factor so the sub-row
    /// is exactly `max_width` wide
    fn adjust_columns_to_width(&mut self, max_width: f32) {
        if self.columns.is_empty() || max_width <= 0.0 {
            return;
        }

        let count = self.columns.len();
        let mut cur_width = 0.0;
        let mut first = 0;
        for i in 0..count {
            cur_width += self.columns[i].width_to_use;
            let group_ends = i + 1 == count || self.columns[i].ends_sub_row();
            if group_ends && cur_width > 0.0 {
                let factor = (max_width / cur_width * 10000.0).trunc() / 10000.0;
                for column in &mut self.columns[first..=i] {
                    column.width_to_use *= factor;
                }
                first = i + 1;
                cur_width = 0.0;
            }
        }
        self.width = max_width;
    }

    fn resize_columns(&mut self, base: &FrameBase, r: &mut Renderer<'_>, width: f32) {
        self.check_for_sub_rows(r, width);
        if base.use_full_width {
            self.adjust_columns_to_width(width);
        }
    }

    fn calc_header_size(&mut self, base: &FrameBase, r: &mut Renderer<'_>, rect: Rect) {
        if self.header_size_init {
            return;
        }
        self.resize_columns(base, r, rect.width());
        self.header_row_height = self.size_print_row(
            r,
            HEADER_ROW,
            rect.left,
            rect.top,
            self.max_header_row_height,
            true,
            true,
        );
        self.header_size_init = true;
    }

    /// The part of `for_rect` the table is placed in: as wide as the columns,
    /// aligned horizontally, and as tall as the rect
    fn table_bounds(&self, base: &FrameBase, for_rect: Rect) -> Rect {
        let size = self
            .border
            .add_to(Size::new(self.width, self.header_row_height));
        let rect = for_rect.aligned(size, base.h_align, base.v_align);
        Rect::new(rect.left, for_rect.top, rect.right, for_rect.bottom)
    }

    fn shows_header(&self) -> bool {
        !self.suppress_header && self.repeat_header
    }

    /// Size, or print, the repeated header at the top of `rect`, moving its
    /// top below it. False when the header does not fit.
    fn size_print_header(
        &mut self,
        r: &mut Renderer<'_>,
        rect: &mut Rect,
        size_only: bool,
    ) -> bool {
        if !self.shows_header() {
            return true;
        }
        if !rect.size_fits(Size::new(self.width, self.header_row_height)) {
            return false;
        }
        if !size_only {
            self.size_print_row(
                r,
                HEADER_ROW,
                rect.left,
                rect.top,
                self.header_row_height,
                false,
                false,
            );
        }
        rect.top += self.header_row_height;
        true
    }

    fn valid_height(&self, height: f32, is_header: bool) -> f32 {
        let (min, max) = if is_header {
            (self.min_header_row_height, self.max_header_row_height)
        } else {
            (self.min_detail_row_height, self.max_detail_row_height)
        };
        height.max(min).min(max)
    }

    fn sub_row_height(&self, row: isize, sub_row: usize) -> f32 {
        self.sub_row_heights
            .get(&(row, sub_row))
            .copied()
            .unwrap_or(0.0)
    }

    /// Measure, or paint, one row with its top-left corner at `(x, y)` and
    /// return its height, rules and spacing included.
    ///
    /// Sizing records the height of every sub-row so that painting can give
    /// each sub-row the same height again.
    #[allow(clippy::too_many_arguments)]
    fn size_print_row(
        &mut self,
        r: &mut Renderer<'_>,
        row_index: isize,
        x: f32,
        y: f32,
        max_height: f32,
        size_only: bool,
        show_line: bool,
    ) -> f32 {
        let is_header = row_index == HEADER_ROW;
        let alternating = row_index % 2 != 0;
        let key = row_index + 1;
        let row = if is_header {
            None
        } else {
            usize::try_from(row_index).ok().and_then(|i| self.rows.get(i))
        };

        let mut max_height = max_height;
        if !size_only && self.num_sub_rows > 1 {
            max_height = self.valid_height(self.sub_row_height(key, 0), is_header);
        }

        let mut row_height = 0.0;
        let mut current_height: f32 = 0.0;
        let mut sub_row = 0;
        let mut x_pos = x;
        let mut y_pos = y;
        let last = self.columns.len().saturating_sub(1);

        for (i, column) in self.columns.iter().enumerate() {
            let absorbed = row.is_some_and(|row| row.absorbs(i));
            if !absorbed {
                let mut width = column.width_to_use;
                if let Some((first, end)) = row.and_then(|row| row.joined) {
                    if first == i {
                        width = self
                            .columns
                            .iter()
                            .take(end + 1)
                            .skip(first)
                            .map(|c| c.width_to_use)
                            .sum();
                    }
                }

                let text = match row {
                    Some(row) => row.text(&column.name),
                    None => column.title.as_str(),
                };
                let style = column.style_for(row, alternating);
                if size_only {
                    let size = column.cell_size(r, text, style, width, max_height);
                    current_height = current_height.max(self.valid_height(size.height, is_header));
                } else {
                    let h_align = row
                        .and_then(|row| row.h_align_of(&column.name))
                        .unwrap_or(column.h_align);
                    let v_align = row
                        .and_then(|row| row.v_align_of(&column.name))
                        .unwrap_or(column.v_align);
                    let rect = Rect::new(x_pos, y_pos, x_pos + width, y_pos + max_height);
                    column.paint_cell(r, text, style, rect, h_align, v_align);
                    current_height = current_height.max(self.valid_height(max_height, is_header));
                }
            }
            x_pos += column.width_to_use;

            if column.ends_sub_row() && i < last {
                if size_only {
                    self.sub_row_heights.insert((key, sub_row), current_height);
                    sub_row += 1;
                } else {
                    sub_row += 1;
                    max_height = self.valid_height(self.sub_row_height(key, sub_row), is_header);
                }
                row_height += current_height;
                y_pos += current_height;
                x_pos = x;
                current_height = 0.0;
            }
        }
        row_height += current_height;
        if size_only && self.num_sub_rows > 1 {
            self.sub_row_heights.insert((key, sub_row), current_height);
        }

        if show_line {
            row_height += self.row_line(
                r,
                x,
                y + row_height,
                self.width,
                is_header,
                false,
                size_only,
            );
        }
        if !is_header {
            row_height += self.inter_row_space;
        }
        match row.map(|row| row.row_type) {
            Some(RowType::SubTotal) => {
                row_height += self.row_line(r, x, y, self.width, false, true, size_only);
                row_height += self.margin_bottom_subtotal;
            }
            Some(RowType::Total) => {
                row_height += self.row_line(r, x, y, self.width, false, true, size_only);
            }
            _ => {}
        }
        row_height
    }

    /// Draw the rule ending at `y`, returning the height it takes
    #[allow(clippy::too_many_arguments)]
    fn row_line(
        &self,
        r: &mut Renderer<'_>,
        x: f32,
        y: f32,
        length: f32,
        is_header: bool,
        is_total: bool,
        size_only: bool,
    ) -> f32 {
        let pen = if is_header {
            &self.pen_header_bottom
        } else if is_total {
            &self.pen_total_top
        } else {
            &self.pen_row
        };
        if !pen.is_visible() {
            return 0.0;
        }
        if !size_only {
            let y = y - pen.extent / 2.0;
            r.line(x, y, x + length, y, pen);
        }
        pen.extent
    }

    /// Measure rows from the current one on until one does not fit in `rect`,
    /// then apply the rows-together policy. Leaves the height of every
    /// accepted row in `row_heights`.
    fn find_data_rows_fit(&mut self, r: &mut Renderer<'_>, rect: &mut Rect) -> usize {
        let total = self.rows.len() as isize;
        let mut rows_fit = 0;
        let mut index = self.row_index;
        self.row_heights.clear();

        while index < total {
            let include_line = index < total - 1;
            let height = self.size_print_row(
                r,
                index,
                rect.left,
                rect.top,
                self.max_detail_row_height,
                true,
                include_line,
            );
            if rect.size_fits(Size::new(self.width, height)) {
                self.row_heights.push(height);
                rect.top += height;
                index += 1;
                rows_fit += 1;
                continue;
            }

            if let Some(&previous) = self.row_heights.last() {
                // the last row to fit loses its rule
                let height = self.size_print_row(
                    r,
                    index - 1,
                    rect.left,
                    rect.top,
                    self.max_detail_row_height,
                    true,
                    false,
                );
                rect.top += height - previous;
                let last = self.row_heights.len() - 1;
                self.row_heights[last] = height;
            } else if rect.top < STALL_TOP_LIMIT
                && self
                    .stalled_at
                    .is_some_and(|top| (top - rect.top).abs() < EPSILON)
            {
                log::warn!(
                    "table row {} does not fit on an empty page, printing it cut to {:.2}mm",
                    index,
                    rect.height()
                );
                let height = rect.height();
                self.row_heights.push(height);
                rect.top += height;
                index += 1;
                rows_fit += 1;
            } else {
                self.stalled_at = Some(rect.top);
            }
            break;
        }

        let min = self.min_data_rows_fit;
        if min != 0 && index < total {
            let rows_left = (total - index) as usize;
            if rows_fit < min || rows_left + rows_fit < 2 * min {
                rows_fit = 0;
            } else if min > rows_left {
                rows_fit -= min - rows_left;
            }
        }
        self.row_heights.truncate(rows_fit);
        rows_fit
    }

    pub(crate) fn calc_size(
        &mut self,
        base: &FrameBase,
        r: &mut Renderer<'_>,
        rect: Rect,
    ) -> SizeState {
        let inside = self.border.inner_rect(rect);
        self.calc_header_size(base, r, inside);
        let mut bounds = self.table_bounds(base, inside);
        let top = bounds.top;

        let mut state = SizeState::default();
        if self.size_print_header(r, &mut bounds, true) {
            let header_height = bounds.top - top;
            self.data_rows_fit = self.find_data_rows_fit(r, &mut bounds);
            self.height_for_page = header_height + self.row_heights.iter().sum::<f32>();

            let total = self.rows.len() as isize;
            if total == 0 {
                state.fits = true;
            } else if self.data_rows_fit > 0 {
                state.fits = true;
                state.continued = self.row_index + (self.data_rows_fit as isize) < total;
            } else {
                // the header alone is placed unless rows must come with it
                state.fits = self.data_rows_fit >= self.min_data_rows_fit;
                state.continued = true;
            }
        } else {
            self.data_rows_fit = 0;
            self.row_heights.clear();
            self.height_for_page = 0.0;
            state.continued = true;
        }

        state.required_size = self
            .border
            .add_to(Size::new(self.width, self.height_for_page));
        state
    }

    pub(crate) fn print(&mut self, base: &FrameBase, r: &mut Renderer<'_>, in_rect: Rect) {
        let bounds = in_rect.aligned(base.required_size, base.h_align, base.v_align);
        let inside = self.border.inner_rect(bounds);

        let mut printing = inside;
        self.size_print_header(r, &mut printing, false);

        let heights = self.row_heights.clone();
        for &height in heights.iter().take(self.data_rows_fit) {
            self.size_print_row(
                r,
                self.row_index,
                printing.left,
                printing.top,
                height,
                false,
                false,
            );
            printing.top += height;
            self.row_index += 1;
        }

        let mut y = inside.top;
        if self.shows_header() {
            self.row_line(
                r,
                inside.left,
                y + self.header_row_height,
                inside.width(),
                true,
                false,
                false,
            );
            y += self.header_row_height;
        }
        for &height in heights.iter().take(self.data_rows_fit.saturating_sub(1)) {
            self.row_line(r, inside.left, y + height, inside.width(), false, false, false);
            y += height;
        }

        if self.num_sub_rows == 1 && self.column_lines {
            let mut x = inside.left;
            for column in &self.columns {
                x += column.width_to_use;
                column.draw_right_line(r, x, inside.top, inside.height());
            }
        }

        self.border.draw(r, bounds);
    }
}
