use crate::{HAlign, VAlign};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a row of a table stands for; decides its text style and rules
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowType {
    /// Set like the column titles
    Header,
    #[default]
    Detail,
    /// Ruled above, with extra space below
    SubTotal,
    /// Ruled above
    Total,
}

/// One row of table data, keyed by column name.
///
/// ```
/// use report_gen::{RowType, TableRow};
///
/// let row = TableRow::new(RowType::Total)
///     .cell("item", "Total")
///     .cell("amount", 12.5)
///     .join_columns(0, 1);
/// assert_eq!(row.text("amount"), "12.5");
/// assert_eq!(row.text("missing"), "");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    pub row_type: RowType,
    /// First and last column index of a run of cells merged into one
    pub joined: Option<(usize, usize)>,
    cells: BTreeMap<String, String>,
    h_aligns: BTreeMap<String, HAlign>,
    v_aligns: BTreeMap<String, VAlign>,
}

impl TableRow {
    pub fn new(row_type: RowType) -> TableRow {
        TableRow {
            row_type,
            ..TableRow::default()
        }
    }

    pub fn detail() -> TableRow {
        TableRow::new(RowType::Detail)
    }

    pub fn cell<N: ToString, V: ToString>(mut self, column: N, value: V) -> Self {
        self.set(column, value);
        self
    }

    pub fn set<N: ToString, V: ToString>(&mut self, column: N, value: V) -> &mut Self {
        self.cells.insert(column.to_string(), value.to_string());
        self
    }

    /// The text of a cell; empty if the row has none for `column`
    pub fn text(&self, column: &str) -> &str {
        self.cells.get(column).map_or("", String::as_str)
    }

    /// Merge the cells of columns `first..=last` into one; only the text of
    /// the first is shown
    pub fn join_columns(mut self, first: usize, last: usize) -> Self {
        self.joined = Some((first, last));
        self
    }

    pub fn align<N: ToString>(mut self, column: N, h_align: HAlign) -> Self {
        self.h_aligns.insert(column.to_string(), h_align);
        self
    }

    pub fn v_align<N: ToString>(mut self, column: N, v_align: VAlign) -> Self {
        self.v_aligns.insert(column.to_string(), v_align);
        self
    }

    pub fn h_align_of(&self, column: &str) -> Option<HAlign> {
        self.h_aligns.get(column).copied()
    }

    pub fn v_align_of(&self, column: &str) -> Option<VAlign> {
        self.v_aligns.get(column).copied()
    }

    /// Whether the cell of column `index` is swallowed by a join
    pub(super) fn absorbs(&self, index: usize) -> bool {
        self.joined
            .is_some_and(|(first, last)| index > first && index <= last)
    }
}
