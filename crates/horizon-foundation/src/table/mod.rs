//! Sortable tables backed by reflected row objects.
//!
//! A [`TableView`] owns a table control and a list of row objects. Each
//! [`TableViewColumn`] derives one cell per row, and the view keeps the
//! rows, the table items and the selection in the same order.

mod column;
mod view;

pub use column::{SortOrder, StringComparator, TableViewColumn, ValueFormatter};
pub use view::{RowColorProvider, TableView};
