//! A sortable table of reflected row objects.

use std::sync::{Arc, Weak};

use horizon_foundation_core::logging::targets;
use horizon_foundation_core::{ConnectionGuard, MethodMeta, SharedObject, Value};
use parking_lot::Mutex;

use super::column::{SortOrder, TableViewColumn};
use crate::environment::Environment;
use crate::error::{ControlError, ControlResult};
use crate::reflect::resolve;
use crate::widget::{Color, ControlId, ControlKind, Style, TableColumnSpec};

/// Supplies per-row colors for a [`TableView`].
///
/// Asked again every time a row is rendered. `None` leaves the toolkit
/// default in place.
pub trait RowColorProvider: Send + Sync {
    /// Text color for `row`.
    fn foreground(&self, row: &SharedObject) -> Option<Color> {
        let _ = row;
        None
    }

    /// Background color for `row`.
    fn background(&self, row: &SharedObject) -> Option<Color> {
        let _ = row;
        None
    }
}

/// Which activation a row callback answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    /// Single click or keyboard selection.
    Single,
    /// Double click or Enter.
    Double,
}

#[derive(Clone)]
struct RowCallback {
    target: SharedObject,
    method: &'static MethodMeta,
}

impl RowCallback {
    fn invoke(&self, row: SharedObject) {
        let Some(mut target) = self.target.try_lock() else {
            tracing::warn!(target: targets::TABLE, method = self.method.name(), "callback target is busy");
            return;
        };
        if let Err(err) = self.method.invoke(&mut *target, Some(Value::Object(row))) {
            tracing::warn!(target: targets::TABLE, method = self.method.name(), %err, "row callback failed");
        }
    }
}

#[derive(Default)]
struct ViewState {
    columns: Vec<TableViewColumn>,
    rows: Vec<SharedObject>,
    sort_column: Option<usize>,
    colors: Option<Arc<dyn RowColorProvider>>,
    on_single: Option<RowCallback>,
    on_double: Option<RowCallback>,
}

struct RenderedRow {
    cells: Vec<String>,
    colors: Option<(Option<Color>, Option<Color>)>,
}

impl ViewState {
    fn render(&self, row: &SharedObject) -> RenderedRow {
        RenderedRow {
            cells: self.columns.iter().map(|column| column.text(row)).collect(),
            colors: self
                .colors
                .as_ref()
                .map(|provider| (provider.foreground(row), provider.background(row))),
        }
    }

    fn position(&self, row: &SharedObject) -> Option<usize> {
        self.rows.iter().position(|r| Arc::ptr_eq(r, row))
    }
}

struct ViewInner {
    env: Arc<Environment>,
    table: ControlId,
    state: Mutex<ViewState>,
}

impl ViewInner {
    /// Write rendered rows into the table starting at `first`.
    fn write_rows(&self, first: usize, rendered: Vec<RenderedRow>) -> ControlResult<()> {
        self.env.controls().with_write(|registry| {
            for (offset, row) in rendered.into_iter().enumerate() {
                let index = first + offset;
                registry.set_item_cells(self.table, index, row.cells)?;
                if let Some((foreground, background)) = row.colors {
                    registry.set_item_colors(self.table, index, foreground, background)?;
                }
            }
            Ok(())
        })
    }

    fn selected_rows(&self, state: &ViewState) -> ControlResult<Vec<SharedObject>> {
        let selection = self.env.controls().selection(self.table)?;
        Ok(selection
            .into_iter()
            .filter_map(|index| state.rows.get(index).cloned())
            .collect())
    }

    fn sort_by_column(&self, index: usize, toggle: bool) -> ControlResult<()> {
        let mut state = self.state.lock();
        let len = state.columns.len();
        if index >= len {
            return Err(ControlError::IndexOutOfRange { index, len });
        }
        let active = state.sort_column == Some(index);
        let column = &mut state.columns[index];
        if !active {
            column.set_sort_order(SortOrder::Ascending);
        } else if toggle {
            column.set_sort_order(column.sort_order().reversed());
        }
        state.sort_column = Some(index);
        self.sort(&mut state)
    }

    /// Reorder rows by the active column, or the first column when none was
    /// chosen yet, and rewrite every table item.
    fn sort(&self, state: &mut ViewState) -> ControlResult<()> {
        if state.columns.is_empty() {
            return Ok(());
        }
        let index = *state.sort_column.get_or_insert(0);
        let selected = self.selected_rows(state)?;

        let column = &state.columns[index];
        let mut keyed: Vec<(Value, SharedObject)> = std::mem::take(&mut state.rows)
            .into_iter()
            .map(|row| (column.value(&row), row))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| column.compare_values(a, b));
        state.rows = keyed.into_iter().map(|(_, row)| row).collect();

        let rendered = state.rows.iter().map(|row| state.render(row)).collect();
        self.write_rows(0, rendered)?;

        let selection: Vec<usize> = selected.iter().filter_map(|row| state.position(row)).collect();
        self.env.controls().set_selection(self.table, &selection)?;

        tracing::debug!(
            target: targets::TABLE,
            column = state.columns[index].header(),
            order = ?state.columns[index].sort_order(),
            rows = state.rows.len(),
            "sorted"
        );
        Ok(())
    }

    fn activate(&self, activation: Activation) {
        let (callback, rows) = {
            let state = self.state.lock();
            let callback = match activation {
                Activation::Single => state.on_single.clone(),
                Activation::Double => state.on_double.clone(),
            };
            let Some(callback) = callback else {
                return;
            };
            match self.selected_rows(&state) {
                Ok(rows) => (callback, rows),
                Err(err) => {
                    tracing::warn!(target: targets::TABLE, %err, "failed to read selection");
                    return;
                }
            }
        };
        tracing::trace!(target: targets::TABLE, ?activation, rows = rows.len(), "rows activated");
        for row in rows {
            callback.invoke(row);
        }
    }
}

/// A table control whose rows are backed by reflected objects.
///
/// Cell text is always derived from the row objects through the columns.
/// Clicking a column header sorts by that column, clicking it again reverses
/// the direction. Rows keep their relative order between equal keys.
///
/// # Example
///
/// ```ignore
/// let view = TableView::new(&env, shell, vec![
///     TableViewColumn::new("Name", "name", Person::static_meta_object()),
///     TableViewColumn::new("Age", "age", Person::static_meta_object()),
/// ], Style::FULL_SELECTION)?;
/// view.add_rows(people)?;
/// view.set_selection_callback(Some((controller, "open_person")));
/// ```
pub struct TableView {
    inner: Arc<ViewInner>,
    _header_clicks: ConnectionGuard<usize>,
    _single: ConnectionGuard<()>,
    _double: ConnectionGuard<()>,
}

impl TableView {
    /// Create a bordered table inside `parent` with a visible header row.
    pub fn new(
        env: &Arc<Environment>,
        parent: ControlId,
        columns: Vec<TableViewColumn>,
        style: Style,
    ) -> ControlResult<Self> {
        let controls = env.controls();
        let table = controls.create(ControlKind::Table, Some(parent), style | Style::BORDER)?;
        let default_width = env.config().table.column_width;
        controls.with_write(|registry| {
            registry.set_header_visible(table, true)?;
            for column in &columns {
                let mut spec = TableColumnSpec::new(column.header(), column.width().unwrap_or(default_width));
                spec.alignment = column.alignment();
                registry.add_column(table, spec)?;
            }
            Ok::<_, ControlError>(())
        })?;

        let inner = Arc::new(ViewInner {
            env: Arc::clone(env),
            table,
            state: Mutex::new(ViewState {
                columns,
                ..ViewState::default()
            }),
        });

        let signals = controls.signals(table)?;
        let weak = Arc::downgrade(&inner);
        let header_clicks = signals.column_clicked.connect_scoped(move |&column| {
            if let Some(inner) = Weak::upgrade(&weak) {
                if let Err(err) = inner.sort_by_column(column, true) {
                    tracing::warn!(target: targets::TABLE, column, %err, "failed to sort");
                }
            }
        });
        let weak = Arc::downgrade(&inner);
        let single = signals.selected.connect_scoped(move |_| {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.activate(Activation::Single);
            }
        });
        let weak = Arc::downgrade(&inner);
        let double = signals.default_selected.connect_scoped(move |_| {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.activate(Activation::Double);
            }
        });

        Ok(Self {
            inner,
            _header_clicks: header_clicks,
            _single: single,
            _double: double,
        })
    }

    /// The table control.
    pub fn control(&self) -> ControlId {
        self.inner.table
    }

    /// Append rows, then re-sort by the active column.
    pub fn add_rows(&self, rows: impl IntoIterator<Item = SharedObject>) -> ControlResult<()> {
        let mut state = self.inner.state.lock();
        let first = state.rows.len();
        state.rows.extend(rows);
        let added = state.rows.len() - first;
        self.inner.env.controls().with_write(|registry| {
            for _ in 0..added {
                registry.add_item(self.inner.table, Vec::new())?;
            }
            Ok::<_, ControlError>(())
        })?;
        tracing::debug!(target: targets::TABLE, added, "rows added");
        self.inner.sort(&mut state)
    }

    /// Append one row, then re-sort.
    pub fn add_row(&self, row: SharedObject) -> ControlResult<()> {
        self.add_rows(std::iter::once(row))
    }

    /// Remove `row`. Returns `false` when it is not shown.
    pub fn remove_row(&self, row: &SharedObject) -> ControlResult<bool> {
        let mut state = self.inner.state.lock();
        let Some(index) = state.position(row) else {
            return Ok(false);
        };
        state.rows.remove(index);
        self.inner.env.controls().with_write(|registry| registry.remove_item(self.inner.table, index))?;
        Ok(true)
    }

    /// Remove every row.
    pub fn clear(&self) -> ControlResult<()> {
        self.inner.state.lock().rows.clear();
        self.inner
            .env
            .controls()
            .with_write(|registry| registry.remove_all_items(self.inner.table))
    }

    /// Re-render `row` after its values changed. The row is not re-sorted.
    ///
    /// Returns `false` when it is not shown.
    pub fn row_changed(&self, row: &SharedObject) -> ControlResult<bool> {
        let state = self.inner.state.lock();
        let Some(index) = state.position(row) else {
            return Ok(false);
        };
        let rendered = state.render(row);
        self.inner.write_rows(index, vec![rendered])?;
        Ok(true)
    }

    /// Sort by the column at `index`.
    ///
    /// Switching to another column sorts it ascending. With `toggle`,
    /// sorting again by the active column reverses its direction.
    pub fn sort_by_column(&self, index: usize, toggle: bool) -> ControlResult<()> {
        self.inner.sort_by_column(index, toggle)
    }

    /// The active sort column, once rows have been sorted.
    pub fn sort_column(&self) -> Option<usize> {
        self.inner.state.lock().sort_column
    }

    /// Direction of the column at `index`.
    pub fn sort_order(&self, index: usize) -> Option<SortOrder> {
        self.inner.state.lock().columns.get(index).map(TableViewColumn::sort_order)
    }

    /// Invoke `method` of the target with each selected row on double
    /// activation. `None` clears the callback.
    ///
    /// Returns whether a one-argument method with that name taking an object
    /// was found.
    pub fn set_selection_callback(&self, callback: Option<(SharedObject, &str)>) -> bool {
        let callback = callback.and_then(|(target, name)| row_callback(target, name));
        let resolved = callback.is_some();
        self.inner.state.lock().on_double = callback;
        resolved
    }

    /// Like [`set_selection_callback`](Self::set_selection_callback), for
    /// single activation.
    pub fn set_single_selection_callback(&self, callback: Option<(SharedObject, &str)>) -> bool {
        let callback = callback.and_then(|(target, name)| row_callback(target, name));
        let resolved = callback.is_some();
        self.inner.state.lock().on_single = callback;
        resolved
    }

    /// Color rows with `provider`, or stop coloring with `None`.
    ///
    /// Takes effect the next time rows are rendered.
    pub fn set_color_provider(&self, provider: Option<Arc<dyn RowColorProvider>>) {
        self.inner.state.lock().colors = provider;
    }

    /// Row objects in display order.
    pub fn rows(&self) -> Vec<SharedObject> {
        self.inner.state.lock().rows.clone()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.inner.state.lock().rows.len()
    }

    /// Row objects of the selected items.
    pub fn selected_rows(&self) -> ControlResult<Vec<SharedObject>> {
        let state = self.inner.state.lock();
        self.inner.selected_rows(&state)
    }

    /// Select the given rows. Rows not shown are ignored.
    pub fn select_rows(&self, rows: &[SharedObject]) -> ControlResult<()> {
        let indices: Vec<usize> = {
            let state = self.inner.state.lock();
            rows.iter().filter_map(|row| state.position(row)).collect()
        };
        self.inner.env.controls().set_selection(self.inner.table, &indices)
    }

    /// Fit every column to its header and cell text.
    pub fn pack(&self) -> ControlResult<()> {
        let columns = self.inner.state.lock().columns.len();
        self.inner.env.controls().with_write(|registry| {
            (0..columns).try_for_each(|column| registry.pack_column(self.inner.table, column))
        })
    }

    /// Whether a drag may start: only with something selected.
    pub fn can_start_drag(&self) -> ControlResult<bool> {
        Ok(!self.inner.env.controls().selection(self.inner.table)?.is_empty())
    }
}

fn row_callback(target: SharedObject, name: &str) -> Option<RowCallback> {
    let meta = target.lock().meta_object();
    // Rows arrive as objects; any object stands in for the row here.
    let sample = Value::Object(Arc::clone(&target));
    let method = resolve(meta, name, true).filter(|method| method.accepts(&sample));
    let Some(method) = method else {
        tracing::warn!(target: targets::TABLE, name, "no row callback taking an object");
        return None;
    };
    Some(RowCallback { target, method })
}

impl std::fmt::Debug for TableView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("TableView")
            .field("table", &self.inner.table)
            .field("columns", &state.columns)
            .field("rows", &state.rows.len())
            .field("sort_column", &state.sort_column)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(TableView: Send, Sync);
