//! Control registry.
//!
//! [`ControlRegistry`] owns all control state and is a plain data structure.
//! [`SharedControlRegistry`] wraps it in a lock and delivers notifications:
//! every operation that changes observable state collects the affected
//! controls' signals while the lock is held and emits them after releasing
//! it.

use std::sync::Arc;

use horizon_foundation_core::PerfSpan;
use horizon_foundation_core::logging::targets;
use parking_lot::RwLock;
use slotmap::SlotMap;

use super::{Accelerator, Color, ControlId, ControlKind, ControlSignals, Style, TextAlignment};
use crate::config::FontMetrics;
use crate::error::{ControlError, ControlResult};
use crate::geometry::{Point, Rect, Size};
use crate::layout::form_layout::{self, LayoutChild};
use crate::layout::FormData;

/// Header and geometry of one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumnSpec {
    /// Header text.
    pub header: String,
    /// Width in pixels.
    pub width: i32,
    /// Cell text alignment.
    pub alignment: TextAlignment,
    /// Whether the user may reorder the column.
    pub moveable: bool,
    /// Whether the user may resize the column.
    pub resizable: bool,
}

impl TableColumnSpec {
    /// A left-aligned, moveable, resizable column.
    pub fn new(header: impl Into<String>, width: i32) -> Self {
        Self {
            header: header.into(),
            width,
            alignment: TextAlignment::Left,
            moveable: true,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TableItem {
    cells: Vec<String>,
    foreground: Option<Color>,
    background: Option<Color>,
}

#[derive(Debug, Default)]
struct TableState {
    columns: Vec<TableColumnSpec>,
    items: Vec<TableItem>,
    selection: Vec<usize>,
    header_visible: bool,
    lines_visible: bool,
}

struct ControlData {
    kind: ControlKind,
    style: Style,
    parent: Option<ControlId>,
    children: Vec<ControlId>,
    text: String,
    items: Vec<String>,
    image: Option<Size>,
    bounds: Rect,
    visible: bool,
    layout_data: Option<FormData>,
    size_hint: Option<Size>,
    foreground: Option<Color>,
    background: Option<Color>,
    accelerator: Option<Accelerator>,
    table: Option<TableState>,
    signals: Arc<ControlSignals>,
}

impl ControlData {
    fn new(kind: ControlKind, style: Style, parent: Option<ControlId>) -> Self {
        Self {
            kind,
            style,
            parent,
            children: Vec::new(),
            text: String::new(),
            items: Vec::new(),
            image: None,
            bounds: Rect::default(),
            // Shells start hidden until opened.
            visible: kind != ControlKind::Shell,
            layout_data: None,
            size_hint: None,
            foreground: None,
            background: None,
            accelerator: None,
            table: (kind == ControlKind::Table).then(TableState::default),
            signals: Arc::new(ControlSignals::default()),
        }
    }
}

/// Storage for every live control.
pub struct ControlRegistry {
    controls: SlotMap<ControlId, ControlData>,
    metrics: FontMetrics,
}

impl ControlRegistry {
    /// Create an empty registry measuring text with `metrics`.
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            controls: SlotMap::with_key(),
            metrics,
        }
    }

    fn get(&self, id: ControlId) -> ControlResult<&ControlData> {
        self.controls
            .get(id)
            .ok_or(ControlError::InvalidControlId(id))
    }

    fn get_mut(&mut self, id: ControlId) -> ControlResult<&mut ControlData> {
        self.controls
            .get_mut(id)
            .ok_or(ControlError::InvalidControlId(id))
    }

    fn table(&self, id: ControlId, operation: &'static str) -> ControlResult<&TableState> {
        let data = self.get(id)?;
        data.table.as_ref().ok_or(ControlError::UnsupportedKind {
            id,
            kind: data.kind,
            operation,
        })
    }

    fn table_mut(&mut self, id: ControlId, operation: &'static str) -> ControlResult<&mut TableState> {
        let data = self.get_mut(id)?;
        let kind = data.kind;
        data.table.as_mut().ok_or(ControlError::UnsupportedKind {
            id,
            kind,
            operation,
        })
    }

    /// Create a control. Shells are usually created without a parent.
    pub fn create(
        &mut self,
        kind: ControlKind,
        parent: Option<ControlId>,
        style: Style,
    ) -> ControlResult<ControlId> {
        if let Some(parent) = parent {
            if !self.get(parent)?.kind.is_container() {
                return Err(ControlError::NotAContainer(parent));
            }
        }

        let id = self.controls.insert(ControlData::new(kind, style, parent));
        if let Some(parent) = parent {
            if let Some(data) = self.controls.get_mut(parent) {
                data.children.push(id);
            }
        }
        tracing::trace!(target: targets::CONTROL, ?id, ?kind, ?parent, "created control");
        Ok(id)
    }

    /// Remove a control and its descendants.
    ///
    /// Returns the signals of every removed control, children first, so the
    /// caller can deliver disposal notifications.
    #[tracing::instrument(skip(self), target = "horizon_foundation::control", level = "trace")]
    pub fn dispose(&mut self, id: ControlId) -> ControlResult<Vec<Arc<ControlSignals>>> {
        let mut doomed = Vec::new();
        self.collect_descendants(id, &mut doomed)?;
        doomed.push(id);

        if let Some(parent) = self.get(id)?.parent {
            if let Some(data) = self.controls.get_mut(parent) {
                data.children.retain(|&child| child != id);
            }
        }

        Ok(doomed
            .into_iter()
            .filter_map(|doomed_id| self.controls.remove(doomed_id))
            .map(|data| data.signals)
            .collect())
    }

    fn collect_descendants(&self, id: ControlId, result: &mut Vec<ControlId>) -> ControlResult<()> {
        for &child in &self.get(id)?.children {
            self.collect_descendants(child, result)?;
            result.push(child);
        }
        Ok(())
    }

    /// Check if a control exists.
    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    /// Number of live controls.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether no control is alive.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Kind of a control.
    pub fn kind(&self, id: ControlId) -> ControlResult<ControlKind> {
        Ok(self.get(id)?.kind)
    }

    /// Creation style of a control.
    pub fn style(&self, id: ControlId) -> ControlResult<Style> {
        Ok(self.get(id)?.style)
    }

    /// Parent of a control.
    pub fn parent(&self, id: ControlId) -> ControlResult<Option<ControlId>> {
        Ok(self.get(id)?.parent)
    }

    /// Children in creation order.
    pub fn children(&self, id: ControlId) -> ControlResult<&[ControlId]> {
        Ok(&self.get(id)?.children)
    }

    /// The shell a control lives in.
    pub fn shell_of(&self, id: ControlId) -> ControlResult<ControlId> {
        let mut current = id;
        loop {
            let data = self.get(current)?;
            match data.parent {
                Some(parent) if data.kind != ControlKind::Shell => current = parent,
                _ => return Ok(current),
            }
        }
    }

    /// Text of a control.
    pub fn text(&self, id: ControlId) -> ControlResult<&str> {
        Ok(&self.get(id)?.text)
    }

    /// Replace the text. Returns whether it changed.
    pub fn set_text(&mut self, id: ControlId, text: &str) -> ControlResult<bool> {
        let data = self.get_mut(id)?;
        if data.text == text {
            return Ok(false);
        }
        data.text = text.to_string();
        Ok(true)
    }

    /// Drop-down entries of a combo.
    pub fn items(&self, id: ControlId) -> ControlResult<&[String]> {
        Ok(&self.get(id)?.items)
    }

    /// Replace the drop-down entries of a combo.
    pub fn set_items(&mut self, id: ControlId, items: Vec<String>) -> ControlResult<()> {
        let data = self.get_mut(id)?;
        if data.kind != ControlKind::Combo {
            return Err(ControlError::UnsupportedKind {
                id,
                kind: data.kind,
                operation: "set_items",
            });
        }
        data.items = items;
        Ok(())
    }

    /// Image dimensions shown by a label.
    pub fn image(&self, id: ControlId) -> ControlResult<Option<Size>> {
        Ok(self.get(id)?.image)
    }

    /// Show an image of the given dimensions.
    pub fn set_image(&mut self, id: ControlId, image: Option<Size>) -> ControlResult<()> {
        self.get_mut(id)?.image = image;
        Ok(())
    }

    /// Bounds relative to the parent (display coordinates for shells).
    pub fn bounds(&self, id: ControlId) -> ControlResult<Rect> {
        Ok(self.get(id)?.bounds)
    }

    /// Set bounds. Returns whether the size changed.
    pub fn set_bounds(&mut self, id: ControlId, bounds: Rect) -> ControlResult<bool> {
        let data = self.get_mut(id)?;
        let resized = data.bounds.size() != bounds.size();
        data.bounds = bounds;
        Ok(resized)
    }

    /// Whether the control itself is visible.
    pub fn is_visible(&self, id: ControlId) -> ControlResult<bool> {
        Ok(self.get(id)?.visible)
    }

    /// Show or hide a control.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) -> ControlResult<()> {
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    /// Layout data, if any.
    pub fn layout_data(&self, id: ControlId) -> ControlResult<Option<FormData>> {
        Ok(self.get(id)?.layout_data)
    }

    /// Replace the layout data.
    pub fn set_layout_data(&mut self, id: ControlId, data: Option<FormData>) -> ControlResult<()> {
        self.get_mut(id)?.layout_data = data;
        Ok(())
    }

    /// Fix the preferred size, bypassing text measurement.
    pub fn set_size_hint(&mut self, id: ControlId, hint: Option<Size>) -> ControlResult<()> {
        self.get_mut(id)?.size_hint = hint;
        Ok(())
    }

    /// Foreground and background colors.
    pub fn colors(&self, id: ControlId) -> ControlResult<(Option<Color>, Option<Color>)> {
        let data = self.get(id)?;
        Ok((data.foreground, data.background))
    }

    /// Set foreground and background colors.
    pub fn set_colors(
        &mut self,
        id: ControlId,
        foreground: Option<Color>,
        background: Option<Color>,
    ) -> ControlResult<()> {
        let data = self.get_mut(id)?;
        data.foreground = foreground;
        data.background = background;
        Ok(())
    }

    /// Keyboard accelerator of a menu item.
    pub fn accelerator(&self, id: ControlId) -> ControlResult<Option<Accelerator>> {
        Ok(self.get(id)?.accelerator)
    }

    /// Set the keyboard accelerator of a menu item.
    pub fn set_accelerator(
        &mut self,
        id: ControlId,
        accelerator: Option<Accelerator>,
    ) -> ControlResult<()> {
        self.get_mut(id)?.accelerator = accelerator;
        Ok(())
    }

    /// Notification signals of a control.
    pub fn signals(&self, id: ControlId) -> ControlResult<Arc<ControlSignals>> {
        Ok(Arc::clone(&self.get(id)?.signals))
    }

    /// Size of `text` under the registry's font metrics.
    pub fn measure_text(&self, text: &str) -> Size {
        let metrics = &self.metrics;
        let columns = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        Size::new(
            columns as i32 * metrics.char_width + 2 * metrics.padding,
            lines as i32 * metrics.line_height + 2 * metrics.padding,
        )
    }

    /// Preferred size of a control.
    pub fn preferred_size(&self, id: ControlId) -> ControlResult<Size> {
        let data = self.get(id)?;
        if let Some(hint) = data.size_hint {
            return Ok(hint);
        }

        let size = match data.kind {
            ControlKind::Shell | ControlKind::Composite => {
                let children = self.layout_children(id)?;
                form_layout::compute_size(&children)
            }
            ControlKind::Label => match data.image {
                Some(image) => image,
                None => self.measure_text(&data.text),
            },
            ControlKind::Combo => {
                let widest = data
                    .items
                    .iter()
                    .chain(std::iter::once(&data.text))
                    .map(|item| self.measure_text(item))
                    .max_by_key(|size| size.width)
                    .unwrap_or_else(|| self.measure_text(""));
                Size::new(widest.width + self.metrics.line_height, widest.height)
            }
            ControlKind::Table => {
                let table = self.table(id, "preferred_size")?;
                let width: i32 = table.columns.iter().map(|c| c.width).sum();
                let header = if table.header_visible { 1 } else { 0 };
                let rows = (table.items.len() + header) as i32;
                Size::new(
                    width + 2 * self.metrics.padding,
                    rows * self.metrics.line_height + 2 * self.metrics.padding,
                )
            }
            ControlKind::Text | ControlKind::Button | ControlKind::MenuItem => {
                self.measure_text(&data.text)
            }
        };
        Ok(size)
    }

    fn layout_children(&self, container: ControlId) -> ControlResult<Vec<LayoutChild>> {
        let data = self.get(container)?;
        let mut children = Vec::with_capacity(data.children.len());
        for &child in &data.children {
            let child_data = self.get(child)?;
            if !child_data.visible
                || matches!(child_data.kind, ControlKind::Shell | ControlKind::MenuItem)
            {
                continue;
            }
            children.push(LayoutChild {
                id: child,
                data: child_data.layout_data.unwrap_or_default(),
                preferred: self.preferred_size(child)?,
            });
        }
        Ok(children)
    }

    /// Lay out `container` and every nested container.
    ///
    /// Returns the signals and new sizes of controls whose size changed.
    pub fn layout(&mut self, container: ControlId) -> ControlResult<Vec<(Arc<ControlSignals>, Size)>> {
        let mut resized = Vec::new();
        self.layout_recursive(container, &mut resized)?;
        Ok(resized)
    }

    fn layout_recursive(
        &mut self,
        container: ControlId,
        resized: &mut Vec<(Arc<ControlSignals>, Size)>,
    ) -> ControlResult<()> {
        if !self.get(container)?.kind.is_container() {
            return Ok(());
        }

        let client = self.get(container)?.bounds.size();
        let children = self.layout_children(container)?;
        let rects = form_layout::solve(client, &children);

        for (child, rect) in children.iter().zip(rects) {
            if self.set_bounds(child.id, rect)? {
                resized.push((self.signals(child.id)?, rect.size()));
            }
        }
        for child in children {
            self.layout_recursive(child.id, resized)?;
        }
        Ok(())
    }

    /// Visible controls of a subtree in paint order (parents first).
    pub fn paint_order(&self, root: ControlId) -> ControlResult<Vec<ControlId>> {
        let mut order = Vec::new();
        self.paint_order_recursive(root, &mut order)?;
        Ok(order)
    }

    fn paint_order_recursive(&self, id: ControlId, order: &mut Vec<ControlId>) -> ControlResult<()> {
        let data = self.get(id)?;
        if !data.visible {
            return Ok(());
        }
        order.push(id);
        for &child in &data.children {
            if self.get(child)?.kind != ControlKind::Shell {
                self.paint_order_recursive(child, order)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tables
    // -------------------------------------------------------------------------

    /// Append a column. Returns its index.
    pub fn add_column(&mut self, id: ControlId, column: TableColumnSpec) -> ControlResult<usize> {
        let table = self.table_mut(id, "add_column")?;
        table.columns.push(column);
        let count = table.columns.len();
        for item in &mut table.items {
            item.cells.resize(count, String::new());
        }
        Ok(count - 1)
    }

    /// Column headers and geometry.
    pub fn columns(&self, id: ControlId) -> ControlResult<&[TableColumnSpec]> {
        Ok(&self.table(id, "columns")?.columns)
    }

    /// Resize one column.
    pub fn set_column_width(&mut self, id: ControlId, column: usize, width: i32) -> ControlResult<()> {
        let table = self.table_mut(id, "set_column_width")?;
        let len = table.columns.len();
        let spec = table
            .columns
            .get_mut(column)
            .ok_or(ControlError::IndexOutOfRange { index: column, len })?;
        spec.width = width;
        Ok(())
    }

    /// Fit a column to its header and cell text.
    pub fn pack_column(&mut self, id: ControlId, column: usize) -> ControlResult<()> {
        let table = self.table(id, "pack_column")?;
        let header = table
            .columns
            .get(column)
            .ok_or(ControlError::IndexOutOfRange {
                index: column,
                len: table.columns.len(),
            })?;
        let width = table
            .items
            .iter()
            .filter_map(|item| item.cells.get(column))
            .chain(std::iter::once(&header.header))
            .map(|text| self.measure_text(text).width)
            .max()
            .unwrap_or(0);
        self.set_column_width(id, column, width)
    }

    /// Show or hide the header row.
    pub fn set_header_visible(&mut self, id: ControlId, visible: bool) -> ControlResult<()> {
        self.table_mut(id, "set_header_visible")?.header_visible = visible;
        Ok(())
    }

    /// Whether the header row is shown.
    pub fn header_visible(&self, id: ControlId) -> ControlResult<bool> {
        Ok(self.table(id, "header_visible")?.header_visible)
    }

    /// Show or hide grid lines.
    pub fn set_lines_visible(&mut self, id: ControlId, visible: bool) -> ControlResult<()> {
        self.table_mut(id, "set_lines_visible")?.lines_visible = visible;
        Ok(())
    }

    /// Whether grid lines are shown.
    pub fn lines_visible(&self, id: ControlId) -> ControlResult<bool> {
        Ok(self.table(id, "lines_visible")?.lines_visible)
    }

    /// Append a row of cell text. Returns its index.
    pub fn add_item(&mut self, id: ControlId, mut cells: Vec<String>) -> ControlResult<usize> {
        let table = self.table_mut(id, "add_item")?;
        cells.resize(table.columns.len(), String::new());
        table.items.push(TableItem {
            cells,
            ..TableItem::default()
        });
        Ok(table.items.len() - 1)
    }

    /// Remove the row at `index`, shifting later rows and the selection up.
    pub fn remove_item(&mut self, id: ControlId, index: usize) -> ControlResult<()> {
        let table = self.table_mut(id, "remove_item")?;
        if index >= table.items.len() {
            return Err(ControlError::IndexOutOfRange {
                index,
                len: table.items.len(),
            });
        }
        table.items.remove(index);
        table.selection.retain(|&i| i != index);
        for selected in &mut table.selection {
            if *selected > index {
                *selected -= 1;
            }
        }
        Ok(())
    }

    /// Remove every row.
    pub fn remove_all_items(&mut self, id: ControlId) -> ControlResult<()> {
        let table = self.table_mut(id, "remove_all_items")?;
        table.items.clear();
        table.selection.clear();
        Ok(())
    }

    /// Number of rows.
    pub fn item_count(&self, id: ControlId) -> ControlResult<usize> {
        Ok(self.table(id, "item_count")?.items.len())
    }

    fn item_mut(&mut self, id: ControlId, index: usize, operation: &'static str) -> ControlResult<&mut TableItem> {
        let table = self.table_mut(id, operation)?;
        let len = table.items.len();
        table
            .items
            .get_mut(index)
            .ok_or(ControlError::IndexOutOfRange { index, len })
    }

    fn item(&self, id: ControlId, index: usize, operation: &'static str) -> ControlResult<&TableItem> {
        let table = self.table(id, operation)?;
        table.items.get(index).ok_or(ControlError::IndexOutOfRange {
            index,
            len: table.items.len(),
        })
    }

    /// Replace the cell text of one row.
    pub fn set_item_cells(&mut self, id: ControlId, index: usize, mut cells: Vec<String>) -> ControlResult<()> {
        let columns = self.table(id, "set_item_cells")?.columns.len();
        cells.resize(columns, String::new());
        self.item_mut(id, index, "set_item_cells")?.cells = cells;
        Ok(())
    }

    /// Cell text of one row.
    pub fn item_cells(&self, id: ControlId, index: usize) -> ControlResult<&[String]> {
        Ok(&self.item(id, index, "item_cells")?.cells)
    }

    /// Set the row colors.
    pub fn set_item_colors(
        &mut self,
        id: ControlId,
        index: usize,
        foreground: Option<Color>,
        background: Option<Color>,
    ) -> ControlResult<()> {
        let item = self.item_mut(id, index, "set_item_colors")?;
        item.foreground = foreground;
        item.background = background;
        Ok(())
    }

    /// Row foreground and background colors.
    pub fn item_colors(&self, id: ControlId, index: usize) -> ControlResult<(Option<Color>, Option<Color>)> {
        let item = self.item(id, index, "item_colors")?;
        Ok((item.foreground, item.background))
    }

    /// Selected row indices in ascending order.
    pub fn selection(&self, id: ControlId) -> ControlResult<&[usize]> {
        Ok(&self.table(id, "selection")?.selection)
    }

    /// Replace the selection.
    ///
    /// Out-of-range indices are dropped. Without [`Style::MULTI`] only the
    /// last index is kept.
    pub fn set_selection(&mut self, id: ControlId, indices: &[usize]) -> ControlResult<()> {
        let multi = self.get(id)?.style.contains(Style::MULTI);
        let table = self.table_mut(id, "set_selection")?;
        let len = table.items.len();
        let mut selection: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
        if !multi && selection.len() > 1 {
            selection.drain(..selection.len() - 1);
        }
        selection.sort_unstable();
        selection.dedup();
        table.selection = selection;
        Ok(())
    }
}

/// A thread-safe wrapper around [`ControlRegistry`] that delivers signals.
pub struct SharedControlRegistry {
    inner: RwLock<ControlRegistry>,
}

impl SharedControlRegistry {
    /// Create a new shared registry.
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            inner: RwLock::new(ControlRegistry::new(metrics)),
        }
    }

    /// Execute a function with read access to the registry.
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ControlRegistry) -> R,
    {
        f(&self.inner.read())
    }

    /// Execute a function with write access to the registry.
    ///
    /// No notifications are delivered for changes made here.
    pub fn with_write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ControlRegistry) -> R,
    {
        f(&mut self.inner.write())
    }

    /// Create a control.
    pub fn create(
        &self,
        kind: ControlKind,
        parent: Option<ControlId>,
        style: Style,
    ) -> ControlResult<ControlId> {
        self.inner.write().create(kind, parent, style)
    }

    /// Dispose a control and its descendants, emitting `disposed` children first.
    pub fn dispose(&self, id: ControlId) -> ControlResult<()> {
        let removed = self.inner.write().dispose(id)?;
        for signals in removed {
            signals.disposed.emit(());
        }
        Ok(())
    }

    /// Check if a control exists.
    pub fn contains(&self, id: ControlId) -> bool {
        self.inner.read().contains(id)
    }

    /// Kind of a control.
    pub fn kind(&self, id: ControlId) -> ControlResult<ControlKind> {
        self.inner.read().kind(id)
    }

    /// Creation style of a control.
    pub fn style(&self, id: ControlId) -> ControlResult<Style> {
        self.inner.read().style(id)
    }

    /// Parent of a control.
    pub fn parent(&self, id: ControlId) -> ControlResult<Option<ControlId>> {
        self.inner.read().parent(id)
    }

    /// Children of a control (owned for thread safety).
    pub fn children(&self, id: ControlId) -> ControlResult<Vec<ControlId>> {
        self.inner.read().children(id).map(<[ControlId]>::to_vec)
    }

    /// Notification signals of a control.
    pub fn signals(&self, id: ControlId) -> ControlResult<Arc<ControlSignals>> {
        self.inner.read().signals(id)
    }

    /// Text of a control.
    pub fn text(&self, id: ControlId) -> ControlResult<String> {
        self.inner.read().text(id).map(str::to_string)
    }

    /// Set the text programmatically.
    ///
    /// Text fields and combos emit `modified` when the text changes.
    pub fn set_text(&self, id: ControlId, text: &str) -> ControlResult<()> {
        let notify = {
            let mut registry = self.inner.write();
            let changed = registry.set_text(id, text)?;
            let editable = registry.kind(id)?.is_editable_text();
            (changed && editable).then(|| registry.signals(id)).transpose()?
        };
        if let Some(signals) = notify {
            signals.modified.emit(());
        }
        Ok(())
    }

    /// Simulate the user editing a text field or combo.
    ///
    /// Always emits `modified`.
    pub fn type_text(&self, id: ControlId, text: &str) -> ControlResult<()> {
        let signals = {
            let mut registry = self.inner.write();
            let kind = registry.kind(id)?;
            if !kind.is_editable_text() {
                return Err(ControlError::UnsupportedKind {
                    id,
                    kind,
                    operation: "type_text",
                });
            }
            registry.set_text(id, text)?;
            registry.signals(id)?
        };
        signals.modified.emit(());
        Ok(())
    }

    /// Drop-down entries of a combo.
    pub fn items(&self, id: ControlId) -> ControlResult<Vec<String>> {
        self.inner.read().items(id).map(<[String]>::to_vec)
    }

    /// Replace the drop-down entries of a combo.
    pub fn set_items(&self, id: ControlId, items: Vec<String>) -> ControlResult<()> {
        self.inner.write().set_items(id, items)
    }

    /// Simulate the user picking a drop-down entry. Emits `modified`.
    pub fn select_item(&self, id: ControlId, index: usize) -> ControlResult<()> {
        let text = {
            let registry = self.inner.read();
            let items = registry.items(id)?;
            items
                .get(index)
                .cloned()
                .ok_or(ControlError::IndexOutOfRange {
                    index,
                    len: items.len(),
                })?
        };
        self.type_text(id, &text)
    }

    /// Show an image of the given dimensions in a label.
    pub fn set_image(&self, id: ControlId, image: Option<Size>) -> ControlResult<()> {
        self.inner.write().set_image(id, image)
    }

    /// Bounds of a control.
    pub fn bounds(&self, id: ControlId) -> ControlResult<Rect> {
        self.inner.read().bounds(id)
    }

    /// Set bounds, emitting `resized` when the size changes.
    pub fn set_bounds(&self, id: ControlId, bounds: Rect) -> ControlResult<()> {
        let notify = {
            let mut registry = self.inner.write();
            let resized = registry.set_bounds(id, bounds)?;
            resized.then(|| registry.signals(id)).transpose()?
        };
        if let Some(signals) = notify {
            signals.resized.emit(bounds.size());
        }
        Ok(())
    }

    /// Location of a control.
    pub fn location(&self, id: ControlId) -> ControlResult<Point> {
        self.bounds(id).map(|b| b.origin())
    }

    /// Move a control, keeping its size.
    pub fn set_location(&self, id: ControlId, location: Point) -> ControlResult<()> {
        let size = self.bounds(id)?.size();
        self.set_bounds(id, Rect::from_parts(location, size))
    }

    /// Size of a control.
    pub fn size(&self, id: ControlId) -> ControlResult<Size> {
        self.bounds(id).map(|b| b.size())
    }

    /// Resize a control, keeping its location.
    pub fn set_size(&self, id: ControlId, size: Size) -> ControlResult<()> {
        let origin = self.bounds(id)?.origin();
        self.set_bounds(id, Rect::from_parts(origin, size))
    }

    /// Preferred size of a control.
    pub fn preferred_size(&self, id: ControlId) -> ControlResult<Size> {
        self.inner.read().preferred_size(id)
    }

    /// Fix the preferred size of a control.
    pub fn set_size_hint(&self, id: ControlId, hint: Option<Size>) -> ControlResult<()> {
        self.inner.write().set_size_hint(id, hint)
    }

    /// Whether the control itself is visible.
    pub fn is_visible(&self, id: ControlId) -> ControlResult<bool> {
        self.inner.read().is_visible(id)
    }

    /// Show or hide a control.
    pub fn set_visible(&self, id: ControlId, visible: bool) -> ControlResult<()> {
        self.inner.write().set_visible(id, visible)
    }

    /// Layout data of a control.
    pub fn layout_data(&self, id: ControlId) -> ControlResult<Option<FormData>> {
        self.inner.read().layout_data(id)
    }

    /// Replace the layout data of a control.
    pub fn set_layout_data(&self, id: ControlId, data: Option<FormData>) -> ControlResult<()> {
        self.inner.write().set_layout_data(id, data)
    }

    /// Foreground and background colors.
    pub fn colors(&self, id: ControlId) -> ControlResult<(Option<Color>, Option<Color>)> {
        self.inner.read().colors(id)
    }

    /// Set foreground and background colors.
    pub fn set_colors(
        &self,
        id: ControlId,
        foreground: Option<Color>,
        background: Option<Color>,
    ) -> ControlResult<()> {
        self.inner.write().set_colors(id, foreground, background)
    }

    /// Keyboard accelerator of a menu item.
    pub fn accelerator(&self, id: ControlId) -> ControlResult<Option<Accelerator>> {
        self.inner.read().accelerator(id)
    }

    /// Set the keyboard accelerator of a menu item.
    pub fn set_accelerator(&self, id: ControlId, accelerator: Option<Accelerator>) -> ControlResult<()> {
        self.inner.write().set_accelerator(id, accelerator)
    }

    /// Lay out a container and its nested containers, emitting `resized`.
    pub fn layout(&self, container: ControlId) -> ControlResult<()> {
        let _span = PerfSpan::new("layout");
        let resized = self.inner.write().layout(container)?;
        for (signals, size) in resized {
            signals.resized.emit(size);
        }
        Ok(())
    }

    /// Resize a shell to its preferred size, then lay it out.
    pub fn pack(&self, shell: ControlId) -> ControlResult<()> {
        let size = self.preferred_size(shell)?;
        self.set_size(shell, size)?;
        self.layout(shell)
    }

    /// Deliver `painted` to every visible control of a subtree.
    pub fn paint(&self, root: ControlId) -> ControlResult<()> {
        let signals = {
            let registry = self.inner.read();
            registry
                .paint_order(root)?
                .into_iter()
                .map(|id| registry.signals(id))
                .collect::<ControlResult<Vec<_>>>()?
        };
        for signal in signals {
            signal.painted.emit(());
        }
        Ok(())
    }

    /// Simulate a single activation (button press, menu selection).
    pub fn click(&self, id: ControlId) -> ControlResult<()> {
        self.signals(id)?.selected.emit(());
        Ok(())
    }

    /// Simulate a double activation.
    pub fn double_click(&self, id: ControlId) -> ControlResult<()> {
        self.signals(id)?.default_selected.emit(());
        Ok(())
    }

    /// Simulate clicking a table row: select it, then emit `selected`.
    pub fn click_row(&self, id: ControlId, row: usize) -> ControlResult<()> {
        self.select_row(id, row)?;
        self.click(id)
    }

    /// Simulate double-clicking a table row: select it, then emit `default_selected`.
    pub fn double_click_row(&self, id: ControlId, row: usize) -> ControlResult<()> {
        self.select_row(id, row)?;
        self.double_click(id)
    }

    fn select_row(&self, id: ControlId, row: usize) -> ControlResult<()> {
        let mut registry = self.inner.write();
        let len = registry.item_count(id)?;
        if row >= len {
            return Err(ControlError::IndexOutOfRange { index: row, len });
        }
        registry.set_selection(id, &[row])
    }

    /// Simulate clicking a table column header.
    pub fn click_column(&self, id: ControlId, column: usize) -> ControlResult<()> {
        let signals = {
            let registry = self.inner.read();
            let len = registry.columns(id)?.len();
            if column >= len {
                return Err(ControlError::IndexOutOfRange { index: column, len });
            }
            registry.signals(id)?
        };
        signals.column_clicked.emit(column);
        Ok(())
    }

    /// Selected table rows.
    pub fn selection(&self, id: ControlId) -> ControlResult<Vec<usize>> {
        self.inner.read().selection(id).map(<[usize]>::to_vec)
    }

    /// Replace the table selection.
    pub fn set_selection(&self, id: ControlId, indices: &[usize]) -> ControlResult<()> {
        self.inner.write().set_selection(id, indices)
    }

    /// Number of table rows.
    pub fn item_count(&self, id: ControlId) -> ControlResult<usize> {
        self.inner.read().item_count(id)
    }

    /// Cell text of one table row.
    pub fn item_cells(&self, id: ControlId, index: usize) -> ControlResult<Vec<String>> {
        self.inner.read().item_cells(id, index).map(<[String]>::to_vec)
    }

    /// Table column specs.
    pub fn columns(&self, id: ControlId) -> ControlResult<Vec<TableColumnSpec>> {
        self.inner.read().columns(id).map(<[TableColumnSpec]>::to_vec)
    }
}
