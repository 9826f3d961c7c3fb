//! Table orchestrator.
//!
//! [`Table`] owns the rows and every piece of grid state, and re-derives the
//! view (ordered indices, visible ids, window geometry, navigator bounds)
//! from scratch whenever an input changes. The only state that survives a
//! derivation is the selection, the focus position and the size cache.

use crate::model::{
    ActionError, CellValue, ColumnError, ColumnKey, ColumnSet, GridAction, GridError,
    PipelineError, Record, RowId,
};
use crate::pipeline::{self, FilterState, PaginationState, SortDirection, SortState};
use crate::state::bulk_action::{ActionTicket, BulkAction, BulkActionState};
use crate::state::focus::{FocusNavigator, FocusPosition, NavEvent, DEFAULT_PAGE_JUMP};
use crate::state::selection::{SelectionAction, SelectionState, SelectionSummary};
use crate::view_state::{Align, ScrollEvent, VirtualItem, Virtualizer, VirtualizerOptions, Window};
use crate::viewport::Viewport;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rows per page when pagination is on and nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Row size assumed before the UI measures a row.
pub const DEFAULT_ESTIMATE_ROW_SIZE: usize = 36;

/// Viewport extent assumed until the UI reports one.
pub const DEFAULT_CONTAINER_EXTENT: usize = 600;

/// Rows materialized beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 5;

/// Derives a [`RowId`] from a row and its index in the source collection.
pub type RowKeyFn<T> = Arc<dyn Fn(&T, usize) -> RowId + Send + Sync>;

// ===== TableOptions =====

/// Construction-time settings of a [`Table`].
pub struct TableOptions<T> {
    /// Row identity; falls back to [`Record::id`] and then the source index.
    pub row_key: Option<RowKeyFn<T>>,
    /// Rows per page, or `None` to show every row.
    pub page_size: Option<usize>,
    pub estimate_row_size: usize,
    pub container_extent: usize,
    pub overscan: usize,
    /// Rows moved by PageUp/PageDown.
    pub page_jump: usize,
}

impl<T> TableOptions<T> {
    /// Use `f` to identify rows.
    pub fn with_row_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> RowId + Send + Sync + 'static,
    {
        self.row_key = Some(Arc::new(f));
        self
    }

    pub fn with_page_size(mut self, page_size: Option<usize>) -> Self {
        self.page_size = page_size;
        self
    }
}

impl<T> Default for TableOptions<T> {
    fn default() -> Self {
        Self {
            row_key: None,
            page_size: Some(DEFAULT_PAGE_SIZE),
            estimate_row_size: DEFAULT_ESTIMATE_ROW_SIZE,
            container_extent: DEFAULT_CONTAINER_EXTENT,
            overscan: DEFAULT_OVERSCAN,
            page_jump: DEFAULT_PAGE_JUMP,
        }
    }
}

impl<T> Clone for TableOptions<T> {
    fn clone(&self) -> Self {
        Self {
            row_key: self.row_key.clone(),
            page_size: self.page_size,
            estimate_row_size: self.estimate_row_size,
            container_extent: self.container_extent,
            overscan: self.overscan,
            page_jump: self.page_jump,
        }
    }
}

impl<T> fmt::Debug for TableOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("row_key", &self.row_key.as_ref().map(|_| "<fn>"))
            .field("page_size", &self.page_size)
            .field("estimate_row_size", &self.estimate_row_size)
            .field("container_extent", &self.container_extent)
            .field("overscan", &self.overscan)
            .field("page_jump", &self.page_jump)
            .finish()
    }
}

/// Identify `row` by `row_key`, its own id, or its source index.
pub fn resolve_row_id<T: Record>(row: &T, index: usize, row_key: Option<&RowKeyFn<T>>) -> RowId {
    match row_key {
        Some(key) => key(row, index),
        None => row.id().unwrap_or_else(|| RowId::positional(index)),
    }
}

// ===== DisplayRow =====

/// A row on the current page.
#[derive(Debug)]
pub struct DisplayRow<'a, T> {
    /// Position on the page; the navigator's and windower's row coordinate.
    pub display_index: usize,
    /// Position in the source collection.
    pub source_index: usize,
    pub id: &'a RowId,
    pub row: &'a T,
    pub selected: bool,
}

/// Pipeline inputs saved before a change, restored if it fails to derive.
#[derive(Debug, Clone)]
struct QueryInputs {
    sort: SortState,
    filters: FilterState,
    pagination: Option<PaginationState>,
}

/// Output of the last derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Derived {
    /// Source indices of the displayed rows, in display order.
    order: Vec<usize>,
    /// Ids of the displayed rows; the visible set.
    visible_ids: Vec<RowId>,
    total_items: usize,
    total_pages: usize,
}

// ===== Table =====

/// Headless data grid over rows of type `T`.
///
/// Every mutation re-runs the pipeline and re-derives the view, so readers
/// never observe a stale page, window or navigator bound. A mutation whose
/// derivation fails is rolled back: inputs and view stay as they were.
pub struct Table<T> {
    rows: Vec<T>,
    columns: ColumnSet<T>,
    row_key: Option<RowKeyFn<T>>,

    sort: SortState,
    filters: FilterState,
    /// `None` when pagination is off.
    pagination: Option<PaginationState>,

    selection: SelectionState,
    navigator: FocusNavigator,
    virtualizer: Virtualizer,
    actions: BulkActionState,
    loading: bool,

    derived: Derived,
}

impl<T: Record> Table<T> {
    /// Build a table and derive its first view.
    ///
    /// # Errors
    ///
    /// [`ColumnError::ZeroPageSize`] for a zero page size, or the first
    /// accessor/comparator failure of the initial derivation.
    pub fn new(rows: Vec<T>, columns: ColumnSet<T>, options: TableOptions<T>) -> Result<Self, GridError> {
        let pagination = options.page_size.map(PaginationState::new).transpose()?;
        let navigator =
            FocusNavigator::new(0, columns.len()).with_page_jump(options.page_jump);
        let virtualizer = Virtualizer::new(VirtualizerOptions {
            count: 0,
            estimate_size: options.estimate_row_size,
            container_extent: options.container_extent,
            overscan: options.overscan,
        });

        let mut table = Self {
            rows,
            columns,
            row_key: options.row_key,
            sort: SortState::none(),
            filters: FilterState::new(),
            pagination,
            selection: SelectionState::new(),
            navigator,
            virtualizer,
            actions: BulkActionState::default(),
            loading: false,
            derived: Derived::default(),
        };
        table.refresh()?;
        Ok(table)
    }

    // ----- Accessors -----

    /// The full source collection.
    pub fn source_rows(&self) -> &[T] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Header indicator for `key`.
    pub fn sort_direction_for(&self, key: &ColumnKey) -> Option<SortDirection> {
        self.sort.direction_for(key)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn pagination(&self) -> Option<&PaginationState> {
        self.pagination.as_ref()
    }

    /// Current page, 0 when pagination is off.
    pub fn page(&self) -> usize {
        self.pagination.map_or(0, |p| p.page())
    }

    /// Rows remaining after filtering.
    pub fn total_items(&self) -> usize {
        self.derived.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.derived.total_pages
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_summary(&self) -> SelectionSummary {
        self.selection.summary(&self.derived.visible_ids)
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Ids of the displayed rows, in display order.
    pub fn visible_ids(&self) -> &[RowId] {
        &self.derived.visible_ids
    }

    pub fn navigator(&self) -> &FocusNavigator {
        &self.navigator
    }

    pub fn focus(&self) -> FocusPosition {
        self.navigator.position()
    }

    pub fn virtualizer(&self) -> &Virtualizer {
        &self.virtualizer
    }

    /// Label of the bulk action currently executing.
    pub fn executing_action(&self) -> Option<&str> {
        self.actions.executing()
    }

    /// Number of displayed rows.
    pub fn len(&self) -> usize {
        self.derived.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.derived.order.is_empty()
    }

    /// The displayed rows: the current page, or every filtered row when
    /// pagination is off.
    pub fn rows(&self) -> Vec<DisplayRow<'_, T>> {
        (0..self.len()).filter_map(|i| self.display_row(i)).collect()
    }

    /// One displayed row by display index.
    pub fn display_row(&self, display_index: usize) -> Option<DisplayRow<'_, T>> {
        let source_index = *self.derived.order.get(display_index)?;
        let id = &self.derived.visible_ids[display_index];
        Some(DisplayRow {
            display_index,
            source_index,
            id,
            row: &self.rows[source_index],
            selected: self.selection.is_selected(id),
        })
    }

    /// Virtual window over the displayed rows at the current scroll offset.
    pub fn window(&self) -> Window {
        self.virtualizer.window()
    }

    /// The rows to materialize, paired with their layout.
    pub fn window_rows(&self) -> Vec<(VirtualItem, DisplayRow<'_, T>)> {
        self.window()
            .items
            .into_iter()
            .filter_map(|item| self.display_row(item.index).map(|row| (item, row)))
            .collect()
    }

    /// Every selected row in source order, visible or not.
    pub fn selected_rows(&self) -> Vec<&T> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.rows
            .iter()
            .enumerate()
            .filter(|(index, row)| {
                let id = resolve_row_id(*row, *index, self.row_key.as_ref());
                self.selection.is_selected(&id)
            })
            .map(|(_, row)| row)
            .collect()
    }

    // ----- Data -----

    /// Replace the source collection.
    ///
    /// Selection is kept by id; ids no longer present stay selected until
    /// cleared. On error the previous rows are kept.
    pub fn set_rows(&mut self, rows: Vec<T>) -> Result<(), GridError> {
        info!(count = rows.len(), "Replacing table rows");
        let previous = std::mem::replace(&mut self.rows, rows);
        if let Err(err) = self.refresh() {
            warn!(error = %err, "Derivation failed; previous rows kept");
            self.rows = previous;
            return Err(err);
        }
        self.virtualizer.reset_measurements();
        Ok(())
    }

    // ----- Sorting -----

    /// Header click: cycle `none → asc → desc → none` on `key`.
    ///
    /// # Errors
    ///
    /// [`ColumnError::UnknownColumn`] or [`ColumnError::NotSortable`].
    pub fn toggle_sort(&mut self, key: &str) -> Result<(), GridError> {
        let key = self.sortable_key(key)?;
        let inputs = self.query_inputs();
        self.sort.toggle(key);
        debug!(column = ?self.sort.column(), direction = ?self.sort.direction(), "Sort toggled");
        self.commit(inputs)
    }

    /// Replace the sort state outright.
    pub fn set_sort(&mut self, sort: SortState) -> Result<(), GridError> {
        if let Some(column) = sort.column() {
            self.sortable_key(column.as_str())?;
        }
        let inputs = self.query_inputs();
        self.sort = sort;
        self.commit(inputs)
    }

    fn sortable_key(&self, key: &str) -> Result<ColumnKey, ColumnError> {
        let column = self.columns.require(key)?;
        if !column.is_sortable() {
            return Err(ColumnError::NotSortable {
                key: column.key().clone(),
            });
        }
        Ok(column.key().clone())
    }

    // ----- Filtering -----

    /// Set the filter on `key`. Blank values clear it. Returns to page 0.
    ///
    /// # Errors
    ///
    /// [`ColumnError::UnknownColumn`] or [`ColumnError::NotFilterable`].
    pub fn set_filter(&mut self, key: &str, value: impl Into<CellValue>) -> Result<(), GridError> {
        let key = self.filterable_key(key)?;
        let value = value.into();
        let inputs = self.query_inputs();
        if value.is_blank() {
            self.filters.remove(&key);
        } else {
            self.filters.set(key, value);
        }
        self.filters_changed(inputs)
    }

    pub fn clear_filter(&mut self, key: &str) -> Result<(), GridError> {
        let key = self.filterable_key(key)?;
        let inputs = self.query_inputs();
        self.filters.remove(&key);
        self.filters_changed(inputs)
    }

    pub fn clear_filters(&mut self) -> Result<(), GridError> {
        let inputs = self.query_inputs();
        self.filters.clear();
        self.filters_changed(inputs)
    }

    fn filterable_key(&self, key: &str) -> Result<ColumnKey, ColumnError> {
        let column = self.columns.require(key)?;
        if !column.is_filterable() {
            return Err(ColumnError::NotFilterable {
                key: column.key().clone(),
            });
        }
        Ok(column.key().clone())
    }

    fn filters_changed(&mut self, inputs: QueryInputs) -> Result<(), GridError> {
        if let Some(pagination) = self.pagination.as_mut() {
            pagination.set_page(0);
        }
        debug!(active = self.filters.active().count(), "Filters changed");
        self.commit(inputs)
    }

    // ----- Pagination -----

    /// Go to `page`, clamped to the last page. No-op when pagination is off.
    pub fn set_page(&mut self, page: usize) -> Result<(), GridError> {
        let inputs = self.query_inputs();
        match self.pagination.as_mut() {
            Some(pagination) => pagination.set_page(page),
            None => return Ok(()),
        }
        self.commit(inputs)
    }

    pub fn next_page(&mut self) -> Result<(), GridError> {
        let inputs = self.query_inputs();
        match self.pagination.as_mut() {
            Some(pagination) => pagination.next_page(),
            None => return Ok(()),
        }
        self.commit(inputs)
    }

    pub fn prev_page(&mut self) -> Result<(), GridError> {
        let inputs = self.query_inputs();
        match self.pagination.as_mut() {
            Some(pagination) => pagination.prev_page(),
            None => return Ok(()),
        }
        self.commit(inputs)
    }

    /// Change the page size, turning pagination on if it was off.
    ///
    /// # Errors
    ///
    /// [`ColumnError::ZeroPageSize`]; the table is left unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), GridError> {
        let inputs = self.query_inputs();
        match self.pagination.as_mut() {
            Some(pagination) => pagination.set_page_size(page_size)?,
            None => self.pagination = Some(PaginationState::new(page_size)?),
        }
        self.commit(inputs)
    }

    /// Show every filtered row on one scrolling page.
    pub fn disable_pagination(&mut self) -> Result<(), GridError> {
        let inputs = self.query_inputs();
        if self.pagination.take().is_none() {
            return Ok(());
        }
        self.commit(inputs)
    }

    // ----- Selection -----

    pub fn toggle_row(&mut self, id: RowId) {
        self.apply_selection(SelectionAction::Toggle(id));
    }

    /// Select-all checkbox over the visible rows.
    pub fn toggle_all(&mut self) {
        self.apply_selection(SelectionAction::ToggleAll);
    }

    pub fn clear_selection(&mut self) {
        self.apply_selection(SelectionAction::Clear);
    }

    /// Run any selection message against the visible set.
    pub fn apply_selection(&mut self, action: SelectionAction) {
        self.selection.apply(action, &self.derived.visible_ids);
        debug!(selected = self.selection.len(), "Selection changed");
    }

    // ----- Geometry -----

    /// Apply a scroll offset reported by the UI. Stale events are dropped.
    pub fn on_scroll(&mut self, event: ScrollEvent) -> bool {
        self.virtualizer.on_scroll(event)
    }

    pub fn set_container_extent(&mut self, container_extent: usize) {
        self.virtualizer.set_container_extent(container_extent);
    }

    /// Record the rendered size of a displayed row.
    pub fn measure_row(&mut self, display_index: usize, size: usize) -> bool {
        self.virtualizer.measure(display_index, size)
    }

    /// Scroll so the displayed row lands per `align`, telling `viewport`.
    pub fn scroll_to_row(
        &mut self,
        display_index: usize,
        align: Align,
        viewport: &mut dyn Viewport,
    ) -> Option<usize> {
        let offset = self.virtualizer.scroll_to_index(display_index, align)?;
        viewport.scroll_to(offset);
        Some(offset)
    }

    // ----- Keyboard -----

    /// Route a key action through the navigator and act on its event.
    ///
    /// Focus moves are forwarded to `viewport` and the focused row is kept
    /// in view with [`Align::Auto`]. Selection requests go to the selection
    /// reducer.
    pub fn on_key(&mut self, action: GridAction, viewport: &mut dyn Viewport) -> Option<NavEvent> {
        let event = self.navigator.handle(action)?;
        self.dispatch(event, viewport);
        Some(event)
    }

    /// Focus a cell directly (pointer click, tab entry).
    pub fn focus_cell(&mut self, row: usize, col: usize, viewport: &mut dyn Viewport) -> Option<NavEvent> {
        let event = self.navigator.focus_cell(row, col)?;
        self.dispatch(event, viewport);
        Some(event)
    }

    /// Mark the grid busy (e.g. while rows load) or ready.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.navigator.set_disabled(loading);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Roving tab index of a cell.
    pub fn tab_index(&self, row: usize, col: usize) -> i32 {
        self.navigator.tab_index(row, col)
    }

    fn dispatch(&mut self, event: NavEvent, viewport: &mut dyn Viewport) {
        match event {
            NavEvent::CellFocused { row, col } => {
                viewport.focus_element_at(row, col);
                self.scroll_to_row(row, Align::Auto, viewport);
            }
            NavEvent::RowSelectRequested { row } => {
                if let Some(id) = self.derived.visible_ids.get(row).cloned() {
                    self.toggle_row(id);
                }
            }
            NavEvent::SelectAllRequested => self.toggle_all(),
            NavEvent::Blurred => viewport.release_focus(),
        }
    }

    // ----- Bulk actions -----

    /// Run `action` over the selected rows, returning how many it received.
    ///
    /// Selection and focus are untouched whatever the outcome.
    ///
    /// # Errors
    ///
    /// [`ActionError::AlreadyExecuting`] while another action runs, or
    /// [`ActionError::Failed`] when the action reports a failure.
    pub fn run_bulk_action(&mut self, action: &mut dyn BulkAction<T>) -> Result<usize, ActionError> {
        let ticket = self.actions.begin(action.label())?;
        let outcome = {
            let rows = self.selected_rows();
            let count = rows.len();
            action.execute(&rows).map(|()| count)
        };
        self.actions.finish(ticket, outcome)
    }

    /// Start an action that completes outside this call.
    ///
    /// The table reports it as executing until [`Table::finish_bulk_action`].
    pub fn begin_bulk_action(&mut self, label: &str) -> Result<ActionTicket, ActionError> {
        self.actions.begin(label)
    }

    pub fn finish_bulk_action(
        &mut self,
        ticket: ActionTicket,
        outcome: Result<(), String>,
    ) -> Result<(), ActionError> {
        self.actions.finish(ticket, outcome)
    }

    // ----- Derivation -----

    fn query_inputs(&self) -> QueryInputs {
        QueryInputs {
            sort: self.sort.clone(),
            filters: self.filters.clone(),
            pagination: self.pagination,
        }
    }

    fn restore(&mut self, inputs: QueryInputs) {
        self.sort = inputs.sort;
        self.filters = inputs.filters;
        self.pagination = inputs.pagination;
    }

    /// Refresh after a change to the query inputs, rolling back to `inputs`
    /// if the pipeline fails.
    fn commit(&mut self, inputs: QueryInputs) -> Result<(), GridError> {
        let result = self.refresh();
        if let Err(err) = &result {
            warn!(error = %err, "Derivation failed; previous view kept");
            self.restore(inputs);
        }
        result
    }

    /// Re-run the pipeline and re-derive everything downstream of it.
    fn refresh(&mut self) -> Result<(), GridError> {
        let derived = self.derive()?;

        if derived.order != self.derived.order {
            // Measurements are keyed by display index; they belong to the old rows.
            self.virtualizer.set_count(derived.order.len());
            self.virtualizer.reset_measurements();
        }
        if let Some(event) = self
            .navigator
            .set_dimensions(derived.order.len(), self.columns.len())
        {
            debug!(?event, "Focus adjusted to new view");
        }
        if self.loading {
            self.navigator.set_disabled(true);
        }

        self.derived = derived;
        Ok(())
    }

    fn derive(&mut self) -> Result<Derived, PipelineError> {
        let output = pipeline::process(
            &self.rows,
            &self.filters,
            &self.sort,
            &self.columns,
            self.pagination.as_ref(),
        )?;

        let order: Vec<usize> = output.rows.iter().map(|r| r.index).collect();
        let visible_ids = output
            .rows
            .iter()
            .map(|r| resolve_row_id(r.row, r.index, self.row_key.as_ref()))
            .collect();
        let total_items = output.total_items;
        let total_pages = output.total_pages;
        let pagination = output.pagination;

        if pagination.is_some() {
            self.pagination = pagination;
        }

        Ok(Derived {
            order,
            visible_ids,
            total_items,
            total_pages,
        })
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("sort", &self.sort)
            .field("filters", &self.filters)
            .field("pagination", &self.pagination)
            .field("selection", &self.selection)
            .field("focus", &self.navigator.position())
            .field("derived", &self.derived)
            .finish()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
