//! Remote grid state synchronizer.
//!
//! Owns the query state of one grid, turns every change into exactly one
//! pending fetch and decides which fetch results may reach the screen.
//! Network I/O stays with the caller: a mutation hands out a [`PendingFetch`],
//! the caller performs it and returns the result through
//! [`GridSynchronizer::complete`].
//!
//! Each data fetch carries the generation it was issued for. A result whose
//! generation is older than the current one is dropped, whatever order the
//! responses arrive in.

use super::config::GridSettings;
use super::dedup::group_duplicates;
use super::error::GridError;
use super::persistence::{
    cache_key, restore, snapshot, write_view_state, ColumnLayout, KeyValueStore,
};
use super::query_state::QueryState;
use super::request::{build_request, ExportColumns};
use super::selection::SelectionSet;
use contracts::shared::data_grid::{
    FilterClause, GridFetchRequest, GridResponse, GridRow, LogicOperator, RowId, SortSpec,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStatus {
    Uninitialized,
    Loading,
    Ready,
    /// Last fetch failed; the previous rows are still shown.
    Error,
}

/// Caller-side configuration of one grid instance.
#[derive(Debug, Clone, Default)]
pub struct GridOptions {
    pub entity_name: String,
    pub default_filters: Option<Vec<FilterClause>>,
    pub fixed_filters: Vec<FilterClause>,
    pub extra_params: Map<String, Value>,
    pub persist: bool,
    pub duplicate_key: Option<String>,
    pub disabled_selected: Vec<RowId>,
    pub settings: GridSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Data,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub kind: FetchKind,
}

/// A fetch the caller has to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: GridFetchRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// New rows are displayed.
    Applied,
    /// Export finished; the caller downloads these files.
    Exported(Vec<String>),
    /// Show the error once; displayed rows are unchanged.
    Failed(GridError),
    /// Superseded by a newer query state and ignored.
    Stale,
    /// The grid was torn down before the result arrived.
    Detached,
}

pub struct GridSynchronizer<T, S> {
    options: GridOptions,
    store: S,
    state: QueryState,
    columns: ColumnLayout,
    status: GridStatus,
    generation: u64,
    export_generation: u64,
    rows: Vec<GridRow<T>>,
    total: u64,
    selection: SelectionSet,
    mounted: bool,
}

impl<T, S> GridSynchronizer<T, S>
where
    T: Serialize,
    S: KeyValueStore,
{
    /// Resolve the initial state from storage (or defaults). Nothing is
    /// fetched until [`start`](Self::start).
    pub fn new(options: GridOptions, store: S) -> Self {
        let (state, columns) = restore(
            &store,
            &options.entity_name,
            options.default_filters.clone(),
            options.fixed_filters.clone(),
            &options.settings,
            options.persist,
        );
        let selection = SelectionSet::new(options.disabled_selected.iter().cloned());
        Self {
            options,
            store,
            state,
            columns,
            status: GridStatus::Uninitialized,
            generation: 0,
            export_generation: 0,
            rows: Vec::new(),
            total: 0,
            selection,
            mounted: true,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn status(&self) -> GridStatus {
        self.status
    }

    pub fn rows(&self) -> &[GridRow<T>] {
        &self.rows
    }

    /// Server-reported total, independent of the duplicate transform.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count(self.total)
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// First fetch after the initial state is resolved.
    pub fn start(&mut self) -> PendingFetch {
        self.next_data_fetch()
    }

    pub fn set_filters(
        &mut self,
        clauses: Vec<FilterClause>,
        combinator: LogicOperator,
    ) -> PendingFetch {
        self.state.apply_filters(clauses, combinator);
        self.next_data_fetch()
    }

    pub fn set_sort(&mut self, sort: Vec<SortSpec>) -> PendingFetch {
        self.state.apply_sort(sort);
        self.next_data_fetch()
    }

    pub fn set_page(&mut self, page: usize, page_size: usize) -> PendingFetch {
        self.state.apply_page(page, page_size);
        self.next_data_fetch()
    }

    /// Manual refresh: same state, new generation.
    pub fn refresh(&mut self) -> PendingFetch {
        self.next_data_fetch()
    }

    /// Timer-driven refresh; nothing to do once detached.
    pub fn poll(&mut self) -> Option<PendingFetch> {
        if !self.mounted {
            return None;
        }
        Some(self.next_data_fetch())
    }

    /// Same parameters as the current page, answered with file paths.
    /// Does not touch displayed rows or the data generation.
    pub fn request_export(&mut self, fields: Vec<String>) -> PendingFetch {
        self.export_generation += 1;
        let columns = ExportColumns {
            fields,
            visibility: self.columns.visibility.clone(),
        };
        PendingFetch {
            ticket: FetchTicket {
                generation: self.export_generation,
                kind: FetchKind::Export,
            },
            request: build_request(&self.state, &self.options.extra_params, Some(&columns)),
        }
    }

    fn next_data_fetch(&mut self) -> PendingFetch {
        self.generation += 1;
        self.status = GridStatus::Loading;
        let request = build_request(&self.state, &self.options.extra_params, None);
        if self.options.persist {
            self.remember_cache_key(&request);
        }
        PendingFetch {
            ticket: FetchTicket {
                generation: self.generation,
                kind: FetchKind::Data,
            },
            request,
        }
    }

    fn remember_cache_key(&self, request: &GridFetchRequest) {
        let key = cache_key(&self.options.entity_name, &self.options.settings);
        let result = serde_json::to_string(request)
            .map_err(|e| GridError::Encode(e.to_string()))
            .and_then(|raw| self.store.set_item(&key, &raw));
        if let Err(e) = result {
            log::warn!("cache key for '{}' not stored: {}", self.options.entity_name, e);
        }
    }

    /// Apply the result of a fetch handed out earlier.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<GridResponse<GridRow<T>>, GridError>,
    ) -> FetchOutcome {
        if !self.mounted {
            return FetchOutcome::Detached;
        }
        match ticket.kind {
            FetchKind::Export => self.complete_export(ticket, result),
            FetchKind::Data => self.complete_data(ticket, result),
        }
    }

    fn complete_export(
        &mut self,
        ticket: FetchTicket,
        result: Result<GridResponse<GridRow<T>>, GridError>,
    ) -> FetchOutcome {
        if ticket.generation != self.export_generation {
            log::debug!(
                "dropping superseded export of '{}'",
                self.options.entity_name
            );
            return FetchOutcome::Stale;
        }
        let paths = result.and_then(|resp| resp.into_export_paths().map_err(GridError::Remote));
        match paths {
            Ok(paths) => FetchOutcome::Exported(paths),
            Err(e) => {
                log::error!("export of '{}' failed: {}", self.options.entity_name, e);
                FetchOutcome::Failed(e)
            }
        }
    }

    fn complete_data(
        &mut self,
        ticket: FetchTicket,
        result: Result<GridResponse<GridRow<T>>, GridError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            log::debug!(
                "dropping stale page for '{}' (generation {} < {})",
                self.options.entity_name,
                ticket.generation,
                self.generation
            );
            return FetchOutcome::Stale;
        }

        let page = result.and_then(|resp| resp.into_page().map_err(GridError::Remote));
        match page {
            Ok(page) => {
                self.rows = match self.options.duplicate_key.as_deref() {
                    Some(key) => group_duplicates(page.data, key),
                    None => page.data,
                };
                self.total = page.total;
                self.status = GridStatus::Ready;
                FetchOutcome::Applied
            }
            Err(e) => {
                log::error!("loading '{}' failed: {}", self.options.entity_name, e);
                self.status = GridStatus::Error;
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Column order changed by the user; persisted right away.
    pub fn set_column_order(&mut self, order: Vec<String>) {
        self.columns.order = order;
        self.persist_or_warn();
    }

    pub fn set_column_visibility(&mut self, visibility: BTreeMap<String, bool>) {
        self.columns.visibility = visibility;
    }

    /// Write the current view state, if persistence is enabled.
    pub fn persist(&self) -> Result<(), GridError> {
        if !self.options.persist {
            return Ok(());
        }
        write_view_state(
            &self.store,
            &self.options.entity_name,
            &self.options.settings,
            &snapshot(&self.state, &self.columns),
        )
    }

    pub fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            log::warn!("grid state of '{}' not saved: {}", self.options.entity_name, e);
        }
    }

    /// Final flush; later results are reported as [`FetchOutcome::Detached`].
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.persist_or_warn();
        self.mounted = false;
    }
}
