//! Grid view state kept in the browser's localStorage between visits.
//!
//! The stored JSON follows the grid export shape so that it stays readable by
//! older bundles: `pagination.paginationModel`, `filter.filterModel`,
//! `sorting.sortModel` and `columns`.

use super::config::GridSettings;
use super::error::GridError;
use super::query_state::QueryState;
use contracts::shared::data_grid::{FilterClause, LogicOperator, SortSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), GridError>;
}

/// `window.localStorage`. Reads yield nothing when storage is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), GridError> {
        let storage = Self::storage()
            .ok_or_else(|| GridError::Storage("localStorage недоступен".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| GridError::Storage(format!("{e:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationModel {
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSection {
    pub pagination_model: PaginationModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    #[serde(default)]
    pub items: Vec<FilterClause>,
    #[serde(default)]
    pub logic_operator: LogicOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSection {
    pub filter_model: FilterModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingSection {
    #[serde(default)]
    pub sort_model: Vec<SortSpec>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsSection {
    #[serde(default)]
    pub column_visibility_model: BTreeMap<String, bool>,
    #[serde(default)]
    pub ordered_fields: Vec<String>,
}

/// Snapshot of the grid presentation keyed by entity name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedViewState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<SortingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnsSection>,
}

/// Column order and visibility as the user left them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnLayout {
    pub visibility: BTreeMap<String, bool>,
    pub order: Vec<String>,
}

impl ColumnLayout {
    /// Declared fields in the saved order. Unknown saved fields are dropped,
    /// fields missing from the saved order keep their declared place at the end.
    pub fn arrange(&self, declared: &[&str]) -> Vec<String> {
        let mut fields: Vec<String> = self
            .order
            .iter()
            .filter(|f| declared.contains(&f.as_str()))
            .cloned()
            .collect();
        for field in declared {
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        fields
    }

    /// Order after moving `field` one place to the left.
    pub fn moved_left(&self, declared: &[&str], field: &str) -> Vec<String> {
        let mut fields = self.arrange(declared);
        if let Some(pos) = fields.iter().position(|f| f == field) {
            if pos > 0 {
                fields.swap(pos - 1, pos);
            }
        }
        fields
    }

    pub fn is_visible(&self, field: &str) -> bool {
        self.visibility.get(field).copied().unwrap_or(true)
    }
}

pub fn state_key(entity_name: &str, settings: &GridSettings) -> String {
    format!("{}{}", entity_name, settings.state_key_suffix)
}

pub fn cache_key(entity_name: &str, settings: &GridSettings) -> String {
    format!("{}{}", entity_name, settings.cache_key_suffix)
}

/// Read the stored snapshot. Unparseable JSON is reported and ignored.
pub fn read_view_state<S: KeyValueStore>(
    store: &S,
    entity_name: &str,
    settings: &GridSettings,
) -> Option<PersistedViewState> {
    let raw = store.get_item(&state_key(entity_name, settings))?;
    match serde_json::from_str::<PersistedViewState>(&raw) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("ignoring stored grid state for '{}': {}", entity_name, e);
            None
        }
    }
}

/// Resolve the initial query state and column layout for a grid.
pub fn restore<S: KeyValueStore>(
    store: &S,
    entity_name: &str,
    default_filters: Option<Vec<FilterClause>>,
    fixed_filters: Vec<FilterClause>,
    settings: &GridSettings,
    persist_enabled: bool,
) -> (QueryState, ColumnLayout) {
    let mut state =
        QueryState::with_defaults(default_filters, fixed_filters, settings.default_page_size);
    let mut layout = ColumnLayout::default();

    let stored = if persist_enabled {
        read_view_state(store, entity_name, settings)
    } else {
        None
    };
    let Some(stored) = stored else {
        return (state, layout);
    };

    if let Some(p) = stored.pagination {
        state.page = p.pagination_model.page;
        state.page_size = p.pagination_model.page_size.max(1);
    }
    if let Some(f) = stored.filter {
        let model = f.filter_model;
        state.replace_filters(model.items, model.logic_operator);
    }
    if let Some(s) = stored.sorting {
        state.sort = s.sort_model.into_iter().next();
    }
    if let Some(c) = stored.columns {
        layout.visibility = c.column_visibility_model;
        layout.order = c.ordered_fields;
    }
    (state, layout)
}

/// Build the snapshot written to storage. Fixed filters are left out.
pub fn snapshot(state: &QueryState, layout: &ColumnLayout) -> PersistedViewState {
    PersistedViewState {
        pagination: Some(PaginationSection {
            pagination_model: PaginationModel {
                page: state.page,
                page_size: state.page_size,
            },
        }),
        filter: Some(FilterSection {
            filter_model: FilterModel {
                items: state.filters.clone().unwrap_or_default(),
                logic_operator: state.filters_operator,
            },
        }),
        sorting: Some(SortingSection {
            sort_model: state.sort.iter().cloned().collect(),
        }),
        columns: Some(ColumnsSection {
            column_visibility_model: layout.visibility.clone(),
            ordered_fields: layout.order.clone(),
        }),
    }
}

pub fn write_view_state<S: KeyValueStore>(
    store: &S,
    entity_name: &str,
    settings: &GridSettings,
    view: &PersistedViewState,
) -> Result<(), GridError> {
    let raw = serde_json::to_string(view).map_err(|e| GridError::Encode(e.to_string()))?;
    store.set_item(&state_key(entity_name, settings), &raw)
}
