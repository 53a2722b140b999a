//! Таблица с серверной пагинацией, сортировкой и фильтрами.
//!
//! `synchronizer` holds the state machine and is plain Rust; `component`
//! binds it to the browser (fetch, localStorage, unload, polling).

pub mod api;
pub mod component;
pub mod config;
pub mod dedup;
pub mod download;
pub mod error;
pub mod filter_editor;
pub mod persistence;
pub mod query_state;
pub mod request;
pub mod selection;
pub mod synchronizer;

#[cfg(test)]
mod test_support;

pub use component::{GridColumn, RemoteDataGrid};
pub use error::GridError;
pub use query_state::QueryState;
pub use synchronizer::{FetchOutcome, GridOptions, GridStatus, GridSynchronizer};
