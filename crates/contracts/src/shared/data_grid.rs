//! Wire contract of the remote paged grid endpoint.
//!
//! One endpoint serves both the paged rows and the export file list; the
//! caller decides how to read the envelope from the request it sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Условие фильтра `{field, operator, value}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// Логическая связка между условиями фильтра
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

impl LogicOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicOperator::And => "and",
            LogicOperator::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Single sort entry, shaped like the grid sort model (`{field, sort}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(rename = "sort")]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Value of the `order` request parameter: `"field: direction"`.
    pub fn order_param(&self) -> String {
        format!("{}: {}", self.field, self.direction.as_str())
    }
}

/// Row identifier as sent by the backend: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Number(n) => write!(f, "{}", n),
            RowId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        RowId::Number(value)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        RowId::Text(value.to_string())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Строка таблицы: обязательный `id` плюс произвольные поля вызывающей стороны
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow<T> {
    pub id: RowId,
    /// Set on members of a duplicate group after fetch; never sent by the server.
    #[serde(default, skip_serializing_if = "is_false")]
    pub duplicated: bool,
    #[serde(flatten)]
    pub fields: T,
}

impl<T> GridRow<T> {
    pub fn new(id: impl Into<RowId>, fields: T) -> Self {
        Self {
            id: id.into(),
            duplicated: false,
            fields,
        }
    }
}

/// Request body of the grid endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFetchRequest {
    /// One-based page number.
    pub page: usize,
    pub per_page: usize,
    pub order: Option<String>,
    pub filters: Option<Vec<FilterClause>>,
    #[serde(rename = "filtersOperator")]
    pub filters_operator: LogicOperator,
    #[serde(rename = "hardCodedFilters")]
    pub hard_coded_filters: Vec<FilterClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(
        rename = "columnVisibilityModel",
        skip_serializing_if = "Option::is_none"
    )]
    pub column_visibility_model: Option<BTreeMap<String, bool>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPage<T> {
    pub data: Vec<T>,
    pub total: u64,
}

/// Response envelope: `{error: true, message}`, `{error: false, data}` or,
/// for export requests, `{error: false, paths}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResponse<T> {
    pub error: bool,
    pub message: Option<String>,
    pub data: Option<GridPage<T>>,
    pub paths: Option<Vec<String>>,
}

impl<T> GridResponse<T> {
    pub fn page(data: Vec<T>, total: u64) -> Self {
        Self {
            error: false,
            message: None,
            data: Some(GridPage { data, total }),
            paths: None,
        }
    }

    pub fn paths(paths: Vec<String>) -> Self {
        Self {
            error: false,
            message: None,
            data: None,
            paths: Some(paths),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: Some(message.into()),
            data: None,
            paths: None,
        }
    }

    fn remote_message(message: Option<String>) -> String {
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Сервер вернул ошибку".to_string())
    }

    /// Reads the envelope of a data request.
    pub fn into_page(self) -> Result<GridPage<T>, String> {
        if self.error {
            return Err(Self::remote_message(self.message));
        }
        self.data
            .ok_or_else(|| "Ответ сервера не содержит данных".to_string())
    }

    /// Reads the envelope of an export request.
    pub fn into_export_paths(self) -> Result<Vec<String>, String> {
        if self.error {
            return Err(Self::remote_message(self.message));
        }
        self.paths
            .ok_or_else(|| "Ответ сервера не содержит файлов экспорта".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Plate {
        plate: String,
    }

    #[test]
    fn test_order_param_format() {
        let sort = SortSpec::new("name", SortDirection::Desc);
        assert_eq!(sort.order_param(), "name: desc");
    }

    #[test]
    fn test_request_wire_names() {
        let mut extra = Map::new();
        extra.insert("clientId".to_string(), json!(7));
        let request = GridFetchRequest {
            page: 1,
            per_page: 25,
            order: None,
            filters: None,
            filters_operator: LogicOperator::Or,
            hard_coded_filters: vec![FilterClause::new("active", "is", json!(true))],
            export: None,
            columns: None,
            column_visibility_model: None,
            extra,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["page"], json!(1));
        assert_eq!(value["per_page"], json!(25));
        assert_eq!(value["order"], Value::Null);
        assert_eq!(value["filters"], Value::Null);
        assert_eq!(value["filtersOperator"], json!("or"));
        assert_eq!(value["hardCodedFilters"][0]["field"], json!("active"));
        assert_eq!(value["clientId"], json!(7));
        assert!(value.get("export").is_none());
        assert!(value.get("columnVisibilityModel").is_none());
    }

    #[test]
    fn test_row_flattens_fields_and_accepts_both_id_kinds() {
        let row: GridRow<Plate> =
            serde_json::from_value(json!({"id": 12, "plate": "AB-123"})).unwrap();
        assert_eq!(row.id, RowId::Number(12));
        assert!(!row.duplicated);
        assert_eq!(row.fields.plate, "AB-123");

        let row: GridRow<Plate> =
            serde_json::from_value(json!({"id": "a-1", "plate": "X"})).unwrap();
        assert_eq!(row.id.to_string(), "a-1");

        let out = serde_json::to_value(&row).unwrap();
        assert!(out.get("duplicated").is_none());
    }

    #[test]
    fn test_envelope_error_carries_message() {
        let resp: GridResponse<GridRow<Plate>> =
            serde_json::from_value(json!({"error": true, "message": "Доступ запрещён"})).unwrap();
        assert_eq!(resp.into_page().unwrap_err(), "Доступ запрещён");
    }

    #[test]
    fn test_envelope_page_and_paths() {
        let resp: GridResponse<GridRow<Plate>> = serde_json::from_value(json!({
            "error": false,
            "data": {"data": [{"id": 1, "plate": "A"}], "total": 40}
        }))
        .unwrap();
        let page = resp.into_page().unwrap();
        assert_eq!(page.total, 40);
        assert_eq!(page.data.len(), 1);

        let resp: GridResponse<GridRow<Plate>> =
            serde_json::from_value(json!({"error": false, "paths": ["/files/a.xlsx"]})).unwrap();
        assert_eq!(resp.clone().into_export_paths().unwrap(), vec!["/files/a.xlsx"]);
        assert!(resp.into_page().is_err());
    }
}
