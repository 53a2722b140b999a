//! Highlighting rows that share a value in one column.
//!
//! This is a display transform: rows are never dropped, members of a
//! duplicate group are flagged and moved in front of the unique rows.

use contracts::shared::data_grid::GridRow;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::hash::Hash;

pub fn group_duplicates_by<T, K, F>(rows: Vec<GridRow<T>>, key_of: F) -> Vec<GridRow<T>>
where
    K: Eq + Hash,
    F: Fn(&GridRow<T>) -> Option<K>,
{
    // group index per key, groups kept in order of first appearance
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<GridRow<T>>> = Vec::new();

    for row in rows {
        match key_of(&row) {
            Some(key) => match index.get(&key) {
                Some(&i) => groups[i].push(row),
                None => {
                    index.insert(key, groups.len());
                    groups.push(vec![row]);
                }
            },
            None => groups.push(vec![row]),
        }
    }

    let mut duplicated = Vec::new();
    let mut singles = Vec::new();
    for group in groups {
        if group.len() > 1 {
            duplicated.extend(group.into_iter().map(|mut row| {
                row.duplicated = true;
                row
            }));
        } else {
            singles.extend(group);
        }
    }
    duplicated.extend(singles);
    duplicated
}

/// Group by a named field of the row payload. Missing and `null` values never
/// form a group.
pub fn group_duplicates<T: Serialize>(
    rows: Vec<GridRow<T>>,
    duplicate_key: &str,
) -> Vec<GridRow<T>> {
    group_duplicates_by(rows, |row| {
        field_value(row, duplicate_key)
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
    })
}

/// Value of a named field, `id` included.
pub fn field_value<T: Serialize>(row: &GridRow<T>, field: &str) -> Option<Value> {
    if field == "id" {
        return serde_json::to_value(&row.id).ok();
    }
    match serde_json::to_value(&row.fields).ok()? {
        Value::Object(mut map) => map.remove(field),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Fields {
        k: Option<String>,
    }

    fn row(id: i64, k: Option<&str>) -> GridRow<Fields> {
        GridRow::new(
            id,
            Fields {
                k: k.map(str::to_string),
            },
        )
    }

    fn ids<T>(rows: &[GridRow<T>]) -> Vec<String> {
        rows.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_duplicates_first_singletons_last() {
        let rows = vec![row(1, Some("a")), row(2, Some("a")), row(3, Some("b"))];
        let out = group_duplicates(rows, "k");
        assert_eq!(ids(&out), vec!["1", "2", "3"]);
        assert!(out[0].duplicated);
        assert!(out[1].duplicated);
        assert!(!out[2].duplicated);
        assert_eq!(out[2].fields.k.as_deref(), Some("b"));
    }

    #[test]
    fn test_interleaved_groups_are_gathered() {
        let rows = vec![
            row(1, Some("solo")),
            row(2, Some("x")),
            row(3, Some("y")),
            row(4, Some("x")),
            row(5, Some("y")),
        ];
        let out = group_duplicates(rows, "k");
        assert_eq!(ids(&out), vec!["2", "4", "3", "5", "1"]);
        assert_eq!(out.iter().filter(|r| r.duplicated).count(), 4);
    }

    #[test]
    fn test_missing_keys_stay_single() {
        let rows = vec![row(1, None), row(2, None), row(3, Some("a"))];
        let out = group_duplicates(rows, "k");
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| !r.duplicated));

        let out = group_duplicates(vec![row(1, Some("a")), row(2, Some("a"))], "unknown");
        assert!(out.iter().all(|r| !r.duplicated));
    }

    #[test]
    fn test_field_value_reads_id() {
        let r = row(9, Some("a"));
        assert_eq!(field_value(&r, "id"), Some(json!(9)));
        assert_eq!(field_value(&r, "k"), Some(json!("a")));
    }
}
