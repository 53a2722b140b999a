use contracts::shared::data_grid::RowId;
use std::collections::BTreeSet;

/// Checked rows of a grid.
///
/// Rows seeded through `disabled` were already picked elsewhere and cannot be
/// toggled here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    disabled: BTreeSet<RowId>,
    checked: BTreeSet<RowId>,
}

impl SelectionSet {
    pub fn new(disabled: impl IntoIterator<Item = RowId>) -> Self {
        Self {
            disabled: disabled.into_iter().collect(),
            checked: BTreeSet::new(),
        }
    }

    pub fn is_selectable(&self, id: &RowId) -> bool {
        !self.disabled.contains(id)
    }

    /// Returns whether the row ended up checked.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if !self.is_selectable(&id) {
            return false;
        }
        if !self.checked.remove(&id) {
            self.checked.insert(id);
            return true;
        }
        false
    }

    pub fn checked(&self) -> Vec<RowId> {
        self.checked.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_rows_cannot_be_checked() {
        let mut sel = SelectionSet::new([RowId::from(1), RowId::from("u-2")]);
        assert!(!sel.is_selectable(&RowId::from(1)));
        assert!(!sel.toggle(RowId::from(1)));
        assert!(!sel.toggle(RowId::from("u-2")));
        assert!(sel.checked().is_empty());

        assert!(sel.toggle(RowId::from(3)));
        assert_eq!(sel.checked(), vec![RowId::from(3)]);
    }

    #[test]
    fn test_toggle() {
        let mut sel = SelectionSet::default();
        assert!(sel.toggle(RowId::from(5)));
        assert!(sel.toggle(RowId::from("a")));
        assert_eq!(sel.checked(), vec![RowId::from(5), RowId::from("a")]);
        assert!(!sel.toggle(RowId::from(5)));
        assert_eq!(sel.checked(), vec![RowId::from("a")]);
    }
}
