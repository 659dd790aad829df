//! Column Mapper
//!
//! Holds one selector per [`SemanticField`]. Each selector offers a blank
//! "unset" choice followed by every column of the uploaded file, and starts
//! on a best-guess match by name.

use crate::models::{FieldMapping, SemanticField};
use tracing::debug;

/// Strip spaces and lowercase, the comparison form for labels and columns
fn squash(s: &str) -> String {
    s.chars().filter(|c| *c != ' ').flat_map(char::to_lowercase).collect()
}

/// Whether `column` should be pre-selected for `field`
pub fn is_best_guess(column: &str, field: SemanticField) -> bool {
    let column = squash(column);
    column == squash(field.label()) || (field == SemanticField::InvoiceNo && column == "invoiceno")
}

/// Pre-selected column index for `field`, if any. A later match replaces an
/// earlier one, as a single-choice selector would.
pub fn best_guess(columns: &[String], field: SemanticField) -> Option<usize> {
    columns.iter().rposition(|c| is_best_guess(c, field))
}

/// Selector state for the mapping step
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapper {
    columns: Vec<String>,
    selections: [Option<usize>; 7],
    focused: usize,
}

impl ColumnMapper {
    pub fn new(columns: Vec<String>) -> Self {
        let mut selections = [None; 7];
        for (slot, field) in selections.iter_mut().zip(SemanticField::ALL) {
            *slot = best_guess(&columns, field);
        }
        debug!(
            "Mapper built over {} columns, {} fields pre-selected",
            columns.len(),
            selections.iter().filter(|s| s.is_some()).count()
        );
        Self {
            columns,
            selections,
            focused: 0,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn index_of(field: SemanticField) -> usize {
        SemanticField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default()
    }

    /// Selected column for `field`, `""` when unset
    pub fn selection(&self, field: SemanticField) -> &str {
        self.selections[Self::index_of(field)]
            .and_then(|i| self.columns.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Select a column by name; `None` or an unknown name clears the field.
    /// Returns whether the name matched a column.
    pub fn select(&mut self, field: SemanticField, column: Option<&str>) -> bool {
        let idx = column.and_then(|name| self.columns.iter().position(|c| c == name));
        self.selections[Self::index_of(field)] = idx;
        idx.is_some() || column.is_none()
    }

    pub fn focused_field(&self) -> SemanticField {
        SemanticField::ALL[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % SemanticField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = if self.focused == 0 {
            SemanticField::ALL.len() - 1
        } else {
            self.focused - 1
        };
    }

    /// Move the focused selector to the next choice, wrapping through blank
    pub fn cycle_next(&mut self) {
        let slot = &mut self.selections[self.focused];
        *slot = match *slot {
            None if self.columns.is_empty() => None,
            None => Some(0),
            Some(i) if i + 1 < self.columns.len() => Some(i + 1),
            Some(_) => None,
        };
    }

    /// Move the focused selector to the previous choice, wrapping through blank
    pub fn cycle_prev(&mut self) {
        let slot = &mut self.selections[self.focused];
        *slot = match *slot {
            None => self.columns.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Snapshot of the current selections
    pub fn field_mapping(&self) -> FieldMapping {
        let mut mapping = FieldMapping::default();
        for field in SemanticField::ALL {
            mapping.set(field, self.selection(field));
        }
        mapping
    }
}
