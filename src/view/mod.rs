// src/view/mod.rs
//! Tabular view engine: one loaded collection snapshot, a free-text query,
//! a single sort key with direction toggling, and row actions.
//!
//! The view never persists anything. Callers run the store call themselves
//! and, only on success, push the result back in with `apply_*`. While one
//! mutation is in flight the whole view is gated: `begin_submit` hands out
//! a ticket and every other mutating action fails fast until the ticket is
//! finished. Tickets carry the epoch they were issued under so a completion
//! that lands after a reload is dropped instead of touching fresh data.

pub mod rows;

pub use rows::{ActivityColumn, EmployeeColumn, InventoryColumn, TaskColumn};

use std::cmp::Ordering;
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

// ==================== SORTING ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// A displayable row: searchable text, per-column comparison, identity.
pub trait TableRow: Clone {
    type Column: Copy + Eq + fmt::Debug;

    fn row_id(&self) -> &str;

    /// Text the global query is matched against, one entry per searchable
    /// field.
    fn search_haystack(&self) -> Vec<String>;

    /// Three-way comparison under one column, ascending sense.
    fn compare_by(&self, other: &Self, column: Self::Column) -> Ordering;

    /// True when the row has no value under the column. Blank rows sort
    /// first regardless of direction.
    fn is_blank(&self, column: Self::Column) -> bool {
        let _ = column;
        false
    }

    fn default_sort() -> (Self::Column, SortDirection);
}

/// Case-insensitive string ordering used by every string-valued column.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// ==================== VIEW ERRORS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// A mutation is already in flight; the submitting gate is closed.
    Busy,
    /// `confirm_delete` without a preceding `request_delete`.
    NoPendingDelete,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViewError::Busy => write!(f, "another change is still being saved"),
            ViewError::NoPendingDelete => write!(f, "no delete is awaiting confirmation"),
        }
    }
}

/// Proof that the submitting gate was taken, bound to the epoch it was
/// issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    epoch: u64,
}

// ==================== TABLE VIEW ====================

pub struct TableView<T: TableRow> {
    records: Vec<T>,
    query: String,
    sort: (T::Column, SortDirection),
    submitting: bool,
    pending_delete: Option<String>,
    epoch: u64,
}

impl<T: TableRow> TableView<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            query: String::new(),
            sort: T::default_sort(),
            submitting: false,
            pending_delete: None,
            epoch: 0,
        }
    }

    /// Replaces the snapshot after a fresh load. Restores the entity's
    /// default sort, drops any half-finished interaction and invalidates
    /// outstanding tickets.
    pub fn reload(&mut self, records: Vec<T>) {
        self.records = records;
        self.sort = T::default_sort();
        self.submitting = false;
        self.pending_delete = None;
        self.epoch += 1;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> (T::Column, SortDirection) {
        self.sort
    }

    pub fn set_sort(&mut self, column: T::Column, direction: SortDirection) {
        self.sort = (column, direction);
    }

    /// Same column flips direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, column: T::Column) {
        let (active, direction) = self.sort;
        if active == column {
            self.sort = (column, direction.flipped());
        } else {
            self.sort = (column, SortDirection::Asc);
        }
    }

    fn matches_query(&self, row: &T) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        row.search_haystack()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// The filtered, ordered rows. Sorting is stable, so ties keep the
    /// underlying collection order.
    pub fn displayed(&self) -> Vec<T> {
        let mut rows: Vec<T> = self
            .records
            .iter()
            .filter(|row| self.matches_query(row))
            .cloned()
            .collect();

        let (column, direction) = self.sort;
        rows.sort_by(|a, b| {
            match (a.is_blank(column), b.is_blank(column)) {
                // Absent values sort first regardless of direction.
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => {
                    let ordering = a.compare_by(b, column);
                    match direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
            }
        });
        rows
    }

    /// Read-only row lookup for the detail view; no state change.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|row| row.row_id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ==================== SUBMITTING GATE ====================

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Takes the gate for one create/update/delete round trip.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, ViewError> {
        if self.submitting {
            return Err(ViewError::Busy);
        }
        self.submitting = true;
        Ok(SubmitTicket { epoch: self.epoch })
    }

    /// Releases the gate. Returns false when the ticket is stale (the view
    /// reloaded meanwhile): the caller must discard the completion instead
    /// of applying it.
    pub fn finish_submit(&mut self, ticket: SubmitTicket) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        self.submitting = false;
        true
    }

    // ==================== OPTIMISTIC APPLICATION ====================

    /// Inserts a freshly created record; the next `displayed()` places it
    /// at the position implied by the current sort.
    pub fn apply_create(&mut self, record: T) {
        self.records.push(record);
    }

    /// Replaces the matching record by id. A missing id is a local no-op,
    /// not an error.
    pub fn apply_update(&mut self, record: T) -> bool {
        match self
            .records
            .iter_mut()
            .find(|row| row.row_id() == record.row_id())
        {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Removes the matching record by id; missing id is a local no-op.
    pub fn apply_delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|row| row.row_id() != id);
        self.records.len() != before
    }

    // ==================== TWO-PHASE DELETE ====================

    /// Marks a row for deletion, awaiting explicit confirmation. Returns
    /// false (and arms nothing) when the row is already gone locally.
    pub fn request_delete(&mut self, id: &str) -> Result<bool, ViewError> {
        if self.submitting {
            return Err(ViewError::Busy);
        }
        if self.get(id).is_none() {
            return Ok(false);
        }
        self.pending_delete = Some(id.to_string());
        Ok(true)
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirms the pending delete: takes the gate and hands the caller the
    /// id to dispatch to the store.
    pub fn confirm_delete(&mut self) -> Result<(String, SubmitTicket), ViewError> {
        let id = self
            .pending_delete
            .clone()
            .ok_or(ViewError::NoPendingDelete)?;
        let ticket = self.begin_submit()?;
        self.pending_delete = None;
        Ok((id, ticket))
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        name: String,
        amount: i64,
        note: Option<String>,
    }

    fn row(id: &str, name: &str, amount: i64, note: Option<&str>) -> Row {
        Row {
            id: id.to_string(),
            name: name.to_string(),
            amount,
            note: note.map(str::to_string),
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RowColumn {
        Name,
        Amount,
        Note,
    }

    impl TableRow for Row {
        type Column = RowColumn;

        fn row_id(&self) -> &str {
            &self.id
        }

        fn search_haystack(&self) -> Vec<String> {
            let mut haystack = vec![self.name.clone(), self.amount.to_string()];
            if let Some(note) = &self.note {
                haystack.push(note.clone());
            }
            haystack
        }

        fn compare_by(&self, other: &Self, column: RowColumn) -> Ordering {
            match column {
                RowColumn::Name => compare_text(&self.name, &other.name),
                RowColumn::Amount => self.amount.cmp(&other.amount),
                RowColumn::Note => compare_text(
                    self.note.as_deref().unwrap_or(""),
                    other.note.as_deref().unwrap_or(""),
                ),
            }
        }

        fn is_blank(&self, column: RowColumn) -> bool {
            matches!(column, RowColumn::Note) && self.note.is_none()
        }

        fn default_sort() -> (RowColumn, SortDirection) {
            (RowColumn::Name, SortDirection::Asc)
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            row("1", "Charlie", 30, Some("warehouse")),
            row("2", "alice", 10, None),
            row("3", "Bob", 20, Some("Front desk")),
        ]
    }

    fn displayed_ids(view: &TableView<Row>) -> Vec<String> {
        view.displayed().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let mut view = TableView::new(sample());
        view.set_query("   ");
        assert_eq!(view.displayed().len(), 3);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring_over_all_fields() {
        let mut view = TableView::new(sample());

        view.set_query("ALI");
        assert_eq!(displayed_ids(&view), vec!["2"]);

        // Numeric field matches through its string form.
        view.set_query("30");
        assert_eq!(displayed_ids(&view), vec!["1"]);

        // Optional field participates when present.
        view.set_query("front");
        assert_eq!(displayed_ids(&view), vec!["3"]);

        view.set_query("nowhere");
        assert!(view.displayed().is_empty());
    }

    #[test]
    fn test_filter_membership_iff_substring_match() {
        let view_rows = sample();
        let queries = ["a", "LI", "2", "desk", "xyz", ""];
        for query in queries {
            let mut view = TableView::new(view_rows.clone());
            view.set_query(query);
            let shown: Vec<String> = displayed_ids(&view);
            for r in &view_rows {
                let expected = query.trim().is_empty()
                    || r.search_haystack()
                        .iter()
                        .any(|f| f.to_lowercase().contains(&query.trim().to_lowercase()));
                assert_eq!(
                    shown.contains(&r.id),
                    expected,
                    "query {:?} row {}",
                    query,
                    r.id
                );
            }
        }
    }

    #[test]
    fn test_default_sort_applies() {
        let view = TableView::new(sample());
        // Name ascending, case-insensitively: alice, Bob, Charlie.
        assert_eq!(displayed_ids(&view), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_toggle_same_column_flips_and_restores() {
        let mut view = TableView::new(sample());
        view.toggle_sort(RowColumn::Amount);
        assert_eq!(view.sort(), (RowColumn::Amount, SortDirection::Asc));
        let ascending = displayed_ids(&view);

        view.toggle_sort(RowColumn::Amount);
        assert_eq!(view.sort(), (RowColumn::Amount, SortDirection::Desc));
        let descending = displayed_ids(&view);
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);

        // Second toggle returns to the original order.
        view.toggle_sort(RowColumn::Amount);
        assert_eq!(displayed_ids(&view), ascending);
    }

    #[test]
    fn test_new_column_resets_to_ascending() {
        let mut view = TableView::new(sample());
        view.toggle_sort(RowColumn::Amount);
        view.toggle_sort(RowColumn::Amount);
        assert_eq!(view.sort(), (RowColumn::Amount, SortDirection::Desc));
        view.toggle_sort(RowColumn::Name);
        assert_eq!(view.sort(), (RowColumn::Name, SortDirection::Asc));
    }

    #[test]
    fn test_blank_values_sort_first_in_both_directions() {
        let mut view = TableView::new(sample());
        view.toggle_sort(RowColumn::Note);
        assert_eq!(displayed_ids(&view)[0], "2");
        view.toggle_sort(RowColumn::Note);
        assert_eq!(displayed_ids(&view)[0], "2");
    }

    #[test]
    fn test_reload_restores_default_sort() {
        let mut view = TableView::new(sample());
        view.toggle_sort(RowColumn::Amount);
        view.toggle_sort(RowColumn::Amount);
        view.reload(sample());
        assert_eq!(view.sort(), Row::default_sort());
    }

    #[test]
    fn test_submitting_gate_blocks_overlap() {
        let mut view = TableView::new(sample());
        let ticket = view.begin_submit().unwrap();
        assert!(view.is_submitting());

        // Scenario: a delete for the same collection while an update is in
        // flight must be rejected, not interleaved.
        assert_eq!(view.begin_submit(), Err(ViewError::Busy));
        assert_eq!(view.request_delete("1"), Err(ViewError::Busy));

        assert!(view.finish_submit(ticket));
        assert!(!view.is_submitting());
        assert!(view.begin_submit().is_ok());
    }

    #[test]
    fn test_stale_ticket_after_reload_is_dropped() {
        let mut view = TableView::new(sample());
        let ticket = view.begin_submit().unwrap();
        view.reload(sample());
        // The completion arrives for a discarded snapshot.
        assert!(!view.finish_submit(ticket));
        // The reload already reopened the gate for the fresh snapshot.
        assert!(!view.is_submitting());
    }

    #[test]
    fn test_apply_update_replaces_and_resorts() {
        let mut view = TableView::new(sample());
        view.toggle_sort(RowColumn::Amount);
        assert_eq!(displayed_ids(&view), vec!["2", "3", "1"]);

        let updated = row("2", "alice", 99, None);
        assert!(view.apply_update(updated));
        // Position follows the new value under the active sort.
        assert_eq!(displayed_ids(&view), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_apply_on_missing_record_is_noop() {
        let mut view = TableView::new(sample());
        assert!(!view.apply_update(row("404", "Ghost", 0, None)));
        assert!(!view.apply_delete("404"));
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_two_phase_delete() {
        let mut view = TableView::new(sample());
        assert_eq!(view.confirm_delete(), Err(ViewError::NoPendingDelete));

        assert!(view.request_delete("3").unwrap());
        assert_eq!(view.pending_delete(), Some("3"));

        let (id, ticket) = view.confirm_delete().unwrap();
        assert_eq!(id, "3");
        assert!(view.is_submitting());

        // Store call succeeded: release the gate, then drop the row.
        assert!(view.finish_submit(ticket));
        assert!(view.apply_delete(&id));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_request_delete_for_missing_row_is_noop() {
        let mut view = TableView::new(sample());
        assert!(!view.request_delete("404").unwrap());
        assert_eq!(view.pending_delete(), None);
    }

    #[test]
    fn test_cancel_delete_disarms() {
        let mut view = TableView::new(sample());
        view.request_delete("1").unwrap();
        view.cancel_delete();
        assert_eq!(view.confirm_delete(), Err(ViewError::NoPendingDelete));
        assert_eq!(view.len(), 3);
    }
}
