//! Update builder types for entity mutations.
//!
//! Each update produces `(column, value)` assignments; only set fields
//! generate SET clauses in the dynamic UPDATE SQL.

pub mod participant;
pub mod record;

/// Build `col1 = ?1, col2 = ?2, ...` and the matching parameter list.
///
/// Returns the SET clause and the index of the next free placeholder.
pub(crate) fn set_clause(columns: &[&str]) -> (String, usize) {
    let clause = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{col} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    (clause, columns.len() + 1)
}
