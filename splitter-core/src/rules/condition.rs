use crate::types::Row;

/// Numeric field accessor: absent and falsy values read as 0.
pub fn numeric_field(row: &Row, column: &str) -> f64 {
    row.get(column).map(|value| value.as_number()).unwrap_or(0.0)
}

/// A single test a row must pass to land in a segment.
///
/// String comparisons are exact: no case folding, no trimming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// `column` holds exactly `value`
    Equals {
        column: &'static str,
        value: &'static str,
    },
    /// `column` holds one of `values`
    OneOf {
        column: &'static str,
        values: &'static [&'static str],
    },
    /// `numeric_field(column) > 0`
    Positive { column: &'static str },
}

impl Condition {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::Equals { column, value } => row.text(column) == Some(*value),
            Condition::OneOf { column, values } => row
                .text(column)
                .is_some_and(|text| values.iter().any(|candidate| *candidate == text)),
            Condition::Positive { column } => numeric_field(row, column) > 0.0,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Condition::Equals { column, value } => format!("{column} = {value}"),
            Condition::OneOf { column, values } => {
                format!("{column} in {{{}}}", values.join(", "))
            }
            Condition::Positive { column } => format!("{column} > 0"),
        }
    }
}

/// Extra column computed before any segment is filtered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedColumn {
    pub name: &'static str,
    /// Summed with [`numeric_field`], so missing inputs count as 0
    pub sum_of: &'static [&'static str],
}

impl DerivedColumn {
    pub fn apply(&self, row: &Row) -> Row {
        let total: f64 = self.sum_of.iter().map(|column| numeric_field(row, column)).sum();
        let mut derived = row.clone();
        derived.insert(self.name, total);
        derived
    }
}

/// Keep only `columns`, in that order. Columns the row lacks are kept as Empty
/// so every projected row shares the same header.
pub fn project(row: &Row, columns: &[&str]) -> Row {
    columns
        .iter()
        .map(|column| (*column, row.get(column).cloned().unwrap_or_default()))
        .collect()
}
