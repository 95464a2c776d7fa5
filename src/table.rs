//! Column-major numeric table holding one trajectory's raw observations.
//!
//! Rows share a dense zero-based index; every row-removing operation returns a
//! new table whose rows are renumbered from 0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRecord", into = "TableRecord")]
pub struct DataTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

/// Serialized column; missing values (NaN padding) are written as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRecord {
    pub columns: Vec<ColumnRecord>,
}

impl DataTable {
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut n_rows = None;

        for (name, values) in columns {
            let name = name.into();
            if seen.insert(name.clone(), names.len()).is_some() {
                return Err(TrajectoryError::Table(format!("duplicate column '{}'", name)));
            }
            match n_rows {
                None => n_rows = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(TrajectoryError::Table(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        values.len(),
                        n
                    )));
                }
                Some(_) => {}
            }
            names.push(name);
            data.push(values);
        }

        Ok(Self {
            names,
            columns: data,
            n_rows: n_rows.unwrap_or(0),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn require_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| TrajectoryError::Table(format!("column '{}' not found", name)))
    }

    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.n_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| c[index]).collect())
    }

    /// Copy of the table keeping only rows where `keep[i]` is true.
    pub fn retain_rows(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.n_rows {
            return Err(TrajectoryError::Table(format!(
                "row mask length {} does not match {} rows",
                keep.len(),
                self.n_rows
            )));
        }
        let columns: Vec<Vec<f64>> = self
            .columns
            .iter()
            .map(|col| {
                col.iter()
                    .zip(keep)
                    .filter(|(_, k)| **k)
                    .map(|(v, _)| *v)
                    .collect()
            })
            .collect();
        let n_rows = keep.iter().filter(|k| **k).count();
        Ok(Self {
            names: self.names.clone(),
            columns,
            n_rows,
        })
    }

    /// Copy of the table without the rows whose `column` value lies in any of
    /// the inclusive `windows`.
    pub fn drop_within(&self, column: &str, windows: &[(f64, f64)]) -> Result<Self> {
        let values = self.require_column(column)?;
        let keep: Vec<bool> = values
            .iter()
            .map(|v| !windows.iter().any(|(lo, hi)| *v >= *lo && *v <= *hi))
            .collect();
        self.retain_rows(&keep)
    }
}

impl TryFrom<TableRecord> for DataTable {
    type Error = TrajectoryError;

    fn try_from(record: TableRecord) -> Result<Self> {
        DataTable::from_columns(
            record
                .columns
                .into_iter()
                .map(|c| {
                    let values: Vec<f64> = c
                        .values
                        .into_iter()
                        .map(|v| v.unwrap_or(f64::NAN))
                        .collect();
                    (c.name, values)
                })
                .collect(),
        )
    }
}

impl From<DataTable> for TableRecord {
    fn from(table: DataTable) -> Self {
        TableRecord {
            columns: table
                .names
                .into_iter()
                .zip(table.columns)
                .map(|(name, values)| ColumnRecord {
                    name,
                    values: values
                        .into_iter()
                        .map(|v| if v.is_nan() { None } else { Some(v) })
                        .collect(),
                })
                .collect(),
        }
    }
}
