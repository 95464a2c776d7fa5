use std::collections::BTreeSet;

use crate::error::{Result, TrajectoryError};
use crate::source::RegionRecord;

/// How a region's raw column name was split into prefix and bare column.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionBinding {
    Bound { prefix: String, column: String },
    /// No known prefix starts the raw column name.
    Unbound { raw_column: String },
    /// More than one known prefix starts the raw column name.
    Ambiguous {
        raw_column: String,
        candidates: Vec<String>,
    },
}

/// Named interval `[start, end]` on one prefixed column of a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub uid: String,
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub binding: RegionBinding,
}

impl Region {
    pub fn resolve(uid: &str, record: &RegionRecord, prefixes: &BTreeSet<String>) -> Self {
        let candidates: Vec<&String> = prefixes
            .iter()
            .filter(|p| record.column.starts_with(p.as_str()))
            .collect();
        let binding = match candidates.as_slice() {
            [prefix] => RegionBinding::Bound {
                prefix: (*prefix).clone(),
                column: record.column[prefix.len()..].to_string(),
            },
            [] => RegionBinding::Unbound {
                raw_column: record.column.clone(),
            },
            many => RegionBinding::Ambiguous {
                raw_column: record.column.clone(),
                candidates: many.iter().map(|p| (*p).clone()).collect(),
            },
        };
        Self {
            uid: uid.to_string(),
            name: record.name.clone(),
            start: record.start,
            end: record.end,
            binding,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, RegionBinding::Bound { .. })
    }

    pub fn prefix(&self) -> Option<&str> {
        match &self.binding {
            RegionBinding::Bound { prefix, .. } => Some(prefix),
            _ => None,
        }
    }

    /// Bare column name; `None` unless the region is bound.
    pub fn column(&self) -> Option<&str> {
        match &self.binding {
            RegionBinding::Bound { column, .. } => Some(column),
            _ => None,
        }
    }

    /// Column name as stored in the molecule's raw table.
    pub fn raw_column(&self) -> String {
        match &self.binding {
            RegionBinding::Bound { prefix, column } => format!("{}{}", prefix, column),
            RegionBinding::Unbound { raw_column } | RegionBinding::Ambiguous { raw_column, .. } => {
                raw_column.clone()
            }
        }
    }

    /// `(prefix, bare column)` or an assignment failure naming the region.
    pub fn require_binding(&self) -> Result<(&str, &str)> {
        match &self.binding {
            RegionBinding::Bound { prefix, column } => Ok((prefix, column)),
            RegionBinding::Unbound { raw_column } => Err(TrajectoryError::Assignment {
                uid: self.uid.clone(),
                subject: format!("region '{}' on column '{}'", self.name, raw_column),
                reason: "no prefix matches".to_string(),
            }),
            RegionBinding::Ambiguous {
                raw_column,
                candidates,
            } => Err(TrajectoryError::Assignment {
                uid: self.uid.clone(),
                subject: format!("region '{}' on column '{}'", self.name, raw_column),
                reason: format!("prefixes {} all match", candidates.join(", ")),
            }),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }
}
