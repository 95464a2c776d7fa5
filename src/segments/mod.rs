//! Fitted piecewise-linear segment tables.
//!
//! A [`SegmentsTable`] is the decomposition of one trajectory slice (one
//! protein prefix, one x/y column pair, one region) into linear segments.
//! Rows are kept ordered by `X1`; row positions are always dense.

mod pause;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};

pub use pause::{MERGE_Y_TOLERANCE, PauseOutcome, PauseParams, PauseThreshold};

pub const RATE_COLUMN: &str = "Position_on_DNA";
pub const BLEACHING_COLUMN: &str = "Intensity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Rate,
    Bleaching,
}

impl SegmentKind {
    /// Classifies a table from its bare y-column name.
    pub fn classify(y_column: &str) -> Option<Self> {
        match y_column {
            RATE_COLUMN => Some(Self::Rate),
            BLEACHING_COLUMN => Some(Self::Bleaching),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::Bleaching => "bleaching",
        }
    }
}

/// Fitted value column a pause analysis can run on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SegmentColumn {
    A,
    #[serde(rename = "Sigma_A")]
    SigmaA,
    #[default]
    B,
    #[serde(rename = "Sigma_B")]
    SigmaB,
}

impl SegmentColumn {
    pub fn name(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::SigmaA => "Sigma_A",
            Self::B => "B",
            Self::SigmaB => "Sigma_B",
        }
    }

    pub fn value(&self, segment: &Segment) -> f64 {
        match self {
            Self::A => segment.a,
            Self::SigmaA => segment.sigma_a,
            Self::B => segment.b,
            Self::SigmaB => segment.sigma_b,
        }
    }

    /// Name of the boolean column holding pause flags for this column.
    pub fn pause_column(&self) -> String {
        format!("pause_{}", self.name())
    }
}

impl fmt::Display for SegmentColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One fitted segment: `y = A + B * x` over `[X1, X2]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "X1")]
    pub x1: f64,
    #[serde(rename = "X2")]
    pub x2: f64,
    #[serde(rename = "Y1")]
    pub y1: f64,
    #[serde(rename = "Y2")]
    pub y2: f64,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "Sigma_A")]
    pub sigma_a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "Sigma_B")]
    pub sigma_b: f64,
    #[serde(skip)]
    pauses: BTreeMap<SegmentColumn, bool>,
}

impl Segment {
    pub fn new(
        x1: f64,
        x2: f64,
        y1: f64,
        y2: f64,
        a: f64,
        sigma_a: f64,
        b: f64,
        sigma_b: f64,
    ) -> Self {
        Self {
            x1,
            x2,
            y1,
            y2,
            a,
            sigma_a,
            b,
            sigma_b,
            pauses: BTreeMap::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Pause flag for `column`; `None` before detection ran on it.
    pub fn pause(&self, column: SegmentColumn) -> Option<bool> {
        self.pauses.get(&column).copied()
    }

    pub fn is_paused(&self, column: SegmentColumn) -> bool {
        self.pause(column).unwrap_or(false)
    }

    fn set_pause(&mut self, column: SegmentColumn, paused: bool) {
        self.pauses.insert(column, paused);
    }

    /// Extends this segment backwards over `earlier`, replacing the fitted
    /// values by their length-weighted averages.
    fn absorb(&mut self, earlier: &Segment) {
        use crate::math::stats::weighted_pair;

        let w_earlier = earlier.duration();
        let w_self = self.duration();
        self.a = weighted_pair(earlier.a, w_earlier, self.a, w_self);
        self.sigma_a = weighted_pair(earlier.sigma_a, w_earlier, self.sigma_a, w_self);
        self.b = weighted_pair(earlier.b, w_earlier, self.b, w_self);
        self.sigma_b = weighted_pair(earlier.sigma_b, w_earlier, self.sigma_b, w_self);
        self.x1 = earlier.x1;
        self.y1 = earlier.y1;
    }
}

/// Identifies one fitted segment set of a molecule in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub x_column: String,
    pub y_column: String,
    pub region: String,
}

impl SegmentKey {
    pub fn new(x_column: &str, y_column: &str, region: &str) -> Self {
        Self {
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            region: region.to_string(),
        }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x_column, self.y_column, self.region)
    }
}

#[derive(Debug, Clone)]
pub struct SegmentsTable {
    uid: String,
    prefix: String,
    x_column: String,
    y_column: String,
    region: String,
    kind: SegmentKind,
    rows: Vec<Segment>,
    filtered: bool,
    analyzed: BTreeSet<SegmentColumn>,
}

impl SegmentsTable {
    /// Builds a table from bare (prefix-stripped) column names. Fails when the
    /// y-column is not a recognised rate or bleaching column.
    pub fn new(
        uid: &str,
        prefix: &str,
        x_column: &str,
        y_column: &str,
        region: &str,
        mut rows: Vec<Segment>,
    ) -> Result<Self> {
        let kind =
            SegmentKind::classify(y_column).ok_or_else(|| TrajectoryError::TypeClassification {
                uid: uid.to_string(),
                y_column: y_column.to_string(),
            })?;
        rows.sort_by(|a, b| a.x1.total_cmp(&b.x1));
        Ok(Self {
            uid: uid.to_string(),
            prefix: prefix.to_string(),
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            region: region.to_string(),
            kind,
            rows,
            filtered: false,
            analyzed: BTreeSet::new(),
        })
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn x_column(&self) -> &str {
        &self.x_column
    }

    pub fn y_column(&self) -> &str {
        &self.y_column
    }

    /// Full x-column name in the molecule's raw table.
    pub fn prefixed_x_column(&self) -> String {
        format!("{}{}", self.prefix, self.x_column)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_rate(&self) -> bool {
        self.kind == SegmentKind::Rate
    }

    pub fn rows(&self) -> &[Segment] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Whether pause detection has run on `column`.
    pub fn has_pause_column(&self, column: SegmentColumn) -> bool {
        self.analyzed.contains(&column)
    }

    pub fn paused_count(&self, column: SegmentColumn) -> usize {
        self.rows.iter().filter(|s| s.is_paused(column)).count()
    }

    /// Drops rate segments whose slope uncertainty reaches `sigma`. Returns
    /// the number of removed rows; bleaching tables are left untouched.
    pub fn filter_segments(&mut self, sigma: f64) -> usize {
        if !self.is_rate() {
            return 0;
        }
        let before = self.rows.len();
        self.rows.retain(|s| s.sigma_b < sigma);
        self.filtered = true;
        before - self.rows.len()
    }

    /// Inclusive `[X1, X2]` windows of every paused row.
    pub fn pause_windows(&self, column: SegmentColumn) -> Result<Vec<(f64, f64)>> {
        if !self.has_pause_column(column) {
            return Err(TrajectoryError::Sequencing {
                uid: self.uid.clone(),
                column: column.name().to_string(),
                x_column: self.prefixed_x_column(),
                y_column: format!("{}{}", self.prefix, self.y_column),
                region: self.region.clone(),
            });
        }
        Ok(self
            .rows
            .iter()
            .filter(|s| s.is_paused(column))
            .map(|s| (s.x1, s.x2))
            .collect())
    }
}
