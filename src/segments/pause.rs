use tracing::debug;

use crate::math::stats::mean;
use crate::segments::{Segment, SegmentColumn, SegmentsTable};

/// Adjacent paused segments only merge when their shared boundary differs by
/// less than this in y.
pub const MERGE_Y_TOLERANCE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PauseThreshold {
    /// Absolute cutoff on the analyzed column.
    Fixed(f64),
    /// Cutoff is the mean of the not-yet-paused rows divided by this value,
    /// recomputed before every row.
    Adaptive(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseParams {
    pub threshold: PauseThreshold,
    pub min_duration: f64,
    pub column: SegmentColumn,
}

impl Default for PauseParams {
    fn default() -> Self {
        Self {
            threshold: PauseThreshold::Fixed(1.0),
            min_duration: 0.0,
            column: SegmentColumn::B,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseOutcome {
    /// Rows flagged before merging.
    pub flagged: usize,
    /// Rows absorbed into a later neighbour.
    pub merged: usize,
    /// Paused rows left after merging.
    pub paused: usize,
}

impl PauseOutcome {
    pub fn add(&mut self, other: PauseOutcome) {
        self.flagged += other.flagged;
        self.merged += other.merged;
        self.paused += other.paused;
    }
}

impl SegmentsTable {
    /// Flags paused segments of a rate table and merges contiguous pauses.
    ///
    /// Rows are visited in ascending `X1`. With an adaptive threshold the
    /// cutoff sees the pause flags set by earlier rows, so the outcome depends
    /// on traversal order. Bleaching tables are left untouched.
    pub fn detect_pauses(&mut self, params: &PauseParams) -> PauseOutcome {
        if !self.is_rate() {
            return PauseOutcome::default();
        }
        let column = params.column;
        self.analyzed.insert(column);
        for segment in &mut self.rows {
            segment.set_pause(column, false);
        }

        let mut flagged = 0;
        for i in 0..self.rows.len() {
            let cutoff = match params.threshold {
                PauseThreshold::Fixed(value) => value,
                PauseThreshold::Adaptive(divisor) => {
                    let active = self
                        .rows
                        .iter()
                        .filter(|s| !s.is_paused(column))
                        .map(|s| column.value(s));
                    match mean(active) {
                        Some(m) => m / divisor,
                        None => continue,
                    }
                }
            };
            let segment = &mut self.rows[i];
            if column.value(segment).abs() < cutoff && segment.duration() >= params.min_duration {
                segment.set_pause(column, true);
                flagged += 1;
            }
        }

        let merged = self.merge_pauses(column);
        let outcome = PauseOutcome {
            flagged,
            merged,
            paused: self.paused_count(column),
        };
        debug!(
            uid = %self.uid,
            prefix = %self.prefix,
            region = %self.region,
            flagged = outcome.flagged,
            merged = outcome.merged,
            "pauses detected"
        );
        outcome
    }

    fn merge_pauses(&mut self, column: SegmentColumn) -> usize {
        let n = self.rows.len();
        let mut drop = vec![false; n];
        for i in 1..n {
            let (head, tail) = self.rows.split_at_mut(i);
            let prev = &head[i - 1];
            let cur = &mut tail[0];
            if mergeable(prev, cur, column) {
                cur.absorb(prev);
                drop[i - 1] = true;
            }
        }

        let merged = drop.iter().filter(|d| **d).count();
        if merged > 0 {
            let mut flags = drop.into_iter();
            self.rows.retain(|_| !flags.next().unwrap_or(false));
        }
        merged
    }
}

fn mergeable(prev: &Segment, cur: &Segment, column: SegmentColumn) -> bool {
    prev.is_paused(column)
        && cur.is_paused(column)
        && prev.x2 == cur.x1
        && (prev.y2 - cur.y1).abs() < MERGE_Y_TOLERANCE
}
