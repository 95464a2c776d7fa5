//! Small numeric helpers for segment statistics.
//!
//! Note: `median` reorders the input slice.

pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Mean of two values weighted by `wa` and `wb`; falls back to the plain
/// mean when both weights are zero.
pub fn weighted_pair(a: f64, wa: f64, b: f64, wb: f64) -> f64 {
    let total = wa + wb;
    if total == 0.0 {
        return (a + b) / 2.0;
    }
    (a * wa + b * wb) / total
}

pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        Some(values[n / 2])
    } else {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    }
}

pub fn euclidean(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}
