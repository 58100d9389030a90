//! Missing-aware descriptive statistics
//!
//! All helpers here skip [`CellValue::Missing`] entirely, so a cell that
//! failed numeric coercion never distorts a mean, deviation, or histogram.

use crate::common::data_structures::CellValue;

/// Arithmetic mean over the numeric values, `None` if there are none
pub fn mean<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.into_iter().filter_map(|cell| cell.as_f64()) {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Population standard deviation over the numeric values
///
/// Uses the population form (divide by N, not N-1), `None` if no numeric
/// value is present.
pub fn std_dev<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let numeric: Vec<f64> = values.into_iter().filter_map(|cell| cell.as_f64()).collect();
    if numeric.is_empty() {
        return None;
    }
    let mean = numeric.iter().sum::<f64>() / numeric.len() as f64;
    let variance = numeric
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / numeric.len() as f64;
    Some(variance.sqrt())
}

/// Smallest and largest numeric value, `None` if there are none
pub fn min_max<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut bounds: Option<(f64, f64)> = None;
    for value in values.into_iter().filter_map(|cell| cell.as_f64()) {
        bounds = Some(match bounds {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }
    bounds
}

/// Counts numeric values into `bins` equal-width bins spanning `[lo, hi]`
///
/// The last bin is closed on both ends, so a value equal to `hi` lands in
/// the final bin rather than falling off the edge. Values outside the span
/// and missing cells are not counted.
pub fn histogram<'a, I>(values: I, bins: usize, lo: f64, hi: f64) -> Vec<usize>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut counts = vec![0usize; bins];
    if bins == 0 || hi <= lo {
        return counts;
    }
    let width = (hi - lo) / bins as f64;
    for value in values.into_iter().filter_map(|cell| cell.as_f64()) {
        if value < lo || value > hi {
            continue;
        }
        let bin = (((value - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    counts
}
