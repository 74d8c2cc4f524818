//! Pure reductions over record collections.
//!
//! Ratios return `None` when the denominator is zero so a single empty
//! dataset never aborts a whole report.

use crate::models::RegionCount;

/// Sums the selected field. Returns 0 for an empty collection.
pub fn total<T, F>(records: &[T], field: F) -> u64
where
    F: Fn(&T) -> u64,
{
    records.iter().map(field).sum()
}

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn rate(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}

/// Fraction of bed capacity in use.
pub fn utilization(total_capacity: u64, total_sheltered: u64) -> Option<f64> {
    rate(total_sheltered as f64, total_capacity as f64)
}

/// People counted per square mile. Area is positive for loaded regions.
pub fn density(region: &RegionCount) -> f64 {
    region.total_count as f64 / region.area_sq_miles
}

/// Groups records by key, keys in first-seen order.
pub fn group_by<'a, T, K, F>(records: &'a [T], key: F) -> Vec<(K, Vec<&'a T>)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();
    for record in records {
        let k = key(record);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(record),
            None => groups.push((k, vec![record])),
        }
    }
    groups
}

/// Arithmetic mean. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median, averaging the middle pair for even lengths. Returns 0.0 for empty input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
