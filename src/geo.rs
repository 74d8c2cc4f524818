//! Great-circle distances and nearest-point search.

use crate::error::{DataError, Result};
use crate::models::Coordinate;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MI: f64 = 3959.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

impl DistanceUnit {
    pub fn radius(&self) -> f64 {
        match self {
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
            DistanceUnit::Miles => EARTH_RADIUS_MI,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

/// Haversine distance between `a` and `b` in kilometers.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    distance_in(a, b, DistanceUnit::Kilometers)
}

/// Haversine distance between `a` and `b` in the given unit.
///
/// The `asin` argument is clamped to `[-1, 1]` so rounding on near-antipodal
/// or near-identical points cannot produce NaN.
pub fn distance_in(a: Coordinate, b: Coordinate, unit: DistanceUnit) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * unit.radius() * h.sqrt().clamp(-1.0, 1.0).asin()
}

/// Closest candidate to a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest<T> {
    pub id: T,
    pub distance: f64,
}

/// Nearest candidate to `query`, distance in kilometers.
pub fn nearest<T, I>(query: Coordinate, candidates: I) -> Result<Nearest<T>>
where
    I: IntoIterator<Item = (T, Coordinate)>,
{
    nearest_in(query, candidates, DistanceUnit::Kilometers)
}

/// Linear scan for the candidate closest to `query`.
///
/// Ties keep the first candidate in input order.
///
/// # Errors
///
/// Returns [`DataError::EmptyInput`] when `candidates` yields nothing.
pub fn nearest_in<T, I>(
    query: Coordinate,
    candidates: I,
    unit: DistanceUnit,
) -> Result<Nearest<T>>
where
    I: IntoIterator<Item = (T, Coordinate)>,
{
    let mut best: Option<Nearest<T>> = None;

    for (id, point) in candidates {
        let d = distance_in(query, point, unit);
        if best.as_ref().is_none_or(|current| d < current.distance) {
            best = Some(Nearest { id, distance: d });
        }
    }

    best.ok_or_else(|| DataError::empty_input("nearest() needs at least one candidate"))
}
