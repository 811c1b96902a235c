//! Distance metrics between positions and along paths

use crate::{Coordinate, GeometryError, Position};
use std::fmt;
use std::str::FromStr;

/// Mean Earth radius in meters (IUGG)
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// How the distance between two consecutive positions is measured
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// Great-circle distance on a sphere, in meters
    #[default]
    Geodesic,
    /// Euclidean distance on raw lon/lat, in input units (for pre-projected data)
    Planar,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric {0:?}, expected \"geodesic\" or \"planar\"")]
pub struct ParseMetricError(String);

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Geodesic => "geodesic",
            Metric::Planar => "planar",
        }
    }

    /// Unit of the lengths produced by this metric
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Geodesic => "m",
            Metric::Planar => "units",
        }
    }

    /// Distance between two positions
    #[inline]
    pub fn distance(self, p1: &Position, p2: &Position) -> f64 {
        match self {
            Metric::Geodesic => haversine_distance(p1, p2),
            Metric::Planar => planar_distance(p1, p2),
        }
    }

    /// Length of one connected path
    ///
    /// Every coordinate is validated before anything is summed, so a bad coordinate fails the
    /// whole path instead of yielding a partial length. Paths with fewer than two positions
    /// have length 0. Finite planar input can still sum past `f64::MAX`, which fails with
    /// [`GeometryError::Overflow`].
    pub fn path_length(self, path: &[Coordinate]) -> Result<f64, GeometryError> {
        let positions = path
            .iter()
            .map(Coordinate::position)
            .collect::<Result<Vec<_>, _>>()?;

        if self == Metric::Geodesic {
            for position in positions.iter().filter(|p| !p.is_in_range()) {
                tracing::warn!(
                    "Position outside WGS84 range: ({}, {})",
                    position.lat,
                    position.lon
                );
            }
        }

        let total: f64 = positions
            .windows(2)
            .map(|pair| self.distance(&pair[0], &pair[1]))
            .sum();
        if !total.is_finite() {
            return Err(GeometryError::Overflow);
        }
        Ok(total)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geodesic" => Ok(Metric::Geodesic),
            "planar" => Ok(Metric::Planar),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

/// Haversine great-circle distance between two positions in meters
#[inline]
pub fn haversine_distance(p1: &Position, p2: &Position) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lon = (p2.lon - p1.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` marginally past 1 for antipodal points
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_MEAN_RADIUS_M * c
}

/// Euclidean distance treating lon/lat as planar x/y
#[inline]
pub fn planar_distance(p1: &Position, p2: &Position) -> f64 {
    let delta = p2.to_point() - p1.to_point();
    delta.x().hypot(delta.y())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points.iter().copied().map(Coordinate::from).collect()
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let distance = haversine_distance(&Position::new(0.0, 0.0), &Position::new(0.0, 1.0));
        // 6371008.8 * PI / 180
        assert!((distance - 111_195.08).abs() < 1.0);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let london = Position::new(-0.1278, 51.5074);
        let paris = Position::new(2.3522, 48.8566);
        let there = haversine_distance(&london, &paris);
        let back = haversine_distance(&paris, &london);
        assert!((there - back).abs() < 1e-6);
        // Roughly 344 km
        assert!(there > 340_000.0 && there < 348_000.0);
        assert_eq!(haversine_distance(&london, &london), 0.0);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let distance = haversine_distance(&Position::new(0.0, 0.0), &Position::new(180.0, 0.0));
        assert!((distance - std::f64::consts::PI * EARTH_MEAN_RADIUS_M).abs() < 1e-3);
    }

    #[test]
    fn test_planar_distance() {
        let distance = planar_distance(&Position::new(0.0, 0.0), &Position::new(3.0, 4.0));
        assert!((distance - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_length_sums_segments() {
        let p = path(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        let length = Metric::Planar.path_length(&p).unwrap();
        assert!((length - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_paths_are_zero() {
        assert_eq!(Metric::Geodesic.path_length(&[]).unwrap(), 0.0);
        assert_eq!(Metric::Geodesic.path_length(&path(&[(10.0, 10.0)])).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_coordinate_fails_whole_path() {
        let mut p = path(&[(0.0, 0.0), (0.0, 1.0)]);
        p.push(Coordinate::xy(f64::NAN, 2.0));
        assert!(Metric::Geodesic.path_length(&p).is_err());

        let p = vec![Coordinate::xy(0.0, 0.0), Coordinate::new([1.0])];
        assert_eq!(
            Metric::Planar.path_length(&p),
            Err(GeometryError::CoordinateArity { len: 1 })
        );
    }

    #[test]
    fn test_planar_overflow_fails() {
        let p = path(&[(-1e308, 0.0), (1e308, 0.0)]);
        assert_eq!(Metric::Planar.path_length(&p), Err(GeometryError::Overflow));

        // Each segment is finite, only the sum overflows
        let p = path(&[(0.0, 0.0), (1.5e308, 0.0), (0.0, 0.0)]);
        assert_eq!(Metric::Planar.path_length(&p), Err(GeometryError::Overflow));
    }

    #[test]
    fn test_out_of_range_still_measured() {
        let p = path(&[(0.0, 0.0), (0.0, 100.0)]);
        let length = Metric::Geodesic.path_length(&p).unwrap();
        assert!(length.is_finite());
        assert!(length > 0.0);
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("geodesic".parse::<Metric>(), Ok(Metric::Geodesic));
        assert_eq!(" Planar ".parse::<Metric>(), Ok(Metric::Planar));
        assert!("manhattan".parse::<Metric>().is_err());
        assert_eq!(Metric::default(), Metric::Geodesic);
        assert_eq!(Metric::Planar.to_string(), "planar");
    }
}
