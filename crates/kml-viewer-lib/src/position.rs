//! Raw coordinate tuples and validated positions
//!
//! The converter delivers coordinates as loose numeric arrays. They are stored untouched as
//! [`Coordinate`] and only turned into a [`Position`] when a measurement needs one, so a bad
//! tuple never prevents the rest of a collection from being summarized.

use crate::GeometryError;
use geo::Point;
use smallvec::SmallVec;

/// Valid longitude range in degrees
const LON_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Valid latitude range in degrees
const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// A coordinate tuple exactly as delivered upstream: `[lon, lat, ele?]`
///
/// No arity or finiteness is enforced here; see [`Coordinate::position`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordinate(SmallVec<[f64; 3]>);

impl Coordinate {
    /// Create a coordinate from any sequence of values
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self(values.into_iter().collect())
    }

    /// Create a two-dimensional coordinate
    #[inline]
    pub fn xy(lon: f64, lat: f64) -> Self {
        Self(SmallVec::from_slice(&[lon, lat]))
    }

    /// Create a coordinate with elevation
    #[inline]
    pub fn xyz(lon: f64, lat: f64, elevation: f64) -> Self {
        Self(SmallVec::from_slice(&[lon, lat, elevation]))
    }

    /// Raw values of the tuple
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Validate the tuple into a [`Position`]
    ///
    /// Fails when the tuple does not have two or three members, or when any member is NaN or
    /// infinite. Range violations are not checked here.
    pub fn position(&self) -> Result<Position, GeometryError> {
        if let Some(&value) = self.0.iter().find(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite { value });
        }
        match *self.0.as_slice() {
            [lon, lat] => Ok(Position::new(lon, lat)),
            [lon, lat, elevation] => Ok(Position::with_elevation(lon, lat, elevation)),
            _ => Err(GeometryError::CoordinateArity { len: self.0.len() }),
        }
    }
}

impl From<Position> for Coordinate {
    fn from(position: Position) -> Self {
        match position.elevation {
            Some(elevation) => Self::xyz(position.lon, position.lat, elevation),
            None => Self::xy(position.lon, position.lat),
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::xy(lon, lat)
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from([lon, lat, elevation]: [f64; 3]) -> Self {
        Self::xyz(lon, lat, elevation)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::xy(lon, lat)
    }
}

/// A validated position: finite longitude, latitude and optional elevation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Elevation in meters, if the source had one
    pub elevation: Option<f64>,
}

impl Position {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: None,
        }
    }

    #[inline]
    pub fn with_elevation(lon: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: Some(elevation),
        }
    }

    /// Whether longitude and latitude lie inside the WGS84 degree ranges
    #[inline]
    pub fn is_in_range(&self) -> bool {
        LON_RANGE.contains(&self.lon) && LAT_RANGE.contains(&self.lat)
    }

    /// Horizontal part as a `geo` point (x = lon, y = lat)
    #[inline]
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<Position> for Point<f64> {
    fn from(position: Position) -> Self {
        position.to_point()
    }
}
