//! Feature and geometry storage module
//!
//! This module provides the closed [`Geometry`] variant the analysis works on, plus the
//! [`Feature`] and [`FeatureCollection`] wrappers produced from converter output.

use crate::{Coordinate, GeometryError};
use std::fmt;

/// Type tag tallied for features that carry no geometry at all
///
/// Parenthesized so it cannot collide with a literal `"null"` geometry type, which is tallied
/// as an unknown tag of its own.
pub const NULL_TYPE_TAG: &str = "(none)";

/// The geometry type tags defined by GeoJSON
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub const ALL: [GeometryType; 7] = [
        GeometryType::Point,
        GeometryType::MultiPoint,
        GeometryType::LineString,
        GeometryType::MultiLineString,
        GeometryType::Polygon,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ];

    /// The literal GeoJSON `type` string
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::LineString => "LineString",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Look up a type by its exact (case-sensitive) tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Whether features of this type get a length record
    #[inline]
    pub fn is_linear(self) -> bool {
        matches!(
            self,
            GeometryType::LineString | GeometryType::MultiLineString
        )
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed geometry
///
/// Besides the GeoJSON variants, two catch-all variants keep unexpected input as data instead
/// of rejecting the whole collection: [`Geometry::Unknown`] for tags outside the GeoJSON set,
/// and [`Geometry::Malformed`] for known tags whose payload had the wrong shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    MultiPoint(Vec<Coordinate>),
    LineString(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    Polygon(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Vec<Vec<Coordinate>>>),
    GeometryCollection(Vec<Geometry>),
    Unknown { type_tag: String },
    Malformed { type_tag: String, reason: String },
}

impl Geometry {
    /// The type tag this geometry is tallied under
    pub fn type_tag(&self) -> &str {
        match self {
            Geometry::Point(_) => GeometryType::Point.as_str(),
            Geometry::MultiPoint(_) => GeometryType::MultiPoint.as_str(),
            Geometry::LineString(_) => GeometryType::LineString.as_str(),
            Geometry::MultiLineString(_) => GeometryType::MultiLineString.as_str(),
            Geometry::Polygon(_) => GeometryType::Polygon.as_str(),
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon.as_str(),
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection.as_str(),
            Geometry::Unknown { type_tag } | Geometry::Malformed { type_tag, .. } => type_tag,
        }
    }

    /// The GeoJSON type, if the tag is one of the known ones
    pub fn geometry_type(&self) -> Option<GeometryType> {
        GeometryType::from_tag(self.type_tag())
    }

    /// The independent paths of a line-like geometry
    ///
    /// Returns `None` for geometries that are not measured, and an error for a `LineString` or
    /// `MultiLineString` whose payload could not be decoded.
    pub fn paths(&self) -> Option<Result<Vec<&[Coordinate]>, GeometryError>> {
        match self {
            Geometry::LineString(path) => Some(Ok(vec![path.as_slice()])),
            Geometry::MultiLineString(paths) => {
                Some(Ok(paths.iter().map(Vec::as_slice).collect()))
            }
            Geometry::Malformed { reason, .. } if self.is_linear() => {
                Some(Err(GeometryError::Malformed(reason.clone())))
            }
            _ => None,
        }
    }

    /// Whether the tag names a line-like type
    #[inline]
    pub fn is_linear(&self) -> bool {
        self.geometry_type().is_some_and(GeometryType::is_linear)
    }

    /// Visit every coordinate, recursing into rings, parts and collections
    pub fn for_each_coordinate<F: FnMut(&Coordinate)>(&self, f: &mut F) {
        match self {
            Geometry::Point(c) => f(c),
            Geometry::MultiPoint(cs) | Geometry::LineString(cs) => cs.iter().for_each(f),
            Geometry::MultiLineString(paths) | Geometry::Polygon(paths) => {
                paths.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polygons) => polygons.iter().flatten().flatten().for_each(f),
            Geometry::GeometryCollection(children) => {
                for child in children {
                    child.for_each_coordinate(f);
                }
            }
            Geometry::Unknown { .. } | Geometry::Malformed { .. } => {}
        }
    }
}

/// A single feature: at most one geometry plus its display name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feature {
    /// `None` when the source had a `null` or untyped geometry
    pub geometry: Option<Geometry>,
    /// KML placemark name, when the converter carried one over
    pub name: Option<String>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            name: None,
        }
    }

    /// A feature without geometry
    pub fn unlocated() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The tag this feature is tallied under ([`NULL_TYPE_TAG`] without geometry)
    #[inline]
    pub fn type_tag(&self) -> &str {
        self.geometry
            .as_ref()
            .map_or(NULL_TYPE_TAG, Geometry::type_tag)
    }
}

impl From<Geometry> for Feature {
    fn from(geometry: Geometry) -> Self {
        Self::new(geometry)
    }
}

/// Ordered sequence of features, in the order they appeared in the source document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn push(&mut self, feature: impl Into<Feature>) {
        self.features.push(feature.into());
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
