//! Geographic extent of a feature collection
//!
//! A presentation layer uses this to fit its map view to the loaded data instead of a fixed
//! starting view.

use crate::{FeatureCollection, Position};
use geo::{Coord, Rect};

/// Bounding box of valid positions, x = longitude and y = latitude in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    rect: Rect<f64>,
}

impl Extent {
    #[inline]
    pub fn rect(&self) -> Rect<f64> {
        self.rect
    }

    /// `(min_lat, min_lon, max_lat, max_lon)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (min, max) = (self.rect.min(), self.rect.max());
        (min.y, min.x, max.y, max.x)
    }

    /// Center as `(lat, lon)`
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        let center = self.rect.center();
        (center.y, center.x)
    }

    fn expand(&mut self, position: &Position) {
        let min = self.rect.min();
        let max = self.rect.max();
        self.rect = Rect::new(
            Coord {
                x: min.x.min(position.lon),
                y: min.y.min(position.lat),
            },
            Coord {
                x: max.x.max(position.lon),
                y: max.y.max(position.lat),
            },
        );
    }
}

/// Bounding box over every valid, in-range position of every feature
///
/// Coordinates that fail validation or fall outside the WGS84 ranges are ignored. Returns
/// `None` when no usable position exists.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn extent(collection: &FeatureCollection) -> Option<Extent> {
    let mut extent: Option<Extent> = None;

    for geometry in collection.iter().filter_map(|f| f.geometry.as_ref()) {
        geometry.for_each_coordinate(&mut |coordinate| {
            let Ok(position) = coordinate.position() else {
                return;
            };
            if !position.is_in_range() {
                return;
            }
            match &mut extent {
                Some(e) => e.expand(&position),
                None => {
                    let corner = Coord {
                        x: position.lon,
                        y: position.lat,
                    };
                    extent = Some(Extent {
                        rect: Rect::new(corner, corner),
                    });
                }
            }
        });
    }

    extent
}
