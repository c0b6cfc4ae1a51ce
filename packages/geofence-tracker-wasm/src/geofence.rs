use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Destination, Distance, Haversine};
use geo_types::{LineString, Polygon};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::models::Coordinate;

/// Great-circle distance in meters on the mean earth radius.
pub fn great_circle_distance(from: Coordinate, to: Coordinate) -> f64 {
    Haversine::distance(from.to_point(), to.to_point())
}

/// A circular fence approximated by a closed polygon. Built once, never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Geofence {
    center: Coordinate,
    radius_m: f64,
    steps: usize,
    polygon: Polygon<f64>,
}

impl Geofence {
    /// Vertices walk counter-clockwise from north; the ring is closed by
    /// repeating the first vertex, so it holds `steps + 1` points.
    pub fn circle(center: Coordinate, radius_km: f64, steps: usize) -> Result<Self, TrackerError> {
        if !center.is_finite() {
            return Err(TrackerError::InvalidConfig("geofence center must be finite".to_string()));
        }
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "geofence radius must be positive, got {} km",
                radius_km
            )));
        }
        if steps < 3 {
            return Err(TrackerError::InvalidConfig(format!(
                "geofence needs at least 3 steps, got {}",
                steps
            )));
        }

        let radius_m = radius_km * 1000.0;
        let origin = center.to_point();
        let mut ring: Vec<_> = (0..steps)
            .map(|i| {
                let bearing = (i as f64 * -360.0) / steps as f64;
                Haversine::destination(origin, bearing, radius_m).0
            })
            .collect();
        ring.push(ring[0]);

        // LineString::new keeps the ring as given; Polygon::new would only
        // close it if it were open.
        let polygon = Polygon::new(LineString::new(ring), vec![]);

        Ok(Self {
            center,
            radius_m,
            steps,
            polygon,
        })
    }

    pub fn from_config(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Self::circle(config.center, config.radius_km, config.steps)
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Ring in geometry order, `[lng, lat]` pairs.
    pub fn ring_lng_lat(&self) -> Vec<[f64; 2]> {
        self.polygon.exterior().coords().map(|c| [c.x, c.y]).collect()
    }

    /// Ring in display order, as coordinates.
    pub fn ring(&self) -> Vec<Coordinate> {
        self.polygon.exterior().coords().map(|c| Coordinate::from(*c)).collect()
    }

    /// Inclusive point-in-polygon: a coordinate on an edge or a vertex is
    /// inside. Non-finite coordinates are never inside.
    pub fn contains(&self, coord: Coordinate) -> bool {
        if !coord.is_finite() {
            return false;
        }
        match self.polygon.coordinate_position(&coord.to_coord()) {
            CoordPos::Inside | CoordPos::OnBoundary => true,
            CoordPos::Outside => false,
        }
    }

    pub fn distance_from_center(&self, coord: Coordinate) -> f64 {
        great_circle_distance(self.center, coord)
    }
}
