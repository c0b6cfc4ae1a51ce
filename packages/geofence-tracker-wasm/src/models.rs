// Shared data structures passed between the session, the trackers and JS
use geo_types::{coord, Coord, Point};
use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Geometry order: x is longitude, y is latitude.
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    pub fn to_coord(self) -> Coord<f64> {
        coord! { x: self.lng, y: self.lat }
    }

    /// Display order used by Leaflet: `[lat, lng]`.
    pub fn to_lat_lng(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(c: Coord<f64>) -> Self {
        Coordinate::new(c.y, c.x)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(p: Point<f64>) -> Self {
        Coordinate::new(p.y(), p.x())
    }
}

/// One reading delivered by the location subscription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub coordinate: Coordinate,
    // Milliseconds since the epoch, as reported by the platform
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl LocationErrorKind {
    // GeolocationPositionError codes
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocationErrorKind::PermissionDenied,
            2 => LocationErrorKind::PositionUnavailable,
            3 => LocationErrorKind::Timeout,
            _ => LocationErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationError {
    pub kind: LocationErrorKind,
    pub message: String,
}

impl LocationError {
    pub fn new(kind: LocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Fix(PositionSample),
    Error(LocationError),
}

/// Read-only view of a tracking session handed back to JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub active: bool,
    pub total_distance: f64,
    pub path_length: usize,
    pub last_point: Option<Coordinate>,
    pub inside: Option<bool>,
    pub status: String,
    pub skipped_segments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_uses_lng_lat_for_geometry() {
        let c = Coordinate::new(52.0926, -1.9467);
        let p = c.to_point();
        assert_eq!(p.x(), -1.9467);
        assert_eq!(p.y(), 52.0926);
        assert_eq!(c.to_lat_lng(), [52.0926, -1.9467]);
        assert_eq!(Coordinate::from(p), c);
    }

    #[test]
    fn error_codes_map_to_kinds() {
        assert_eq!(LocationErrorKind::from_code(1), LocationErrorKind::PermissionDenied);
        assert_eq!(LocationErrorKind::from_code(2), LocationErrorKind::PositionUnavailable);
        assert_eq!(LocationErrorKind::from_code(3), LocationErrorKind::Timeout);
        assert_eq!(LocationErrorKind::from_code(0), LocationErrorKind::Unknown);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = SessionSnapshot {
            active: true,
            total_distance: 12.5,
            path_length: 2,
            last_point: Some(Coordinate::new(1.0, 2.0)),
            inside: Some(false),
            status: "You are OUTSIDE the geofence.".to_string(),
            skipped_segments: 0,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalDistance"], 12.5);
        assert_eq!(json["pathLength"], 2);
        assert_eq!(json["lastPoint"]["lat"], 1.0);
        assert_eq!(json["skippedSegments"], 0);
    }
}
