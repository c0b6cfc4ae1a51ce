use crate::geofence::great_circle_distance;
use crate::models::Coordinate;

/// Running total of distance travelled between consecutive fixes.
#[derive(Debug, Default, Clone)]
pub struct MetricsAccumulator {
    total_distance: f64,
    last_point: Option<Coordinate>,
    skipped_segments: usize,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the total changed. Segments whose distance is not a
    /// finite number are skipped and counted; the last point always advances.
    pub fn on_sample(&mut self, coord: Coordinate) -> bool {
        let mut changed = false;
        if let Some(last) = self.last_point {
            let dist = great_circle_distance(last, coord);
            if dist.is_finite() {
                self.total_distance += dist;
                changed = true;
            } else {
                self.skipped_segments += 1;
                log::warn!(
                    "Skipping segment {:?} -> {:?}: distance is not a number",
                    last,
                    coord
                );
            }
        }
        self.last_point = Some(coord);
        changed
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn last_point(&self) -> Option<Coordinate> {
        self.last_point
    }

    pub fn skipped_segments(&self) -> usize {
        self.skipped_segments
    }

    pub fn distance_text(&self) -> String {
        format_distance(self.total_distance)
    }
}

pub fn format_distance(meters: f64) -> String {
    format!("Distance: {:.1} m", meters)
}
