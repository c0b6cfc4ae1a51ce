use crate::config::{Palette, TrackerConfig};
use crate::error::TrackerError;
use crate::geofence::Geofence;
use crate::map_view::{MapSurface, MapView};
use crate::metrics::MetricsAccumulator;
use crate::models::{LocationError, LocationEvent, PositionSample, SessionSnapshot};
use crate::status::{self, Membership, StatusDisplay, StatusReporter, UNSUPPORTED_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Active,
    Stopped,
}

/// Owns everything one page session mutates: the map overlays, the distance
/// total, the last point and the status text.
pub struct TrackingSession<S: MapSurface, D: StatusDisplay> {
    fence: Geofence,
    palette: Palette,
    initial_zoom: u8,
    map: MapView<S>,
    display: D,
    metrics: MetricsAccumulator,
    reporter: StatusReporter,
    membership: Option<Membership>,
    status: String,
    state: SessionState,
}

impl<S: MapSurface, D: StatusDisplay> TrackingSession<S, D> {
    pub fn new(config: &TrackerConfig, surface: S, display: D) -> Result<Self, TrackerError> {
        config.validate()?;
        let fence = Geofence::from_config(config)?;
        Ok(Self {
            fence,
            palette: config.palette.clone(),
            initial_zoom: config.initial_zoom,
            map: MapView::new(surface, config.fix_zoom),
            display,
            metrics: MetricsAccumulator::new(),
            reporter: StatusReporter::new(&config.palette, config.fence_label.clone()),
            membership: None,
            status: String::new(),
            state: SessionState::Created,
        })
    }

    /// Centers the map on the fence, draws it and the empty path, and shows
    /// the zero distance.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.state != SessionState::Created {
            return Err(TrackerError::AlreadyStarted);
        }
        self.map.initialize(self.fence.center(), self.initial_zoom);
        let ring = self.fence.ring();
        self.map.draw_geofence(&ring, &self.palette.fence);
        self.map.draw_path(&self.palette.path);
        self.display.show_metrics(&self.metrics.distance_text());
        self.state = SessionState::Active;
        log::info!(
            "Tracking session started: {:.0} m fence around {}, {}",
            self.fence.radius_m(),
            self.fence.center().lat,
            self.fence.center().lng
        );
        Ok(())
    }

    /// Returns false when the event was ignored because the session is not
    /// active.
    pub fn handle_event(&mut self, event: LocationEvent) -> bool {
        if self.state != SessionState::Active {
            log::debug!("Ignoring location event, session is {:?}", self.state);
            return false;
        }
        match event {
            LocationEvent::Fix(sample) => self.on_fix(sample),
            LocationEvent::Error(err) => self.on_error(&err),
        }
        true
    }

    fn on_fix(&mut self, sample: PositionSample) {
        let coord = sample.coordinate;

        self.map.update_user_position(coord);
        self.map.append_path_point(coord);

        if self.metrics.on_sample(coord) {
            self.display.show_metrics(&self.metrics.distance_text());
        }

        let membership = status::evaluate(coord, &self.fence);
        self.map.restyle_geofence(self.reporter.style_for(membership));
        let text = self.reporter.message_for(membership);
        self.set_status(text);
        self.membership = Some(membership);
    }

    fn on_error(&mut self, err: &LocationError) {
        log::error!("Location error ({:?}): {}", err.kind, err.message);
        self.set_status(status::location_error_message(&err.message));
    }

    /// The platform has no geolocation; this is the only status the session
    /// will ever show.
    pub fn report_unsupported(&mut self) {
        log::warn!("{}", UNSUPPORTED_MESSAGE);
        self.set_status(UNSUPPORTED_MESSAGE.to_string());
        self.state = SessionState::Stopped;
    }

    pub fn stop(&mut self) {
        if self.state != SessionState::Stopped {
            log::info!(
                "Tracking session stopped after {} fixes, {:.1} m",
                self.map.path().len(),
                self.metrics.total_distance()
            );
        }
        self.state = SessionState::Stopped;
    }

    fn set_status(&mut self, text: String) {
        self.display.show_status(&text);
        self.status = text;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn fence(&self) -> &Geofence {
        &self.fence
    }

    pub fn map(&self) -> &MapView<S> {
        &self.map
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn total_distance(&self) -> f64 {
        self.metrics.total_distance()
    }

    pub fn path_length(&self) -> usize {
        self.map.path().len()
    }

    pub fn membership(&self) -> Option<Membership> {
        self.membership
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active: self.is_active(),
            total_distance: self.metrics.total_distance(),
            path_length: self.map.path().len(),
            last_point: self.metrics.last_point(),
            inside: self.membership.map(Membership::is_inside),
            status: self.status.clone(),
            skipped_segments: self.metrics.skipped_segments(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::great_circle_distance;
    use crate::map_view::testing::{MapCall, RecordingSurface};
    use crate::models::{Coordinate, LocationErrorKind};

    #[derive(Debug, Default)]
    struct TextPanel {
        status: Vec<String>,
        metrics: Vec<String>,
    }

    impl StatusDisplay for TextPanel {
        fn show_status(&mut self, text: &str) {
            self.status.push(text.to_string());
        }
        fn show_metrics(&mut self, text: &str) {
            self.metrics.push(text.to_string());
        }
    }

    type TestSession = TrackingSession<RecordingSurface, TextPanel>;

    fn started() -> TestSession {
        let mut session =
            TrackingSession::new(&TrackerConfig::default(), RecordingSurface::default(), TextPanel::default())
                .unwrap();
        session.start().unwrap();
        session
    }

    fn fix(lat: f64, lng: f64) -> LocationEvent {
        LocationEvent::Fix(PositionSample {
            coordinate: Coordinate::new(lat, lng),
            timestamp: 1_700_000_000_000.0,
        })
    }

    #[test]
    fn start_draws_fence_and_shows_zero_distance() {
        let session = started();
        let calls = &session.map().surface().calls;
        assert_eq!(calls[0], MapCall::SetView(Coordinate::new(52.0926, -1.9467), 16));
        assert!(calls
            .iter()
            .any(|c| matches!(c, MapCall::DrawFence(65, style) if style.color == "blue")));
        assert_eq!(session.display().metrics, vec!["Distance: 0.0 m".to_string()]);
        assert!(session.is_active());
    }

    #[test]
    fn fence_is_layered_below_the_path() {
        let session = started();
        let calls = &session.map().surface().calls;
        let fence_at = calls.iter().position(|c| matches!(c, MapCall::DrawFence(..))).unwrap();
        let path_at = calls.iter().position(|c| matches!(c, MapCall::DrawPath(_))).unwrap();
        assert!(fence_at < path_at, "calls: {calls:?}");
    }

    #[test]
    fn cannot_start_twice() {
        let mut session = started();
        assert!(matches!(session.start(), Err(TrackerError::AlreadyStarted)));
    }

    #[test]
    fn fix_at_center_is_inside() {
        let mut session = started();
        session.handle_event(fix(52.0926, -1.9467));

        assert_eq!(session.membership(), Some(Membership::Inside));
        assert_eq!(session.snapshot().status, "You are INSIDE the geofence.");
        let style = session.map().surface().last_fence_style().unwrap();
        assert_eq!(style.color, "green");
        assert!(session.map().has_marker());
    }

    #[test]
    fn fix_north_of_fence_is_outside() {
        let mut session = started();
        session.handle_event(fix(52.0936, -1.9467));

        assert_eq!(session.membership(), Some(Membership::Outside));
        assert_eq!(
            session.display().status.last().map(String::as_str),
            Some("You are OUTSIDE the geofence.")
        );
        assert_eq!(session.map().surface().last_fence_style().unwrap().fill_color, "#ff6347");
    }

    #[test]
    fn distance_and_path_follow_accepted_fixes() {
        let mut session = started();
        let track = [(52.0926, -1.9467), (52.0927, -1.9467), (52.0930, -1.9470), (52.0940, -1.9470)];
        for (lat, lng) in track {
            session.handle_event(fix(lat, lng));
        }

        let expected: f64 = track
            .windows(2)
            .map(|w| great_circle_distance(Coordinate::new(w[0].0, w[0].1), Coordinate::new(w[1].0, w[1].1)))
            .sum();
        assert!((session.total_distance() - expected).abs() < 1e-9);
        assert_eq!(session.path_length(), track.len());

        let surface = session.map().surface();
        assert_eq!(surface.count(|c| matches!(c, MapCall::PlaceMarker(_))), 1);
        assert_eq!(surface.count(|c| matches!(c, MapCall::MoveMarker(_))), 3);
        assert_eq!(surface.count(|c| matches!(c, MapCall::SetView(_, 17))), 1);
        // Zero distance rendered at start, then one update per segment
        assert_eq!(session.display().metrics.len(), 4);
    }

    #[test]
    fn permission_denied_before_any_fix() {
        let mut session = started();
        session.handle_event(LocationEvent::Error(LocationError::new(
            LocationErrorKind::PermissionDenied,
            "User denied Geolocation",
        )));

        let snapshot = session.snapshot();
        assert!(snapshot.status.contains("User denied Geolocation"));
        assert_eq!(snapshot.total_distance, 0.0);
        assert_eq!(snapshot.path_length, 0);
        assert!(!session.map().has_marker());
        assert_eq!(snapshot.inside, None);
    }

    #[test]
    fn fixes_after_an_error_are_still_handled() {
        let mut session = started();
        session.handle_event(LocationEvent::Error(LocationError::new(
            LocationErrorKind::Timeout,
            "Timeout expired",
        )));
        session.handle_event(fix(52.0926, -1.9467));
        assert_eq!(session.snapshot().status, "You are INSIDE the geofence.");
        assert_eq!(session.path_length(), 1);
    }

    #[test]
    fn events_after_stop_are_ignored() {
        let mut session = started();
        assert!(session.handle_event(fix(52.0926, -1.9467)));
        session.stop();
        assert!(!session.handle_event(fix(52.0936, -1.9467)));
        session.stop();

        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(session.path_length(), 1);
        assert_eq!(session.membership(), Some(Membership::Inside));
        assert!(!session.snapshot().active);
    }

    #[test]
    fn events_before_start_are_ignored() {
        let mut session =
            TrackingSession::new(&TrackerConfig::default(), RecordingSurface::default(), TextPanel::default())
                .unwrap();
        assert!(!session.handle_event(fix(52.0926, -1.9467)));
        assert_eq!(session.path_length(), 0);
        assert!(session.map().surface().calls.is_empty());
    }

    #[test]
    fn unsupported_platform_sets_status_once() {
        let mut session =
            TrackingSession::new(&TrackerConfig::default(), RecordingSurface::default(), TextPanel::default())
                .unwrap();
        session.start().unwrap();
        session.report_unsupported();
        session.handle_event(fix(52.0926, -1.9467));

        assert_eq!(session.display().status, vec![UNSUPPORTED_MESSAGE.to_string()]);
        assert_eq!(session.path_length(), 0);
    }

    #[test]
    fn invalid_sample_still_counts_toward_path() {
        let mut session = started();
        session.handle_event(fix(52.0926, -1.9467));
        session.handle_event(fix(f64::NAN, -1.9467));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.path_length, 2);
        assert_eq!(snapshot.total_distance, 0.0);
        assert_eq!(snapshot.skipped_segments, 1);
        assert_eq!(snapshot.inside, Some(false));
    }

    #[test]
    fn labelled_fence_in_status_text() {
        let mut config = TrackerConfig::default();
        config.fence_label = Some("WR11 1TD".to_string());
        let mut session = TrackingSession::new(&config, RecordingSurface::default(), TextPanel::default()).unwrap();
        session.start().unwrap();
        session.handle_event(fix(52.0926, -1.9467));
        assert_eq!(session.snapshot().status, "You are INSIDE the WR11 1TD geofence.");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = TrackerConfig::default();
        config.steps = 1;
        let result = TrackingSession::new(&config, RecordingSurface::default(), TextPanel::default());
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }
}
