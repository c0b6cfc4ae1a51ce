use std::cell::RefCell;
use std::rc::Rc;

use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

// Browser console logging and panic hook
pub mod console;
pub mod config;
pub mod error;
pub mod models;
// Fence polygon and point-in-polygon
pub mod geofence;
pub mod metrics;
pub mod status;
pub mod map_view;
pub mod session;
// Browser-only surfaces
pub mod dom;
pub mod leaflet;
pub mod tracker;

use config::TrackerConfig;
use dom::DomStatusPanel;
use error::TrackerError;
use geofence::Geofence;
use leaflet::LeafletMap;
use models::Coordinate;
use session::TrackingSession;
use tracker::LocationSubscription;

type BrowserSession = TrackingSession<LeafletMap, DomStatusPanel>;

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    console::init(log::Level::Info);
    log::info!("Geofence tracker module initialized");
}

fn parse_config(config: JsValue) -> Result<TrackerConfig, JsValue> {
    let config: TrackerConfig = if config.is_undefined() || config.is_null() {
        TrackerConfig::default()
    } else {
        from_value(config).map_err(|e| JsValue::from_str(&format!("Invalid tracker config: {}", e)))?
    };
    config.validate()?;
    Ok(config)
}

/// One tracking session bound to the page. Create it, call `start()`, and
/// `stop()` (or `free()`) to clear the location watch.
#[wasm_bindgen]
pub struct GeofenceTracker {
    config: TrackerConfig,
    session: Option<Rc<RefCell<BrowserSession>>>,
    subscription: Option<LocationSubscription>,
}

#[wasm_bindgen]
impl GeofenceTracker {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<GeofenceTracker, JsValue> {
        let config = parse_config(config)?;
        console::set_level(config.log_level());
        Ok(GeofenceTracker {
            config,
            session: None,
            subscription: None,
        })
    }

    /// Binds the status regions, mounts the map and subscribes to position
    /// updates. Without geolocation support the status says so and nothing
    /// is subscribed. If only the subscription failed, calling `start()`
    /// again retries it on the already mounted map.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.subscription.is_some() {
            return Err(TrackerError::AlreadyStarted.into());
        }
        let window = web_sys::window().ok_or(TrackerError::NoWindow)?;

        let session = match &self.session {
            Some(session) if session.borrow().is_active() => Rc::clone(session),
            Some(_) => return Err(TrackerError::AlreadyStarted.into()),
            None => {
                let session = Rc::new(RefCell::new(self.mount_session(&window)?));
                self.session = Some(Rc::clone(&session));
                session
            }
        };

        if !tracker::geolocation_available(&window) {
            session.borrow_mut().report_unsupported();
            return Ok(());
        }

        let handle = Rc::clone(&session);
        let subscription = tracker::watch_position(&window, &self.config.watch, move |event| {
            match handle.try_borrow_mut() {
                Ok(mut session) => session.handle_event(event),
                Err(_) => {
                    log::warn!("Session busy, location event not handled");
                    false
                }
            }
        })?;
        self.subscription = Some(subscription);
        Ok(())
    }

    // The page elements are checked before Leaflet is touched, so a failed
    // start leaves the map container free for another attempt.
    fn mount_session(&self, window: &web_sys::Window) -> Result<BrowserSession, TrackerError> {
        let document = window.document().ok_or(TrackerError::NoWindow)?;
        let panel = DomStatusPanel::bind(&document, &self.config.elements)?;
        let map = LeafletMap::mount(&document, &self.config.elements.map, &self.config.tiles)
            .map_err(|e| {
                log::error!("{}", e);
                e
            })?;

        let mut session = TrackingSession::new(&self.config, map, panel)?;
        session.start()?;
        Ok(session)
    }

    /// Clears the location watch and freezes the session state.
    pub fn stop(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
        if let Some(session) = &self.session {
            session.borrow_mut().stop();
        }
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.borrow().is_active())
            .unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = totalDistance)]
    pub fn total_distance(&self) -> f64 {
        self.session
            .as_ref()
            .map(|s| s.borrow().total_distance())
            .unwrap_or(0.0)
    }

    #[wasm_bindgen(getter, js_name = pathLength)]
    pub fn path_length(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.borrow().path_length())
            .unwrap_or(0)
    }

    /// `undefined` until the first fix.
    #[wasm_bindgen(getter, js_name = isInside)]
    pub fn is_inside(&self) -> Option<bool> {
        self.session
            .as_ref()
            .and_then(|s| s.borrow().membership())
            .map(|m| m.is_inside())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        match &self.session {
            Some(session) => Ok(to_value(&session.borrow().snapshot())?),
            None => Ok(JsValue::NULL),
        }
    }
}

/// The fence ring as `[lat, lng]` pairs for pages that draw it themselves.
#[wasm_bindgen]
pub fn geofence_ring(config: JsValue) -> Result<JsValue, JsValue> {
    let config = parse_config(config)?;
    let fence = Geofence::from_config(&config)?;
    let ring: Vec<[f64; 2]> = fence.ring().into_iter().map(Coordinate::to_lat_lng).collect();
    Ok(to_value(&ring)?)
}

/// Great-circle distance in meters between two WGS84 positions.
#[wasm_bindgen]
pub fn great_circle_distance(from_lat: f64, from_lng: f64, to_lat: f64, to_lng: f64) -> f64 {
    geofence::great_circle_distance(
        Coordinate::new(from_lat, from_lng),
        Coordinate::new(to_lat, to_lng),
    )
}
