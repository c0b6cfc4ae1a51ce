use std::rc::Rc;

use js_sys::{Date, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Geolocation, PositionOptions, Window};

use crate::config::WatchOptions;
use crate::error::TrackerError;
use crate::models::{Coordinate, LocationError, LocationErrorKind, LocationEvent, PositionSample};

/// Equivalent of `"geolocation" in navigator`.
pub fn geolocation_available(window: &Window) -> bool {
    let navigator = window.navigator();
    Reflect::has(&navigator, &JsValue::from_str("geolocation")).unwrap_or(false)
}

/// A live `watchPosition` registration. Cancelling clears the watch; dropping
/// the subscription cancels it.
pub struct LocationSubscription {
    geolocation: Geolocation,
    watch_id: i32,
    cancelled: bool,
    _on_success: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl LocationSubscription {
    pub fn watch_id(&self) -> i32 {
        self.watch_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.geolocation.clear_watch(self.watch_id);
        self.cancelled = true;
        log::debug!("Cleared location watch {}", self.watch_id);
    }
}

impl Drop for LocationSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub(crate) fn position_options(options: &WatchOptions) -> Result<PositionOptions, JsValue> {
    let obj = Object::new();
    Reflect::set(
        &obj,
        &"enableHighAccuracy".into(),
        &JsValue::from_bool(options.enable_high_accuracy),
    )?;
    Reflect::set(
        &obj,
        &"maximumAge".into(),
        &JsValue::from_f64(options.maximum_age_ms as f64),
    )?;
    Reflect::set(
        &obj,
        &"timeout".into(),
        &JsValue::from_f64(options.timeout_ms as f64),
    )?;
    Ok(obj.unchecked_into::<PositionOptions>())
}

fn number_field(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
}

// Missing coordinates become NaN; the distance step skips those
pub(crate) fn sample_from_js(position: &JsValue) -> PositionSample {
    let coords = Reflect::get(position, &JsValue::from_str("coords")).unwrap_or(JsValue::UNDEFINED);
    let lat = number_field(&coords, "latitude").unwrap_or(f64::NAN);
    let lng = number_field(&coords, "longitude").unwrap_or(f64::NAN);
    let timestamp = number_field(position, "timestamp").unwrap_or_else(Date::now);
    PositionSample {
        coordinate: Coordinate::new(lat, lng),
        timestamp,
    }
}

pub(crate) fn error_from_js(err: &JsValue) -> LocationError {
    let code = number_field(err, "code").unwrap_or(0.0) as u16;
    let message = Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "Unknown location error".to_string());
    LocationError::new(LocationErrorKind::from_code(code), message)
}

fn local_time(timestamp: f64) -> String {
    Date::new(&JsValue::from_f64(timestamp))
        .to_locale_time_string("default")
        .into()
}

/// Subscribes to continuous position updates. Each fix and each error is
/// passed to `handler` in arrival order; the handler returns whether it
/// processed the event.
pub fn watch_position<F>(
    window: &Window,
    options: &WatchOptions,
    handler: F,
) -> Result<LocationSubscription, TrackerError>
where
    F: Fn(LocationEvent) -> bool + 'static,
{
    let geolocation = window
        .navigator()
        .geolocation()
        .map_err(|e| TrackerError::Subscription(format!("{:?}", e)))?;
    let handler = Rc::new(handler);

    let on_fix = Rc::clone(&handler);
    let on_success = Closure::<dyn FnMut(JsValue)>::new(move |position: JsValue| {
        let sample = sample_from_js(&position);
        if (*on_fix)(LocationEvent::Fix(sample)) {
            log::info!(
                "Moved to: {}, {} at {}",
                sample.coordinate.lat,
                sample.coordinate.lng,
                local_time(sample.timestamp)
            );
        }
    });

    let on_failure = Rc::clone(&handler);
    let on_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
        (*on_failure)(LocationEvent::Error(error_from_js(&err)));
    });

    let opts = position_options(options).map_err(|e| TrackerError::Subscription(format!("{:?}", e)))?;
    let watch_id = geolocation
        .watch_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &opts,
        )
        .map_err(|e| TrackerError::Subscription(format!("{:?}", e)))?;

    log::debug!(
        "Watching position (id {}, high accuracy {}, max age {} ms, timeout {} ms)",
        watch_id,
        options.enable_high_accuracy,
        options.maximum_age_ms,
        options.timeout_ms
    );

    Ok(LocationSubscription {
        geolocation,
        watch_id,
        cancelled: false,
        _on_success: on_success,
        _on_error: on_error,
    })
}
