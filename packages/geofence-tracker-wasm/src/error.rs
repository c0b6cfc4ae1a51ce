use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unable to create map in container '{0}'")]
    MapContainer(String),
    #[error("Missing page element '#{0}'")]
    MissingElement(String),
    #[error("No browser window available")]
    NoWindow,
    #[error("Location subscription failed: {0}")]
    Subscription(String),
    #[error("Tracking session already started")]
    AlreadyStarted,
}

impl From<TrackerError> for JsValue {
    fn from(err: TrackerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
