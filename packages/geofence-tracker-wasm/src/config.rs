use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::models::Coordinate;

// Centre of WR11 1TD (approx)
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(52.0926, -1.9467);
pub const DEFAULT_RADIUS_KM: f64 = 0.1;
pub const DEFAULT_STEPS: usize = 64;
pub const INITIAL_ZOOM: u8 = 16;
pub const FIX_ZOOM: u8 = 17;

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_MAX_ZOOM: u8 = 19;
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Leaflet path options for the fence polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FenceStyle {
    pub color: String,
    pub fill_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
}

impl FenceStyle {
    pub fn new(color: &str, fill_color: &str) -> Self {
        Self {
            color: color.to_string(),
            fill_color: fill_color.to_string(),
            fill_opacity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub fence: FenceStyle,
    pub inside: FenceStyle,
    pub outside: FenceStyle,
    pub path: PathStyle,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fence: FenceStyle {
                color: "blue".to_string(),
                fill_color: "#3388ff".to_string(),
                fill_opacity: Some(0.2),
            },
            inside: FenceStyle::new("green", "#3cb371"),
            outside: FenceStyle::new("red", "#ff6347"),
            path: PathStyle {
                color: "purple".to_string(),
                weight: 4.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileLayerConfig {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            url_template: TILE_URL_TEMPLATE.to_string(),
            max_zoom: TILE_MAX_ZOOM,
            attribution: TILE_ATTRIBUTION.to_string(),
        }
    }
}

/// Options handed to `watchPosition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchOptions {
    pub enable_high_accuracy: bool,
    pub maximum_age_ms: u32,
    pub timeout_ms: u32,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            maximum_age_ms: 5_000,
            timeout_ms: 20_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub map: String,
    pub status: String,
    pub metrics: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            map: "map".to_string(),
            status: "status".to_string(),
            metrics: "metrics".to_string(),
        }
    }
}

/// Everything the tracking page needs. Missing fields fall back to the
/// fixed page constants, so `{}` from JS is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    pub center: Coordinate,
    pub radius_km: f64,
    pub steps: usize,
    pub initial_zoom: u8,
    pub fix_zoom: u8,
    pub fence_label: Option<String>,
    pub elements: ElementIds,
    pub tiles: TileLayerConfig,
    pub palette: Palette,
    pub watch: WatchOptions,
    pub log_level: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            radius_km: DEFAULT_RADIUS_KM,
            steps: DEFAULT_STEPS,
            initial_zoom: INITIAL_ZOOM,
            fix_zoom: FIX_ZOOM,
            fence_label: None,
            elements: ElementIds::default(),
            tiles: TileLayerConfig::default(),
            palette: Palette::default(),
            watch: WatchOptions::default(),
            log_level: "info".to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.center.is_finite() {
            return Err(TrackerError::InvalidConfig(format!(
                "center must be finite, got {}, {}",
                self.center.lat, self.center.lng
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "radiusKm must be positive, got {}",
                self.radius_km
            )));
        }
        if self.steps < 3 {
            return Err(TrackerError::InvalidConfig(format!(
                "steps must be at least 3, got {}",
                self.steps
            )));
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
