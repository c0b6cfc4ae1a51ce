use serde::{Deserialize, Serialize};

use crate::config::{FenceStyle, Palette};
use crate::geofence::Geofence;
use crate::models::Coordinate;

pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported in this browser.";

/// Text regions of the page.
pub trait StatusDisplay {
    fn show_status(&mut self, text: &str);
    fn show_metrics(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    Inside,
    Outside,
}

impl Membership {
    pub fn is_inside(self) -> bool {
        self == Membership::Inside
    }
}

/// Evaluate membership. Pure: same inputs, same answer.
pub fn evaluate(coord: Coordinate, fence: &Geofence) -> Membership {
    if fence.contains(coord) {
        Membership::Inside
    } else {
        Membership::Outside
    }
}

pub fn location_error_message(message: &str) -> String {
    format!("Unable to get your location: {}", message)
}

/// Maps membership to fence style and status text.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    inside_style: FenceStyle,
    outside_style: FenceStyle,
    fence_label: Option<String>,
}

impl StatusReporter {
    pub fn new(palette: &Palette, fence_label: Option<String>) -> Self {
        Self {
            inside_style: palette.inside.clone(),
            outside_style: palette.outside.clone(),
            fence_label: fence_label.filter(|label| !label.trim().is_empty()),
        }
    }

    pub fn style_for(&self, membership: Membership) -> &FenceStyle {
        match membership {
            Membership::Inside => &self.inside_style,
            Membership::Outside => &self.outside_style,
        }
    }

    pub fn message_for(&self, membership: Membership) -> String {
        let state = match membership {
            Membership::Inside => "INSIDE",
            Membership::Outside => "OUTSIDE",
        };
        match &self.fence_label {
            Some(label) => format!("You are {} the {} geofence.", state, label),
            None => format!("You are {} the geofence.", state),
        }
    }
}
