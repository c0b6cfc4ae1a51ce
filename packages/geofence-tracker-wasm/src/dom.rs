use web_sys::{Document, Element};

use crate::config::ElementIds;
use crate::error::TrackerError;
use crate::status::StatusDisplay;

/// The `#status` and `#metrics` text regions.
pub struct DomStatusPanel {
    status: Element,
    metrics: Element,
}

impl DomStatusPanel {
    pub fn bind(document: &Document, ids: &ElementIds) -> Result<Self, TrackerError> {
        let lookup = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| TrackerError::MissingElement(id.to_string()))
        };
        Ok(Self {
            status: lookup(&ids.status)?,
            metrics: lookup(&ids.metrics)?,
        })
    }
}

impl StatusDisplay for DomStatusPanel {
    fn show_status(&mut self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    fn show_metrics(&mut self, text: &str) {
        self.metrics.set_text_content(Some(text));
    }
}
