//! Page and zoom state for the PDF viewer
//!
//! Rendering belongs to pdf.js; this only keeps the numbers it is asked to
//! render inside their valid ranges.

use serde::Serialize;

use crate::config::ViewerLimits;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerState {
    /// 1-indexed; meaningless while `page_count` is 0
    current_page: u32,
    /// 0 until a document finishes loading
    page_count: u32,
    zoom: f64,
    #[serde(skip)]
    limits: ViewerLimits,
}

impl ViewerState {
    pub fn new(limits: ViewerLimits) -> Self {
        Self {
            current_page: 1,
            page_count: 0,
            zoom: limits.initial_zoom,
            limits,
        }
    }

    /// Back to the empty state used when the subject changes
    pub fn reset(&mut self) {
        *self = Self::new(self.limits);
    }

    /// The renderer finished loading a document. Zoom is kept.
    pub fn document_loaded(&mut self, page_count: u32) {
        self.page_count = page_count;
        self.current_page = 1;
    }

    pub fn is_loaded(&self) -> bool {
        self.page_count > 0
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn limits(&self) -> ViewerLimits {
        self.limits
    }

    /// Move by `offset` pages, clamped to the document. Returns whether the
    /// page changed.
    pub fn go_to_page(&mut self, offset: i64) -> bool {
        if !self.is_loaded() {
            return false;
        }
        let target = (self.current_page as i64)
            .saturating_add(offset)
            .clamp(1, self.page_count as i64) as u32;
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    /// Change zoom by `delta`, clamped to the configured limits. Returns
    /// whether the zoom changed.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let target =
            round_zoom(self.zoom + delta).clamp(self.limits.min_zoom, self.limits.max_zoom);
        let changed = target != self.zoom;
        self.zoom = target;
        changed
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.limits.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-self.limits.zoom_step)
    }

    pub fn can_go_previous(&self) -> bool {
        self.is_loaded() && self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.is_loaded() && self.current_page < self.page_count
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.limits.max_zoom
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > self.limits.min_zoom
    }
}

/// Which viewer buttons are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewerControls {
    pub previous: bool,
    pub next: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub zoom_percent: u32,
}

impl From<&ViewerState> for ViewerControls {
    fn from(state: &ViewerState) -> Self {
        Self {
            previous: state.can_go_previous(),
            next: state.can_go_next(),
            zoom_in: state.can_zoom_in(),
            zoom_out: state.can_zoom_out(),
            zoom_percent: state.zoom_percent(),
        }
    }
}

// Repeated 0.2 steps drift (1.0 + 0.2 + 0.2 = 1.4000000000000001).
fn round_zoom(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
