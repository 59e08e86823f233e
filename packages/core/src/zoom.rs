//! Webview zoom level

use mathpaste_settings::DEFAULT_ZOOM;

pub const ZOOM_MIN: u32 = 10;
pub const ZOOM_MAX: u32 = 300;
pub const ZOOM_STEP: u32 = 10;

/// A zoom change requested from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

/// Zoom in percent, always within `ZOOM_MIN..=ZOOM_MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom(u32);

impl Default for Zoom {
    fn default() -> Self {
        Self(DEFAULT_ZOOM)
    }
}

impl Zoom {
    pub fn from_percent(percent: u32) -> Self {
        Self(percent.clamp(ZOOM_MIN, ZOOM_MAX))
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    /// Scale factor for the webview, 1.0 is 100 %
    pub fn factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn apply(self, action: ZoomAction) -> Self {
        match action {
            ZoomAction::In => Self::from_percent(self.0.saturating_add(ZOOM_STEP)),
            ZoomAction::Out => Self::from_percent(self.0.saturating_sub(ZOOM_STEP)),
            ZoomAction::Reset => Self::default(),
        }
    }
}
