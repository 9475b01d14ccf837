use serde::{Deserialize, Serialize};

use crate::TimelineError;

/// Geometry and pointer tolerances for the timeline canvas.
///
/// Every field has a default, so a settings document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Height of the time ruler row above the tracks.
    pub ruler_height: f64,
    /// Height of each track row.
    pub track_height: f64,
    /// Vertical gap below each track row.
    pub track_gap: f64,
    /// Space reserved before time zero.
    pub left_margin: f64,
    /// Sum of the left and right margins.
    pub total_margin: f64,
    /// Horizontal grab distance for the playhead.
    pub playhead_tolerance_px: f64,
    /// Horizontal grab distance for the in/out markers. Wider than the
    /// playhead because the marker flag is drawn to one side of the line.
    pub marker_tolerance_px: f64,
    /// Allow dragging a selected segment's body to shift it in time.
    pub segment_body_drag: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            ruler_height: 30.0,
            track_height: 50.0,
            track_gap: 5.0,
            left_margin: 20.0,
            total_margin: 40.0,
            playhead_tolerance_px: 20.0,
            marker_tolerance_px: 40.0,
            segment_body_drag: false,
        }
    }
}

impl TimelineSettings {
    pub fn from_json(text: &str) -> Result<Self, TimelineError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, TimelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        let positive = [
            ("ruler_height", self.ruler_height),
            ("track_height", self.track_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidSettings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("track_gap", self.track_gap),
            ("left_margin", self.left_margin),
            ("total_margin", self.total_margin),
            ("playhead_tolerance_px", self.playhead_tolerance_px),
            ("marker_tolerance_px", self.marker_tolerance_px),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidSettings(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.total_margin < self.left_margin {
            return Err(TimelineError::InvalidSettings(format!(
                "total_margin ({}) is smaller than left_margin ({})",
                self.total_margin, self.left_margin
            )));
        }
        Ok(())
    }
}
