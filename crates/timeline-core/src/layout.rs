use serde::{Deserialize, Serialize};

use crate::{TimeMapping, TimelineSettings, TimelineSnapshot};

/// The fixed, ordered set of timeline rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Music,
    Frequency,
}

impl TrackKind {
    pub const ALL: [TrackKind; 3] = [TrackKind::Video, TrackKind::Music, TrackKind::Frequency];

    pub fn row_index(self) -> usize {
        match self {
            TrackKind::Video => 0,
            TrackKind::Music => 1,
            TrackKind::Frequency => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Music => "Music",
            TrackKind::Frequency => "Frequency",
        }
    }
}

/// Vertical geometry of the canvas: a ruler row followed by one row per track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackLayout {
    ruler_height: f64,
    track_height: f64,
    track_gap: f64,
}

impl TrackLayout {
    pub fn new(settings: &TimelineSettings) -> Self {
        Self {
            ruler_height: settings.ruler_height,
            track_height: settings.track_height,
            track_gap: settings.track_gap,
        }
    }

    pub fn ruler_height(&self) -> f64 {
        self.ruler_height
    }

    pub fn track_height(&self) -> f64 {
        self.track_height
    }

    /// Top of row `index`.
    pub fn track_y(&self, index: usize) -> f64 {
        self.ruler_height + index as f64 * self.row_pitch()
    }

    /// `(top, bottom)` of the drawn part of a track row, gap excluded.
    pub fn track_band(&self, kind: TrackKind) -> (f64, f64) {
        let top = self.track_y(kind.row_index());
        (top, top + self.track_height)
    }

    pub fn canvas_height(&self) -> f64 {
        self.track_y(TrackKind::ALL.len())
    }

    /// Track whose drawn band contains `y`. Points in the ruler or in a gap
    /// belong to no track.
    pub fn track_at_y(&self, y: f64) -> Option<TrackKind> {
        TrackKind::ALL.into_iter().find(|kind| {
            let (top, bottom) = self.track_band(*kind);
            y >= top && y <= bottom
        })
    }

    fn row_pitch(&self) -> f64 {
        self.track_height + self.track_gap
    }
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self::new(&TimelineSettings::default())
    }
}

/// Geometry and tolerances for one frame, derived from the snapshot, the
/// settings and the current viewport width. Nothing here is cached between
/// events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineView {
    pub mapping: TimeMapping,
    pub layout: TrackLayout,
    pub viewport_width: f64,
    pub playhead_tolerance_px: f64,
    pub marker_tolerance_px: f64,
}

impl TimelineView {
    pub fn new(
        snapshot: &TimelineSnapshot,
        settings: &TimelineSettings,
        viewport_width: f64,
    ) -> Self {
        Self {
            mapping: TimeMapping::new(&snapshot.config(viewport_width), settings),
            layout: TrackLayout::new(settings),
            viewport_width,
            playhead_tolerance_px: settings.playhead_tolerance_px,
            marker_tolerance_px: settings.marker_tolerance_px,
        }
    }

    pub fn canvas_height(&self) -> f64 {
        self.layout.canvas_height()
    }
}
