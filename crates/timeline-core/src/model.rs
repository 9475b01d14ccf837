use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{clamp_zoom, Seconds, TimelineConfig, TimelineError, TrackKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time-ranged region on the video track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub start_time: Seconds,
    pub end_time: Seconds,
}

impl Segment {
    /// Builds a segment, requiring `0 <= start < end <= duration`.
    pub fn new(
        id: SegmentId,
        start_time: Seconds,
        end_time: Seconds,
        duration: Seconds,
    ) -> Result<Self, TimelineError> {
        let valid = start_time.is_finite()
            && end_time.is_finite()
            && 0.0 <= start_time
            && start_time < end_time
            && end_time <= duration;
        if !valid {
            return Err(TimelineError::InvalidSegment {
                start: start_time,
                end: end_time,
                duration,
            });
        }
        Ok(Self {
            id,
            start_time,
            end_time,
        })
    }

    pub fn duration(&self) -> Seconds {
        self.end_time - self.start_time
    }

    /// True when `time` falls strictly inside the segment, i.e. a cut there
    /// would leave two non-empty halves.
    pub fn splits_at(&self, time: Seconds) -> bool {
        time > self.start_time && time < self.end_time
    }
}

/// `[start, end)` shifted by `delta`, kept inside `[0, duration]` with its
/// length preserved.
pub(crate) fn shift_range(
    start: Seconds,
    end: Seconds,
    delta: Seconds,
    duration: Seconds,
) -> (Seconds, Seconds) {
    let length = end - start;
    let latest_start = (duration - length).max(0.0);
    let new_start = (start + delta).clamp(0.0, latest_start);
    (new_start, new_start + length)
}

/// Legacy single-range trim markers. No ordering is enforced between the two
/// points; an inverted range is a valid transient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerPair {
    pub in_point: Option<Seconds>,
    pub out_point: Option<Seconds>,
}

impl MarkerPair {
    pub fn new(in_point: Option<Seconds>, out_point: Option<Seconds>) -> Self {
        Self {
            in_point,
            out_point,
        }
    }

    pub fn clear(&mut self) {
        self.in_point = None;
        self.out_point = None;
    }

    pub fn is_empty(&self) -> bool {
        self.in_point.is_none() && self.out_point.is_none()
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.in_point, self.out_point), (Some(i), Some(o)) if o < i)
    }

    /// `out - in` when both are set; negative for an inverted range.
    pub fn trim_duration(&self) -> Option<Seconds> {
        match (self.in_point, self.out_point) {
            (Some(i), Some(o)) => Some(o - i),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioKind {
    Music,
    Frequency,
}

impl AudioKind {
    pub fn track(self) -> TrackKind {
        match self {
            AudioKind::Music => TrackKind::Music,
            AudioKind::Frequency => TrackKind::Frequency,
        }
    }
}

/// Audio bed spanning the whole timeline on one of the audio rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrackClip {
    pub kind: AudioKind,
    pub name: String,
    pub volume: f32,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl AudioTrackClip {
    pub fn new(kind: AudioKind, name: impl Into<String>, volume: f32) -> Self {
        Self {
            kind,
            name: name.into(),
            volume: volume.clamp(0.0, 1.0),
            is_active: true,
        }
    }
}

/// Which of the two mutually exclusive editing models is in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimelineMode {
    LegacyRange(MarkerPair),
    MultiSegment {
        segments: Vec<Segment>,
        #[serde(default)]
        selected: Option<SegmentId>,
    },
}

impl Default for TimelineMode {
    fn default() -> Self {
        TimelineMode::LegacyRange(MarkerPair::default())
    }
}

/// Read view of the host's editor state for one event or one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    pub duration: Seconds,
    pub current_time: Seconds,
    pub zoom: f64,
    pub mode: TimelineMode,
    #[serde(default)]
    pub audio_tracks: Vec<AudioTrackClip>,
}

impl TimelineSnapshot {
    pub fn config(&self, viewport_width: f64) -> TimelineConfig {
        TimelineConfig::new(self.duration, clamp_zoom(self.zoom), viewport_width)
    }

    pub fn is_multi_segment_mode(&self) -> bool {
        matches!(self.mode, TimelineMode::MultiSegment { .. })
    }

    /// Segments in render order; empty in legacy mode.
    pub fn active_segments(&self) -> &[Segment] {
        match &self.mode {
            TimelineMode::MultiSegment { segments, .. } => segments,
            TimelineMode::LegacyRange(_) => &[],
        }
    }

    pub fn selected_segment(&self) -> Option<SegmentId> {
        match &self.mode {
            TimelineMode::MultiSegment { selected, .. } => *selected,
            TimelineMode::LegacyRange(_) => None,
        }
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.active_segments().iter().find(|s| s.id == id)
    }

    pub fn markers(&self) -> Option<&MarkerPair> {
        match &self.mode {
            TimelineMode::LegacyRange(markers) => Some(markers),
            TimelineMode::MultiSegment { .. } => None,
        }
    }

    /// The clip drawn on an audio row: the first active one of that kind.
    pub fn active_audio_clip(&self, kind: AudioKind) -> Option<&AudioTrackClip> {
        self.audio_tracks
            .iter()
            .find(|clip| clip.kind == kind && clip.is_active)
    }
}

/// Mutations the timeline issues back to the state that owns the model.
///
/// Every time passed in has already been clamped to `[0, duration]`.
pub trait TimelineHost {
    fn set_current_time(&mut self, time: Seconds);
    fn set_in_point(&mut self, time: Seconds);
    fn set_out_point(&mut self, time: Seconds);
    fn set_zoom(&mut self, zoom: f64);
    fn clear_markers(&mut self);
    fn select_segment(&mut self, id: Option<SegmentId>);

    /// Shift a segment body. Hosts that do not support body drags ignore it.
    fn move_segment(&mut self, _id: SegmentId, _start: Seconds, _end: Seconds) {}

    /// Commit a blade cut at `time`.
    fn cut_at(&mut self, _time: Seconds) {}
}
