use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    clamp_time, clamp_zoom, AudioTrackClip, MarkerPair, Seconds, Segment, SegmentId,
    TimelineError, TimelineHost, TimelineMode, TimelineSnapshot, MIN_ZOOM,
};

/// In-memory editor state: owns the model the timeline reads and applies the
/// timeline's mutations with every value clamped into range.
///
/// Both the legacy marker pair and the segment list are kept, so switching
/// modes does not lose either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    duration: Seconds,
    current_time: Seconds,
    zoom: f64,
    multi_segment: bool,
    markers: MarkerPair,
    segments: Vec<Segment>,
    selected: Option<SegmentId>,
    audio_tracks: Vec<AudioTrackClip>,
}

impl EditorState {
    pub fn new(duration: Seconds) -> Self {
        Self {
            duration: duration.max(0.0),
            current_time: 0.0,
            zoom: MIN_ZOOM,
            multi_segment: false,
            markers: MarkerPair::default(),
            segments: Vec::new(),
            selected: None,
            audio_tracks: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        let mode = if self.multi_segment {
            TimelineMode::MultiSegment {
                segments: self.segments.clone(),
                selected: self.selected,
            }
        } else {
            TimelineMode::LegacyRange(self.markers)
        };
        TimelineSnapshot {
            duration: self.duration,
            current_time: self.current_time,
            zoom: self.zoom,
            mode,
            audio_tracks: self.audio_tracks.clone(),
        }
    }

    pub fn duration(&self) -> Seconds {
        self.duration
    }

    pub fn current_time(&self) -> Seconds {
        self.current_time
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn markers(&self) -> &MarkerPair {
        &self.markers
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn selected_segment(&self) -> Option<SegmentId> {
        self.selected
    }

    pub fn is_multi_segment_mode(&self) -> bool {
        self.multi_segment
    }

    pub fn set_multi_segment_mode(&mut self, enabled: bool) {
        if self.multi_segment != enabled {
            debug!(enabled, "multi-segment mode");
            self.multi_segment = enabled;
        }
    }

    pub fn add_segment(&mut self, start: Seconds, end: Seconds) -> Result<SegmentId, TimelineError> {
        let segment = Segment::new(SegmentId::new(), start, end, self.duration)?;
        let id = segment.id;
        self.segments.push(segment);
        Ok(id)
    }

    pub fn remove_segment(&mut self, id: SegmentId) -> Option<Segment> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.segments.remove(index))
    }

    /// Adds an audio clip. An active clip replaces the active one of the same
    /// kind, which stays in the list but is deactivated.
    pub fn add_audio_track(&mut self, clip: AudioTrackClip) {
        if clip.is_active {
            for existing in self.audio_tracks.iter_mut().filter(|c| c.kind == clip.kind) {
                existing.is_active = false;
            }
        }
        self.audio_tracks.push(clip);
    }

    pub fn audio_tracks(&self) -> &[AudioTrackClip] {
        &self.audio_tracks
    }
}

impl TimelineHost for EditorState {
    fn set_current_time(&mut self, time: Seconds) {
        self.current_time = clamp_time(time, self.duration);
    }

    fn set_in_point(&mut self, time: Seconds) {
        self.markers.in_point = Some(clamp_time(time, self.duration));
    }

    fn set_out_point(&mut self, time: Seconds) {
        self.markers.out_point = Some(clamp_time(time, self.duration));
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn select_segment(&mut self, id: Option<SegmentId>) {
        match id {
            Some(id) if !self.segments.iter().any(|s| s.id == id) => {
                trace!(%id, "ignoring selection of unknown segment");
            }
            _ => self.selected = id,
        }
    }

    fn move_segment(&mut self, id: SegmentId, start: Seconds, end: Seconds) {
        let start = clamp_time(start, self.duration);
        let end = clamp_time(end, self.duration);
        if start >= end {
            return;
        }
        if let Some(segment) = self.segments.iter_mut().find(|s| s.id == id) {
            segment.start_time = start;
            segment.end_time = end;
        }
    }

    /// Splits the topmost segment that strictly contains `time`.
    fn cut_at(&mut self, time: Seconds) {
        if !self.multi_segment {
            return;
        }
        let Some(index) = self.segments.iter().rposition(|s| s.splits_at(time)) else {
            return;
        };
        let tail = Segment {
            id: SegmentId::new(),
            start_time: time,
            end_time: self.segments[index].end_time,
        };
        self.segments[index].end_time = time;
        debug!(time, head = %self.segments[index].id, tail = %tail.id, "segment split");
        self.segments.insert(index + 1, tail);
    }
}
