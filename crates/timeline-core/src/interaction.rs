use tracing::{debug, trace};

use crate::{
    clamp_time, hit_test, segment_at, shift_range, zoomed_in, zoomed_out, HitTarget, Seconds,
    SegmentId, TimelineHost, TimelineSettings, TimelineSnapshot, TimelineView, TrackKind,
};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DragTarget {
    Playhead,
    InMarker,
    OutMarker,
    /// Body drag of a segment; the original range is kept so every move is
    /// applied relative to where the drag began.
    Segment {
        id: SegmentId,
        grab_time: Seconds,
        orig_start: Seconds,
        orig_end: Seconds,
    },
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragTarget),
    /// Blade mode is on and the pointer is previewing a cut point.
    BladeArmed,
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::Dragging(_))
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
}

/// Ephemeral view state the renderer needs from the controller.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Overlay {
    pub state: InteractionState,
    pub blade_mode: bool,
    pub blade_cursor_x: Option<f64>,
    pub hovered_segment: Option<SegmentId>,
}

/// Pointer-driven state machine for the timeline canvas.
///
/// Owns only interaction state; every model change goes through the
/// [`TimelineHost`] passed to each call, and every call finishes before it
/// returns.
#[derive(Clone, Debug)]
pub struct TimelineController {
    settings: TimelineSettings,
    viewport_width: f64,
    state: InteractionState,
    blade_mode: bool,
    blade_cursor_x: Option<f64>,
    hovered_segment: Option<SegmentId>,
}

impl TimelineController {
    pub fn new(settings: TimelineSettings, viewport_width: f64) -> Self {
        Self {
            settings,
            viewport_width,
            state: InteractionState::Idle,
            blade_mode: false,
            blade_cursor_x: None,
            hovered_segment: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn blade_mode(&self) -> bool {
        self.blade_mode
    }

    pub fn blade_cursor_x(&self) -> Option<f64> {
        self.blade_cursor_x
    }

    pub fn hovered_segment(&self) -> Option<SegmentId> {
        self.hovered_segment
    }

    pub fn overlay(&self) -> Overlay {
        Overlay {
            state: self.state,
            blade_mode: self.blade_mode,
            blade_cursor_x: self.blade_cursor_x,
            hovered_segment: self.hovered_segment,
        }
    }

    /// Records the canvas width; geometry is rederived on the next event.
    pub fn resize(&mut self, viewport_width: f64) {
        if viewport_width != self.viewport_width {
            trace!(viewport_width, "timeline resized");
            self.viewport_width = viewport_width;
        }
    }

    pub fn view(&self, snapshot: &TimelineSnapshot) -> TimelineView {
        TimelineView::new(snapshot, &self.settings, self.viewport_width)
    }

    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        snapshot: &TimelineSnapshot,
        host: &mut impl TimelineHost,
    ) {
        match event {
            PointerEvent::Down { x, y } => self.pointer_down(snapshot, host, x, y),
            PointerEvent::Move { x, y } => self.pointer_move(snapshot, host, x, y),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    pub fn pointer_down(
        &mut self,
        snapshot: &TimelineSnapshot,
        host: &mut impl TimelineHost,
        x: f64,
        y: f64,
    ) {
        let view = self.view(snapshot);

        if self.blade_mode {
            let (top, bottom) = view.layout.track_band(TrackKind::Video);
            if (top..=bottom).contains(&y) {
                let time = view.mapping.pixel_to_time(x);
                debug!(time, "blade cut");
                host.cut_at(time);
            }
            self.blade_cursor_x = Some(x);
            self.state = InteractionState::BladeArmed;
            return;
        }

        let target = hit_test(snapshot, &view, x, y);
        let next = match target {
            HitTarget::Playhead => InteractionState::Dragging(DragTarget::Playhead),
            HitTarget::InMarker => InteractionState::Dragging(DragTarget::InMarker),
            HitTarget::OutMarker => InteractionState::Dragging(DragTarget::OutMarker),
            HitTarget::Segment(id) => {
                host.select_segment(Some(id));
                match snapshot.segment(id) {
                    Some(segment) if self.settings.segment_body_drag => {
                        InteractionState::Dragging(DragTarget::Segment {
                            id,
                            grab_time: view.mapping.pixel_to_time(x),
                            orig_start: segment.start_time,
                            orig_end: segment.end_time,
                        })
                    }
                    _ => InteractionState::Idle,
                }
            }
            HitTarget::Background => {
                if snapshot.is_multi_segment_mode() {
                    host.select_segment(None);
                }
                host.set_current_time(view.mapping.pixel_to_time(x));
                InteractionState::Dragging(DragTarget::Playhead)
            }
        };
        debug!(?target, state = ?next, "timeline pointer down");
        self.state = next;
    }

    pub fn pointer_move(
        &mut self,
        snapshot: &TimelineSnapshot,
        host: &mut impl TimelineHost,
        x: f64,
        y: f64,
    ) {
        let view = self.view(snapshot);
        self.hovered_segment = segment_at(snapshot, &view, x, y);

        let time = view.mapping.pixel_to_time(x);
        match self.state {
            InteractionState::Dragging(DragTarget::Playhead) => host.set_current_time(time),
            InteractionState::Dragging(DragTarget::InMarker) => host.set_in_point(time),
            InteractionState::Dragging(DragTarget::OutMarker) => host.set_out_point(time),
            InteractionState::Dragging(DragTarget::Segment {
                id,
                grab_time,
                orig_start,
                orig_end,
            }) => {
                let (start, end) =
                    shift_range(orig_start, orig_end, time - grab_time, snapshot.duration);
                host.move_segment(id, start, end);
            }
            InteractionState::Idle | InteractionState::BladeArmed => {
                if self.blade_mode {
                    self.blade_cursor_x = Some(x);
                    self.state = InteractionState::BladeArmed;
                }
                return;
            }
        }
        trace!(time, state = ?self.state, "timeline drag");
    }

    pub fn pointer_up(&mut self) {
        if self.state != InteractionState::Idle {
            debug!(state = ?self.state, "timeline interaction ended");
        }
        self.state = InteractionState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
        self.hovered_segment = None;
        self.blade_cursor_x = None;
    }

    pub fn set_blade_mode(&mut self, enabled: bool) {
        if enabled == self.blade_mode {
            return;
        }
        debug!(enabled, "blade mode");
        self.blade_mode = enabled;
        if enabled {
            if self.state == InteractionState::Idle {
                self.state = InteractionState::BladeArmed;
            }
        } else {
            self.state = InteractionState::Idle;
            self.blade_cursor_x = None;
        }
    }

    pub fn toggle_blade_mode(&mut self) {
        self.set_blade_mode(!self.blade_mode);
    }

    pub fn zoom_in(&self, snapshot: &TimelineSnapshot, host: &mut impl TimelineHost) {
        host.set_zoom(zoomed_in(snapshot.zoom));
    }

    pub fn zoom_out(&self, snapshot: &TimelineSnapshot, host: &mut impl TimelineHost) {
        host.set_zoom(zoomed_out(snapshot.zoom));
    }

    pub fn set_in_at_playhead(&self, snapshot: &TimelineSnapshot, host: &mut impl TimelineHost) {
        host.set_in_point(clamp_time(snapshot.current_time, snapshot.duration));
    }

    pub fn set_out_at_playhead(&self, snapshot: &TimelineSnapshot, host: &mut impl TimelineHost) {
        host.set_out_point(clamp_time(snapshot.current_time, snapshot.duration));
    }

    pub fn clear_markers(&self, host: &mut impl TimelineHost) {
        host.clear_markers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MarkerPair, Segment, TimelineMode};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Time(f64),
        In(f64),
        Out(f64),
        Zoom(f64),
        Clear,
        Select(Option<SegmentId>),
        Move(SegmentId, f64, f64),
        Cut(f64),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl TimelineHost for Recorder {
        fn set_current_time(&mut self, time: Seconds) {
            self.calls.push(Call::Time(time));
        }
        fn set_in_point(&mut self, time: Seconds) {
            self.calls.push(Call::In(time));
        }
        fn set_out_point(&mut self, time: Seconds) {
            self.calls.push(Call::Out(time));
        }
        fn set_zoom(&mut self, zoom: f64) {
            self.calls.push(Call::Zoom(zoom));
        }
        fn clear_markers(&mut self) {
            self.calls.push(Call::Clear);
        }
        fn select_segment(&mut self, id: Option<SegmentId>) {
            self.calls.push(Call::Select(id));
        }
        fn move_segment(&mut self, id: SegmentId, start: Seconds, end: Seconds) {
            self.calls.push(Call::Move(id, start, end));
        }
        fn cut_at(&mut self, time: Seconds) {
            self.calls.push(Call::Cut(time));
        }
    }

    const VIDEO_Y: f64 = 50.0;

    // 120s over 760 usable pixels starting at x = 20.
    fn x_for(time: f64) -> f64 {
        20.0 + time / 120.0 * 760.0
    }

    fn controller() -> TimelineController {
        TimelineController::new(TimelineSettings::default(), 800.0)
    }

    fn legacy(current_time: f64, in_point: Option<f64>, out_point: Option<f64>) -> TimelineSnapshot {
        TimelineSnapshot {
            duration: 120.0,
            current_time,
            zoom: 1.0,
            mode: TimelineMode::LegacyRange(MarkerPair::new(in_point, out_point)),
            audio_tracks: Vec::new(),
        }
    }

    fn multi(current_time: f64, segments: Vec<Segment>) -> TimelineSnapshot {
        TimelineSnapshot {
            duration: 120.0,
            current_time,
            zoom: 1.0,
            mode: TimelineMode::MultiSegment {
                segments,
                selected: None,
            },
            audio_tracks: Vec::new(),
        }
    }

    fn assert_time_close(call: &Call, expected: f64) {
        match call {
            Call::Time(t) | Call::In(t) | Call::Out(t) | Call::Cut(t) => {
                assert!((t - expected).abs() < 1e-9, "{t} != {expected}")
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn playhead_drag_scrubs_every_move() {
        let snapshot = legacy(30.0, None, None);
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.pointer_down(&snapshot, &mut host, x_for(30.0), VIDEO_Y);
        assert_eq!(ctl.state(), InteractionState::Dragging(DragTarget::Playhead));
        assert!(host.calls.is_empty());

        ctl.pointer_move(&snapshot, &mut host, x_for(45.0), VIDEO_Y);
        ctl.pointer_move(&snapshot, &mut host, x_for(60.0), VIDEO_Y);
        assert_eq!(host.calls.len(), 2);
        assert_time_close(&host.calls[0], 45.0);
        assert_time_close(&host.calls[1], 60.0);

        ctl.pointer_up();
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn background_click_seeks_and_starts_scrub() {
        let snapshot = legacy(0.0, None, None);
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.pointer_down(&snapshot, &mut host, 5_000.0, VIDEO_Y);
        assert_eq!(host.calls, vec![Call::Time(120.0)]);
        assert_eq!(ctl.state(), InteractionState::Dragging(DragTarget::Playhead));

        ctl.pointer_move(&snapshot, &mut host, -300.0, VIDEO_Y);
        assert_eq!(host.calls.last(), Some(&Call::Time(0.0)));
    }

    #[test]
    fn background_click_in_multi_mode_deselects_first() {
        let snapshot = multi(0.0, Vec::new());
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.pointer_down(&snapshot, &mut host, x_for(60.0), VIDEO_Y);
        assert_eq!(host.calls[0], Call::Select(None));
        assert_time_close(&host.calls[1], 60.0);
    }

    #[test]
    fn marker_drags_do_not_enforce_order() {
        let snapshot = legacy(0.0, Some(40.0), Some(80.0));
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.pointer_down(&snapshot, &mut host, x_for(40.0), 0.0);
        assert_eq!(ctl.state(), InteractionState::Dragging(DragTarget::InMarker));
        ctl.pointer_move(&snapshot, &mut host, x_for(100.0), 0.0);
        assert_time_close(&host.calls[0], 100.0);
        assert!(matches!(host.calls[0], Call::In(_)));
        ctl.pointer_leave();

        ctl.pointer_down(&snapshot, &mut host, x_for(80.0), 0.0);
        assert_eq!(ctl.state(), InteractionState::Dragging(DragTarget::OutMarker));
        ctl.pointer_move(&snapshot, &mut host, x_for(10.0), 0.0);
        assert!(matches!(host.calls[1], Call::Out(_)));
        assert_time_close(&host.calls[1], 10.0);
    }

    #[test]
    fn segment_click_selects_without_dragging() {
        let segment = Segment::new(SegmentId::new(), 40.0, 80.0, 120.0).unwrap();
        let id = segment.id;
        let snapshot = multi(0.0, vec![segment]);
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.pointer_down(&snapshot, &mut host, x_for(60.0), VIDEO_Y);
        assert_eq!(host.calls, vec![Call::Select(Some(id))]);
        assert_eq!(ctl.state(), InteractionState::Idle);

        ctl.pointer_move(&snapshot, &mut host, x_for(70.0), VIDEO_Y);
        assert_eq!(host.calls.len(), 1);
    }

    #[test]
    fn segment_body_drag_preserves_duration() {
        let segment = Segment::new(SegmentId::new(), 40.0, 80.0, 120.0).unwrap();
        let id = segment.id;
        let snapshot = multi(0.0, vec![segment]);
        let mut host = Recorder::default();
        let settings = TimelineSettings {
            segment_body_drag: true,
            ..TimelineSettings::default()
        };
        let mut ctl = TimelineController::new(settings, 800.0);

        ctl.pointer_down(&snapshot, &mut host, x_for(60.0), VIDEO_Y);
        assert!(ctl.state().is_dragging());

        ctl.pointer_move(&snapshot, &mut host, x_for(75.0), VIDEO_Y);
        match host.calls.last() {
            Some(Call::Move(moved, start, end)) => {
                assert_eq!(*moved, id);
                assert!((start - 55.0).abs() < 1e-9);
                assert!((end - 95.0).abs() < 1e-9);
            }
            other => panic!("expected move, got {other:?}"),
        }

        ctl.pointer_move(&snapshot, &mut host, x_for(120.0), VIDEO_Y);
        assert_eq!(host.calls.last(), Some(&Call::Move(id, 80.0, 120.0)));
    }

    #[test]
    fn hover_tracks_segments_during_drag() {
        let segment = Segment::new(SegmentId::new(), 40.0, 80.0, 120.0).unwrap();
        let id = segment.id;
        let snapshot = multi(10.0, vec![segment]);
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.pointer_down(&snapshot, &mut host, x_for(10.0), VIDEO_Y);
        ctl.pointer_move(&snapshot, &mut host, x_for(50.0), VIDEO_Y);
        assert_eq!(ctl.hovered_segment(), Some(id));
        assert_eq!(ctl.state(), InteractionState::Dragging(DragTarget::Playhead));

        ctl.pointer_leave();
        assert_eq!(ctl.hovered_segment(), None);
    }

    #[test]
    fn blade_preview_only_moves_cursor() {
        let segment = Segment::new(SegmentId::new(), 40.0, 80.0, 120.0).unwrap();
        let snapshot = multi(0.0, vec![segment]);
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.set_blade_mode(true);
        assert_eq!(ctl.state(), InteractionState::BladeArmed);
        for x in [100.0, 300.0, 500.0] {
            ctl.pointer_move(&snapshot, &mut host, x, VIDEO_Y);
            assert_eq!(ctl.blade_cursor_x(), Some(x));
        }
        assert!(host.calls.is_empty());

        ctl.set_blade_mode(false);
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(ctl.blade_cursor_x(), None);
    }

    #[test]
    fn blade_off_mid_drag_returns_to_idle() {
        let snapshot = multi(0.0, Vec::new());
        let mut host = Recorder::default();
        let mut ctl = controller();

        ctl.pointer_down(&snapshot, &mut host, 400.0, VIDEO_Y);
        assert_eq!(ctl.state(), InteractionState::Dragging(DragTarget::Playhead));

        ctl.set_blade_mode(true);
        assert!(ctl.state().is_dragging());
        ctl.set_blade_mode(false);
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(ctl.blade_cursor_x(), None);
    }

    #[test]
    fn blade_click_outside_video_row_does_not_cut() {
        let snapshot = multi(0.0, Vec::new());
        let mut host = Recorder::default();
        let mut ctl = controller();
        ctl.set_blade_mode(true);

        // ruler, music row, frequency row
        for y in [10.0, 100.0, 160.0] {
            ctl.pointer_down(&snapshot, &mut host, x_for(30.0), y);
            ctl.pointer_up();
        }
        assert!(host.calls.is_empty());
        assert_eq!(ctl.blade_cursor_x(), Some(x_for(30.0)));
        assert!(!ctl.state().is_dragging());
    }

    #[test]
    fn blade_click_commits_cut_instead_of_seeking() {
        let snapshot = multi(0.0, Vec::new());
        let mut host = Recorder::default();
        let mut ctl = controller();
        ctl.toggle_blade_mode();

        ctl.pointer_down(&snapshot, &mut host, x_for(30.0), VIDEO_Y);
        assert_eq!(host.calls.len(), 1);
        assert!(matches!(host.calls[0], Call::Cut(_)));
        assert_time_close(&host.calls[0], 30.0);
        assert!(!ctl.state().is_dragging());

        ctl.pointer_up();
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert!(ctl.blade_mode());
    }

    #[test]
    fn every_sequence_ending_in_up_or_leave_is_idle() {
        let segment = Segment::new(SegmentId::new(), 40.0, 80.0, 120.0).unwrap();
        let snapshots = [
            legacy(20.0, Some(50.0), Some(90.0)),
            multi(20.0, vec![segment]),
        ];
        let points = [x_for(20.0), x_for(50.0), x_for(60.0), x_for(90.0), 2.0, 900.0];
        for snapshot in &snapshots {
            for blade in [false, true] {
                for &down_x in &points {
                    for end in [PointerEvent::Up, PointerEvent::Leave] {
                        let mut host = Recorder::default();
                        let mut ctl = controller();
                        ctl.set_blade_mode(blade);
                        let events = [
                            PointerEvent::Move { x: down_x, y: VIDEO_Y },
                            PointerEvent::Down { x: down_x, y: VIDEO_Y },
                            PointerEvent::Move { x: down_x + 33.0, y: VIDEO_Y },
                            end,
                        ];
                        for event in events {
                            ctl.handle_pointer(event, snapshot, &mut host);
                        }
                        assert_eq!(ctl.state(), InteractionState::Idle);
                    }
                }
            }
        }
    }

    #[test]
    fn zoom_buttons_clamp() {
        let mut host = Recorder::default();
        let ctl = controller();
        let mut snapshot = legacy(0.0, None, None);
        snapshot.zoom = 9.0;
        for _ in 0..3 {
            ctl.zoom_in(&snapshot, &mut host);
            if let Some(Call::Zoom(z)) = host.calls.last() {
                snapshot.zoom = *z;
            }
        }
        assert_eq!(snapshot.zoom, 10.0);

        snapshot.zoom = 1.0;
        ctl.zoom_out(&snapshot, &mut host);
        assert_eq!(host.calls.last(), Some(&Call::Zoom(1.0)));
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn marker_controls_use_clamped_playhead() {
        let mut host = Recorder::default();
        let ctl = controller();
        let snapshot = legacy(500.0, None, None);
        ctl.set_in_at_playhead(&snapshot, &mut host);
        ctl.set_out_at_playhead(&snapshot, &mut host);
        ctl.clear_markers(&mut host);
        assert_eq!(host.calls, vec![Call::In(120.0), Call::Out(120.0), Call::Clear]);
    }
}
