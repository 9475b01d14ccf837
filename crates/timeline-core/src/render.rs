use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::{
    clamp_time, AudioKind, MarkerPair, Overlay, Seconds, Segment, SegmentId, TimelineMode,
    TimelineSnapshot, TimelineView, TrackKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b, 255)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub const fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_x_range(x0: f64, x1: f64, y: f64, height: f64) -> Self {
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        Self {
            x: left,
            y,
            width: right - left,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    LeftTop,
    LeftCenter,
    CenterTop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    StrokeRect {
        rect: Rect,
        width: f64,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgba,
    },
    Text {
        pos: Point,
        text: String,
        size: f64,
        color: Rgba,
        anchor: TextAnchor,
    },
}

/// Paint passes, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Ruler,
    Tracks,
    Content,
    Audio,
    Playhead,
    Blade,
}

/// One frame of draw commands, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub width: f64,
    pub height: f64,
    items: Vec<(Layer, DrawCommand)>,
}

impl DrawList {
    fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    fn push(&mut self, layer: Layer, command: DrawCommand) {
        self.items.push((layer, command));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.items.iter().map(|(_, command)| command)
    }

    pub fn layered(&self) -> impl Iterator<Item = (Layer, &DrawCommand)> {
        self.items.iter().map(|(layer, command)| (*layer, command))
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.items
            .iter()
            .filter(move |(l, _)| *l == layer)
            .map(|(_, command)| command)
    }

    /// Stable hash of everything that would reach the surface.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.to_bits().hash(&mut hasher);
        self.height.to_bits().hash(&mut hasher);
        for (layer, command) in &self.items {
            layer.hash(&mut hasher);
            hash_command(command, &mut hasher);
        }
        hasher.finish()
    }
}

fn hash_point(p: &Point, h: &mut DefaultHasher) {
    p.x.to_bits().hash(h);
    p.y.to_bits().hash(h);
}

fn hash_rect(r: &Rect, h: &mut DefaultHasher) {
    for v in [r.x, r.y, r.width, r.height] {
        v.to_bits().hash(h);
    }
}

fn hash_command(command: &DrawCommand, h: &mut DefaultHasher) {
    match command {
        DrawCommand::FillRect { rect, color } => {
            0u8.hash(h);
            hash_rect(rect, h);
            color.hash(h);
        }
        DrawCommand::StrokeRect { rect, width, color } => {
            1u8.hash(h);
            hash_rect(rect, h);
            width.to_bits().hash(h);
            color.hash(h);
        }
        DrawCommand::Line {
            from,
            to,
            width,
            color,
        } => {
            2u8.hash(h);
            hash_point(from, h);
            hash_point(to, h);
            width.to_bits().hash(h);
            color.hash(h);
        }
        DrawCommand::Polygon { points, color } => {
            3u8.hash(h);
            points.len().hash(h);
            for p in points {
                hash_point(p, h);
            }
            color.hash(h);
        }
        DrawCommand::Text {
            pos,
            text,
            size,
            color,
            anchor,
        } => {
            4u8.hash(h);
            hash_point(pos, h);
            text.hash(h);
            size.to_bits().hash(h);
            color.hash(h);
            anchor.hash(h);
        }
    }
}

mod palette {
    use super::Rgba;

    pub const BACKGROUND: Rgba = Rgba::rgb(24, 24, 28);
    pub const RULER: Rgba = Rgba::rgb(36, 36, 42);
    pub const RULER_TICK: Rgba = Rgba::rgb(120, 120, 130);
    pub const RULER_TEXT: Rgba = Rgba::rgb(170, 170, 180);
    pub const TRACK_BG: [Rgba; 3] = [
        Rgba::rgb(34, 40, 52),
        Rgba::rgb(34, 48, 40),
        Rgba::rgb(48, 40, 52),
    ];
    pub const TRACK_LABEL: Rgba = Rgba::rgb(200, 200, 210);
    pub const SEGMENT: Rgba = Rgba::rgb(40, 90, 160);
    pub const SEGMENT_HOVER: Rgba = Rgba::rgb(60, 115, 190);
    pub const SEGMENT_SELECTED: Rgba = Rgba::rgb(70, 130, 210);
    pub const SEGMENT_OUTLINE: Rgba = Rgba::rgb(255, 200, 50);
    pub const RANGE: Rgba = Rgba(74, 158, 255, 50);
    pub const RANGE_INVERTED: Rgba = Rgba(255, 90, 60, 50);
    pub const IN_MARKER: Rgba = Rgba::rgb(0, 200, 90);
    pub const OUT_MARKER: Rgba = Rgba::rgb(230, 60, 60);
    pub const MUSIC: Rgba = Rgba::rgb(40, 120, 40);
    pub const FREQUENCY: Rgba = Rgba::rgb(130, 70, 160);
    pub const AUDIO_TEXT: Rgba = Rgba::rgb(235, 235, 235);
    pub const PLAYHEAD: Rgba = Rgba::rgb(255, 70, 70);
    pub const BLADE: Rgba = Rgba::rgb(255, 153, 0);
}

const TICK_STEPS: [Seconds; 11] = [
    0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0,
];
const MIN_TICK_SPACING_PX: f64 = 60.0;
const LABEL_SIZE: f64 = 11.0;
const MARKER_FLAG_WIDTH: f64 = 28.0;
const MARKER_FLAG_HEIGHT: f64 = 14.0;
const PLAYHEAD_HANDLE: f64 = 7.0;

/// Smallest ruler step that keeps ticks at least `MIN_TICK_SPACING_PX` apart.
pub fn ruler_tick_step(pixels_per_second: f64) -> Seconds {
    let coarsest = TICK_STEPS[TICK_STEPS.len() - 1];
    if !(pixels_per_second > 0.0) {
        return coarsest;
    }
    if let Some(step) = TICK_STEPS
        .into_iter()
        .find(|step| step * pixels_per_second >= MIN_TICK_SPACING_PX)
    {
        return step;
    }
    // Very long timelines: whole multiples of the coarsest step.
    coarsest * (MIN_TICK_SPACING_PX / (coarsest * pixels_per_second)).ceil()
}

/// `m:ss`, or `m:ss.s` when the ruler step is below one second.
pub fn format_ruler_time(time: Seconds, step: Seconds) -> String {
    let tenths = (time * 10.0).round() as i64;
    let minutes = tenths / 600;
    let seconds = (tenths % 600) / 10;
    if step < 1.0 {
        format!("{minutes}:{seconds:02}.{}", tenths % 10)
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Paints one frame from the snapshot. Pure: identical inputs produce
/// identical command lists.
pub fn render(snapshot: &TimelineSnapshot, view: &TimelineView, overlay: &Overlay) -> DrawList {
    let width = view.viewport_width.max(0.0);
    let height = view.canvas_height();
    let mut list = DrawList::new(width, height);

    list.push(
        Layer::Background,
        DrawCommand::FillRect {
            rect: Rect::from_x_range(0.0, width, 0.0, height),
            color: palette::BACKGROUND,
        },
    );
    draw_ruler(&mut list, snapshot, view);
    draw_tracks(&mut list, view);
    match &snapshot.mode {
        TimelineMode::MultiSegment { segments, selected } => {
            draw_segments(&mut list, view, segments, *selected, overlay.hovered_segment)
        }
        TimelineMode::LegacyRange(markers) => draw_markers(&mut list, view, markers),
    }
    draw_audio(&mut list, snapshot, view);
    draw_playhead(&mut list, snapshot, view);
    if overlay.blade_mode {
        if let Some(x) = overlay.blade_cursor_x {
            draw_blade(&mut list, view, x);
        }
    }
    list
}

fn draw_ruler(list: &mut DrawList, snapshot: &TimelineSnapshot, view: &TimelineView) {
    let ruler_h = view.layout.ruler_height();
    list.push(
        Layer::Ruler,
        DrawCommand::FillRect {
            rect: Rect::from_x_range(0.0, list.width, 0.0, ruler_h),
            color: palette::RULER,
        },
    );

    let pps = view.mapping.pixels_per_second();
    if pps <= 0.0 {
        return;
    }
    let step = ruler_tick_step(pps);
    let mut index = 0u32;
    loop {
        let t = f64::from(index) * step;
        if t > snapshot.duration + 1e-9 {
            break;
        }
        let x = view.mapping.time_to_pixel(t);
        if x > list.width {
            break;
        }
        list.push(
            Layer::Ruler,
            DrawCommand::Line {
                from: pt(x, ruler_h * 0.55),
                to: pt(x, ruler_h),
                width: 1.0,
                color: palette::RULER_TICK,
            },
        );
        list.push(
            Layer::Ruler,
            DrawCommand::Text {
                pos: pt(x + 3.0, 2.0),
                text: format_ruler_time(t, step),
                size: LABEL_SIZE,
                color: palette::RULER_TEXT,
                anchor: TextAnchor::LeftTop,
            },
        );
        index += 1;
    }
}

fn draw_tracks(list: &mut DrawList, view: &TimelineView) {
    for kind in TrackKind::ALL {
        let (top, bottom) = view.layout.track_band(kind);
        list.push(
            Layer::Tracks,
            DrawCommand::FillRect {
                rect: Rect::from_x_range(0.0, list.width, top, bottom - top),
                color: palette::TRACK_BG[kind.row_index()],
            },
        );
        list.push(
            Layer::Tracks,
            DrawCommand::Text {
                pos: pt(4.0, top + 3.0),
                text: kind.label().to_string(),
                size: LABEL_SIZE,
                color: palette::TRACK_LABEL,
                anchor: TextAnchor::LeftTop,
            },
        );
    }
}

fn draw_segments(
    list: &mut DrawList,
    view: &TimelineView,
    segments: &[Segment],
    selected: Option<SegmentId>,
    hovered: Option<SegmentId>,
) {
    let (top, bottom) = view.layout.track_band(TrackKind::Video);
    for segment in segments {
        let rect = Rect::from_x_range(
            view.mapping.time_to_pixel(segment.start_time),
            view.mapping.time_to_pixel(segment.end_time),
            top,
            bottom - top,
        );
        let is_selected = selected == Some(segment.id);
        let color = if is_selected {
            palette::SEGMENT_SELECTED
        } else if hovered == Some(segment.id) {
            palette::SEGMENT_HOVER
        } else {
            palette::SEGMENT
        };
        list.push(Layer::Content, DrawCommand::FillRect { rect, color });
        if is_selected {
            list.push(
                Layer::Content,
                DrawCommand::StrokeRect {
                    rect,
                    width: 2.0,
                    color: palette::SEGMENT_OUTLINE,
                },
            );
        }
    }
}

fn draw_markers(list: &mut DrawList, view: &TimelineView, markers: &MarkerPair) {
    let ruler_h = view.layout.ruler_height();
    let height = list.height;

    if let (Some(in_point), Some(out_point)) = (markers.in_point, markers.out_point) {
        let color = if markers.is_inverted() {
            palette::RANGE_INVERTED
        } else {
            palette::RANGE
        };
        list.push(
            Layer::Content,
            DrawCommand::FillRect {
                rect: Rect::from_x_range(
                    view.mapping.time_to_pixel(in_point),
                    view.mapping.time_to_pixel(out_point),
                    ruler_h,
                    height - ruler_h,
                ),
                color,
            },
        );
    }

    // The in flag points right and the out flag points left, so the grab
    // area sits on the inside of the range.
    let flags = [
        (markers.in_point, palette::IN_MARKER, "IN", 1.0),
        (markers.out_point, palette::OUT_MARKER, "OUT", -1.0),
    ];
    for (time, color, label, dir) in flags {
        let Some(time) = time else { continue };
        let x = view.mapping.time_to_pixel(time);
        list.push(
            Layer::Content,
            DrawCommand::Line {
                from: pt(x, ruler_h),
                to: pt(x, height),
                width: 2.0,
                color,
            },
        );
        let tip = x + dir * MARKER_FLAG_WIDTH;
        list.push(
            Layer::Content,
            DrawCommand::Polygon {
                points: vec![
                    pt(x, ruler_h),
                    pt(tip, ruler_h),
                    pt(tip, ruler_h + MARKER_FLAG_HEIGHT),
                    pt(x, ruler_h + MARKER_FLAG_HEIGHT),
                ],
                color,
            },
        );
        list.push(
            Layer::Content,
            DrawCommand::Text {
                pos: pt((x + tip) / 2.0, ruler_h + 1.0),
                text: label.to_string(),
                size: LABEL_SIZE - 1.0,
                color: palette::AUDIO_TEXT,
                anchor: TextAnchor::CenterTop,
            },
        );
    }
}

fn draw_audio(list: &mut DrawList, snapshot: &TimelineSnapshot, view: &TimelineView) {
    for kind in [AudioKind::Music, AudioKind::Frequency] {
        let Some(clip) = snapshot.active_audio_clip(kind) else {
            continue;
        };
        let (top, bottom) = view.layout.track_band(kind.track());
        let rect = Rect::from_x_range(
            view.mapping.time_to_pixel(0.0),
            view.mapping.time_to_pixel(snapshot.duration),
            top,
            bottom - top,
        );
        let color = match kind {
            AudioKind::Music => palette::MUSIC,
            AudioKind::Frequency => palette::FREQUENCY,
        };
        list.push(Layer::Audio, DrawCommand::FillRect { rect, color });
        let volume = (clip.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
        list.push(
            Layer::Audio,
            DrawCommand::Text {
                pos: pt(rect.x + 6.0, top + (bottom - top) / 2.0),
                text: format!("{} ({volume}%)", clip.name),
                size: LABEL_SIZE,
                color: palette::AUDIO_TEXT,
                anchor: TextAnchor::LeftCenter,
            },
        );
    }
}

fn draw_playhead(list: &mut DrawList, snapshot: &TimelineSnapshot, view: &TimelineView) {
    let x = view
        .mapping
        .time_to_pixel(clamp_time(snapshot.current_time, snapshot.duration));
    let ruler_h = view.layout.ruler_height();
    list.push(
        Layer::Playhead,
        DrawCommand::Line {
            from: pt(x, 0.0),
            to: pt(x, list.height),
            width: 2.0,
            color: palette::PLAYHEAD,
        },
    );
    list.push(
        Layer::Playhead,
        DrawCommand::Polygon {
            points: vec![
                pt(x - PLAYHEAD_HANDLE, ruler_h - 2.0 * PLAYHEAD_HANDLE),
                pt(x + PLAYHEAD_HANDLE, ruler_h - 2.0 * PLAYHEAD_HANDLE),
                pt(x, ruler_h),
            ],
            color: palette::PLAYHEAD,
        },
    );
}

fn draw_blade(list: &mut DrawList, view: &TimelineView, x: f64) {
    let ruler_h = view.layout.ruler_height();
    list.push(
        Layer::Blade,
        DrawCommand::Line {
            from: pt(x, ruler_h),
            to: pt(x, list.height),
            width: 1.0,
            color: palette::BLADE,
        },
    );
    let time = view.mapping.pixel_to_time(x);
    list.push(
        Layer::Blade,
        DrawCommand::Text {
            pos: pt(x + 4.0, ruler_h + 2.0),
            text: format_ruler_time(time, 0.1),
            size: LABEL_SIZE,
            color: palette::BLADE,
            anchor: TextAnchor::LeftTop,
        },
    );
}
