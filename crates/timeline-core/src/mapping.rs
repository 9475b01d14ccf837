use serde::{Deserialize, Serialize};

use crate::{Seconds, TimelineSettings};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 10.0;
pub const ZOOM_STEP: f64 = 1.5;

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Clamps a time into `[0, duration]`; degenerate durations collapse to 0.
pub fn clamp_time(time: Seconds, duration: Seconds) -> Seconds {
    if !(duration.is_finite() && duration > 0.0) || time.is_nan() {
        return 0.0;
    }
    time.clamp(0.0, duration)
}

pub fn zoomed_in(zoom: f64) -> f64 {
    clamp_zoom(zoom * ZOOM_STEP)
}

pub fn zoomed_out(zoom: f64) -> f64 {
    clamp_zoom(zoom / ZOOM_STEP)
}

/// Horizontal parameters of the timeline view. Stored values are in time
/// units; everything in pixels is derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub duration: Seconds,
    pub zoom: f64,
    pub viewport_width: f64,
}

impl TimelineConfig {
    pub fn new(duration: Seconds, zoom: f64, viewport_width: f64) -> Self {
        Self {
            duration,
            zoom: clamp_zoom(zoom),
            viewport_width,
        }
    }
}

/// Bidirectional time <-> x conversion for one frame of layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeMapping {
    duration: Seconds,
    zoom: f64,
    left_margin: f64,
    usable_width: f64,
}

impl TimeMapping {
    pub fn new(config: &TimelineConfig, settings: &TimelineSettings) -> Self {
        Self {
            duration: config.duration,
            zoom: clamp_zoom(config.zoom),
            left_margin: settings.left_margin,
            usable_width: (config.viewport_width - settings.total_margin).max(0.0),
        }
    }

    pub fn duration(&self) -> Seconds {
        self.duration
    }

    pub fn left_margin(&self) -> f64 {
        self.left_margin
    }

    /// Pixel width of the whole `[0, duration]` span at the current zoom.
    pub fn content_width(&self) -> f64 {
        self.usable_width * self.zoom
    }

    pub fn pixels_per_second(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.content_width() / self.duration
    }

    pub fn time_to_pixel(&self, time: Seconds) -> f64 {
        if self.is_degenerate() || !time.is_finite() {
            return self.left_margin;
        }
        (time / self.duration) * self.content_width() + self.left_margin
    }

    /// Inverse of [`Self::time_to_pixel`], clamped to `[0, duration]`.
    pub fn pixel_to_time(&self, x: f64) -> Seconds {
        let width = self.content_width();
        if self.is_degenerate() || width <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        let time = (x - self.left_margin) / width * self.duration;
        time.clamp(0.0, self.duration)
    }

    fn is_degenerate(&self) -> bool {
        !(self.duration.is_finite() && self.duration > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(duration: f64, zoom: f64, width: f64) -> TimeMapping {
        TimeMapping::new(
            &TimelineConfig::new(duration, zoom, width),
            &TimelineSettings::default(),
        )
    }

    #[test]
    fn round_trip_within_tolerance() {
        for zoom in [1.0, 1.5, 3.375, 10.0] {
            let m = mapping(120.0, zoom, 800.0);
            for step in 0..=240 {
                let t = step as f64 * 0.5;
                let back = m.pixel_to_time(m.time_to_pixel(t));
                assert!((back - t).abs() < 1e-6, "zoom {zoom} t {t} -> {back}");
            }
        }
    }

    #[test]
    fn pixel_to_time_clamps_outside_canvas() {
        let m = mapping(120.0, 1.0, 800.0);
        assert_eq!(m.pixel_to_time(-500.0), 0.0);
        assert_eq!(m.pixel_to_time(0.0), 0.0);
        assert_eq!(m.pixel_to_time(5_000.0), 120.0);
        assert_eq!(m.pixel_to_time(f64::NAN), 0.0);
        assert_eq!(m.pixel_to_time(f64::INFINITY), 0.0);
    }

    #[test]
    fn zero_duration_never_divides() {
        let m = mapping(0.0, 1.0, 800.0);
        assert_eq!(m.time_to_pixel(0.0), 20.0);
        assert_eq!(m.time_to_pixel(42.0), 20.0);
        for x in [-10.0, 0.0, 400.0, 10_000.0] {
            let t = m.pixel_to_time(x);
            assert_eq!(t, 0.0);
        }

        let negative = mapping(-5.0, 1.0, 800.0);
        assert_eq!(negative.pixel_to_time(300.0), 0.0);
        assert_eq!(negative.time_to_pixel(3.0), 20.0);
    }

    #[test]
    fn narrow_viewport_degrades_to_zero_width() {
        let m = mapping(60.0, 1.0, 10.0);
        assert_eq!(m.content_width(), 0.0);
        assert_eq!(m.pixel_to_time(30.0), 0.0);
        assert_eq!(m.time_to_pixel(30.0), 20.0);
    }

    #[test]
    fn time_to_pixel_is_strictly_increasing() {
        let m = mapping(90.0, 2.0, 1024.0);
        let mut prev = m.time_to_pixel(0.0);
        for step in 1..=900 {
            let x = m.time_to_pixel(step as f64 * 0.1);
            assert!(x > prev);
            prev = x;
        }
    }

    #[test]
    fn higher_zoom_spreads_times_apart() {
        let (a, b) = (10.0, 12.5);
        let mut prev_gap = 0.0;
        for zoom in [1.0, 1.5, 2.25, 5.0, 10.0] {
            let m = mapping(120.0, zoom, 800.0);
            let gap = m.time_to_pixel(b) - m.time_to_pixel(a);
            assert!(gap > prev_gap);
            prev_gap = gap;
        }
    }

    #[test]
    fn scrub_to_right_edge_clamps_to_duration() {
        let m = mapping(120.0, 1.0, 800.0);
        assert_eq!(m.pixel_to_time(780.0), 120.0);
        assert_eq!(m.pixel_to_time(799.0), 120.0);
    }

    #[test]
    fn zoom_steps_clamp() {
        let mut zoom = 9.0;
        for _ in 0..3 {
            zoom = zoomed_in(zoom);
        }
        assert_eq!(zoom, MAX_ZOOM);

        let mut zoom = 1.2;
        zoom = zoomed_out(zoom);
        assert_eq!(zoom, MIN_ZOOM);

        assert_eq!(clamp_zoom(f64::NAN), MIN_ZOOM);
        assert_eq!(TimelineConfig::new(10.0, 42.0, 800.0).zoom, MAX_ZOOM);
    }

    #[test]
    fn clamp_time_handles_degenerate_input() {
        assert_eq!(clamp_time(130.0, 120.0), 120.0);
        assert_eq!(clamp_time(-3.0, 120.0), 0.0);
        assert_eq!(clamp_time(f64::NAN, 120.0), 0.0);
        assert_eq!(clamp_time(5.0, 0.0), 0.0);
    }
}
