use eframe::egui;
use timeline_core::{
    render, AudioKind, AudioTrackClip, EditorState, InteractionState, PointerEvent,
    TimelineController, TimelineSettings,
};
use tracing::{debug, trace, warn};

use crate::keyboard::KeyCommand;
use crate::painter;
use crate::toolbar::{format_clock, TimelineToolbar};

const DEMO_DURATION: f64 = 120.0;

pub struct App {
    state: EditorState,
    controller: TimelineController,
    toolbar: TimelineToolbar,
    pointer_inside: bool,
    last_pointer: Option<egui::Pos2>,
}

impl App {
    pub fn new(settings: TimelineSettings) -> Self {
        Self {
            state: demo_state(),
            controller: TimelineController::new(settings, 0.0),
            toolbar: TimelineToolbar::default(),
            pointer_inside: false,
            last_pointer: None,
        }
    }

    fn apply(&mut self, command: KeyCommand) {
        debug!(?command, "timeline command");
        let snapshot = self.state.snapshot();
        match command {
            KeyCommand::ToggleBlade => {
                if self.state.is_multi_segment_mode() {
                    self.controller.toggle_blade_mode();
                }
            }
            KeyCommand::SetInPoint => self.controller.set_in_at_playhead(&snapshot, &mut self.state),
            KeyCommand::SetOutPoint => {
                self.controller.set_out_at_playhead(&snapshot, &mut self.state)
            }
            KeyCommand::ClearInOut => self.controller.clear_markers(&mut self.state),
            KeyCommand::ZoomIn => self.controller.zoom_in(&snapshot, &mut self.state),
            KeyCommand::ZoomOut => self.controller.zoom_out(&snapshot, &mut self.state),
        }
    }

    fn set_multi_segment(&mut self, enabled: bool) {
        self.state.set_multi_segment_mode(enabled);
        if !enabled {
            self.controller.set_blade_mode(false);
        }
    }

    fn send(&mut self, event: PointerEvent) {
        let snapshot = self.state.snapshot();
        self.controller.handle_pointer(event, &snapshot, &mut self.state);
    }

    /// Turns egui's per-frame pointer state into timeline pointer events.
    fn forward_pointer(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let (pressed, released, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });
        let inside = pos.is_some() && ui.rect_contains_pointer(rect);

        if let (true, Some(pos)) = (inside, pos) {
            let local = pos - rect.min;
            let (x, y) = (f64::from(local.x), f64::from(local.y));
            if self.last_pointer != Some(pos) {
                self.send(PointerEvent::Move { x, y });
            }
            if pressed {
                self.send(PointerEvent::Down { x, y });
            }
            if released {
                self.send(PointerEvent::Up);
            }
        } else if self.pointer_inside {
            self.send(PointerEvent::Leave);
        }

        self.pointer_inside = inside;
        self.last_pointer = pos;

        if inside {
            let cursor = match self.controller.state() {
                InteractionState::Dragging(_) => egui::CursorIcon::ResizeHorizontal,
                _ if self.controller.blade_mode() => egui::CursorIcon::Crosshair,
                _ => egui::CursorIcon::Default,
            };
            ui.ctx().set_cursor_icon(cursor);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width().max(1.0);
        self.controller.resize(f64::from(width));
        let height = self.controller.view(&self.state.snapshot()).canvas_height() as f32;

        let (response, canvas) =
            ui.allocate_painter(egui::vec2(width, height), egui::Sense::click_and_drag());
        let rect = response.rect;
        self.forward_pointer(ui, rect);

        let snapshot = self.state.snapshot();
        let view = self.controller.view(&snapshot);
        let list = render(&snapshot, &view, &self.controller.overlay());
        trace!(commands = list.len(), "timeline frame");
        painter::paint(&canvas, rect.min, &list);
    }

    fn status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.state.is_multi_segment_mode() {
                ui.label(format!("{} segments", self.state.segments().len()));
                ui.separator();
                let selected = self
                    .state
                    .selected_segment()
                    .and_then(|id| self.state.segments().iter().find(|s| s.id == id));
                match selected {
                    Some(segment) => {
                        ui.label(format!(
                            "Selected: {} - {}",
                            format_clock(segment.start_time),
                            format_clock(segment.end_time)
                        ));
                    }
                    None => {
                        ui.label(egui::RichText::new("No selection").weak());
                    }
                }
            } else {
                ui.label("Single range");
            }
            ui.separator();
            ui.label(format!("Duration {}", format_clock(self.state.duration())));
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !ctx.wants_keyboard_input() {
            for command in KeyCommand::pressed(ctx) {
                self.apply(command);
            }
        }

        egui::TopBottomPanel::top("timeline_toolbar").show(ctx, |ui| {
            let snapshot = self.state.snapshot();
            let mut multi_segment = self.state.is_multi_segment_mode();
            let clicked =
                self.toolbar
                    .ui(ui, &snapshot, self.controller.blade_mode(), &mut multi_segment);
            self.set_multi_segment(multi_segment);
            for command in clicked {
                self.apply(command);
            }
        });
        self.toolbar.keyboard_help(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas(ui);
            ui.add_space(6.0);
            self.status(ui);
        });
    }
}

fn demo_state() -> EditorState {
    let mut state = EditorState::new(DEMO_DURATION);
    for (start, end) in [(5.0, 30.0), (42.0, 75.0), (80.0, 110.0)] {
        if let Err(err) = state.add_segment(start, end) {
            warn!("skipping demo segment: {err}");
        }
    }
    state.add_audio_track(AudioTrackClip::new(AudioKind::Music, "Ambient bed", 0.8));
    state.add_audio_track(AudioTrackClip::new(AudioKind::Frequency, "528 Hz tone", 0.4));
    state
}
