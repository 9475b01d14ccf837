/// Paints timeline draw lists with egui.
use eframe::egui;
use timeline_core::{DrawCommand, DrawList, Point, Rect, Rgba, TextAnchor};

pub fn color32(color: Rgba) -> egui::Color32 {
    let Rgba(r, g, b, a) = color;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

pub fn align(anchor: TextAnchor) -> egui::Align2 {
    match anchor {
        TextAnchor::LeftTop => egui::Align2::LEFT_TOP,
        TextAnchor::LeftCenter => egui::Align2::LEFT_CENTER,
        TextAnchor::CenterTop => egui::Align2::CENTER_TOP,
    }
}

/// Canvas coordinates are relative to the widget's top-left corner.
pub fn to_pos(origin: egui::Pos2, point: Point) -> egui::Pos2 {
    origin + egui::vec2(point.x as f32, point.y as f32)
}

pub fn to_rect(origin: egui::Pos2, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        to_pos(origin, timeline_core::pt(rect.x, rect.y)),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

pub fn paint(painter: &egui::Painter, origin: egui::Pos2, list: &DrawList) {
    for command in list.commands() {
        match command {
            DrawCommand::FillRect { rect, color } => {
                painter.rect_filled(to_rect(origin, *rect), 0.0, color32(*color));
            }
            DrawCommand::StrokeRect { rect, width, color } => {
                painter.rect_stroke(
                    to_rect(origin, *rect),
                    0.0,
                    egui::Stroke::new(*width as f32, color32(*color)),
                );
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                painter.line_segment(
                    [to_pos(origin, *from), to_pos(origin, *to)],
                    egui::Stroke::new(*width as f32, color32(*color)),
                );
            }
            DrawCommand::Polygon { points, color } => {
                let points = points.iter().map(|p| to_pos(origin, *p)).collect();
                painter.add(egui::Shape::convex_polygon(
                    points,
                    color32(*color),
                    egui::Stroke::NONE,
                ));
            }
            DrawCommand::Text {
                pos,
                text,
                size,
                color,
                anchor,
            } => {
                painter.text(
                    to_pos(origin, *pos),
                    align(*anchor),
                    text,
                    egui::FontId::proportional(*size as f32),
                    color32(*color),
                );
            }
        }
    }
}
