use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use super::graph::kind_rank;

const KIND_PALETTE: [Color32; 10] = [
    Color32::from_rgb(132, 112, 214),
    Color32::from_rgb(71, 150, 226),
    Color32::from_rgb(64, 170, 196),
    Color32::from_rgb(72, 178, 150),
    Color32::from_rgb(104, 160, 230),
    Color32::from_rgb(98, 190, 112),
    Color32::from_rgb(226, 160, 74),
    Color32::from_rgb(214, 108, 146),
    Color32::from_rgb(150, 150, 160),
    Color32::from_rgb(118, 126, 140),
];

pub(super) const GROUP_COLOR: Color32 = Color32::from_rgb(58, 96, 140);

pub(super) fn kind_color(kind: &str) -> Color32 {
    KIND_PALETTE[kind_rank(kind).min(KIND_PALETTE.len() - 1)]
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (48.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 60));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Screen rectangle of a card centred on `world`.
pub(super) fn card_rect(rect: Rect, pan: Vec2, zoom: f32, world: Vec2, size: Vec2) -> Rect {
    Rect::from_center_size(world_to_screen(rect, pan, zoom, world), size * zoom)
}

/// Point where the segment from the centre of `card` towards `toward`
/// leaves the card.
pub(super) fn card_boundary_point(card: Rect, toward: Pos2) -> Pos2 {
    let center = card.center();
    let delta = toward - center;
    if delta.x.abs() <= f32::EPSILON && delta.y.abs() <= f32::EPSILON {
        return center;
    }

    let half = card.size() * 0.5;
    let scale_x = if delta.x.abs() > f32::EPSILON {
        half.x / delta.x.abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if delta.y.abs() > f32::EPSILON {
        half.y / delta.y.abs()
    } else {
        f32::INFINITY
    };

    center + delta * scale_x.min(scale_y).min(1.0)
}
