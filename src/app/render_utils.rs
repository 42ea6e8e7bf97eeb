use concept_atlas::{EdgeKind, NodeKind, Viewport};
use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2, vec2};

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

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

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

/// Outline of the layout bounds, inset by the node margin.
pub(super) fn draw_bounds(
    painter: &Painter,
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    viewport: Viewport,
    margin: f32,
) {
    let min = world_to_screen(rect, pan, zoom, viewport, vec2(margin, margin));
    let max = world_to_screen(
        rect,
        pan,
        zoom,
        viewport,
        vec2(viewport.width() - margin, viewport.height() - margin),
    );
    painter.rect_stroke(
        Rect::from_min_max(min, max),
        4.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 130, 145, 60)),
        StrokeKind::Inside,
    );
}

/// Layout coordinates are centered on the canvas; `pan` and `zoom` apply on top.
pub(super) fn world_to_screen(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    viewport: Viewport,
    world: Vec2,
) -> Pos2 {
    let offset = world - viewport.center();
    rect.center() + pan + offset * zoom
}

pub(super) fn screen_to_world(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    viewport: Viewport,
    screen: Pos2,
) -> Vec2 {
    let offset = (screen - rect.center() - pan) / zoom;
    viewport.center() + offset
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Concept => Color32::from_rgb(86, 156, 214),
        NodeKind::Theorem => Color32::from_rgb(197, 134, 192),
        NodeKind::Problem => Color32::from_rgb(106, 176, 112),
    }
}

pub(super) fn edge_stroke(kind: EdgeKind, zoom: f32, highlighted: bool) -> Stroke {
    let zoom_sqrt = zoom.sqrt();
    let (width, color) = match kind {
        EdgeKind::Prerequisite => (1.6, Color32::from_rgba_unmultiplied(150, 160, 175, 200)),
        EdgeKind::Related => (1.0, Color32::from_rgba_unmultiplied(241, 146, 94, 170)),
        EdgeKind::Subconcept => (1.3, Color32::from_rgba_unmultiplied(120, 200, 140, 180)),
    };
    if highlighted {
        Stroke::new(
            (width * 1.8 * zoom_sqrt).clamp(1.2, 5.0),
            blend_color(color, Color32::from_rgb(246, 206, 104), 0.6),
        )
    } else {
        Stroke::new((width * zoom_sqrt).clamp(0.6, 3.4), color)
    }
}
