use eframe::egui::{self, Rect, Ui, Vec2, vec2};

use super::super::TopologyApp;
use super::super::render_utils::{card_rect, screen_to_world};
use super::RenderableView;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 4.0;
const FIT_MARGIN: f32 = 48.0;

impl TopologyApp {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.camera.pan, self.camera.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.camera.zoom = (self.camera.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.camera.pan = pointer - rect.center() - (world_before * self.camera.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan += response.drag_delta();
        }
    }

    /// Centres the view and picks a zoom that shows every card.
    pub(in crate::app) fn fit_camera(&mut self, rect: Rect) {
        self.camera.fit_pending = false;
        let Some(view) = self.view.as_ref() else {
            return;
        };
        let Some(bounds) = world_bounds(view) else {
            self.camera.pan = Vec2::ZERO;
            self.camera.zoom = 1.0;
            return;
        };

        let available = (rect.size() - vec2(FIT_MARGIN, FIT_MARGIN) * 2.0).max(vec2(1.0, 1.0));
        let zoom = (available.x / bounds.width())
            .min(available.y / bounds.height())
            .clamp(MIN_ZOOM, 1.0);

        self.camera.zoom = zoom;
        self.camera.pan = -bounds.center().to_vec2() * zoom;
    }

    pub(in crate::app) fn hovered_card(
        &self,
        ui: &Ui,
        rect: Rect,
        view: &RenderableView,
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        let size = view.mode.card_size();
        view.nodes.iter().rposition(|node| {
            card_rect(rect, self.camera.pan, self.camera.zoom, node.position, size)
                .contains(pointer)
        })
    }
}

fn world_bounds(view: &RenderableView) -> Option<Rect> {
    let size = view.mode.card_size();
    view.nodes
        .iter()
        .map(|node| Rect::from_center_size(node.position.to_pos2(), size))
        .reduce(|bounds, card| bounds.union(card))
}
