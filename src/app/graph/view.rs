use std::collections::{HashMap, HashSet};

use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::kube::GroupKey;
use crate::layout::LayoutMode;
use crate::util::{plural, truncate_label};

use super::super::TopologyApp;
use super::super::render_utils::{
    GROUP_COLOR, blend_color, card_boundary_point, card_rect, dim_color, draw_background,
    kind_color,
};
use super::{NodeRole, RenderableView};

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

pub(in crate::app) fn fuzzy_match_score(
    matcher: &SkimMatcherV2,
    text: &str,
    query: &str,
) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn search_matches(view: &RenderableView, query: &str) -> Option<HashSet<usize>> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    Some(
        view.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| fuzzy_match_score(&matcher, &node.label, query).is_some())
            .map(|(index, _)| index)
            .collect(),
    )
}

fn empty_view_message(mode: LayoutMode) -> &'static str {
    match mode {
        LayoutMode::Overview => "No resources in this cluster.",
        LayoutMode::Detail => "This group has no resources.",
    }
}

fn draw_edge(painter: &Painter, start: Pos2, end: Pos2, stroke: Stroke, head_length: f32) {
    let delta = end - start;
    if delta.length_sq() <= 1.0 {
        return;
    }

    painter.line_segment([start, end], stroke);

    let direction = delta.normalized();
    let normal = vec2(-direction.y, direction.x);
    let base = end - direction * head_length;
    let half_width = head_length * 0.45;
    painter.line_segment([end, base + normal * half_width], stroke);
    painter.line_segment([end, base - normal * half_width], stroke);
}

impl TopologyApp {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if self.camera.fit_pending {
            self.fit_camera(rect);
        }

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        draw_background(&painter, rect, self.camera.pan, self.camera.zoom);

        let Some(view) = self.view.take() else {
            return;
        };

        if view.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                empty_view_message(view.mode),
                FontId::proportional(16.0),
                Color32::from_gray(190),
            );
            self.view = Some(view);
            return;
        }

        let pan = self.camera.pan;
        let zoom = self.camera.zoom;
        let card_size = view.mode.card_size();
        let cards = view
            .nodes
            .iter()
            .map(|node| card_rect(rect, pan, zoom, node.position, card_size))
            .collect::<Vec<_>>();
        let index_by_id = view
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect::<HashMap<_, _>>();

        let matches = search_matches(&view, &self.search);
        let selected = self
            .nav
            .selected_node_id()
            .and_then(|id| index_by_id.get(id).copied());
        let hovered = self.hovered_card(ui, rect, &view);

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let zoom_sqrt = zoom.sqrt();
        for edge in &view.edges {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(edge.source.as_str()),
                index_by_id.get(edge.target.as_str()),
            ) else {
                continue;
            };

            let start = card_boundary_point(cards[source], cards[target].center());
            let end = card_boundary_point(cards[target], cards[source].center());
            if !rect.intersects(Rect::from_two_pos(start, end).expand(4.0)) {
                continue;
            }

            let touches_selection = selected.is_some_and(|index| index == source || index == target);
            let stroke = if touches_selection {
                Stroke::new((2.4 * zoom_sqrt).clamp(1.2, 4.0), SELECTED_COLOR)
            } else if selected.is_some() || matches.is_some() {
                Stroke::new(
                    (1.0 * zoom_sqrt).clamp(0.5, 2.0),
                    Color32::from_rgba_unmultiplied(90, 100, 112, 110),
                )
            } else {
                Stroke::new(
                    (1.4 * zoom_sqrt).clamp(0.7, 3.0),
                    Color32::from_rgba_unmultiplied(150, 160, 172, 200),
                )
            };
            draw_edge(&painter, start, end, stroke, (10.0 * zoom_sqrt).clamp(5.0, 14.0));
        }

        let mut selection_animating = false;
        for (index, node) in view.nodes.iter().enumerate() {
            let card = cards[index];
            if !rect.intersects(card) {
                continue;
            }

            let is_hovered = hovered == Some(index);
            let is_match = matches.as_ref().is_some_and(|found| found.contains(&index));
            let base_color = match &node.role {
                NodeRole::Group { .. } => GROUP_COLOR,
                NodeRole::Resource { kind, .. } => kind_color(kind),
            };
            let unselected = if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.25)
            } else if is_match {
                blend_color(base_color, MATCH_COLOR, 0.55)
            } else if matches.is_some() {
                dim_color(base_color, 0.38)
            } else if selected.is_some() {
                dim_color(base_color, 0.62)
            } else {
                base_color
            };

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("card-selection", node.id.as_str())),
                selected == Some(index),
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }

            let fill = blend_color(unselected, SELECTED_COLOR, selection_mix * 0.35);
            let rounding = 8.0 * zoom;
            painter.rect_filled(card, rounding, fill);
            painter.rect_stroke(
                card,
                rounding,
                Stroke::new(
                    1.0 + selection_mix * 1.8,
                    blend_color(
                        Color32::from_rgba_unmultiplied(15, 15, 15, 200),
                        SELECTED_COLOR,
                        selection_mix,
                    ),
                ),
                StrokeKind::Inside,
            );

            if zoom < 0.25 {
                continue;
            }

            match &node.role {
                NodeRole::Group { key, count } => {
                    let name_color = match key {
                        GroupKey::Global => Color32::from_gray(210),
                        GroupKey::Namespace(_) => Color32::from_gray(245),
                    };
                    painter.text(
                        card.center() - vec2(0.0, 12.0 * zoom),
                        Align2::CENTER_CENTER,
                        truncate_label(&node.label, 28),
                        FontId::proportional((17.0 * zoom).max(8.0)),
                        name_color,
                    );
                    painter.text(
                        card.center() + vec2(0.0, 16.0 * zoom),
                        Align2::CENTER_CENTER,
                        plural(*count, "resource", "resources"),
                        FontId::proportional((13.0 * zoom).max(7.0)),
                        Color32::from_gray(200),
                    );
                }
                NodeRole::Resource { kind, name } => {
                    painter.text(
                        card.center() - vec2(0.0, 10.0 * zoom),
                        Align2::CENTER_CENTER,
                        truncate_label(kind, 24),
                        FontId::proportional((11.0 * zoom).max(6.0)),
                        Color32::from_gray(215),
                    );
                    painter.text(
                        card.center() + vec2(0.0, 8.0 * zoom),
                        Align2::CENTER_CENTER,
                        truncate_label(name, 24),
                        FontId::proportional((14.0 * zoom).max(7.0)),
                        Color32::from_gray(248),
                    );
                }
            }
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(index) = hovered {
            let node = &view.nodes[index];
            let hint = match (&node.role, view.mode) {
                (NodeRole::Group { .. }, _) | (_, LayoutMode::Overview) => {
                    format!("{}  |  click to expand", node.label)
                }
                (NodeRole::Resource { .. }, LayoutMode::Detail) => node.id.clone(),
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                hint,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            let node_id = view.nodes[index].id.clone();
            self.nav.handle_click(&view, &node_id);
        }

        self.view = Some(view);
    }
}
