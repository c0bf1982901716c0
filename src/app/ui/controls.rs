use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::layout::LayoutMode;

use super::super::TopologyApp;
use super::super::graph::{NodeRole, fuzzy_match_score};

const MAX_LISTED: usize = 200;

impl TopologyApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("name, kind or namespace")
                    .desired_width(f32::INFINITY),
            );
        });
        if !self.search.is_empty() && ui.small_button("Clear").clicked() {
            self.search.clear();
        }

        ui.separator();

        let Some(view) = self.view.as_ref() else {
            ui.label("No topology loaded yet.");
            return;
        };

        let heading = match view.mode {
            LayoutMode::Overview => "Namespaces",
            LayoutMode::Detail => "Resources",
        };
        ui.label(RichText::new(heading).strong());

        let query = self.search.trim();
        let matcher = SkimMatcherV2::default();
        let mut rows = view
            .nodes
            .iter()
            .filter_map(|node| {
                if query.is_empty() {
                    return Some((0, node));
                }
                fuzzy_match_score(&matcher, &node.label, query).map(|score| (score, node))
            })
            .collect::<Vec<_>>();
        if !query.is_empty() {
            rows.sort_by(|a, b| b.0.cmp(&a.0));
        }

        if rows.is_empty() {
            ui.label("Nothing matches the current search.");
            return;
        }

        let selected = self.nav.selected_node_id();
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("node_list_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (_, node) in rows.iter().take(MAX_LISTED) {
                    let text = match &node.role {
                        NodeRole::Group { count, .. } => format!("{}  ({count})", node.label),
                        NodeRole::Resource { .. } => node.label.clone(),
                    };
                    let is_selected = selected == Some(node.id.as_str());
                    if ui
                        .selectable_label(is_selected, text)
                        .on_hover_text(node.id.as_str())
                        .clicked()
                    {
                        clicked = Some(node.id.clone());
                    }
                }
                if rows.len() > MAX_LISTED {
                    ui.label(format!("... and {} more", rows.len() - MAX_LISTED));
                }
            });

        if let Some(node_id) = clicked
            && let Some(view) = self.view.as_ref()
        {
            self.nav.handle_click(view, &node_id);
        }
    }
}
