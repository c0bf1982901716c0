use eframe::egui::{self, Color32, RichText, Ui};

use crate::kube::GroupKey;

use super::super::TopologyApp;
use super::super::inspect::{
    LOGS_NOT_APPLICABLE, LOGS_PENDING, LogView, MANIFEST_PENDING, ManifestView,
};
use super::super::navigation::InspectionTab;

const ERROR_COLOR: Color32 = Color32::from_rgb(235, 110, 100);

impl TopologyApp {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Selection Details");
            if self.nav.selected_node_id().is_some() && ui.small_button("Close").clicked() {
                self.nav.click_close();
            }
        });
        ui.add_space(6.0);

        let Some(node_id) = self.nav.selected_node_id().map(str::to_owned) else {
            match self.nav.expanded_group() {
                None => ui.label("Click a namespace card to see its resources."),
                Some(_) => ui.label("Select a resource from the graph or the list."),
            };
            return;
        };

        ui.horizontal(|ui| {
            for tab in InspectionTab::ALL {
                if ui
                    .selectable_label(self.nav.active_tab() == tab, tab.label())
                    .clicked()
                {
                    self.nav.select_tab(tab);
                }
            }
        });
        ui.separator();

        match self.nav.active_tab() {
            InspectionTab::Info => self.draw_info_tab(ui, &node_id),
            InspectionTab::Manifest => self.draw_manifest_tab(ui),
            InspectionTab::Logs => self.draw_logs_tab(ui),
        }
    }

    fn draw_info_tab(&self, ui: &mut Ui, node_id: &str) {
        let node = self
            .refresh
            .snapshot()
            .and_then(|snapshot| snapshot.node(node_id));

        let Some(node) = node else {
            ui.label(RichText::new("This resource is not in the latest snapshot.").italics());
            if self.inspector.selected_node_id() == Some(node_id)
                && let Some(identity) = self.inspector.identity()
            {
                if identity.is_unknown() {
                    ui.label("The resource id could not be decoded.");
                }
                ui.label(format!("Kind: {}", identity.kind));
                ui.label(format!("Name: {}", identity.name));
                if let Some(namespace) = identity.namespace() {
                    ui.label(format!("Namespace: {namespace}"));
                }
            }
            return;
        };

        ui.label(RichText::new(node.label()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        egui::Grid::new("info_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Kind");
                ui.label(node.kind.as_str());
                ui.end_row();

                ui.label("Name");
                ui.label(node.name.as_str());
                ui.end_row();

                ui.label("Namespace");
                match node.group_key() {
                    GroupKey::Namespace(namespace) => ui.label(namespace),
                    GroupKey::Global => ui.label(GroupKey::GLOBAL_LABEL),
                };
                ui.end_row();
            });

        ui.separator();
        ui.label(RichText::new("Labels").strong());
        if node.labels.is_empty() {
            ui.label("No labels.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("labels_scroll")
            .max_height(280.0)
            .show(ui, |ui| {
                for (key, value) in &node.labels {
                    ui.monospace(format!("{key}={value}"));
                }
            });
    }

    fn draw_manifest_tab(&self, ui: &mut Ui) {
        match self.inspector.manifest() {
            ManifestView::Idle | ManifestView::Pending => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(MANIFEST_PENDING);
                });
            }
            ManifestView::Failed(message) => {
                ui.label(RichText::new(message.as_str()).color(ERROR_COLOR));
            }
            ManifestView::Ready(manifest) => {
                egui::ScrollArea::both()
                    .id_salt("manifest_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.monospace(manifest.as_str());
                    });
            }
        }
    }

    fn draw_logs_tab(&self, ui: &mut Ui) {
        match self.inspector.logs() {
            LogView::Idle | LogView::Pending => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(LOGS_PENDING);
                });
            }
            LogView::NotApplicable => {
                ui.label(RichText::new(LOGS_NOT_APPLICABLE).italics());
            }
            LogView::Failed {
                message,
                updated_at,
            } => {
                ui.small(format!("Last updated {updated_at}"));
                ui.label(RichText::new(message.as_str()).color(ERROR_COLOR));
            }
            LogView::Lines { lines, updated_at } => {
                ui.small(format!("Last updated {updated_at}"));
                if lines.is_empty() {
                    ui.label("No log lines.");
                    return;
                }
                egui::ScrollArea::both()
                    .id_salt("logs_scroll")
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in lines {
                            ui.monospace(line.as_str());
                        }
                    });
            }
        }
    }
}
