use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::kube::GroupKey;
use crate::util::format_clock;

use super::super::TopologyApp;

const ERROR_COLOR: Color32 = Color32::from_rgb(235, 110, 100);

impl TopologyApp {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let is_loading = self.refresh.is_loading();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("kube-atlas");
                    ui.separator();
                    ui.label(format!("cluster: {}", self.settings.cluster));
                    ui.label(format!("source: {}", self.settings.describe_source()));
                    if let Some(snapshot) = self.refresh.snapshot() {
                        ui.label(format!("nodes: {}", snapshot.node_count()));
                        ui.label(format!("edges: {}", snapshot.edge_count()));
                    }
                    ui.label(format!("groups: {}", self.groups.len()));
                    ui.separator();
                    self.draw_breadcrumb(ui);

                    if self.groups.len() > 1
                        && self.nav.expanded_group().is_some()
                        && ui.button("Back to overview").clicked()
                    {
                        self.nav.click_back(self.groups.len());
                    }

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        self.refresh.reload();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(refreshed_at) = self.refresh.refreshed_at() {
                            ui.label(format!("updated {}", format_clock(refreshed_at)));
                        }
                        if is_loading {
                            ui.spinner();
                        }
                    });
                });
            });

        if let Some(error) = self.refresh.error().map(str::to_owned) {
            egui::TopBottomPanel::top("error_banner")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(error).color(ERROR_COLOR));
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.refresh.dismiss_error();
                            }
                            if ui.add_enabled(!is_loading, egui::Button::new("Retry")).clicked() {
                                self.refresh.reload();
                            }
                        });
                    });
                });
        }

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
            if is_loading {
                let rect = ui.max_rect();
                ui.painter()
                    .rect_filled(rect, 0.0, Color32::from_black_alpha(110));
                ui.put(
                    egui::Rect::from_center_size(rect.center(), egui::vec2(220.0, 48.0)),
                    |ui: &mut egui::Ui| {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("Loading topology...").strong());
                        })
                        .response
                    },
                );
            }
        });
    }

    fn draw_breadcrumb(&self, ui: &mut egui::Ui) {
        match self.nav.expanded_group() {
            None => {
                ui.label(RichText::new("Overview").strong());
            }
            Some(group) => {
                if self.groups.len() > 1 {
                    ui.label("Overview ›");
                }
                let text = match group {
                    GroupKey::Global => group.to_string(),
                    GroupKey::Namespace(namespace) => format!("namespace {namespace}"),
                };
                ui.label(RichText::new(text).strong());
            }
        }
    }
}
