use std::sync::Arc;

use eframe::egui::{self, Context, Vec2};
use tokio::runtime::Handle;

use crate::kube::{GraphSnapshot, GroupSummary, ResourceSource};
use crate::settings::Settings;

mod graph;
mod inspect;
mod navigation;
mod refresh;
mod render_utils;
mod ui;

use graph::{Projection, RenderableView, project};
use inspect::Inspector;
use navigation::Navigation;
use refresh::RefreshCoordinator;

/// Wakes the UI thread after a background task delivered a result.
pub(crate) type Repaint = Arc<dyn Fn() + Send + Sync>;

pub struct TopologyApp {
    settings: Settings,
    refresh: RefreshCoordinator,
    inspector: Inspector,
    nav: Navigation,
    view: Option<RenderableView>,
    view_key: Option<ViewKey>,
    groups: Vec<GroupSummary>,
    camera: Camera,
    search: String,
}

/// Snapshot revision and navigation revision the current view was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ViewKey {
    snapshot: u64,
    navigation: u64,
}

struct Camera {
    pan: Vec2,
    zoom: f32,
    fit_pending: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            fit_pending: true,
        }
    }
}

impl TopologyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        source: Arc<dyn ResourceSource>,
        runtime: Handle,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let repaint: Repaint = Arc::new(move || ctx.request_repaint());

        let mut refresh = RefreshCoordinator::new(
            Arc::clone(&source),
            runtime.clone(),
            settings.refresh_interval,
            Arc::clone(&repaint),
        );
        refresh.start(settings.cluster.clone());

        let inspector = Inspector::new(
            source,
            runtime,
            settings.cluster.clone(),
            settings.log_refresh_interval,
            settings.log_tail,
            repaint,
        );

        Self {
            settings,
            refresh,
            inspector,
            nav: Navigation::default(),
            view: None,
            view_key: None,
            groups: Vec::new(),
            camera: Camera::default(),
            search: String::new(),
        }
    }

    /// Re-projects when either the snapshot or the navigation state moved.
    fn sync_view(&mut self) {
        let Some(snapshot) = self.refresh.snapshot().cloned() else {
            self.view = None;
            self.view_key = None;
            self.groups.clear();
            return;
        };

        let key = ViewKey {
            snapshot: self.refresh.revision(),
            navigation: self.nav.revision(),
        };
        if self.view_key == Some(key) {
            return;
        }

        let Some(view) = resolve_view(&snapshot, &mut self.nav) else {
            return;
        };

        tracing::debug!(
            mode = ?view.mode,
            nodes = view.nodes.len(),
            edges = view.edges.len(),
            "projected topology view"
        );

        let key = ViewKey {
            snapshot: key.snapshot,
            navigation: self.nav.revision(),
        };
        if needs_fit(self.view_key, key) {
            self.camera.fit_pending = true;
        }

        self.groups = snapshot.group_summaries();
        self.view = Some(view);
        self.view_key = Some(key);
    }

    fn retry(&mut self) {
        if self.refresh.snapshot().is_some() {
            self.refresh.reload();
        } else {
            self.refresh.start(self.settings.cluster.clone());
        }
    }

    fn draw_loading(ctx: &Context, cluster: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading(format!("Loading topology for {cluster}..."));
                ui.add_space(8.0);
                ui.spinner();
            });
        });
    }

    fn draw_failure(&mut self, ctx: &Context, error: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Failed to load cluster topology");
            ui.add_space(6.0);
            ui.label(error);
            ui.add_space(10.0);
            if ui.button("Retry").clicked() {
                self.retry();
            }
        });
    }
}

/// Projects `snapshot` for the current navigation. An expanded group the
/// snapshot no longer holds sends navigation back to the overview, and a
/// snapshot with a single group goes straight to that group's detail view.
fn resolve_view(snapshot: &GraphSnapshot, nav: &mut Navigation) -> Option<RenderableView> {
    nav.leave_missing_group(&snapshot.group_summaries());

    match project(snapshot, nav.state()) {
        Projection::View(view) => Some(view),
        Projection::AutoExpand(group) => {
            nav.auto_expand(group);
            match project(snapshot, nav.state()) {
                Projection::View(view) => Some(view),
                Projection::AutoExpand(group) => {
                    tracing::warn!(%group, "auto-expand did not settle");
                    None
                }
            }
        }
    }
}

/// The camera re-fits on the first view and whenever navigation moved;
/// snapshot refreshes alone keep it where the user left it.
fn needs_fit(previous: Option<ViewKey>, next: ViewKey) -> bool {
    previous.is_none_or(|previous| previous.navigation != next.navigation)
}

impl eframe::App for TopologyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.refresh.poll();
        self.inspector.poll();

        self.sync_view();
        self.inspector
            .sync_selection(self.nav.selection_epoch(), self.nav.selected_node_id());

        if self.view.is_some() {
            self.show(ctx);
            return;
        }

        match self.refresh.error().map(str::to_owned) {
            Some(error) if !self.refresh.is_loading() => self.draw_failure(ctx, &error),
            _ => Self::draw_loading(ctx, self.settings.cluster.as_str()),
        }
    }
}
