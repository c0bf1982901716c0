use crate::kube::{GroupKey, GroupSummary};

use super::graph::{NodeRole, RenderableView};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InspectionTab {
    #[default]
    Info,
    Manifest,
    Logs,
}

impl InspectionTab {
    pub const ALL: [Self; 3] = [Self::Info, Self::Manifest, Self::Logs];

    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Manifest => "Manifest",
            Self::Logs => "Logs",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub expanded_group: Option<GroupKey>,
    pub selected_node_id: Option<String>,
    pub active_tab: InspectionTab,
}

/// Owns which group is expanded, which node is selected and which
/// inspection tab is showing.
///
/// `revision` moves only when the expanded group changes, since that is all
/// the projected view depends on. `selection_epoch` moves whenever the
/// selection is replaced or cleared, and is what in-flight inspection
/// fetches are keyed on.
#[derive(Debug, Default)]
pub struct Navigation {
    state: NavigationState,
    revision: u64,
    selection_epoch: u64,
}

impl Navigation {
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection_epoch(&self) -> u64 {
        self.selection_epoch
    }

    pub fn expanded_group(&self) -> Option<&GroupKey> {
        self.state.expanded_group.as_ref()
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.state.selected_node_id.as_deref()
    }

    pub fn active_tab(&self) -> InspectionTab {
        self.state.active_tab
    }

    pub fn click_group(&mut self, group: GroupKey) {
        self.expand(group);
    }

    /// Entered without user input when the snapshot holds a single group.
    pub fn auto_expand(&mut self, group: GroupKey) {
        if self.state.expanded_group.is_none() {
            tracing::debug!(%group, "single group in snapshot, skipping overview");
            self.expand(group);
        }
    }

    /// Returns to the overview. Only offered while more than one group exists.
    pub fn click_back(&mut self, group_count: usize) -> bool {
        if group_count <= 1 || self.state.expanded_group.is_none() {
            return false;
        }

        self.state.expanded_group = None;
        self.clear_selection();
        self.revision += 1;
        true
    }

    pub fn click_node(&mut self, node_id: &str) {
        if self.state.expanded_group.is_none() {
            return;
        }

        self.state.selected_node_id = Some(node_id.to_owned());
        self.state.active_tab = InspectionTab::Info;
        self.selection_epoch += 1;
    }

    pub fn click_close(&mut self) {
        self.clear_selection();
    }

    /// Falls back to the overview when a refreshed snapshot no longer holds
    /// the expanded group. Returns true when navigation moved.
    pub fn leave_missing_group(&mut self, groups: &[GroupSummary]) -> bool {
        let Some(expanded) = self.state.expanded_group.as_ref() else {
            return false;
        };
        if groups.iter().any(|group| &group.key == expanded) {
            return false;
        }

        tracing::info!(group = %expanded, "expanded group left the snapshot, back to overview");
        self.state.expanded_group = None;
        self.clear_selection();
        self.revision += 1;
        true
    }

    pub fn select_tab(&mut self, tab: InspectionTab) -> bool {
        if self.state.selected_node_id.is_none() {
            return false;
        }

        self.state.active_tab = tab;
        true
    }

    /// Click callback for the rendered graph.
    pub fn handle_click(&mut self, view: &RenderableView, node_id: &str) {
        let Some(node) = view.node(node_id) else {
            return;
        };

        match &node.role {
            NodeRole::Group { key, .. } => self.click_group(key.clone()),
            NodeRole::Resource { .. } => self.click_node(node_id),
        }
    }

    fn expand(&mut self, group: GroupKey) {
        if self.state.expanded_group.as_ref() == Some(&group) {
            return;
        }

        self.state.expanded_group = Some(group);
        self.clear_selection();
        self.revision += 1;
    }

    fn clear_selection(&mut self) {
        self.state.active_tab = InspectionTab::Info;
        if self.state.selected_node_id.take().is_some() {
            self.selection_epoch += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::graph::{Projection, project};
    use crate::kube::testing::two_namespace_snapshot;

    fn default_group() -> GroupKey {
        GroupKey::Namespace("default".to_owned())
    }

    #[test]
    fn starts_in_overview_with_nothing_selected() {
        let navigation = Navigation::default();
        assert_eq!(navigation.state(), &NavigationState::default());
        assert_eq!(navigation.active_tab(), InspectionTab::Info);
    }

    #[test]
    fn clicking_a_group_expands_it_and_clears_selection() {
        let mut navigation = Navigation::default();
        navigation.click_group(default_group());
        navigation.click_node("pod:default:web-1");
        let epoch = navigation.selection_epoch();

        navigation.click_group(GroupKey::Namespace("kube-system".to_owned()));

        assert_eq!(
            navigation.expanded_group(),
            Some(&GroupKey::Namespace("kube-system".to_owned()))
        );
        assert_eq!(navigation.selected_node_id(), None);
        assert!(navigation.selection_epoch() > epoch);
    }

    #[test]
    fn selecting_a_node_resets_the_tab() {
        let mut navigation = Navigation::default();
        navigation.click_group(default_group());
        navigation.click_node("deployment:default:web");
        assert!(navigation.select_tab(InspectionTab::Logs));

        navigation.click_node("pod:default:web-1");

        assert_eq!(navigation.selected_node_id(), Some("pod:default:web-1"));
        assert_eq!(navigation.active_tab(), InspectionTab::Info);
    }

    #[test]
    fn tab_changes_need_a_selection() {
        let mut navigation = Navigation::default();
        navigation.click_group(default_group());

        assert!(!navigation.select_tab(InspectionTab::Manifest));
        assert_eq!(navigation.active_tab(), InspectionTab::Info);

        navigation.click_node("pod:default:web-1");
        let revision = navigation.revision();
        assert!(navigation.select_tab(InspectionTab::Manifest));
        assert_eq!(navigation.active_tab(), InspectionTab::Manifest);
        assert_eq!(navigation.revision(), revision);
    }

    #[test]
    fn closing_keeps_the_group_expanded() {
        let mut navigation = Navigation::default();
        navigation.click_group(default_group());
        navigation.click_node("pod:default:web-1");
        let epoch = navigation.selection_epoch();

        navigation.click_close();

        assert_eq!(navigation.expanded_group(), Some(&default_group()));
        assert_eq!(navigation.selected_node_id(), None);
        assert_eq!(navigation.selection_epoch(), epoch + 1);
    }

    #[test]
    fn back_to_overview_requires_several_groups() {
        let mut navigation = Navigation::default();
        navigation.auto_expand(default_group());

        assert!(!navigation.click_back(1));
        assert_eq!(navigation.expanded_group(), Some(&default_group()));

        navigation.click_node("pod:default:web-1");
        assert!(navigation.click_back(2));
        assert_eq!(navigation.state(), &NavigationState::default());
    }

    #[test]
    fn auto_expand_never_overrides_a_choice() {
        let mut navigation = Navigation::default();
        navigation.click_group(default_group());
        navigation.auto_expand(GroupKey::Global);
        assert_eq!(navigation.expanded_group(), Some(&default_group()));
    }

    #[test]
    fn selection_changes_leave_the_view_revision_alone() {
        let mut navigation = Navigation::default();
        navigation.click_group(default_group());
        let revision = navigation.revision();
        let epoch = navigation.selection_epoch();

        navigation.click_node("pod:default:web-1");
        navigation.click_node("deployment:default:web");
        navigation.click_close();
        navigation.click_close();

        assert_eq!(navigation.revision(), revision);
        assert_eq!(navigation.selection_epoch(), epoch + 3);
    }

    #[test]
    fn vanished_group_falls_back_to_overview() {
        let mut navigation = Navigation::default();
        navigation.click_group(GroupKey::Namespace("team-a".to_owned()));
        navigation.click_node("pod:team-a:api-0");
        let revision = navigation.revision();
        let epoch = navigation.selection_epoch();

        let remaining = two_namespace_snapshot().group_summaries();
        assert!(navigation.leave_missing_group(&remaining));

        assert_eq!(navigation.state(), &NavigationState::default());
        assert!(navigation.revision() > revision);
        assert!(navigation.selection_epoch() > epoch);
    }

    #[test]
    fn present_group_is_kept_on_refresh() {
        let mut navigation = Navigation::default();
        assert!(!navigation.leave_missing_group(&[]));

        navigation.click_group(default_group());
        let revision = navigation.revision();
        assert!(!navigation.leave_missing_group(&two_namespace_snapshot().group_summaries()));
        assert_eq!(navigation.expanded_group(), Some(&default_group()));
        assert_eq!(navigation.revision(), revision);
    }

    #[test]
    fn node_clicks_are_ignored_in_overview() {
        let mut navigation = Navigation::default();
        navigation.click_node("pod:default:web-1");
        assert_eq!(navigation.selected_node_id(), None);
        assert_eq!(navigation.selection_epoch(), 0);
    }

    #[test]
    fn graph_clicks_route_by_node_role() {
        let snapshot = two_namespace_snapshot();
        let mut navigation = Navigation::default();

        let Projection::View(overview) = project(&snapshot, navigation.state()) else {
            panic!("two namespaces render an overview");
        };
        let group_id = overview.nodes[0].id.clone();
        navigation.handle_click(&overview, &group_id);
        assert_eq!(navigation.expanded_group(), Some(&default_group()));

        let Projection::View(detail) = project(&snapshot, navigation.state()) else {
            panic!("expanded group renders a detail view");
        };
        navigation.handle_click(&detail, "pod:default:web-1");
        assert_eq!(navigation.selected_node_id(), Some("pod:default:web-1"));

        navigation.handle_click(&detail, "not-in-view");
        assert_eq!(navigation.selected_node_id(), Some("pod:default:web-1"));
    }
}
