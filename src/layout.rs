use eframe::egui::{Vec2, vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    Overview,
    Detail,
}

impl LayoutMode {
    pub fn density(self) -> f64 {
        match self {
            Self::Overview => 2.0,
            Self::Detail => 1.8,
        }
    }

    pub fn spacing(self) -> Vec2 {
        match self {
            Self::Overview => vec2(320.0, 200.0),
            Self::Detail => vec2(220.0, 120.0),
        }
    }

    /// Card footprint drawn for a node; always smaller than the spacing.
    pub fn card_size(self) -> Vec2 {
        match self {
            Self::Overview => vec2(240.0, 110.0),
            Self::Detail => vec2(190.0, 56.0),
        }
    }
}

pub fn grid_columns(count: usize, mode: LayoutMode) -> usize {
    // Rounding in `count * density` must not lift an exact square past its root.
    let root = ((count as f64) * mode.density()).sqrt();
    let columns = (root - 1e-9).ceil() as i64;
    if columns <= 0 { 4 } else { columns as usize }
}

/// Row-major grid placement. Positions line up with `node_ids` by index and
/// follow input order exactly.
pub fn grid_layout(node_ids: &[String], mode: LayoutMode) -> Vec<Vec2> {
    let n = node_ids.len();
    if n == 0 {
        return Vec::new();
    }

    let columns = grid_columns(n, mode);
    let spacing = mode.spacing();

    (0..n)
        .map(|index| {
            let col = index % columns;
            let row = index / columns;
            vec2(col as f32 * spacing.x, row as f32 * spacing.y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|index| format!("pod:default:web-{index}")).collect()
    }

    #[test]
    fn empty_input_has_no_positions() {
        assert!(grid_layout(&[], LayoutMode::Overview).is_empty());
    }

    #[test]
    fn column_count_follows_density() {
        assert_eq!(grid_columns(1, LayoutMode::Overview), 2);
        assert_eq!(grid_columns(2, LayoutMode::Overview), 2);
        assert_eq!(grid_columns(8, LayoutMode::Overview), 4);
        assert_eq!(grid_columns(10, LayoutMode::Detail), 5);
        assert_eq!(grid_columns(11, LayoutMode::Detail), 5);
        assert_eq!(grid_columns(14, LayoutMode::Detail), 6);
    }

    #[test]
    fn exact_squares_keep_their_root_as_column_count() {
        for (count, columns) in [(8, 4), (18, 6), (32, 8), (50, 10), (200, 20), (1250, 50)] {
            assert_eq!(grid_columns(count, LayoutMode::Overview), columns, "overview {count}");
        }
        for (count, columns) in [(5, 3), (20, 6), (45, 9), (80, 12), (245, 21), (1445, 51)] {
            assert_eq!(grid_columns(count, LayoutMode::Detail), columns, "detail {count}");
        }
        assert_eq!(grid_columns(9, LayoutMode::Overview), 5);
        assert_eq!(grid_columns(6, LayoutMode::Detail), 4);
    }

    #[test]
    fn fills_rows_left_to_right_in_input_order() {
        let positions = grid_layout(&ids(5), LayoutMode::Detail);
        let spacing = LayoutMode::Detail.spacing();

        // 5 * 1.8 = 9 -> 3 columns
        assert_eq!(
            positions,
            vec![
                vec2(0.0, 0.0),
                vec2(spacing.x, 0.0),
                vec2(spacing.x * 2.0, 0.0),
                vec2(0.0, spacing.y),
                vec2(spacing.x, spacing.y),
            ]
        );
    }

    #[test]
    fn layout_is_deterministic_and_collision_free() {
        for mode in [LayoutMode::Overview, LayoutMode::Detail] {
            for count in [1, 2, 3, 7, 40, 333] {
                let input = ids(count);
                let first = grid_layout(&input, mode);
                let second = grid_layout(&input, mode);
                assert_eq!(first, second);
                assert_eq!(first.len(), count);

                let distinct = first
                    .iter()
                    .map(|position| (position.x.to_bits(), position.y.to_bits()))
                    .collect::<HashSet<_>>();
                assert_eq!(distinct.len(), count);
            }
        }
    }

    #[test]
    fn overview_spacing_is_wider_than_detail() {
        let overview = LayoutMode::Overview.spacing();
        let detail = LayoutMode::Detail.spacing();
        assert!(overview.x > detail.x && overview.y > detail.y);

        for mode in [LayoutMode::Overview, LayoutMode::Detail] {
            assert!(mode.card_size().x < mode.spacing().x);
            assert!(mode.card_size().y < mode.spacing().y);
        }
    }
}
