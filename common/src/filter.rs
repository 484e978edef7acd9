//! Visibility filter
//!
//! A row is shown when its scene type is checked. Subsample placeholder
//! rows (label containing [`SUBSAMPLE_SENTINEL`]) also need the
//! [`SUBSAMPLE_TOGGLE`] checkbox. Categories without a checkbox stay hidden.
//!
//! [`SUBSAMPLE_SENTINEL`]: crate::types::SUBSAMPLE_SENTINEL

use crate::surface::Surface;
use crate::types::{DisplayState, Row, SceneToggles, SUBSAMPLE_TOGGLE};

/// Shown/hidden counts of one filter pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilitySummary {
    pub shown: usize,
    pub hidden: usize,
}

pub fn is_visible(row: &Row, toggles: &SceneToggles) -> bool {
    toggles.is_checked(&row.scene_type)
        && (!row.is_subsample() || toggles.is_checked(SUBSAMPLE_TOGGLE))
}

pub fn compute_display(rows: &[Row], toggles: &SceneToggles) -> Vec<DisplayState> {
    rows.iter()
        .map(|row| DisplayState::from_visible(is_visible(row, toggles)))
        .collect()
}

/// Re-reads every checkbox and rewrites every row's display class
pub fn update_visibility<S: Surface + ?Sized>(surface: &mut S) -> VisibilitySummary {
    let toggles = SceneToggles::from_toggles(&surface.toggles());
    let rows = surface.rows();
    let states = compute_display(&rows, &toggles);
    surface.apply_row_display(&states);

    let shown = states.iter().filter(|s| s.is_shown()).count();
    let summary = VisibilitySummary {
        shown,
        hidden: states.len() - shown,
    };
    tracing::debug!(
        toggles = toggles.len(),
        shown = summary.shown,
        hidden = summary.hidden,
        "visibility updated"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemoryRow, MemorySurface};

    fn toggles(pairs: &[(&str, bool)]) -> SceneToggles {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_visible_iff_category_checked() {
        let t = toggles(&[("slate", true), ("chyron", false)]);
        assert!(is_visible(&Row::new("slate", "slate"), &t));
        assert!(!is_visible(&Row::new("chyron", "chyron"), &t));
    }

    #[test]
    fn test_unknown_category_is_hidden() {
        let t = toggles(&[("slate", true)]);
        assert!(!is_visible(&Row::new("credits", "credits"), &t));
        assert!(!is_visible(&Row::new("credits", "credits"), &SceneToggles::default()));
    }

    #[test]
    fn test_subsample_needs_both_toggles() {
        let row = Row::new("chyron", "chyron - - -");
        assert!(!is_visible(&row, &toggles(&[("chyron", true)])));
        assert!(!is_visible(&row, &toggles(&[("chyron", true), (SUBSAMPLE_TOGGLE, false)])));
        assert!(is_visible(&row, &toggles(&[("chyron", true), (SUBSAMPLE_TOGGLE, true)])));
        // the subsample toggle alone does not reveal a hidden category
        assert!(!is_visible(&row, &toggles(&[("chyron", false), (SUBSAMPLE_TOGGLE, true)])));
    }

    #[test]
    fn test_rule_holds_for_all_combinations() {
        let labels = ["x", "x - - -"];
        for category in [false, true] {
            for subsample in [false, true] {
                let t = toggles(&[("A", category), (SUBSAMPLE_TOGGLE, subsample)]);
                for label in labels {
                    let row = Row::new("A", label);
                    let expected = category && (!row.is_subsample() || subsample);
                    assert_eq!(is_visible(&row, &t), expected, "{:?} {:?}", t, label);
                }
            }
        }
    }

    #[test]
    fn test_mixed_rows_scenario() {
        let mut surface = MemorySurface::new()
            .with_toggle("A", true)
            .with_toggle("B", false)
            .with_row(MemoryRow::new(Row::new("A", "x")))
            .with_row(MemoryRow::new(Row::new("B", "y")))
            .with_row(MemoryRow::new(Row::new("A", "z - - -")));

        let summary = update_visibility(&mut surface);

        assert_eq!(surface.shown_labels(), vec!["x"]);
        assert_eq!(summary, VisibilitySummary { shown: 1, hidden: 2 });
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut surface = MemorySurface::new()
            .with_toggle("A", true)
            .with_toggle(SUBSAMPLE_TOGGLE, true)
            .with_row(MemoryRow::new(Row::new("A", "x")))
            .with_row(MemoryRow::new(Row::new("A", "x - - -")))
            .with_row(MemoryRow::new(Row::new("C", "c")));

        update_visibility(&mut surface);
        let first = surface.row_displays();
        update_visibility(&mut surface);
        assert_eq!(surface.row_displays(), first);
        assert_eq!(
            first,
            vec![
                Some(DisplayState::Shown),
                Some(DisplayState::Shown),
                Some(DisplayState::Hidden)
            ]
        );
    }

    #[test]
    fn test_update_follows_checkbox_change() {
        let mut surface = MemorySurface::new()
            .with_toggle("A", false)
            .with_row(MemoryRow::new(Row::new("A", "x")));

        update_visibility(&mut surface);
        assert!(surface.shown_labels().is_empty());

        surface.set_checked("A", true);
        update_visibility(&mut surface);
        assert_eq!(surface.shown_labels(), vec!["x"]);
    }
}
