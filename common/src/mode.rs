//! View / catalog mode

use crate::surface::Surface;
use crate::types::DisplayState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page mode; every page load starts in [`Mode::View`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    View,
    Catalog,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::View => Mode::Catalog,
            Mode::Catalog => Mode::View,
        }
    }

    pub fn is_catalog(&self) -> bool {
        matches!(self, Mode::Catalog)
    }

    /// Display state of catalog-only elements in this mode
    pub fn extras_display(&self) -> DisplayState {
        DisplayState::from_visible(self.is_catalog())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::View => write!(f, "view"),
            Mode::Catalog => write!(f, "catalog"),
        }
    }
}

/// Rewrites every element governed by the mode
pub fn apply_mode<S: Surface + ?Sized>(surface: &mut S, mode: Mode) {
    let display = mode.extras_display();
    surface.set_catalog_extras(display);
    surface.set_full_rows(mode.is_catalog());
    surface.set_export_control(display);
    tracing::debug!(%mode, "mode applied");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemoryRow, MemorySurface};
    use crate::types::Row;

    #[test]
    fn test_toggle_is_its_own_inverse() {
        for mode in [Mode::View, Mode::Catalog] {
            assert_eq!(mode.toggled().toggled(), mode);
            assert_ne!(mode.toggled(), mode);
        }
    }

    #[test]
    fn test_initial_mode_is_view() {
        assert_eq!(Mode::default(), Mode::View);
    }

    #[test]
    fn test_apply_catalog_then_view() {
        let mut surface = MemorySurface::cataid("a")
            .with_row(MemoryRow::new(Row::new("slate", "slate")))
            .with_row(MemoryRow::new(Row::new("chyron", "chyron")));

        apply_mode(&mut surface, Mode::Catalog);
        assert_eq!(surface.extras, Some(DisplayState::Shown));
        assert_eq!(surface.export_control, Some(DisplayState::Shown));
        assert!(surface.rows.iter().all(|r| r.full_row));

        apply_mode(&mut surface, Mode::View);
        assert_eq!(surface.extras, Some(DisplayState::Hidden));
        assert_eq!(surface.export_control, Some(DisplayState::Hidden));
        assert!(surface.rows.iter().all(|r| !r.full_row));
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Catalog).unwrap(), "\"catalog\"");
        assert_eq!(Mode::View.to_string(), "view");
    }
}
