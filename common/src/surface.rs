//! Rendering surface contract
//!
//! The engine never touches a document directly. It reads attributes and
//! writes display classes through [`Surface`], so the same logic runs
//! against the live DOM (WASM), a saved page loaded by the CLI, or the
//! in-memory [`MemorySurface`] used in tests.

use crate::error::{Error, Result};
use crate::types::{DisplayState, FilterToggle, Row};
use std::collections::{BTreeMap, BTreeSet};

/// Element id of the view/catalog mode switch
pub const MODE_TOGGLE_ID: &str = "mode-toggle";

/// Element id of the export trigger
pub const EXPORT_BUTTON_ID: &str = "export-button";

/// Fragments correlated with a row by its time position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FragmentKind {
    /// `pre.editor-text` content
    EditorText,
    /// `data-tpid` of the editor text
    AnnotationId,
    /// `pre.aid-text` content
    OriginalText,
    /// `.img-fname` content
    ImageFilename,
    /// `src` of the row image
    ImageSource,
    /// `data-label` of the row
    Label,
}

impl FragmentKind {
    pub fn description(&self) -> &'static str {
        match self {
            FragmentKind::EditorText => "editor text",
            FragmentKind::AnnotationId => "annotation id",
            FragmentKind::OriginalText => "original text",
            FragmentKind::ImageFilename => "image filename",
            FragmentKind::ImageSource => "image",
            FragmentKind::Label => "label",
        }
    }
}

/// Page-level identity fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageField {
    AssetId,
    CataidId,
    CataidVersion,
    Cataloger,
}

impl PageField {
    pub fn element_id(&self) -> &'static str {
        match self {
            PageField::AssetId => "asset-id",
            PageField::CataidId => "cataid-id",
            PageField::CataidVersion => "cataid-ver",
            PageField::Cataloger => "cataloger",
        }
    }
}

/// Element id of the embedded metadata blob
pub const METADATA_ELEMENT_ID: &str = "mmif-metadata";

/// Read/write contract of a rendered viewer page
pub trait Surface {
    /// Every category checkbox, in document order
    fn toggles(&self) -> Vec<FilterToggle>;

    /// Every filterable row, in document order
    fn rows(&self) -> Vec<Row>;

    /// Writes one display state per row, same order as [`Surface::rows`]
    fn apply_row_display(&mut self, states: &[DisplayState]);

    /// Shows or hides every catalog-only element
    fn set_catalog_extras(&mut self, state: DisplayState);

    /// Switches every row between the narrow and the wide layout
    fn set_full_rows(&mut self, full: bool);

    /// Shows and enables, or hides and disables, the export trigger
    fn set_export_control(&mut self, state: DisplayState);

    /// Time positions that have an engagement toggle
    fn engage_toggles(&self) -> Vec<u64>;

    /// Flips the engaged state of every editor at `time_position`
    fn toggle_engaged(&mut self, time_position: u64);

    /// Raw (untrimmed) fragment correlated with `time_position`
    fn fragment(&self, time_position: u64, kind: FragmentKind) -> Option<String>;

    /// Raw (untrimmed) page identity field
    fn page_field(&self, field: PageField) -> Option<String>;

    /// Embedded metadata JSON text, if the page carries one
    fn metadata_blob(&self) -> Option<String>;

    fn has_element(&self, id: &str) -> bool;

    /// Hands a finished file to the user
    fn deliver(&mut self, file_name: &str, contents: &str) -> Result<()>;

    /// Shows a message to the user
    fn notify(&mut self, message: &str);
}

// ============================================
// In-memory surface
// ============================================

/// Row of a [`MemorySurface`] with the state a page would hold in classes
#[derive(Debug, Clone, Default)]
pub struct MemoryRow {
    pub row: Row,
    pub display: Option<DisplayState>,
    pub full_row: bool,
    pub has_engage_toggle: bool,
    pub fragments: BTreeMap<FragmentKind, String>,
}

impl MemoryRow {
    pub fn new(row: Row) -> Self {
        Self {
            row,
            ..Default::default()
        }
    }

    /// Adds an editor: editor text, annotation id and an engagement toggle
    pub fn with_editor(mut self, tp_id: &str, text: &str) -> Self {
        self.has_engage_toggle = true;
        self.fragments.insert(FragmentKind::AnnotationId, tp_id.to_string());
        self.fragments.insert(FragmentKind::EditorText, text.to_string());
        self
    }

    pub fn with_fragment(mut self, kind: FragmentKind, value: impl Into<String>) -> Self {
        self.fragments.insert(kind, value.into());
        self
    }
}

/// A file handed to [`Surface::deliver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredFile {
    pub file_name: String,
    pub contents: String,
}

/// Surface backed by plain data
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    pub toggles: Vec<FilterToggle>,
    pub rows: Vec<MemoryRow>,
    pub extras: Option<DisplayState>,
    pub export_control: Option<DisplayState>,
    pub page_fields: BTreeMap<PageField, String>,
    pub metadata: Option<String>,
    pub elements: BTreeSet<String>,
    pub delivered: Vec<DeliveredFile>,
    pub notices: Vec<String>,
    /// When set, deliveries fail with this reason
    pub delivery_failure: Option<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cataid page with both controls present
    pub fn cataid(asset_id: &str) -> Self {
        let mut surface = Self::default();
        surface.elements.insert(MODE_TOGGLE_ID.to_string());
        surface.elements.insert(EXPORT_BUTTON_ID.to_string());
        surface
            .page_fields
            .insert(PageField::AssetId, asset_id.to_string());
        surface
    }

    pub fn with_toggle(mut self, key: &str, checked: bool) -> Self {
        self.toggles.push(FilterToggle::new(key, checked));
        self
    }

    pub fn with_row(mut self, row: MemoryRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_page_field(mut self, field: PageField, value: &str) -> Self {
        self.page_fields.insert(field, value.to_string());
        self
    }

    pub fn with_metadata(mut self, json: &str) -> Self {
        self.metadata = Some(json.to_string());
        self
    }

    /// Sets every checkbox with `key`; returns false when none exists
    pub fn set_checked(&mut self, key: &str, checked: bool) -> bool {
        let mut found = false;
        for toggle in self.toggles.iter_mut().filter(|t| t.category_key == key) {
            toggle.checked = checked;
            found = true;
        }
        found
    }

    pub fn row_displays(&self) -> Vec<Option<DisplayState>> {
        self.rows.iter().map(|r| r.display).collect()
    }

    /// Labels of rows currently shown
    pub fn shown_labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.display == Some(DisplayState::Shown))
            .map(|r| r.row.label.as_str())
            .collect()
    }

    fn rows_at(&self, time_position: u64) -> impl Iterator<Item = &MemoryRow> + '_ {
        self.rows
            .iter()
            .filter(move |r| r.row.time_position == Some(time_position))
    }
}

impl Surface for MemorySurface {
    fn toggles(&self) -> Vec<FilterToggle> {
        self.toggles.clone()
    }

    fn rows(&self) -> Vec<Row> {
        self.rows.iter().map(|r| r.row.clone()).collect()
    }

    fn apply_row_display(&mut self, states: &[DisplayState]) {
        for (row, state) in self.rows.iter_mut().zip(states) {
            row.display = Some(*state);
        }
    }

    fn set_catalog_extras(&mut self, state: DisplayState) {
        self.extras = Some(state);
    }

    fn set_full_rows(&mut self, full: bool) {
        for row in &mut self.rows {
            row.full_row = full;
        }
    }

    fn set_export_control(&mut self, state: DisplayState) {
        if self.elements.contains(EXPORT_BUTTON_ID) {
            self.export_control = Some(state);
        }
    }

    fn engage_toggles(&self) -> Vec<u64> {
        self.rows
            .iter()
            .filter(|r| r.has_engage_toggle)
            .filter_map(|r| r.row.time_position)
            .collect()
    }

    fn toggle_engaged(&mut self, time_position: u64) {
        for row in self
            .rows
            .iter_mut()
            .filter(|r| r.row.time_position == Some(time_position))
        {
            row.row.engaged = !row.row.engaged;
        }
    }

    fn fragment(&self, time_position: u64, kind: FragmentKind) -> Option<String> {
        let row = self.rows_at(time_position).next()?;
        match kind {
            FragmentKind::Label => Some(row.row.label.clone()),
            _ => row.fragments.get(&kind).cloned(),
        }
    }

    fn page_field(&self, field: PageField) -> Option<String> {
        self.page_fields.get(&field).cloned()
    }

    fn metadata_blob(&self) -> Option<String> {
        self.metadata.clone()
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    fn deliver(&mut self, file_name: &str, contents: &str) -> Result<()> {
        if let Some(reason) = &self.delivery_failure {
            return Err(Error::Delivery {
                file_name: file_name.to_string(),
                reason: reason.clone(),
            });
        }
        self.delivered.push(DeliveredFile {
            file_name: file_name.to_string(),
            contents: contents.to_string(),
        });
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_row(tp: u64) -> MemoryRow {
        MemoryRow::new(Row::new("chyron", "chyron").with_time_position(tp))
            .with_editor(&format!("tp_{}", tp), "text")
    }

    #[test]
    fn test_toggle_engaged_flips_matching_rows_only() {
        let mut surface = MemorySurface::cataid("a")
            .with_row(editor_row(10))
            .with_row(editor_row(20));

        surface.toggle_engaged(10);
        let engaged: Vec<bool> = surface.rows().iter().map(|r| r.engaged).collect();
        assert_eq!(engaged, vec![true, false]);

        surface.toggle_engaged(10);
        assert!(surface.rows().iter().all(|r| !r.engaged));
    }

    #[test]
    fn test_fragment_label_comes_from_row() {
        let surface = MemorySurface::cataid("a").with_row(editor_row(10));
        assert_eq!(
            surface.fragment(10, FragmentKind::Label).as_deref(),
            Some("chyron")
        );
        assert_eq!(surface.fragment(10, FragmentKind::OriginalText), None);
        assert_eq!(surface.fragment(99, FragmentKind::Label), None);
    }

    #[test]
    fn test_engage_toggles_lists_editor_rows() {
        let surface = MemorySurface::cataid("a")
            .with_row(editor_row(10))
            .with_row(MemoryRow::new(Row::new("slate", "slate")))
            .with_row(editor_row(30));
        assert_eq!(surface.engage_toggles(), vec![10, 30]);
    }

    #[test]
    fn test_export_control_needs_element() {
        let mut surface = MemorySurface::new();
        surface.set_export_control(DisplayState::Shown);
        assert_eq!(surface.export_control, None);

        let mut surface = MemorySurface::cataid("a");
        surface.set_export_control(DisplayState::Shown);
        assert_eq!(surface.export_control, Some(DisplayState::Shown));
    }

    #[test]
    fn test_delivery_failure() {
        let mut surface = MemorySurface::cataid("a");
        surface.delivery_failure = Some("disk full".to_string());
        let err = surface.deliver("a_catout.json", "{}").unwrap_err();
        assert!(matches!(err, Error::Delivery { .. }));
        assert!(surface.delivered.is_empty());
    }

    #[test]
    fn test_set_checked_reports_unknown_key() {
        let mut surface = MemorySurface::new().with_toggle("slate", false);
        assert!(surface.set_checked("slate", true));
        assert!(surface.toggles[0].checked);
        assert!(!surface.set_checked("chyron", true));
    }
}
