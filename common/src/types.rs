//! Shared data model
//!
//! Types read from the rendering surface and written to export files:
//! - Row / FilterToggle / SceneToggles: inputs of the visibility filter
//! - EditRecord / ExportBundle: the exported catalog data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label substring marking a row as a subsample placeholder
pub const SUBSAMPLE_SENTINEL: &str = " - - -";

/// Toggle that additionally gates subsample placeholder rows
pub const SUBSAMPLE_TOGGLE: &str = "scene subsample";

/// One annotated item as read from the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Category key (`data-scenetype`)
    pub scene_type: String,
    /// Displayed label (`data-label`), may carry the subsample sentinel
    pub label: String,
    /// Correlation key shared with the row's fragments; visaid rows have none
    pub time_position: Option<u64>,
    /// Marked for export by the user
    pub engaged: bool,
}

impl Row {
    pub fn new(scene_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            scene_type: scene_type.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_time_position(mut self, time_position: u64) -> Self {
        self.time_position = Some(time_position);
        self
    }

    pub fn engaged(mut self, engaged: bool) -> Self {
        self.engaged = engaged;
        self
    }

    pub fn is_subsample(&self) -> bool {
        self.label.contains(SUBSAMPLE_SENTINEL)
    }
}

/// A category checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterToggle {
    pub category_key: String,
    pub checked: bool,
}

impl FilterToggle {
    pub fn new(category_key: impl Into<String>, checked: bool) -> Self {
        Self {
            category_key: category_key.into(),
            checked,
        }
    }
}

/// Category key -> checked, rebuilt from the checkboxes on every change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneToggles(BTreeMap<String, bool>);

impl SceneToggles {
    /// Later toggles with the same key win, as they do when the page
    /// writes them into a plain object.
    pub fn from_toggles<'a>(toggles: impl IntoIterator<Item = &'a FilterToggle>) -> Self {
        Self(
            toggles
                .into_iter()
                .map(|t| (t.category_key.clone(), t.checked))
                .collect(),
        )
    }

    /// Absent keys read as unchecked
    pub fn is_checked(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, checked: bool) {
        self.0.insert(key.into(), checked);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for SceneToggles {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Two-valued display class written to rows and catalog-only elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayState {
    Shown,
    Hidden,
}

impl DisplayState {
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            DisplayState::Shown
        } else {
            DisplayState::Hidden
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, DisplayState::Shown)
    }

    /// Class added for this state
    pub fn class_name(&self) -> &'static str {
        match self {
            DisplayState::Shown => "shown",
            DisplayState::Hidden => "hidden",
        }
    }

    /// Class removed for this state
    pub fn opposite_class_name(&self) -> &'static str {
        match self {
            DisplayState::Shown => "hidden",
            DisplayState::Hidden => "shown",
        }
    }
}

/// Item exported by the catalog (richest) page variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub tp_time: u64,
    #[serde(default)]
    pub tp_id: String,
    pub tf_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aid_text: Option<String>,
    pub etd_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_fname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_data_uri: Option<String>,
}

/// Item exported by the simpler page variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicItem {
    pub tp_id: String,
    pub text: String,
}

/// One exported unit per engaged row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditRecord {
    Catalog(CatalogItem),
    Basic(BasicItem),
}

impl EditRecord {
    pub fn tp_id(&self) -> &str {
        match self {
            EditRecord::Catalog(item) => &item.tp_id,
            EditRecord::Basic(item) => &item.tp_id,
        }
    }

    /// User-edited text of the record
    pub fn edited_text(&self) -> &str {
        match self {
            EditRecord::Catalog(item) => &item.etd_text,
            EditRecord::Basic(item) => &item.text,
        }
    }

    pub fn as_catalog(&self) -> Option<&CatalogItem> {
        match self {
            EditRecord::Catalog(item) => Some(item),
            EditRecord::Basic(_) => None,
        }
    }
}

/// Top-level export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub asset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cataid_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cataid_ver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cataloger: Option<String>,
    pub export_date: String,
    #[serde(default)]
    pub editor_items: Vec<EditRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mmif_metadata: Option<serde_json::Value>,
}

impl ExportBundle {
    /// Pretty-printed JSON with 2-space indentation
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
