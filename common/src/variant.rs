//! Page variants
//!
//! The viewer pages come in two flavors. Visaid pages only filter rows;
//! cataid pages add catalog mode and an export. The export format differs
//! between the older `cataid_data` pages and the `catout` pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field subset and filename suffix of the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportVariant {
    /// tp_time, tp_id, tf_label, aid_text, etd_text, image fields
    #[default]
    Catout,
    /// tp_id and text only
    CataidData,
}

impl ExportVariant {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ExportVariant::Catout => "_catout.json",
            ExportVariant::CataidData => "_cataid_data.json",
        }
    }

    /// Export filename for an asset
    pub fn file_name(&self, asset_id: &str) -> String {
        format!("{}{}", asset_id, self.file_suffix())
    }
}

impl fmt::Display for ExportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportVariant::Catout => write!(f, "catout"),
            ExportVariant::CataidData => write!(f, "cataid-data"),
        }
    }
}

impl FromStr for ExportVariant {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "catout" => Ok(ExportVariant::Catout),
            "cataid-data" | "cataid_data" => Ok(ExportVariant::CataidData),
            other => Err(crate::Error::Config(format!("unknown export variant: {}", other))),
        }
    }
}

/// How a page is laid out and what it exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// CSS class of the filtered rows (without the dot)
    pub row_class: String,
    /// None for pages without catalog mode
    pub export: Option<ExportVariant>,
}

impl PageConfig {
    /// Plain visaid page: `.item` rows, no catalog mode
    pub fn visaid() -> Self {
        Self {
            row_class: "item".to_string(),
            export: None,
        }
    }

    /// Cataid page: `.itemrow` rows with editors and an export
    pub fn cataid(variant: ExportVariant) -> Self {
        Self {
            row_class: "itemrow".to_string(),
            export: Some(variant),
        }
    }

    pub fn has_catalog_mode(&self) -> bool {
        self.export.is_some()
    }

    pub fn row_selector(&self) -> String {
        format!(".{}", self.row_class)
    }

    /// Reads the `data-cataid-variant` marker: `visaid`, `catout`
    /// or `cataid-data`. Unmarked pages are treated as catout cataids.
    pub fn from_marker(marker: Option<&str>) -> crate::Result<Self> {
        match marker.map(str::trim) {
            None | Some("") => Ok(Self::cataid(ExportVariant::Catout)),
            Some("visaid") => Ok(Self::visaid()),
            Some(other) => Ok(Self::cataid(other.parse()?)),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::cataid(ExportVariant::default())
    }
}
