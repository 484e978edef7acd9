//! Catout read-back
//!
//! Turns exported catout bundles back into flat table rows for review.
//! Editor text that is not key-information data (`*`-prefixed) is read as
//! a name note: written name, normalized name, then attribute lines.

use crate::error::Result;
use crate::types::{EditRecord, ExportBundle};
use serde::Serialize;

/// One table row per exported catalog item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatoutRow {
    pub asset_id: String,
    pub cataid_id: String,
    pub cataid_ver: String,
    pub cataloger: String,
    /// Date part of the export timestamp
    pub export_date: String,
    pub tp_time: u64,
    pub tf_label: String,
    pub etd_text: String,
    pub name_as_written: String,
    pub name_normalized: String,
    pub person_attributes_list: Vec<String>,
    pub person_attributes: String,
    pub img_fname: String,
    pub img_data_uri: String,
}

/// Fields parsed from a name note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameNote {
    pub name_as_written: String,
    pub name_normalized: String,
    pub person_attributes_list: Vec<String>,
}

impl NameNote {
    pub fn person_attributes(&self) -> String {
        self.person_attributes_list.join(" ")
    }
}

/// Parses editor text; empty and `*`-prefixed text yield an empty note
pub fn parse_editor_text(text: &str) -> NameNote {
    if text.is_empty() || text.starts_with('*') {
        return NameNote::default();
    }

    let mut lines = text.split('\n').filter(|line| !line.is_empty());
    NameNote {
        name_as_written: lines.next().unwrap_or_default().to_string(),
        name_normalized: lines.next().unwrap_or_default().to_string(),
        person_attributes_list: lines.map(str::to_string).collect(),
    }
}

pub fn parse_catout(json: &str) -> Result<ExportBundle> {
    Ok(serde_json::from_str(json)?)
}

/// Flattens a bundle; items without catalog fields are skipped
pub fn tablify_bundle(bundle: &ExportBundle) -> Vec<CatoutRow> {
    let export_date = bundle
        .export_date
        .split('T')
        .next()
        .unwrap_or_default()
        .to_string();

    bundle
        .editor_items
        .iter()
        .filter_map(|record| match record {
            EditRecord::Catalog(item) => Some(item),
            EditRecord::Basic(item) => {
                tracing::warn!(asset = %bundle.asset_id, tp_id = %item.tp_id, "skipping item without catalog fields");
                None
            }
        })
        .map(|item| {
            let note = parse_editor_text(&item.etd_text);
            CatoutRow {
                asset_id: bundle.asset_id.clone(),
                cataid_id: bundle.cataid_id.clone().unwrap_or_default(),
                cataid_ver: bundle.cataid_ver.clone().unwrap_or_default(),
                cataloger: bundle.cataloger.clone().unwrap_or_default(),
                export_date: export_date.clone(),
                tp_time: item.tp_time,
                tf_label: item.tf_label.clone(),
                etd_text: item.etd_text.clone(),
                person_attributes: note.person_attributes(),
                name_as_written: note.name_as_written,
                name_normalized: note.name_normalized,
                person_attributes_list: note.person_attributes_list,
                img_fname: item
                    .img_fname
                    .clone()
                    .unwrap_or_else(|| format!("{}_{}.jpg", bundle.asset_id, item.tp_time)),
                img_data_uri: item.img_data_uri.clone().unwrap_or_default(),
            }
        })
        .collect()
}
