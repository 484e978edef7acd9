//! Catout table renderers shared by the CLI and other front ends.

pub mod html_core;

#[cfg(feature = "excel")]
pub mod excel_core;

/// Fields shown before the image column
pub const LEADING_FIELDS: &[&str] = &["asset_id", "cataloger", "export_date", "tp_time"];

/// Fields shown after the image column
pub const TRAILING_FIELDS: &[&str] = &["name_normalized", "person_attributes"];

/// Value of a named table field
pub fn field_value(row: &crate::catout::CatoutRow, key: &str) -> String {
    match key {
        "asset_id" => row.asset_id.clone(),
        "cataid_id" => row.cataid_id.clone(),
        "cataloger" => row.cataloger.clone(),
        "export_date" => row.export_date.clone(),
        "tp_time" => row.tp_time.to_string(),
        "tf_label" => row.tf_label.clone(),
        "name_as_written" => row.name_as_written.clone(),
        "name_normalized" => row.name_normalized.clone(),
        "person_attributes" => row.person_attributes.clone(),
        "img_fname" => row.img_fname.clone(),
        _ => String::new(),
    }
}
