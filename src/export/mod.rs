//! Catout tables and bundle files on disk

use crate::cli::TableFormat;
use crate::error::{CataidError, Result};
use cataid_common::export::html_core::render_table_html;
use cataid_common::surface::DeliveredFile;
use cataid_common::{parse_catout, tablify_bundle, CatoutRow};
use std::path::{Path, PathBuf};

fn output_path_for_format(output: &Path, default_name: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(Path::new(default_name).with_extension(extension))
    } else {
        output.with_extension(extension)
    }
}

/// Reads every catout file into table rows.
///
/// Files that cannot be read or parsed are reported and skipped.
pub fn load_rows(paths: &[PathBuf]) -> Vec<CatoutRow> {
    let mut rows = Vec::new();

    for path in paths {
        let bundle = std::fs::read_to_string(path)
            .map_err(CataidError::from)
            .and_then(|json| parse_catout(&json).map_err(CataidError::from));
        match bundle {
            Ok(bundle) => {
                let table = tablify_bundle(&bundle);
                tracing::debug!(path = %path.display(), rows = table.len(), "catout loaded");
                rows.extend(table);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable catout file");
            }
        }
    }

    rows
}

/// Writes the review table; returns the files written
pub fn write_table(
    rows: &[CatoutRow],
    format: TableFormat,
    output: &Path,
    default_name: &str,
    image_height_px: u32,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, TableFormat::Html | TableFormat::Both) {
        let path = output_path_for_format(output, default_name, "html");
        std::fs::write(&path, render_table_html(rows, image_height_px))?;
        written.push(path);
    }

    if matches!(format, TableFormat::Excel | TableFormat::Both) {
        let path = output_path_for_format(output, default_name, "xlsx");
        let bytes = cataid_common::export::excel_core::generate_table_excel(rows, image_height_px)?;
        std::fs::write(&path, bytes)?;
        written.push(path);
    }

    Ok(written)
}

/// Writes delivered export files into `dir`, creating it if needed
pub fn write_delivered(files: &[DeliveredFile], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    files
        .iter()
        .map(|file| {
            let path = dir.join(&file.file_name);
            std::fs::write(&path, &file.contents)?;
            Ok(path)
        })
        .collect()
}
