//! Edit collector
//!
//! Gathers every engaged row into an [`ExportBundle`] and delivers it as a
//! pretty-printed JSON file named `<asset_id><suffix>`.
//!
//! Records follow the document order of the engaged rows. Fragments are
//! looked up once per time position and bundled into a [`CorrelatedItem`].
//! A missing required fragment aborts the whole export, so a partial file
//! is never delivered.
//!
//! Trimming differs by field: editor text keeps its leading whitespace and
//! loses only the trailing side. Reference text, filenames, labels and page
//! fields are trimmed on both sides. Files exported earlier depend on this.

use crate::error::{Error, Result};
use crate::surface::{FragmentKind, PageField, Surface};
use crate::types::{BasicItem, CatalogItem, EditRecord, ExportBundle, Row};
use crate::variant::ExportVariant;
use std::collections::HashMap;

/// Everything one engaged time position contributes to a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelatedItem {
    pub time_position: u64,
    pub annotation_id: String,
    pub editor_text: String,
    pub label: Option<String>,
    pub original_text: Option<String>,
    pub image_filename: Option<String>,
    pub image_source: Option<String>,
}

/// Result of a delivered export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub file_name: String,
    pub item_count: usize,
}

/// Time positions of engaged rows, in document order.
///
/// An engaged row without a time position fails the whole export.
pub fn engaged_positions(rows: &[Row]) -> Result<Vec<u64>> {
    rows.iter()
        .filter(|row| row.engaged)
        .map(|row| {
            row.time_position.ok_or_else(|| Error::MissingTimePosition {
                label: row.label.clone(),
            })
        })
        .collect()
}

fn required<S: Surface + ?Sized>(surface: &S, time_position: u64, kind: FragmentKind) -> Result<String> {
    surface
        .fragment(time_position, kind)
        .ok_or(Error::MissingElement {
            time_position,
            fragment: kind.description(),
        })
}

fn correlate_one<S: Surface + ?Sized>(
    surface: &S,
    time_position: u64,
    variant: ExportVariant,
) -> Result<CorrelatedItem> {
    let annotation_id = required(surface, time_position, FragmentKind::AnnotationId)?;
    let editor_text = required(surface, time_position, FragmentKind::EditorText)?;

    let item = match variant {
        ExportVariant::CataidData => CorrelatedItem {
            time_position,
            annotation_id,
            editor_text,
            ..Default::default()
        },
        ExportVariant::Catout => CorrelatedItem {
            time_position,
            annotation_id,
            editor_text,
            label: Some(required(surface, time_position, FragmentKind::Label)?),
            original_text: surface.fragment(time_position, FragmentKind::OriginalText),
            image_filename: surface.fragment(time_position, FragmentKind::ImageFilename),
            image_source: surface.fragment(time_position, FragmentKind::ImageSource),
        },
    };
    Ok(item)
}

/// Looks up the fragments of every position, each position once
pub fn correlate<S: Surface + ?Sized>(
    surface: &S,
    positions: &[u64],
    variant: ExportVariant,
) -> Result<Vec<CorrelatedItem>> {
    let mut by_position: HashMap<u64, CorrelatedItem> = HashMap::new();
    let mut items = Vec::with_capacity(positions.len());

    for &time_position in positions {
        let item = match by_position.get(&time_position) {
            Some(item) => item.clone(),
            None => {
                let item = correlate_one(surface, time_position, variant)?;
                by_position.insert(time_position, item.clone());
                item
            }
        };
        items.push(item);
    }

    Ok(items)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Applies the variant's field subset and trimming rules
pub fn build_record(item: CorrelatedItem, variant: ExportVariant) -> EditRecord {
    let edited = item.editor_text.trim_end().to_string();
    match variant {
        ExportVariant::CataidData => EditRecord::Basic(BasicItem {
            tp_id: item.annotation_id.trim().to_string(),
            text: edited,
        }),
        ExportVariant::Catout => EditRecord::Catalog(CatalogItem {
            tp_time: item.time_position,
            tp_id: item.annotation_id.trim().to_string(),
            tf_label: trimmed(item.label).unwrap_or_default(),
            aid_text: trimmed(item.original_text),
            etd_text: edited,
            img_fname: trimmed(item.image_filename),
            img_data_uri: trimmed(item.image_source),
        }),
    }
}

/// Page field trimmed on both sides; empty counts as absent
pub fn page_text<S: Surface + ?Sized>(surface: &S, field: PageField) -> Option<String> {
    surface
        .page_field(field)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses the embedded metadata blob without interpreting it
pub fn read_metadata<S: Surface + ?Sized>(surface: &S) -> Result<Option<serde_json::Value>> {
    match surface.metadata_blob() {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(&text)
            .map(Some)
            .map_err(Error::MalformedMetadata),
        _ => Ok(None),
    }
}

/// Assembles the bundle without delivering it
pub fn collect_bundle<S: Surface + ?Sized>(
    surface: &S,
    variant: ExportVariant,
    export_date: String,
) -> Result<ExportBundle> {
    let asset_id = page_text(surface, PageField::AssetId)
        .ok_or(Error::MissingPageField(PageField::AssetId.element_id()))?;

    let positions = engaged_positions(&surface.rows())?;
    if positions.is_empty() {
        return Err(Error::NoEngagedItems);
    }

    let editor_items: Vec<EditRecord> = correlate(surface, &positions, variant)?
        .into_iter()
        .map(|item| build_record(item, variant))
        .collect();

    let bundle = match variant {
        ExportVariant::CataidData => ExportBundle {
            asset_id,
            cataid_id: None,
            cataid_ver: None,
            cataloger: None,
            export_date,
            editor_items,
            mmif_metadata: None,
        },
        ExportVariant::Catout => ExportBundle {
            asset_id,
            cataid_id: page_text(surface, PageField::CataidId),
            cataid_ver: page_text(surface, PageField::CataidVersion),
            cataloger: page_text(surface, PageField::Cataloger),
            export_date,
            editor_items,
            mmif_metadata: read_metadata(surface)?,
        },
    };
    Ok(bundle)
}

/// Collects, serializes and delivers the export file
pub fn export<S: Surface + ?Sized>(
    surface: &mut S,
    variant: ExportVariant,
    export_date: String,
) -> Result<ExportOutcome> {
    let bundle = collect_bundle(&*surface, variant, export_date)?;
    let json = bundle.to_json()?;
    let file_name = variant.file_name(&bundle.asset_id);

    surface.deliver(&file_name, &json)?;

    tracing::info!(
        file = %file_name,
        items = bundle.editor_items.len(),
        "export delivered"
    );
    Ok(ExportOutcome {
        file_name,
        item_count: bundle.editor_items.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemoryRow, MemorySurface};

    const DATE: &str = "2025-06-01T12:00:00Z";

    fn editor_row(tp: u64, label: &str, text: &str) -> MemoryRow {
        MemoryRow::new(Row::new(label, label).with_time_position(tp))
            .with_editor(&format!("v_0:tp_{}", tp), text)
    }

    fn engage(surface: &mut MemorySurface, positions: &[u64]) {
        for &tp in positions {
            surface.toggle_engaged(tp);
        }
    }

    #[test]
    fn test_editor_text_trimmed_on_trailing_side_only() {
        let mut surface = MemorySurface::cataid("asset")
            .with_row(editor_row(10, "A", "hello  "))
            .with_row(editor_row(20, "A", "  indented\n\n"));
        engage(&mut surface, &[10, 20]);

        let bundle = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap();
        let first = bundle.editor_items[0].as_catalog().unwrap();
        assert_eq!(first.tp_time, 10);
        assert_eq!(first.etd_text, "hello");
        assert_eq!(bundle.editor_items[1].edited_text(), "  indented");
    }

    #[test]
    fn test_reference_fields_trimmed_on_both_sides() {
        let mut surface = MemorySurface::cataid("  asset  ")
            .with_page_field(PageField::Cataloger, "  J. Doe \n")
            .with_row(
                editor_row(10, "chyron", "x")
                    .with_fragment(FragmentKind::OriginalText, "\n  Jane Smith\n")
                    .with_fragment(FragmentKind::ImageFilename, " asset_10.jpg\n")
                    .with_fragment(FragmentKind::ImageSource, "data:image/jpeg;base64,AAAA"),
            );
        engage(&mut surface, &[10]);

        let bundle = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap();
        assert_eq!(bundle.asset_id, "asset");
        assert_eq!(bundle.cataloger.as_deref(), Some("J. Doe"));
        let item = bundle.editor_items[0].as_catalog().unwrap();
        assert_eq!(item.aid_text.as_deref(), Some("Jane Smith"));
        assert_eq!(item.img_fname.as_deref(), Some("asset_10.jpg"));
        assert_eq!(item.img_data_uri.as_deref(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!(item.tf_label, "chyron");
    }

    #[test]
    fn test_records_follow_document_order() {
        let mut surface = MemorySurface::cataid("asset")
            .with_row(editor_row(300, "A", "c"))
            .with_row(editor_row(100, "A", "a"))
            .with_row(editor_row(200, "A", "b"));
        engage(&mut surface, &[200, 300, 100]);

        let bundle = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap();
        let order: Vec<&str> = bundle.editor_items.iter().map(|r| r.edited_text()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_engaged_row_without_time_position_fails_export() {
        let mut surface = MemorySurface::cataid("asset")
            .with_row(editor_row(10, "chyron", "kept"))
            .with_row(MemoryRow::new(Row::new("credits", "credits").engaged(true)));
        engage(&mut surface, &[10]);

        let err = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap_err();
        assert!(matches!(err, Error::MissingTimePosition { ref label } if label == "credits"));

        let err = export(&mut surface, ExportVariant::Catout, DATE.to_string()).unwrap_err();
        assert!(matches!(err, Error::MissingTimePosition { .. }));
        assert!(surface.delivered.is_empty());
    }

    #[test]
    fn test_only_unpositioned_engaged_rows_is_not_empty_export() {
        let surface = MemorySurface::cataid("asset")
            .with_row(MemoryRow::new(Row::new("chyron", "chyron").engaged(true)));
        let err = collect_bundle(&surface, ExportVariant::CataidData, DATE.to_string()).unwrap_err();
        assert!(matches!(err, Error::MissingTimePosition { .. }));
    }

    #[test]
    fn test_count_matches_engaged_rows() {
        let mut surface = MemorySurface::cataid("asset");
        for tp in 1..=6 {
            surface.rows.push(editor_row(tp * 10, "A", "t"));
        }
        engage(&mut surface, &[10, 30, 40, 60]);
        engage(&mut surface, &[40]);

        let engaged = surface.rows().iter().filter(|r| r.engaged).count();
        let bundle = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap();
        assert_eq!(bundle.editor_items.len(), engaged);
        assert_eq!(engaged, 3);
    }

    #[test]
    fn test_no_engaged_items() {
        let surface = MemorySurface::cataid("asset").with_row(editor_row(10, "A", "t"));
        let err = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap_err();
        assert!(matches!(err, Error::NoEngagedItems));
    }

    #[test]
    fn test_missing_editor_text_aborts_export() {
        let mut row = editor_row(10, "A", "t");
        row.fragments.remove(&FragmentKind::EditorText);
        let mut surface = MemorySurface::cataid("asset")
            .with_row(editor_row(5, "A", "ok"))
            .with_row(row);
        engage(&mut surface, &[5, 10]);

        let err = export(&mut surface, ExportVariant::Catout, DATE.to_string()).unwrap_err();
        match err {
            Error::MissingElement { time_position, fragment } => {
                assert_eq!(time_position, 10);
                assert_eq!(fragment, "editor text");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(surface.delivered.is_empty());
    }

    #[test]
    fn test_missing_asset_id() {
        let mut surface = MemorySurface::new().with_row(editor_row(10, "A", "t"));
        engage(&mut surface, &[10]);
        let err = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap_err();
        assert!(matches!(err, Error::MissingPageField("asset-id")));
    }

    #[test]
    fn test_metadata_passthrough_keeps_key_order() {
        let mut surface = MemorySurface::cataid("asset")
            .with_metadata(r#"{"zeta": 1, "alpha": {"b": 2, "a": [3]}}"#)
            .with_row(editor_row(10, "A", "t"));
        engage(&mut surface, &[10]);

        let bundle = collect_bundle(&surface, ExportVariant::Catout, DATE.to_string()).unwrap();
        let metadata = bundle.mmif_metadata.expect("metadata");
        let compact = serde_json::to_string(&metadata).unwrap();
        assert_eq!(compact, r#"{"zeta":1,"alpha":{"b":2,"a":[3]}}"#);
    }

    #[test]
    fn test_malformed_metadata() {
        let mut surface = MemorySurface::cataid("asset")
            .with_metadata("{not json")
            .with_row(editor_row(10, "A", "t"));
        engage(&mut surface, &[10]);

        let err = export(&mut surface, ExportVariant::Catout, DATE.to_string()).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)));
        assert!(surface.delivered.is_empty());
    }

    #[test]
    fn test_basic_variant_exports_id_and_text() {
        let mut surface = MemorySurface::cataid("asset")
            .with_page_field(PageField::Cataloger, "ignored")
            .with_metadata("{broken")
            .with_row(editor_row(10, "A", "hello  "));
        engage(&mut surface, &[10]);

        let outcome = export(&mut surface, ExportVariant::CataidData, DATE.to_string()).unwrap();
        assert_eq!(outcome.file_name, "asset_cataid_data.json");
        assert_eq!(outcome.item_count, 1);

        let value: serde_json::Value =
            serde_json::from_str(&surface.delivered[0].contents).unwrap();
        assert_eq!(value["editor_items"][0]["tp_id"], "v_0:tp_10");
        assert_eq!(value["editor_items"][0]["text"], "hello");
        assert!(value.get("cataloger").is_none());
        assert!(value.get("mmif_metadata").is_none());
    }

    #[test]
    fn test_export_delivers_pretty_json() {
        let mut surface = MemorySurface::cataid("cpb-aacip-1")
            .with_page_field(PageField::CataidId, "cpb-aacip-1#20250101")
            .with_row(editor_row(10, "A", "hello  "));
        engage(&mut surface, &[10]);

        let outcome = export(&mut surface, ExportVariant::Catout, DATE.to_string()).unwrap();
        assert_eq!(outcome.file_name, "cpb-aacip-1_catout.json");

        let delivered = &surface.delivered[0];
        assert_eq!(delivered.file_name, "cpb-aacip-1_catout.json");
        assert!(delivered.contents.starts_with("{\n  \"asset_id\": \"cpb-aacip-1\""));
        let bundle: ExportBundle = serde_json::from_str(&delivered.contents).unwrap();
        assert_eq!(bundle.export_date, DATE);
        assert_eq!(bundle.editor_items.len(), 1);
    }

    #[test]
    fn test_correlate_repeats_duplicate_positions() {
        let surface = MemorySurface::cataid("asset").with_row(editor_row(10, "A", "t"));
        let items = correlate(&surface, &[10, 10], ExportVariant::Catout).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
    }
}
