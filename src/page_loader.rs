//! Saved page loader
//!
//! Reads a visaid/cataid HTML page saved from the browser into a
//! [`MemorySurface`], keeping the state the page held when it was saved:
//! checkbox states, engaged editors, edited text and display classes.

use crate::error::{CataidError, Result};
use cataid_common::surface::{EXPORT_BUTTON_ID, METADATA_ELEMENT_ID, MODE_TOGGLE_ID};
use cataid_common::{
    DisplayState, ExportVariant, FilterToggle, FragmentKind, MemoryRow, MemorySurface,
    PageConfig, PageField, Row,
};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

/// A parsed page and the layout it declares
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub config: PageConfig,
    pub surface: MemorySurface,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CataidError::InvalidPage(format!("selector {}: {}", css, e)))
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn display_of(element: &ElementRef) -> Option<DisplayState> {
    if has_class(element, "hidden") {
        Some(DisplayState::Hidden)
    } else if has_class(element, "shown") {
        Some(DisplayState::Shown)
    } else {
        None
    }
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect()
}

fn first<'a>(scope: &ElementRef<'a>, css: &Selector) -> Option<ElementRef<'a>> {
    scope.select(css).next()
}

pub fn load_page(path: &Path, variant: Option<ExportVariant>) -> Result<LoadedPage> {
    if !path.exists() {
        return Err(CataidError::PageNotFound(path.display().to_string()));
    }
    let html = std::fs::read_to_string(path)?;
    parse_page(&html, variant)
}

/// Parses page HTML; `variant` overrides the page's own marker
pub fn parse_page(html: &str, variant: Option<ExportVariant>) -> Result<LoadedPage> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let body_sel = selector("body")?;
    let marker = first(&root, &body_sel).and_then(|b| b.value().attr("data-cataid-variant"));
    let mut config = PageConfig::from_marker(marker)?;
    // visaid pages keep their layout
    if let Some(variant) = variant.filter(|_| config.has_catalog_mode()) {
        config.export = Some(variant);
    }

    let mut surface = MemorySurface::new();

    let checkbox_sel = selector("input[type=checkbox]")?;
    for input in root.select(&checkbox_sel) {
        let key = input.value().attr("value").unwrap_or_default();
        let checked = input.value().attr("checked").is_some();
        surface.toggles.push(FilterToggle::new(key, checked));
    }

    let row_sel = selector(&config.row_selector())?;
    let editor_sel = selector(".item-editor[data-tptime]")?;
    let editor_text_sel = selector("pre.editor-text")?;
    let engage_sel = selector(".engage-toggle[data-tptime]")?;
    let aid_sel = selector(".aid-text")?;
    let fname_sel = selector(".img-fname")?;
    let img_sel = selector("img")?;

    for row_el in root.select(&row_sel) {
        let attrs = row_el.value();
        let mut row = Row::new(
            attrs.attr("data-scenetype").unwrap_or_default(),
            attrs.attr("data-label").unwrap_or_default(),
        );

        let editor = first(&row_el, &editor_sel);
        if let Some(editor) = &editor {
            row.time_position = editor
                .value()
                .attr("data-tptime")
                .and_then(|v| v.trim().parse().ok());
            row.engaged = has_class(editor, "engaged");
        }

        let mut memory_row = MemoryRow::new(row);
        memory_row.display = display_of(&row_el);
        memory_row.full_row = has_class(&row_el, "fullrow");
        memory_row.has_engage_toggle = first(&row_el, &engage_sel).is_some();

        if let Some(text_el) = first(&row_el, &editor_text_sel) {
            memory_row
                .fragments
                .insert(FragmentKind::EditorText, text_of(&text_el));
            if let Some(tp_id) = text_el.value().attr("data-tpid") {
                memory_row
                    .fragments
                    .insert(FragmentKind::AnnotationId, tp_id.to_string());
            }
        }
        if let Some(aid) = first(&row_el, &aid_sel) {
            memory_row
                .fragments
                .insert(FragmentKind::OriginalText, text_of(&aid));
        }
        if let Some(fname) = first(&row_el, &fname_sel) {
            memory_row
                .fragments
                .insert(FragmentKind::ImageFilename, text_of(&fname));
        }
        if let Some(src) = first(&row_el, &img_sel).and_then(|img| img.value().attr("src")) {
            memory_row
                .fragments
                .insert(FragmentKind::ImageSource, src.to_string());
        }

        surface.rows.push(memory_row);
    }

    let extra_sel = selector(".cataid-extra")?;
    surface.extras = first(&root, &extra_sel).and_then(|el| display_of(&el));

    for field in [
        PageField::AssetId,
        PageField::CataidId,
        PageField::CataidVersion,
        PageField::Cataloger,
    ] {
        let field_sel = selector(&format!("#{}", field.element_id()))?;
        if let Some(el) = first(&root, &field_sel) {
            let value = match el.value().name() {
                "input" => el.value().attr("value").unwrap_or_default().to_string(),
                _ => text_of(&el),
            };
            surface.page_fields.insert(field, value);
        }
    }

    let metadata_sel = selector(&format!("#{}", METADATA_ELEMENT_ID))?;
    surface.metadata = first(&root, &metadata_sel).map(|el| text_of(&el));

    for id in [MODE_TOGGLE_ID, EXPORT_BUTTON_ID] {
        if first(&root, &selector(&format!("#{}", id))?).is_some() {
            surface.elements.insert(id.to_string());
        }
    }

    tracing::debug!(
        rows = surface.rows.len(),
        toggles = surface.toggles.len(),
        "page parsed"
    );
    Ok(LoadedPage { config, surface })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cataid_common::Surface;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body data-cataid-variant="catout">
<span id="asset-id"> cpb-aacip-1 </span>
<span id="cataid-id">cpb-aacip-1#20250101120000</span>
<span id="cataid-ver">0.4.2</span>
<input type="text" id="cataloger" value="owen">
<label><input type="checkbox" value="chyron" checked>chyron</label>
<label><input type="checkbox" value="scene subsample">scene subsample</label>
<button id="mode-toggle">mode</button>
<button id="export-button" class="hidden">export</button>
<div class="itemrow shown" data-label="chyron" data-scenetype="chyron">
<div class="item"><img src="data:image/jpeg;base64,AAAA">
<div class="img-caption"><span class="img-fname hidden">cpb-aacip-1_00100000_00001000_00001001.jpg<br></span></div></div>
<div class="cataid-extra hidden">
<div class="item item-aid"><span class="engage-toggle label clickable" data-tptime="1000">o</span>
<pre class="aid-text">
Jane Smith
</pre></div>
<div class="item item-editor engaged" data-scenetype="chyron" data-tptime="1000">
<pre class="editor-text" contenteditable="true" data-tptime="1000" data-tpid="v_0:tp_1">
Jane Smith
Reporter
</pre></div>
</div></div>
<div class="itemrow hidden" data-label="chyron - - -" data-scenetype="chyron"></div>
<script type="application/json" id="mmif-metadata">{"mmif": "1.0"}</script>
</body></html>"#;

    #[test]
    fn test_parse_page_reads_state() {
        let page = parse_page(PAGE, None).expect("parse");
        assert_eq!(page.config, PageConfig::cataid(ExportVariant::Catout));

        let surface = page.surface;
        assert_eq!(surface.toggles.len(), 2);
        assert!(surface.toggles[0].checked);
        assert!(!surface.toggles[1].checked);

        let rows = surface.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].time_position, Some(1000));
        assert!(rows[0].engaged);
        assert!(rows[1].is_subsample());
        assert_eq!(surface.rows[0].display, Some(DisplayState::Shown));
        assert_eq!(surface.extras, Some(DisplayState::Hidden));
        assert_eq!(surface.engage_toggles(), vec![1000]);
        assert!(surface.has_element(MODE_TOGGLE_ID));
        assert!(surface.has_element(EXPORT_BUTTON_ID));
    }

    #[test]
    fn test_parse_page_fragments() {
        let surface = parse_page(PAGE, None).expect("parse").surface;
        assert_eq!(
            surface.fragment(1000, FragmentKind::EditorText).as_deref(),
            Some("Jane Smith\nReporter\n")
        );
        assert_eq!(
            surface.fragment(1000, FragmentKind::AnnotationId).as_deref(),
            Some("v_0:tp_1")
        );
        assert_eq!(
            surface.fragment(1000, FragmentKind::ImageFilename).as_deref(),
            Some("cpb-aacip-1_00100000_00001000_00001001.jpg")
        );
        assert_eq!(
            surface.page_field(PageField::Cataloger).as_deref(),
            Some("owen")
        );
        assert_eq!(surface.metadata_blob().as_deref(), Some(r#"{"mmif": "1.0"}"#));
    }

    #[test]
    fn test_variant_override() {
        let page = parse_page(PAGE, Some(ExportVariant::CataidData)).expect("parse");
        assert_eq!(page.config.export, Some(ExportVariant::CataidData));
    }

    #[test]
    fn test_variant_override_ignored_on_visaid_page() {
        let html = r#"<html><body data-cataid-variant="visaid">
            <div class="item" data-label="slate" data-scenetype="slate"></div>
            </body></html>"#;
        let page = parse_page(html, Some(ExportVariant::Catout)).expect("parse");
        assert_eq!(page.config, PageConfig::visaid());
        assert_eq!(page.surface.rows.len(), 1);
    }

    #[test]
    fn test_unparsable_time_position_keeps_engaged_state() {
        let html = r#"<html><body data-cataid-variant="catout">
            <div class="itemrow" data-label="chyron" data-scenetype="chyron">
            <div class="item item-editor engaged" data-tptime="12.5">
            <pre class="editor-text" data-tpid="v_0:tp_1">x</pre></div></div>
            </body></html>"#;
        let page = parse_page(html, None).expect("parse");
        assert!(page.surface.rows[0].row.engaged);
        assert_eq!(page.surface.rows[0].row.time_position, None);
    }

    #[test]
    fn test_visaid_page() {
        let html = r#"<html><body data-cataid-variant="visaid">
            <input type="checkbox" value="slate" checked>
            <div class="item" data-label="slate" data-scenetype="slate"></div>
            <div class="item" data-label="bars" data-scenetype="bars"></div>
            </body></html>"#;
        let page = parse_page(html, None).expect("parse");
        assert!(!page.config.has_catalog_mode());
        assert_eq!(page.surface.rows.len(), 2);
        assert!(page.surface.rows.iter().all(|r| r.row.time_position.is_none()));
    }
}
