//! DOM surface
//!
//! [`Surface`] over the live document of a visaid/cataid page.

use crate::export::download::{save_text_file, JSON_MIME};
use cataid_common::surface::{EXPORT_BUTTON_ID, METADATA_ELEMENT_ID};
use cataid_common::{
    DisplayState, Error, FilterToggle, FragmentKind, PageConfig, PageField, Result, Row, Surface,
};
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, HtmlInputElement,
};

const ENGAGED_CLASS: &str = "engaged";
const FULL_ROW_CLASS: &str = "fullrow";
const EXTRA_SELECTOR: &str = ".cataid-extra";
const ENGAGE_TOGGLE_SELECTOR: &str = ".engage-toggle[data-tptime]";

pub fn editor_selector(time_position: u64) -> String {
    format!(".item-editor[data-tptime=\"{}\"]", time_position)
}

pub fn editor_text_selector(time_position: u64) -> String {
    format!("pre.editor-text[data-tptime=\"{}\"]", time_position)
}

pub fn engage_toggle_selector(time_position: u64) -> String {
    format!(".engage-toggle[data-tptime=\"{}\"]", time_position)
}

pub fn parse_time_position(value: Option<String>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

pub struct DomSurface {
    document: Document,
    config: PageConfig,
}

impl DomSurface {
    pub fn new(document: Document, config: PageConfig) -> Self {
        Self { document, config }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Every element matching `selector`, in document order
    pub fn select_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            gloo::console::error!(format!("invalid selector: {}", selector));
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn select(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn row_elements(&self) -> Vec<Element> {
        self.select_all(&self.config.row_selector())
    }

    fn set_display(element: &Element, state: DisplayState) {
        let classes = element.class_list();
        let _ = classes.remove_1(state.opposite_class_name());
        let _ = classes.add_1(state.class_name());
    }

    /// Row that owns the editor at `time_position`
    fn row_at(&self, time_position: u64) -> Option<Element> {
        let editor = self.select(&editor_selector(time_position))?;
        editor.closest(&self.config.row_selector()).ok().flatten()
    }

    fn row_fragment(&self, time_position: u64, selector: &str) -> Option<Element> {
        self.row_at(time_position)?.query_selector(selector).ok().flatten()
    }

    /// Rendered text of an element, as the user sees and edits it
    fn element_text(element: &Element) -> Option<String> {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => Some(html.inner_text()),
            None => element.text_content(),
        }
    }

    /// Image as a data URI; file references are drawn through a canvas
    fn image_data_uri(element: &Element) -> Option<String> {
        let image = element.dyn_ref::<HtmlImageElement>()?;
        let src = image.src();
        if src.starts_with("data:") {
            return Some(src);
        }
        match Self::capture_image(image) {
            Ok(uri) => Some(uri),
            Err(e) => {
                gloo::console::warn!(format!("image capture failed, keeping src: {:?}", e));
                Some(src)
            }
        }
    }

    fn capture_image(image: &HtmlImageElement) -> std::result::Result<String, JsValue> {
        let document = gloo::utils::document();
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(image.natural_width());
        canvas.set_height(image.natural_height());
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        context.draw_image_with_html_image_element(image, 0.0, 0.0)?;
        canvas.to_data_url_with_type("image/jpeg")
    }
}

impl Surface for DomSurface {
    fn toggles(&self) -> Vec<FilterToggle> {
        self.select_all("input")
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
            .filter(|input| input.type_() == "checkbox")
            .map(|input| FilterToggle::new(input.value(), input.checked()))
            .collect()
    }

    fn rows(&self) -> Vec<Row> {
        self.row_elements()
            .iter()
            .map(|el| {
                let editor = el.query_selector(".item-editor[data-tptime]").ok().flatten();
                Row {
                    scene_type: el.get_attribute("data-scenetype").unwrap_or_default(),
                    label: el.get_attribute("data-label").unwrap_or_default(),
                    time_position: editor
                        .as_ref()
                        .and_then(|e| parse_time_position(e.get_attribute("data-tptime"))),
                    engaged: editor
                        .map(|e| e.class_list().contains(ENGAGED_CLASS))
                        .unwrap_or(false),
                }
            })
            .collect()
    }

    fn apply_row_display(&mut self, states: &[DisplayState]) {
        for (el, state) in self.row_elements().iter().zip(states) {
            Self::set_display(el, *state);
        }
    }

    fn set_catalog_extras(&mut self, state: DisplayState) {
        for el in self.select_all(EXTRA_SELECTOR) {
            Self::set_display(&el, state);
        }
    }

    fn set_full_rows(&mut self, full: bool) {
        for el in self.row_elements() {
            let classes = el.class_list();
            let _ = if full {
                classes.add_1(FULL_ROW_CLASS)
            } else {
                classes.remove_1(FULL_ROW_CLASS)
            };
        }
    }

    fn set_export_control(&mut self, state: DisplayState) {
        let Some(button) = self.document.get_element_by_id(EXPORT_BUTTON_ID) else {
            return;
        };
        Self::set_display(&button, state);
        let _ = if state.is_shown() {
            button.remove_attribute("disabled")
        } else {
            button.set_attribute("disabled", "")
        };
    }

    fn engage_toggles(&self) -> Vec<u64> {
        self.select_all(ENGAGE_TOGGLE_SELECTOR)
            .iter()
            .filter_map(|el| parse_time_position(el.get_attribute("data-tptime")))
            .collect()
    }

    fn toggle_engaged(&mut self, time_position: u64) {
        for el in self.select_all(&editor_selector(time_position)) {
            let _ = el.class_list().toggle(ENGAGED_CLASS);
        }
    }

    fn fragment(&self, time_position: u64, kind: FragmentKind) -> Option<String> {
        match kind {
            FragmentKind::EditorText => self
                .select(&editor_text_selector(time_position))
                .and_then(|el| Self::element_text(&el)),
            FragmentKind::AnnotationId => self
                .select(&editor_text_selector(time_position))
                .and_then(|el| el.get_attribute("data-tpid")),
            FragmentKind::OriginalText => self
                .row_fragment(time_position, ".aid-text")
                .and_then(|el| Self::element_text(&el)),
            FragmentKind::ImageFilename => self
                .row_fragment(time_position, ".img-fname")
                .and_then(|el| el.text_content()),
            FragmentKind::ImageSource => self
                .row_fragment(time_position, "img")
                .and_then(|el| Self::image_data_uri(&el)),
            FragmentKind::Label => self
                .row_at(time_position)
                .and_then(|el| el.get_attribute("data-label")),
        }
    }

    fn page_field(&self, field: PageField) -> Option<String> {
        let element = self.document.get_element_by_id(field.element_id())?;
        match element.dyn_ref::<HtmlInputElement>() {
            Some(input) => Some(input.value()),
            None => element.text_content(),
        }
    }

    fn metadata_blob(&self) -> Option<String> {
        self.document
            .get_element_by_id(METADATA_ELEMENT_ID)
            .and_then(|el| el.text_content())
    }

    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn deliver(&mut self, file_name: &str, contents: &str) -> Result<()> {
        save_text_file(&self.document, file_name, contents, JSON_MIME).map_err(|e| {
            Error::Delivery {
                file_name: file_name.to_string(),
                reason: format!("{:?}", e),
            }
        })
    }

    fn notify(&mut self, message: &str) {
        gloo::console::warn!(message.to_string());
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use cataid_common::{Event, ExportVariant, Mode, Page, Target};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const PAGE: &str = r#"
        <span id="asset-id">cpb-aacip-1</span>
        <input type="text" id="cataloger" value=" owen ">
        <label><input type="checkbox" value="chyron" checked>chyron</label>
        <label><input type="checkbox" value="slate">slate</label>
        <button id="mode-toggle">mode</button>
        <button id="export-button">export</button>
        <div class="itemrow" data-label="chyron" data-scenetype="chyron">
          <div class="item"><img src="data:image/jpeg;base64,AAAA"></div>
          <div class="cataid-extra">
            <div class="item item-aid"><span class="engage-toggle" data-tptime="1000">o</span>
              <pre class="aid-text">Jane Smith</pre></div>
            <div class="item item-editor" data-scenetype="chyron" data-tptime="1000">
              <pre class="editor-text" contenteditable="true" data-tptime="1000" data-tpid="v_0:tp_1">Jane Smith  </pre>
            </div>
          </div>
        </div>
        <div class="itemrow" data-label="slate" data-scenetype="slate"></div>
    "#;

    fn mount() -> Document {
        let document = gloo::utils::document();
        let body = document.body().expect("body");
        body.set_inner_html(PAGE);
        document
    }

    #[wasm_bindgen_test]
    fn wasm_filter_and_mode() {
        let document = mount();
        let surface = DomSurface::new(document.clone(), PageConfig::default());
        let mut page = Page::new(surface, PageConfig::default());
        let summary = page.initialize();
        assert_eq!(summary.shown, 1);

        let rows = page.surface().select_all(".itemrow");
        assert!(rows[0].class_list().contains("shown"));
        assert!(rows[1].class_list().contains("hidden"));

        page.handle(&Event::click(Target::ModeToggle)).expect("toggle");
        assert_eq!(page.mode(), Mode::Catalog);
        assert!(rows.iter().all(|r| r.class_list().contains("fullrow")));
        let button = document.get_element_by_id("export-button").expect("button");
        assert!(!button.has_attribute("disabled"));
    }

    #[wasm_bindgen_test]
    fn wasm_engage_and_collect() {
        let document = mount();
        let mut surface = DomSurface::new(document, PageConfig::default());
        surface.toggle_engaged(1000);

        let bundle = cataid_common::collect_bundle(
            &surface,
            ExportVariant::Catout,
            "2025-01-01T00:00:00Z".to_string(),
        )
        .expect("bundle");
        let item = bundle.editor_items[0].as_catalog().expect("catalog item");
        assert_eq!(item.etd_text, "Jane Smith");
        assert_eq!(item.aid_text.as_deref(), Some("Jane Smith"));
        assert_eq!(bundle.cataloger.as_deref(), Some("owen"));
    }
}
