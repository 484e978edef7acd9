//! File download
//!
//! Saves a text file through a Blob object URL and a temporary anchor.

use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url};

pub const JSON_MIME: &str = "application/json";

/// Starts a browser download of `contents` as `file_name`
pub fn save_text_file(
    document: &Document,
    file_name: &str,
    contents: &str,
    mime: &str,
) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(contents));

    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();

    // revoke after the click has been processed
    Timeout::new(0, move || {
        let _ = Url::revoke_object_url(&url);
    })
    .forget();
    Ok(())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_save_text_file_leaves_no_anchor() {
        let document = gloo::utils::document();
        save_text_file(&document, "asset_catout.json", "{}", JSON_MIME).expect("download");
        let anchors = document.query_selector_all("a[download]").expect("query");
        assert_eq!(anchors.length(), 0);
    }
}
