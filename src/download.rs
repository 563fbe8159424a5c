//! Saving the current ontology as a JSON file from the browser.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::ontology::OntologyData;

/// Offer `data` as a pretty-printed JSON download named `file_name`.
pub fn download_json(data: &OntologyData, file_name: &str) -> Result<(), JsValue> {
	let json = data
		.to_pretty_json()
		.map_err(|e| JsValue::from_str(&e.to_string()))?;

	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&Array::of1(&JsValue::from_str(&json)), &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();

	Url::revoke_object_url(&url)
}
