//! Save fetched bytes through a temporary object URL.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Hand `bytes` to the browser as a file download named `filename`.
///
/// The object URL is revoked on the next tick, once the click has been handled.
///
/// # Errors
///
/// Returns a description of the browser call that failed.
pub fn save_bytes(bytes: &[u8], filename: &str, mime: &str) -> Result<(), String> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let bag = BlobPropertyBag::new();
    bag.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag).map_err(|e| format!("blob: {e:?}"))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| format!("object url: {e:?}"))?;

    let anchor = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document".to_owned())?
        .create_element("a")
        .map_err(|e| format!("anchor: {e:?}"))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| "anchor cast".to_owned())?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Timeout::new(0, move || {
        let _ = Url::revoke_object_url(&url);
    })
    .forget();
    Ok(())
}

/// Open `url` in a new browser tab. Returns `false` when blocked.
pub fn open_in_new_tab(url: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.open_with_url_and_target(url, "_blank").ok().flatten())
        .is_some()
}
