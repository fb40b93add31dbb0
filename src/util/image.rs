//! Decode an image's pixel size from a URL.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlImageElement;

use crate::state::profile_picture::PictureRejection;

/// Load `url` into an off-screen image and report its natural size.
///
/// # Errors
///
/// Returns [`PictureRejection::Unreadable`] when the browser cannot decode it.
pub async fn natural_size(url: &str) -> Result<(u32, u32), PictureRejection> {
    let img = HtmlImageElement::new().map_err(|_| PictureRejection::Unreadable)?;
    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let loaded_tx = Rc::clone(&tx);
    let on_load = Closure::<dyn FnMut()>::new(move || {
        if let Some(tx) = loaded_tx.borrow_mut().take() {
            let _ = tx.send(true);
        }
    });
    let on_error = Closure::<dyn FnMut()>::new(move || {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(false);
        }
    });
    img.set_onload(Some(on_load.as_ref().unchecked_ref()));
    img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    img.set_src(url);

    let loaded = rx.await.unwrap_or(false);
    img.set_onload(None);
    img.set_onerror(None);
    drop((on_load, on_error));

    if !loaded {
        return Err(PictureRejection::Unreadable);
    }
    Ok((img.natural_width(), img.natural_height()))
}
