//! Object URLs for local file previews.
//!
//! URLs are created into a [`PreviewUrl`] and revoked by consuming it, so a
//! preview cannot be revoked twice.

use crate::state::uploads::PreviewUrl;

/// Create a preview URL for a local file.
#[cfg(feature = "hydrate")]
pub fn create_for_file(file: &web_sys::File) -> Option<PreviewUrl> {
    match web_sys::Url::create_object_url_with_blob(file) {
        Ok(url) => Some(PreviewUrl::new(url)),
        Err(e) => {
            leptos::logging::warn!("could not create preview for {}: {e:?}", file.name());
            None
        }
    }
}

/// Release a preview URL.
pub fn revoke(preview: PreviewUrl) {
    let url = preview.into_inner();
    #[cfg(feature = "hydrate")]
    {
        if let Err(e) = web_sys::Url::revoke_object_url(&url) {
            leptos::logging::warn!("could not revoke {url}: {e:?}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = url;
    }
}

/// Release every preview in `previews`.
pub fn revoke_all(previews: impl IntoIterator<Item = PreviewUrl>) {
    for preview in previews {
        revoke(preview);
    }
}
