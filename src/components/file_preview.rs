//! Previously uploaded file with download, delete, and preview actions.

use leptos::prelude::*;

use crate::app::use_api;
use crate::net::types::Attachment;
use crate::util::format::{human_size, mime_icon, short_datetime};

/// Fetch an attachment and hand it to the browser as a download.
#[cfg(feature = "hydrate")]
async fn download(api: &crate::net::api::ApiClient, attachment: &Attachment) -> Result<(), String> {
    let bytes = api
        .download_attachment(&attachment.id)
        .await
        .map_err(|e| e.user_message())?;
    crate::util::download::save_bytes(&bytes, &attachment.original_name, &attachment.mime_type).map_err(|e| {
        leptos::logging::warn!("download of {} failed: {e}", attachment.id);
        "The file could not be saved.".to_owned()
    })
}

/// File card. `on_deleted` receives the attachment id after a successful delete.
#[component]
pub fn FilePreviewWidget(
    attachment: Attachment,
    #[prop(optional)] on_deleted: Option<Callback<String>>,
    #[prop(optional)] can_delete: bool,
) -> impl IntoView {
    let api = use_api();
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let downloads = RwSignal::new(attachment.download_count);

    let on_download = {
        let api = api.clone();
        let attachment = attachment.clone();
        move |_| {
            if busy.get_untracked() {
                return;
            }
            #[cfg(feature = "hydrate")]
            {
                let api = api.clone();
                let attachment = attachment.clone();
                busy.set(true);
                error.set(None);
                leptos::task::spawn_local(async move {
                    match download(&api, &attachment).await {
                        Ok(()) => downloads.update(|n| *n += 1),
                        Err(message) => error.set(Some(message)),
                    }
                    busy.set(false);
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&api, &attachment);
            }
        }
    };

    let on_preview = {
        let api = api.clone();
        let attachment = attachment.clone();
        move |_| {
            #[cfg(feature = "hydrate")]
            {
                if attachment.is_previewable() && crate::util::download::open_in_new_tab(&attachment.url) {
                    return;
                }
                let api = api.clone();
                let attachment = attachment.clone();
                busy.set(true);
                leptos::task::spawn_local(async move {
                    match download(&api, &attachment).await {
                        Ok(()) => downloads.update(|n| *n += 1),
                        Err(message) => error.set(Some(message)),
                    }
                    busy.set(false);
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&api, &attachment);
            }
        }
    };

    let on_delete = {
        let attachment_id = attachment.id.clone();
        let name = attachment.original_name.clone();
        move |_| {
            #[cfg(feature = "hydrate")]
            {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message(&format!("Delete {name}?")).ok())
                    .unwrap_or(false);
                if !confirmed {
                    return;
                }
                let api = api.clone();
                let attachment_id = attachment_id.clone();
                busy.set(true);
                error.set(None);
                leptos::task::spawn_local(async move {
                    match api.delete_attachment(&attachment_id).await {
                        Ok(()) => {
                            if let Some(cb) = on_deleted {
                                cb.run(attachment_id);
                            }
                        }
                        Err(e) => error.set(Some(e.user_message())),
                    }
                    busy.set(false);
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&api, &attachment_id, &name, on_deleted);
            }
        }
    };

    let preview_label = if attachment.is_previewable() { "Preview" } else { "Open" };
    let uploaded_tags = attachment.tags.join(", ");
    let last_downloaded = attachment.last_downloaded_at.map(short_datetime);

    view! {
        <div class="file-preview">
            <span class="file-preview__icon">{mime_icon(&attachment.mime_type)}</span>
            <div class="file-preview__body">
                <span class="file-preview__name" title=attachment.original_name.clone()>
                    {attachment.original_name.clone()}
                </span>
                <span class="file-preview__meta">
                    {human_size(attachment.size)}
                    " · "
                    {move || format!("{} downloads", downloads.get())}
                    {last_downloaded.map(|at| format!(" · last {at}"))}
                </span>
                {(!attachment.description.is_empty())
                    .then(|| view! { <p class="file-preview__description">{attachment.description.clone()}</p> })}
                {(!uploaded_tags.is_empty()).then(|| view! { <span class="file-preview__tags">{uploaded_tags}</span> })}
                <Show when=move || error.get().is_some()>
                    <p class="file-preview__error">{move || error.get().unwrap_or_default()}</p>
                </Show>
            </div>
            <div class="file-preview__actions">
                <button class="btn" disabled=move || busy.get() on:click=on_preview>
                    {preview_label}
                </button>
                <button class="btn" disabled=move || busy.get() on:click=on_download>
                    "Download"
                </button>
                {can_delete
                    .then(|| {
                        view! {
                            <button class="btn btn--danger" disabled=move || busy.get() on:click=on_delete>
                                "Delete"
                            </button>
                        }
                    })}
            </div>
        </div>
    }
}
