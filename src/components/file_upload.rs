//! Multi-file upload widget with drag-and-drop and a resettable staged list.
//!
//! ARCHITECTURE
//! ============
//! Validation and staging live in [`crate::state::uploads`]. The browser
//! `File` handles are kept beside that state in a local map keyed by staged
//! id, since they cannot cross into the reactive graph's shared storage.
//! Every preview URL leaving the staged list goes through
//! [`object_url::revoke`].

use leptos::prelude::*;

use crate::app::use_api;
use crate::net::types::UploadResponse;
use crate::state::uploads::{UploadConfig, UploadMode, UploadState};
use crate::util::format::{human_size, mime_icon};
use crate::util::object_url;

#[cfg(feature = "hydrate")]
type FileMap = std::collections::HashMap<String, web_sys::File>;

/// Validate a browser selection and stage the accepted files.
#[cfg(feature = "hydrate")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ingest(
    list: &web_sys::FileList,
    config: &UploadConfig,
    state: RwSignal<UploadState>,
    files: StoredValue<FileMap, LocalStorage>,
) {
    use crate::state::uploads::{FileMeta, validate_batch};

    let picked: Vec<web_sys::File> = (0..list.length()).filter_map(|i| list.get(i)).collect();
    if picked.is_empty() {
        return;
    }
    let metas: Vec<FileMeta> = picked
        .iter()
        .map(|f| FileMeta::new(&f.name(), &f.type_(), f.size() as u64))
        .collect();

    let staged = state.with_untracked(UploadState::len);
    let verdict = match validate_batch(config, staged, &metas) {
        Ok(verdict) => verdict,
        Err(rejection) => {
            state.update(|s| s.error = Some(rejection.to_string()));
            return;
        }
    };

    for index in &verdict.accepted {
        let file = picked[*index].clone();
        let meta = metas[*index].clone();
        let preview = if meta.is_image() { object_url::create_for_file(&file) } else { None };
        let Some((id, released)) = state.try_update(|s| s.stage(config.mode, meta, preview)) else {
            return;
        };
        object_url::revoke_all(released);
        let live = state.with_untracked(UploadState::ids);
        files.update_value(|m| {
            m.retain(|k, _| live.contains(k));
            m.insert(id, file);
        });
    }
    state.update(|s| s.error = verdict.message());
}

/// File upload widget.
///
/// `on_success` receives the server response after an upload; `on_error`
/// receives the message shown to the user when an upload fails.
#[component]
pub fn FileUploadWidget(
    config: UploadConfig,
    #[prop(optional, into)] related_model: Option<String>,
    #[prop(optional, into)] related_id: Option<String>,
    #[prop(optional)] on_success: Option<Callback<UploadResponse>>,
    #[prop(optional)] on_error: Option<Callback<String>>,
) -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(UploadState::default());
    let description = RwSignal::new(String::new());
    let tags = RwSignal::new(String::new());
    let is_public = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let files = StoredValue::new_local(FileMap::new());

    on_cleanup(move || {
        if let Some(released) = state.try_update(UploadState::clear) {
            object_url::revoke_all(released);
        }
    });

    let multiple = config.mode == UploadMode::Multiple;
    let accept = config.accept_attr();
    let limits = format!(
        "Up to {} file{}, {} each",
        config.file_limit(),
        if config.file_limit() == 1 { "" } else { "s" },
        human_size(config.max_file_size)
    );

    let on_pick = {
        let config = config.clone();
        move |ev: leptos::ev::Event| {
            #[cfg(feature = "hydrate")]
            {
                let input: web_sys::HtmlInputElement = event_target(&ev);
                if let Some(list) = input.files() {
                    ingest(&list, &config, state, files);
                }
                input.set_value("");
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (ev, &config);
            }
        }
    };

    let on_drop = {
        let config = config.clone();
        move |ev: leptos::ev::DragEvent| {
            ev.prevent_default();
            state.update(|s| s.drag_active = false);
            #[cfg(feature = "hydrate")]
            {
                if let Some(list) = ev.data_transfer().and_then(|dt| dt.files()) {
                    ingest(&list, &config, state, files);
                }
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = &config;
            }
        }
    };

    let on_remove = move |id: String| {
        if let Some(preview) = state.try_update(|s| s.remove(&id)).flatten().flatten() {
            object_url::revoke(preview);
        }
        #[cfg(feature = "hydrate")]
        files.update_value(|m| {
            m.remove(&id);
        });
    };

    let on_reset = move |_| {
        if let Some(released) = state.try_update(UploadState::clear) {
            object_url::revoke_all(released);
        }
        #[cfg(feature = "hydrate")]
        files.update_value(FileMap::clear);
        state.update(|s| s.error = None);
    };

    let on_upload = move |_| {
        if state.with_untracked(|s| s.is_empty() || s.uploading) {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            use crate::state::uploads::{UploadMetadata, parse_tags};

            let ids = state.with_untracked(UploadState::ids);
            let picked: Vec<web_sys::File> = files.with_value(|m| ids.iter().filter_map(|id| m.get(id).cloned()).collect());
            let meta = UploadMetadata {
                description: description.get_untracked(),
                tags: parse_tags(&tags.get_untracked()),
                related_model: related_model.clone(),
                related_id: related_id.clone(),
                is_public: is_public.get_untracked(),
            };
            let api = api.clone();
            let config = config.clone();
            state.update(|s| {
                s.uploading = true;
                s.error = None;
            });
            leptos::task::spawn_local(async move {
                match api.upload_files(config.mode, &config.upload_type, &picked, &meta).await {
                    Ok(resp) => {
                        let released = state
                            .try_update(|s| {
                                s.uploading = false;
                                s.remove_many(&ids)
                            })
                            .unwrap_or_default();
                        object_url::revoke_all(released);
                        files.try_update_value(|m| m.retain(|id, _| !ids.contains(id)));
                        description.set(String::new());
                        tags.set(String::new());
                        if let Some(cb) = on_success {
                            cb.run(resp);
                        }
                    }
                    Err(e) => {
                        let message = e.user_message();
                        leptos::logging::warn!("upload failed: {e}");
                        state.update(|s| {
                            s.uploading = false;
                            s.error = Some(message.clone());
                        });
                        if let Some(cb) = on_error {
                            cb.run(message);
                        }
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, &config, &related_model, &related_id, on_success, on_error);
        }
    };

    let rows = move || {
        state.with(|s| {
            s.files()
                .iter()
                .map(|f| (f.id.clone(), f.meta.clone(), f.preview.as_ref().map(|p| p.as_str().to_owned())))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="file-upload">
            <label
                class=move || {
                    if state.with(|s| s.drag_active) { "file-upload__drop file-upload__drop--active" } else { "file-upload__drop" }
                }
                on:dragover=move |ev: leptos::ev::DragEvent| {
                    ev.prevent_default();
                    state.update(|s| s.drag_active = true);
                }
                on:dragleave=move |_| state.update(|s| s.drag_active = false)
                on:drop=on_drop
            >
                <input
                    class="file-upload__input"
                    type="file"
                    multiple=multiple
                    accept=accept
                    on:change=on_pick
                />
                <span class="file-upload__prompt">"Drag files here or click to browse"</span>
                <span class="file-upload__limits">{limits}</span>
            </label>

            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="file-upload__error">{move || state.with(|s| s.error.clone().unwrap_or_default())}</p>
            </Show>

            <ul class="file-upload__list">
                {move || {
                    rows()
                        .into_iter()
                        .map(|(id, meta, preview)| {
                            view! {
                                <li class="file-upload__item">
                                    {match preview {
                                        Some(src) => view! { <img class="file-upload__thumb" src=src alt=meta.name.clone()/> }.into_any(),
                                        None => view! { <span class="file-upload__icon">{mime_icon(&meta.mime)}</span> }.into_any(),
                                    }}
                                    <span class="file-upload__name">{meta.name.clone()}</span>
                                    <span class="file-upload__size">{human_size(meta.size)}</span>
                                    <button
                                        class="btn file-upload__remove"
                                        title="Remove"
                                        disabled=move || state.with(|s| s.uploading)
                                        on:click=move |_| on_remove(id.clone())
                                    >
                                        "✕"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>

            <Show when=move || state.with(|s| !s.is_empty())>
                <div class="file-upload__meta">
                    <input
                        type="text"
                        placeholder="Description"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="Tags (comma separated)"
                        prop:value=move || tags.get()
                        on:input=move |ev| tags.set(event_target_value(&ev))
                    />
                    <label class="file-upload__public">
                        <input
                            type="checkbox"
                            prop:checked=move || is_public.get()
                            on:change=move |ev| is_public.set(event_target_checked(&ev))
                        />
                        "Public"
                    </label>
                </div>
            </Show>

            <div class="file-upload__actions">
                <button
                    class="btn"
                    disabled=move || state.with(|s| s.is_empty() || s.uploading)
                    on:click=on_reset
                >
                    "Clear"
                </button>
                <button
                    class="btn btn--primary"
                    disabled=move || state.with(|s| s.is_empty() || s.uploading)
                    on:click=on_upload
                >
                    {move || if state.with(|s| s.uploading) { "Uploading…" } else { "Upload" }}
                </button>
            </div>
        </div>
    }
}
