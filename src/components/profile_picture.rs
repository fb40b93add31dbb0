//! Single-image uploader for the signed-in user's profile picture.
//!
//! A picked file is checked (type, size, decoded dimensions), previewed at
//! once, and uploaded without a confirm step. A failed upload reverts to the
//! picture shown before. Each pick is stamped as it is made, so a slow older
//! pick never touches the preview of a newer one.

use leptos::prelude::*;

use crate::app::use_api;
use crate::net::types::ProfilePicture;
use crate::state::profile_picture::PictureState;
use crate::util::object_url;

#[cfg(feature = "hydrate")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
async fn select_picture(
    api: crate::net::api::ApiClient,
    file: web_sys::File,
    ticket: crate::util::request_seq::Ticket,
    state: RwSignal<PictureState>,
    on_change: Option<Callback<Option<ProfilePicture>>>,
) {
    use crate::state::profile_picture::{PROFILE_PICTURE_UPLOAD_TYPE, PictureRejection, check_dimensions, check_file};
    use crate::state::uploads::{FileMeta, UploadMetadata, UploadMode};

    let meta = FileMeta::new(&file.name(), &file.type_(), file.size() as u64);
    if let Err(rejection) = check_file(&meta) {
        state.try_update(|s| s.pick_rejected(&ticket, rejection.to_string()));
        return;
    }
    let Some(preview) = object_url::create_for_file(&file) else {
        state.try_update(|s| s.pick_rejected(&ticket, PictureRejection::Unreadable.to_string()));
        return;
    };
    let checked = match crate::util::image::natural_size(preview.as_str()).await {
        Ok((width, height)) => check_dimensions(width, height),
        Err(rejection) => Err(rejection),
    };
    if let Err(rejection) = checked {
        object_url::revoke(preview);
        state.try_update(|s| s.pick_rejected(&ticket, rejection.to_string()));
        return;
    }

    match state.try_update(|s| s.begin_upload(&ticket, preview)) {
        Some(Ok(Some(replaced))) => object_url::revoke(replaced),
        Some(Ok(None)) => {}
        Some(Err(superseded)) => {
            object_url::revoke(superseded);
            return;
        }
        None => return,
    }
    let uploaded = api
        .upload_files(UploadMode::Single, PROFILE_PICTURE_UPLOAD_TYPE, &[file], &UploadMetadata::default())
        .await
        .and_then(|resp| {
            resp.into_attachments()
                .first()
                .map(ProfilePicture::from)
                .ok_or_else(|| crate::net::error::ApiError::Decode("upload returned no attachment".to_owned()))
        });
    match uploaded {
        Ok(picture) => {
            let Some(released) = state.try_update(|s| s.upload_succeeded(&ticket, picture.clone())).flatten() else {
                return;
            };
            if let Some(released) = released {
                object_url::revoke(released);
            }
            if let Some(cb) = on_change {
                cb.run(Some(picture));
            }
        }
        Err(e) => {
            leptos::logging::warn!("profile picture upload failed: {e}");
            if let Some(released) = state.try_update(|s| s.upload_failed(&ticket, e.user_message())).flatten().flatten() {
                object_url::revoke(released);
            }
        }
    }
}

/// Profile picture widget. `on_change` receives the new picture, or `None` after removal.
#[component]
pub fn ProfilePictureWidget(
    current: Option<ProfilePicture>,
    #[prop(optional)] on_change: Option<Callback<Option<ProfilePicture>>>,
) -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(PictureState::new(current));

    on_cleanup(move || {
        if let Some(preview) = state.try_update(PictureState::take_preview).flatten() {
            object_url::revoke(preview);
        }
    });

    let on_pick = {
        let api = api.clone();
        move |ev: leptos::ev::Event| {
            #[cfg(feature = "hydrate")]
            {
                let input: web_sys::HtmlInputElement = event_target(&ev);
                let file = input.files().and_then(|list| list.get(0));
                input.set_value("");
                let Some(file) = file else {
                    return;
                };
                let Some(ticket) = state.try_update(PictureState::begin_pick) else {
                    return;
                };
                leptos::task::spawn_local(select_picture(api.clone(), file, ticket, state, on_change));
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (ev, &api);
            }
        }
    };

    let on_remove = move |_| {
        let Some(attachment_id) = state.with_untracked(PictureState::removable_id) else {
            return;
        };
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            state.update(|s| s.uploading = true);
            leptos::task::spawn_local(async move {
                match api.delete_attachment(&attachment_id).await {
                    Ok(()) => {
                        state.update(|s| {
                            s.uploading = false;
                            s.removed();
                        });
                        if let Some(cb) = on_change {
                            cb.run(None);
                        }
                    }
                    Err(e) => state.update(|s| {
                        s.uploading = false;
                        s.error = Some(e.user_message());
                    }),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, attachment_id, on_change);
        }
    };

    let display_url = move || state.with(|s| s.display_url().map(ToOwned::to_owned));

    view! {
        <div class="profile-picture">
            <div class="profile-picture__frame">
                {move || match display_url() {
                    Some(src) => view! { <img class="profile-picture__image" src=src alt="Profile picture"/> }.into_any(),
                    None => view! { <span class="profile-picture__placeholder">"👤"</span> }.into_any(),
                }}
                <Show when=move || state.with(|s| s.uploading)>
                    <span class="profile-picture__spinner">"Uploading…"</span>
                </Show>
            </div>
            <div class="profile-picture__actions">
                <label class="btn profile-picture__change">
                    "Change picture"
                    <input
                        class="profile-picture__input"
                        type="file"
                        accept="image/*"
                        disabled=move || state.with(|s| s.uploading)
                        on:change=on_pick
                    />
                </label>
                <Show when=move || state.with(|s| s.removable_id().is_some())>
                    <button
                        class="btn btn--danger"
                        disabled=move || state.with(|s| s.uploading)
                        on:click=on_remove.clone()
                    >
                        "Remove"
                    </button>
                </Show>
            </div>
            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="profile-picture__error">{move || state.with(|s| s.error.clone().unwrap_or_default())}</p>
            </Show>
            <p class="profile-picture__hint">"JPG, PNG or GIF, at least 100×100 pixels, up to 5 MB."</p>
        </div>
    }
}
