//! Profile page: picture management plus the user's own documents.

use leptos::prelude::*;

use crate::app::use_api;
use crate::components::file_preview::FilePreviewWidget;
use crate::components::file_upload::FileUploadWidget;
use crate::components::profile_picture::ProfilePictureWidget;
use crate::net::types::{Attachment, ProfilePicture, UploadResponse};
use crate::state::session::{SESSION_STORAGE_KEY, Session};
use crate::state::uploads::UploadConfig;
use crate::util::request_seq::RequestSeq;

const DOCUMENT_MODEL: &str = "User";
const DOCUMENT_UPLOAD_TYPE: &str = "document";

/// Attachments listed under the profile, with stale-response protection.
#[derive(Debug, Default)]
struct Documents {
    items: Vec<Attachment>,
    loading: bool,
    error: Option<String>,
    fetches: RequestSeq,
}

/// Persist a new profile picture into the cached session.
fn store_picture(session: RwSignal<Session>, picture: Option<ProfilePicture>) {
    session.update(|s| {
        if let Some(user) = s.user.as_mut() {
            user.profile_picture = picture;
        }
        crate::util::storage::save_json(SESSION_STORAGE_KEY, s);
    });
}

/// Profile page.
#[component]
pub fn ProfilePage() -> impl IntoView {
    let api = use_api();
    let session = expect_context::<RwSignal<Session>>();
    let user = session.with_untracked(|s| s.user.clone());
    let docs = RwSignal::new(Documents::default());
    let reloads = RwSignal::new(0_u32);

    let user_id = user.as_ref().map(|u| u.id.clone()).unwrap_or_default();

    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        let user_id = user_id.clone();
        Effect::new(move || {
            reloads.track();
            if user_id.is_empty() {
                return;
            }
            let Some(ticket) = docs.try_update(|d| {
                d.loading = true;
                d.fetches.begin("documents")
            }) else {
                return;
            };
            let api = api.clone();
            let user_id = user_id.clone();
            leptos::task::spawn_local(async move {
                let result = api.list_attachments(DOCUMENT_MODEL, &user_id).await;
                docs.try_update(|d| {
                    if !d.fetches.finish(&ticket) {
                        return;
                    }
                    d.loading = false;
                    match result {
                        Ok(items) => {
                            d.items = items;
                            d.error = None;
                        }
                        Err(e) => d.error = Some(e.user_message()),
                    }
                });
            });
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = &api;
    }

    let on_picture = Callback::new(move |picture: Option<ProfilePicture>| store_picture(session, picture));
    let on_uploaded = Callback::new(move |_: UploadResponse| reloads.update(|n| *n += 1));
    let on_deleted = Callback::new(move |id: String| docs.update(|d| d.items.retain(|a| a.id != id)));

    let Some(user) = user else {
        return view! { <p class="profile-page__empty">"Sign in to manage your profile."</p> }.into_any();
    };

    let upload_config = UploadConfig::new(DOCUMENT_UPLOAD_TYPE);
    let items = move || docs.with(|d| d.items.clone());

    view! {
        <section class="profile-page">
            <header class="profile-page__header">
                <h1>{user.name.clone()}</h1>
                <span class="profile-page__role">{user.role.label()}</span>
            </header>

            <ProfilePictureWidget current=user.profile_picture.clone() on_change=on_picture/>

            <h2>"Documents"</h2>
            <FileUploadWidget
                config=upload_config
                related_model=DOCUMENT_MODEL
                related_id=user_id
                on_success=on_uploaded
            />

            <Show when=move || docs.with(|d| d.error.is_some())>
                <p class="profile-page__error" role="alert">
                    {move || docs.with(|d| d.error.clone().unwrap_or_default())}
                </p>
            </Show>

            <Show
                when=move || docs.with(|d| !d.items.is_empty())
                fallback=move || {
                    view! {
                        <p class="profile-page__empty">
                            {move || if docs.with(|d| d.loading) { "Loading…" } else { "No documents uploaded yet." }}
                        </p>
                    }
                }
            >
                <div class="profile-page__documents">
                    <For
                        each=items
                        key=|a: &Attachment| a.id.clone()
                        children=move |attachment: Attachment| {
                            view! { <FilePreviewWidget attachment=attachment on_deleted=on_deleted can_delete=true/> }
                        }
                    />
                </div>
            </Show>
        </section>
    }
    .into_any()
}
