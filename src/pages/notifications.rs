//! Notification feed with unread badge and mark-read actions.
//!
//! ARCHITECTURE
//! ============
//! Two effects fetch the page and the unread count. Each tracks only its
//! revision key in [`NotificationsState`]; mark-read actions call
//! `invalidate`, which moves both keys and triggers both refetches.

use leptos::prelude::*;

use crate::app::use_api;
use crate::components::notification_item::NotificationItem;
use crate::components::pagination::PageControls;
use crate::config::NOTIFICATION_PAGE_SIZE;
use crate::net::types::Notification;
use crate::state::notifications::NotificationsState;

/// Notification feed page.
#[component]
pub fn NotificationsPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(NotificationsState::default());
    let marking_all = RwSignal::new(false);

    let page_key = Memo::new(move |_| state.with(NotificationsState::page_key));
    let unread_rev = Memo::new(move |_| state.with(NotificationsState::unread_rev));

    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        Effect::new(move || {
            let key = page_key.get();
            let ticket = state.try_update_untracked(NotificationsState::begin_page_fetch);
            let Some(ticket) = ticket else {
                return;
            };
            state.notify();
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match api.fetch_notifications(key.page, NOTIFICATION_PAGE_SIZE).await {
                    Ok(page) => {
                        state.try_update(|s| s.apply_page(&ticket, page));
                    }
                    Err(e) => {
                        state.try_update(|s| s.fail_page(&ticket, e.user_message()));
                    }
                }
            });
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        Effect::new(move || {
            unread_rev.track();
            let Some(ticket) = state.try_update_untracked(NotificationsState::begin_unread_fetch) else {
                return;
            };
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match api.fetch_unread_count().await {
                    Ok(count) => {
                        state.try_update(|s| s.apply_unread(&ticket, count));
                    }
                    Err(e) => {
                        leptos::logging::warn!("unread count fetch failed: {e}");
                        state.try_update_untracked(|s| s.abandon_unread(&ticket));
                    }
                }
            });
        });
    }

    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (page_key, unread_rev);
    }

    let on_read = {
        let api = api.clone();
        Callback::new(move |id: String| {
            #[cfg(feature = "hydrate")]
            {
                let api = api.clone();
                leptos::task::spawn_local(async move {
                    match api.mark_notification_read(&id).await {
                        Ok(()) => state.update(NotificationsState::invalidate),
                        Err(e) => state.update(|s| s.error = Some(e.user_message())),
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&api, id);
            }
        })
    };

    let on_mark_all = move |_| {
        if marking_all.get_untracked() {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            marking_all.set(true);
            leptos::task::spawn_local(async move {
                match api.mark_all_notifications_read().await {
                    Ok(()) => state.update(NotificationsState::invalidate),
                    Err(e) => state.update(|s| s.error = Some(e.user_message())),
                }
                marking_all.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &api;
        }
    };

    let on_page = Callback::new(move |page: u32| state.update(|s| s.set_page(page)));
    let items = move || state.with(|s| s.notifications.clone());

    view! {
        <section class="notifications-page">
            <header class="notifications-page__header">
                <h1>
                    "Notifications"
                    {move || {
                        state
                            .with(|s| s.unread_count)
                            .filter(|count| *count > 0)
                            .map(|count| view! { <span class="badge notifications-page__badge">{count}</span> })
                    }}
                </h1>
                <button
                    class="btn"
                    disabled=move || marking_all.get() || !state.with(NotificationsState::has_unread)
                    on:click=on_mark_all
                >
                    "Mark all as read"
                </button>
            </header>

            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="notifications-page__error" role="alert">
                    {move || state.with(|s| s.error.clone().unwrap_or_default())}
                </p>
            </Show>

            <Show
                when=move || state.with(|s| !s.notifications.is_empty())
                fallback=move || {
                    view! {
                        <p class="notifications-page__empty">
                            {move || if state.with(|s| s.loading) { "Loading…" } else { "You have no notifications." }}
                        </p>
                    }
                }
            >
                <ul class="notifications-page__list">
                    <For
                        each=items
                        key=|n: &Notification| (n.id.clone(), n.read)
                        children=move |notification: Notification| {
                            view! { <NotificationItem notification=notification on_read=on_read/> }
                        }
                    />
                </ul>
            </Show>

            <PageControls
                page=Signal::derive(move || state.with(|s| s.page))
                total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                on_change=on_page
            />
        </section>
    }
}
