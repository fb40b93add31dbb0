//! One row of the notification feed.

use leptos::prelude::*;

use crate::net::types::Notification;
use crate::util::format::time_ago;

/// Notification row. Clicking an unread row fires `on_read` with its id.
#[component]
pub fn NotificationItem(notification: Notification, on_read: Callback<String>) -> impl IntoView {
    let read = notification.read;
    let id = notification.id.clone();
    let kind = notification.kind;
    let age = time_ago(notification.created_at, chrono::Utc::now());

    let on_click = move |_| {
        if !read {
            on_read.run(id.clone());
        }
    };

    view! {
        <li
            class=if read { "notification" } else { "notification notification--unread" }
            on:click=on_click
        >
            <span class="notification__icon" title=kind.label()>{kind.icon()}</span>
            <div class="notification__body">
                <span class="notification__title">{notification.title}</span>
                <p class="notification__message">{notification.message}</p>
                <span class="notification__meta">{kind.label()} " · " {age}</span>
            </div>
            {(!read).then(|| view! { <span class="notification__dot" aria-label="Unread"></span> })}
        </li>
    }
}
