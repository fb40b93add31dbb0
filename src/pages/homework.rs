//! Homework list: server filter, client-side search, role-aware columns.

use chrono::Utc;
use leptos::prelude::*;

use crate::app::use_api;
use crate::components::pagination::PageControls;
use crate::config::HOMEWORK_PAGE_SIZE;
use crate::net::types::Homework;
use crate::state::homework::{HomeworkFilter, HomeworkState, due_status};
use crate::state::session::Session;
use crate::util::format::short_datetime;

fn points_label(homework: &Homework) -> String {
    homework.max_points.map_or_else(|| "—".to_owned(), |p| format!("{p}"))
}

/// Homework list page.
#[component]
pub fn HomeworkPage() -> impl IntoView {
    let api = use_api();
    let session = expect_context::<RwSignal<Session>>();
    let is_staff = Memo::new(move |_| session.with(|s| s.role().is_staff()));
    let state = RwSignal::new(HomeworkState::default());

    let fetch_key = Memo::new(move |_| state.with(|s| (s.page, s.filter)));

    #[cfg(feature = "hydrate")]
    Effect::new(move || {
        let (page, filter) = fetch_key.get();
        let Some(ticket) = state.try_update_untracked(HomeworkState::begin_fetch) else {
            return;
        };
        state.notify();
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.fetch_homework(page, HOMEWORK_PAGE_SIZE, filter).await {
                Ok(page) => {
                    state.try_update(|s| s.apply_page(&ticket, page));
                }
                Err(e) => {
                    state.try_update(|s| s.fail_fetch(&ticket, e.user_message()));
                }
            }
        });
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, fetch_key);
    }

    let on_page = Callback::new(move |page: u32| state.update(|s| s.set_page(page)));

    let rows = move || {
        let now = Utc::now();
        let staff = is_staff.get();
        state.with(|s| {
            s.visible()
                .into_iter()
                .map(|hw| {
                    let status = due_status(hw, now);
                    view! {
                        <tr class="homework-table__row">
                            <td class="homework-table__title">
                                <span>{hw.title.clone()}</span>
                                <span class="homework-table__description">{hw.description.clone()}</span>
                            </td>
                            <td>{hw.subject.clone()}</td>
                            <td>{short_datetime(hw.due_date)}</td>
                            <td>
                                <span class=status.color_class()>{status.label()}</span>
                            </td>
                            <td>{points_label(hw)}</td>
                            {staff
                                .then(|| {
                                    view! {
                                        <td class="homework-table__submissions">
                                            {format!("{} / {}", hw.submission_count, hw.assigned_students.len())}
                                        </td>
                                    }
                                })}
                            <td class="homework-table__actions">
                                {if staff {
                                    view! { <a class="btn" href=format!("/homework/{}/edit", hw.id)>"Edit"</a> }
                                        .into_any()
                                } else {
                                    view! {
                                        <a class="btn btn--primary" href=format!("/homework/{}/submit", hw.id)>
                                            "Submit"
                                        </a>
                                    }
                                        .into_any()
                                }}
                            </td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="homework-page">
            <header class="homework-page__header">
                <h1>"Homework"</h1>
                <Show when=move || is_staff.get()>
                    <a class="btn btn--primary" href="/homework/new">"New homework"</a>
                </Show>
            </header>

            <div class="homework-page__filters">
                <input
                    class="homework-page__search"
                    type="search"
                    placeholder="Search title, subject or description"
                    prop:value=move || state.with(|s| s.search.clone())
                    on:input=move |ev| state.update(|s| s.search = event_target_value(&ev))
                />
                <select
                    class="homework-page__status"
                    prop:value=move || state.with(|s| s.filter.key())
                    on:change=move |ev| {
                        let filter = HomeworkFilter::from_key(&event_target_value(&ev));
                        state.update(|s| s.set_filter(filter));
                    }
                >
                    {HomeworkFilter::ALL
                        .into_iter()
                        .map(|f| view! { <option value=f.key()>{f.label()}</option> })
                        .collect_view()}
                </select>
            </div>

            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="homework-page__error" role="alert">
                    {move || state.with(|s| s.error.clone().unwrap_or_default())}
                </p>
            </Show>

            <Show
                when=move || state.with(|s| !s.visible().is_empty())
                fallback=move || {
                    view! {
                        <p class="homework-page__empty">
                            {move || if state.with(|s| s.loading) { "Loading…" } else { "No homework found." }}
                        </p>
                    }
                }
            >
                <table class="homework-table">
                    <thead>
                        <tr>
                            <th>"Title"</th>
                            <th>"Subject"</th>
                            <th>"Due"</th>
                            <th>"Status"</th>
                            <th>"Points"</th>
                            <Show when=move || is_staff.get()>
                                <th>"Submissions"</th>
                            </Show>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </Show>

            <PageControls
                page=Signal::derive(move || state.with(|s| s.page))
                total_pages=Signal::derive(move || state.with(|s| s.pagination.total_pages))
                on_change=on_page
            />
        </section>
    }
}
